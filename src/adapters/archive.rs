//! Zip archive access.

use std::fs::File;
use std::path::Path;

use crate::error::{ResolveError, ResolveResult};

fn open(path: &Path) -> ResolveResult<zip::ZipArchive<File>> {
    let file = File::open(path).map_err(|err| {
        ResolveError::Execution(format!("cannot open archive {}: {}", path.display(), err))
    })?;
    zip::ZipArchive::new(file)
        .map_err(|err| ResolveError::Format(format!("not a valid zip archive: {}", err)))
}

/// Names of all members in the archive, in stored order.
pub fn list_members(path: &Path) -> ResolveResult<Vec<String>> {
    let archive = open(path)?;
    Ok(archive.file_names().map(String::from).collect())
}

/// Extract one member to `dest`. `member` matches the stored name exactly,
/// or the basename of an entry when the archive nests it in a directory.
pub fn extract_member(archive_path: &Path, member: &str, dest: &Path) -> ResolveResult<()> {
    let mut archive = open(archive_path)?;

    let stored_name = archive
        .file_names()
        .find(|name| {
            *name == member
                || Path::new(name)
                    .file_name()
                    .is_some_and(|base| base == Path::new(member).as_os_str())
        })
        .map(String::from)
        .ok_or_else(|| {
            ResolveError::Format(format!("archive has no member named '{}'", member))
        })?;

    let mut entry = archive
        .by_name(&stored_name)
        .map_err(|err| ResolveError::Format(format!("cannot read archive member: {}", err)))?;
    let mut out = File::create(dest).map_err(|err| {
        ResolveError::Execution(format!("cannot create {}: {}", dest.display(), err))
    })?;
    std::io::copy(&mut entry, &mut out)
        .map_err(|err| ResolveError::Format(format!("cannot extract '{}': {}", member, err)))?;
    Ok(())
}
