//! Scratch-file tracking for one resolution.
//!
//! Each resolution gets its own directory under the configured scratch root.
//! The streamed upload and any extracted archive members land inside that
//! directory, and shell commands run with it as their working directory, so
//! their side effects do too. Files created elsewhere are registered
//! explicitly. The engine releases the scope on both the success and the
//! failure path, so no request leaves files behind.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

/// Tracks the scratch directory and files of a single resolution.
pub struct ReleaseScope {
    dir: PathBuf,
    files: Mutex<Vec<PathBuf>>,
}

impl ReleaseScope {
    /// Open a scope with a fresh directory under `root`, creating it.
    pub fn new(root: &Path) -> io::Result<Self> {
        let dir = root.join(format!("req_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            files: Mutex::new(Vec::new()),
        })
    }

    /// The scope's private directory. Work that spawns commands or extracts
    /// archives uses this as its working directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Track a file outside the scope directory. Files inside the directory
    /// need no registration; the whole directory goes at release.
    pub fn register(&self, path: PathBuf) {
        self.files.lock().expect("scope lock poisoned").push(path);
    }

    /// Mint a unique path inside the scope directory, keeping the extension
    /// of `hint` so format sniffing by extension still works. The caller
    /// creates the file.
    pub fn scratch_path(&self, hint: &str) -> PathBuf {
        let name = match sanitized_extension(hint) {
            Some(ext) => format!("upload_{}.{}", Uuid::new_v4(), ext),
            None => format!("upload_{}", Uuid::new_v4()),
        };
        self.dir.join(name)
    }

    /// Delete every tracked file and the scope directory itself. Failures
    /// are logged and swallowed; cleanup never replaces a computed answer
    /// with an error. Safe to call more than once.
    pub fn release(&self) {
        let files = {
            let mut guard = self.files.lock().expect("scope lock poisoned");
            std::mem::take(&mut *guard)
        };
        for path in files {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed scratch file"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to remove scratch file");
                }
            }
        }

        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::debug!(dir = %self.dir.display(), "removed scratch dir"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), error = %err, "failed to remove scratch dir");
            }
        }
    }
}

// Backstop for paths that drop the scope without resolving, e.g. a request
// that fails while its body is still streaming in. `release` is idempotent,
// so the engine's explicit call stays the primary path.
impl Drop for ReleaseScope {
    fn drop(&mut self) {
        self.release();
    }
}

fn sanitized_extension(hint: &str) -> Option<String> {
    let ext = Path::new(hint).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
