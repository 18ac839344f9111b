//! Charset decoding via `encoding_rs`.

use encoding_rs::Encoding;

use crate::error::{ResolveError, ResolveResult};

/// Resolve a user-written charset token to an encoding. `encoding_rs` only
/// knows WHATWG labels, so spaced and hyphenated spellings like `CP-1252`
/// are retried in collapsed forms.
fn resolve_label(label: &str) -> Option<&'static Encoding> {
    let lower = label.trim().to_ascii_lowercase();
    let candidates = [
        lower.clone(),
        lower.replace(' ', "-"),
        lower.replace(['-', ' '], ""),
    ];
    candidates
        .iter()
        .find_map(|candidate| Encoding::for_label(candidate.as_bytes()))
}

/// Decode `bytes` according to the declared charset label.
pub fn decode_bytes(bytes: &[u8], label: &str) -> ResolveResult<String> {
    let encoding = resolve_label(label)
        .ok_or_else(|| ResolveError::Parameter(format!("unknown encoding '{}'", label)))?;

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ResolveError::Format(format!(
            "bytes are not valid {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}
