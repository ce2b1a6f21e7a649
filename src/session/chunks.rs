use std::collections::BTreeMap;

/// Cookie chunk reassembly error type
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ChunkError {
    #[error("No cookie matches the `{0}` prefix")]
    NotFound(String),
    #[error("Cookie `{0}` has an invalid chunk suffix")]
    InvalidSuffix(String),
    #[error("Chunk {0} appears more than once")]
    DuplicateChunk(usize),
    #[error("Chunk {0} is missing")]
    MissingChunk(usize),
    #[error("Unchunked and chunked cookies cannot be mixed")]
    MixedChunks,
    #[error("Reassembled cookie value is empty")]
    Empty,
}

/// Reassemble a logical cookie value from a `name=value; name=value` string.
///
/// Only cookies whose name starts with `prefix` are considered. The value is
/// either carried whole by a cookie named exactly `prefix`, or split across
/// cookies named `prefix-0`, `prefix-1`, ... which are concatenated in index
/// order regardless of the order they appear in `cookies`.
pub fn join_cookies(prefix: &str, cookies: &str) -> Result<String, ChunkError> {
    let mut whole = None;
    let mut chunks = BTreeMap::new();

    for pair in cookies.split("; ").filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };

        if suffix.is_empty() {
            if whole.replace(value).is_some() {
                return Err(ChunkError::DuplicateChunk(0));
            }
            continue;
        }

        let index = chunk_index(suffix).ok_or_else(|| ChunkError::InvalidSuffix(name.into()))?;
        if chunks.insert(index, value).is_some() {
            return Err(ChunkError::DuplicateChunk(index));
        }
    }

    let joined = match (whole, chunks.is_empty()) {
        (Some(value), true) => value.to_string(),
        (Some(_), false) => return Err(ChunkError::MixedChunks),
        (None, true) => return Err(ChunkError::NotFound(prefix.into())),
        (None, false) => {
            // BTreeMap keys are sorted, so any gap shows up as a key/position mismatch
            if let Some(missing) = chunks.keys().enumerate().find(|(i, k)| i != *k).map(|(i, _)| i) {
                return Err(ChunkError::MissingChunk(missing));
            }
            chunks.into_values().collect()
        }
    };

    if joined.is_empty() {
        Err(ChunkError::Empty)
    } else {
        Ok(joined)
    }
}

/// Split a raw `Cookie` header into `(name, value)` pairs, values left as sent.
///
/// Pairs without a `=` or with an empty name are skipped.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
}

/// Split a cookie value into `(name, value)` pairs of at most `max_len` characters each
pub fn split_cookie(name: &str, value: &str, max_len: usize) -> Vec<(String, String)> {
    let max_len = max_len.max(1);
    if value.chars().count() <= max_len {
        return vec![(name.to_string(), value.to_string())];
    }

    let chars: Vec<char> = value.chars().collect();
    chars
        .chunks(max_len)
        .enumerate()
        .map(|(i, chunk)| (format!("{name}-{i}"), chunk.iter().collect()))
        .collect()
}

/// Parse a `-<digits>` chunk suffix
fn chunk_index(suffix: &str) -> Option<usize> {
    let digits = suffix.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
