use crate::errors::DiscoveryError;

const RELEASE_SEPARATOR: &str = "_release_";

pub fn parse_repository(id: &str) -> Result<String, DiscoveryError> {
    if let Some(at) = rightmost_date_separator(id) {
        return Ok(id[..at].to_string());
    }
    if let Some(at) = rightmost_release_separator(id) {
        return Ok(id[..at].to_string());
    }
    Err(DiscoveryError::new(id))
}

// The repository prefix may itself contain underscores, so the longest
// prefix wins: scan for the rightmost `_YYYY_MM_DD_` window that leaves a
// non-empty repository and a non-empty name on either side.
fn rightmost_date_separator(id: &str) -> Option<usize> {
    let bytes = id.as_bytes();
    if bytes.len() < 14 {
        return None;
    }
    (1..bytes.len() - 12)
        .rev()
        .find(|&at| is_date_separator(&bytes[at..at + 12]))
}

fn is_date_separator(window: &[u8]) -> bool {
    window.len() == 12
        && window[0] == b'_'
        && window[1..5].iter().all(u8::is_ascii_digit)
        && window[5] == b'_'
        && window[6..8].iter().all(u8::is_ascii_digit)
        && window[8] == b'_'
        && window[9..11].iter().all(u8::is_ascii_digit)
        && window[11] == b'_'
}

fn rightmost_release_separator(id: &str) -> Option<usize> {
    id.match_indices(RELEASE_SEPARATOR)
        .map(|(at, _)| at)
        .filter(|&at| at >= 1 && at + RELEASE_SEPARATOR.len() < id.len())
        .last()
}
