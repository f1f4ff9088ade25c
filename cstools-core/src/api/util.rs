//! Helpers for shaping REST v1 request parameters.

use uuid::Uuid;

/// Render values as the bracketed, comma-separated string the v1 API expects
/// for array parameters, e.g. `[WORKSHEET,USER_DEFINED]`.
///
/// Duplicates are removed, first occurrence wins. Returns `None` for empty input
/// so the parameter is omitted rather than sent blank.
pub fn stringified_array<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();

    for value in values {
        let value = value.as_ref();
        if !seen.iter().any(|v| v == value) {
            seen.push(value.to_string());
        }
    }

    if seen.is_empty() {
        return None;
    }

    Some(format!("[{}]", seen.join(",")))
}

/// True if `candidate` is a canonical, hyphenated lowercase GUID.
pub fn is_valid_guid(candidate: &str) -> bool {
    match Uuid::parse_str(candidate) {
        Ok(guid) => guid.hyphenated().to_string() == candidate,
        Err(_) => false,
    }
}
