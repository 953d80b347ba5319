//! Centralized input limits and helper checks.

/// Largest repeat count accepted on a single pattern atom
pub const MAX_REPEAT: usize = 10_000;

/// Largest number of atoms a pattern may expand to
pub const MAX_PATTERN_ATOMS: usize = 100_000;

/// Maximum number of records allowed in a single database file (DOS protection)
pub const MAX_RECORDS: usize = 100_000;

/// Deepest recursion the backtracking engine may reach before giving up
pub const MAX_BACKTRACK_DEPTH: usize = 1024;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Validate that a name is usable as an enzyme or fingerprint identifier.
///
/// # Examples
///
/// ```
/// use motifscan::utils::validation::is_valid_name;
///
/// assert!(is_valid_name("EcoRI"));
/// assert!(is_valid_name("PR00001"));
/// assert!(!is_valid_name(""));
/// assert!(!is_valid_name("Eco RI"));
/// ```
#[must_use]
pub fn is_valid_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_record_limit() {
        assert!(check_record_limit(0).is_none());
        assert!(check_record_limit(MAX_RECORDS - 1).is_none());
        assert!(check_record_limit(MAX_RECORDS).is_some());
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("BsaI"));
        assert!(is_valid_name("Bsp1286I"));
        assert!(!is_valid_name("Bsa\tI"));
    }
}
