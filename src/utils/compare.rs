//! Constant-time string comparison
//!
//! Issuer, audience and subject values are compared without early exit so
//! that response timing does not reveal how much of an expected value matched.

use constant_time_eq::constant_time_eq;

/// Compare two strings in time independent of their contents
pub(crate) fn strings_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// Check whether `needle` equals any entry of `haystack`
///
/// Every entry is compared, even after a match has been found.
pub(crate) fn contains(haystack: &[&str], needle: &str) -> bool {
    haystack
        .iter()
        .fold(false, |found, candidate| strings_eq(candidate, needle) | found)
}
