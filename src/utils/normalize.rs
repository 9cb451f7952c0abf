// src/utils/normalize.rs
//! Input normalization for verification queries and certificate records.
//!
//! Names and serials are typed by humans and stored by humans, so both sides of
//! a comparison are folded through the same pipeline before matching:
//! 1. Trim surrounding whitespace
//! 2. Collapse internal whitespace runs to a single space
//! 3. Apply Unicode compatibility normalization (NFKC)
//! 4. Fold case (lower for names, upper for serials)

use unicode_normalization::UnicodeNormalization;

/// Minimum accepted serial length, in characters.
pub const SERIAL_MIN_LEN: usize = 3;

/// Maximum accepted serial length, in characters.
pub const SERIAL_MAX_LEN: usize = 64;

/// Whitespace as browsers see it: Unicode `White_Space` plus the byte order
/// mark, minus NEL (U+0085).
pub fn is_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Trims and collapses separator runs to a single space.
fn collapse(s: &str) -> String {
    s.split(is_separator)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses whitespace, applies NFKC, then collapses again.
///
/// NFKC can turn a character into a space plus a combining mark (U+00A8 becomes
/// `" \u{308}"`), so the second pass keeps the output a fixed point of `fold`.
fn fold(s: &str) -> String {
    let composed: String = collapse(s).nfkc().collect();
    collapse(&composed)
}

/// Normalizes a certificate holder name for comparison.
///
/// Case folding runs between two folds because a few lowercase letters only
/// reach their final form after NFKC (U+1D2C folds to `A`).
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_name("  Jane   Doe "), "jane doe");
/// ```
pub fn normalize_name(s: &str) -> String {
    fold(&fold(s).to_lowercase())
}

/// Normalizes a serial code for comparison and format validation.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_serial(" abc-123 "), "ABC-123");
/// ```
pub fn normalize_serial(s: &str) -> String {
    fold(&fold(s).to_uppercase())
}

/// Checks that an already-normalized serial has an acceptable shape.
///
/// Accepts 3 to 64 characters drawn from `A-Z`, `0-9`, `-` and whitespace.
/// Anything else is rejected before the collection store is contacted.
pub fn is_valid_serial_format(serial: &str) -> bool {
    let allowed = |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || is_separator(c);

    let len = serial.chars().count();
    (SERIAL_MIN_LEN..=SERIAL_MAX_LEN).contains(&len) && serial.chars().all(allowed)
}
