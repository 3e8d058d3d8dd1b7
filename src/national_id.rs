//! Chilean RUT and passport identifiers.
//!
//! A RUT is a numeric body followed by a modulo 11 check digit (`0`-`9` or
//! `K`). Non-nationals identify themselves with a passport number written
//! behind a `P` marker, which has no checksum.

/// Marker opening a passport identifier.
pub const PASSPORT_MARKER: char = 'P';

pub const PASSPORT_MIN_LENGTH: usize = 5;
pub const PASSPORT_MAX_LENGTH: usize = 20;

/// Weights applied to the reversed RUT body, cycling.
pub const RUT_WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];

/// Upper-cases, trims, and removes the `-` and `.` separators.
pub fn normalize(id: &str) -> String {
    id.trim()
        .to_uppercase()
        .chars()
        .filter(|c| *c != '-' && *c != '.')
        .collect()
}

pub fn is_passport(normalized: &str) -> bool {
    normalized.starts_with(PASSPORT_MARKER)
}

/// Check digit of a RUT body, `None` if the body is not a run of digits.
///
/// ```
/// use bulk_enroll_rs::national_id::check_digit;
///
/// assert_eq!(check_digit("11111111"), Some('1'));
/// assert_eq!(check_digit("12a"), None);
/// ```
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() {
        return None;
    }

    let mut sum: u32 = 0;
    for (digit, weight) in body.chars().rev().zip(RUT_WEIGHTS.iter().cycle()) {
        sum += digit.to_digit(10)? * weight;
    }

    match (11 - sum % 11) % 11 {
        10 => Some('K'),
        residue => char::from_digit(residue, 10),
    }
}

/// Validates a RUT or passport identifier. Never fails, malformed input is
/// simply invalid.
pub fn is_valid(id: &str) -> bool {
    let normalized = normalize(id);

    if is_passport(&normalized) {
        let body_length = normalized.chars().count() - 1;
        return (PASSPORT_MIN_LENGTH..=PASSPORT_MAX_LENGTH).contains(&body_length);
    }

    let mut chars = normalized.chars();
    let Some(given) = chars.next_back() else {
        return false;
    };

    check_digit(chars.as_str()) == Some(given)
}

/// Storage form of an identifier: normalized, and for RUTs a `-` before the
/// check digit.
///
/// ```
/// use bulk_enroll_rs::national_id::canonicalize;
///
/// assert_eq!(canonicalize("11.111.111-1"), "11111111-1");
/// assert_eq!(canonicalize(" p012345 "), "P012345");
/// ```
pub fn canonicalize(id: &str) -> String {
    let normalized = normalize(id);

    if is_passport(&normalized) {
        return normalized;
    }

    let mut chars = normalized.chars();
    match chars.next_back() {
        Some(check) => format!("{}-{}", chars.as_str(), check),
        None => normalized,
    }
}
