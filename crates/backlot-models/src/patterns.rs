//! Shared validation patterns.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164-ish phone numbers with optional spaces, dashes and parentheses.
pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{5,18}[0-9]$").unwrap());

/// SKUs: uppercase alphanumerics and dashes, 2 to 32 characters.
pub static SKU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,31}$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_pattern_accepts_common_formats() {
        assert!(PHONE_RE.is_match("+15551234567"));
        assert!(PHONE_RE.is_match("(555) 123-4567"));
        assert!(!PHONE_RE.is_match("bad"));
        assert!(!PHONE_RE.is_match("+1"));
    }

    #[test]
    fn sku_pattern_is_uppercase_alphanumeric() {
        assert!(SKU_RE.is_match("TOWEL-XL-01"));
        assert!(!SKU_RE.is_match("towel-xl"));
        assert!(!SKU_RE.is_match("A"));
    }
}
