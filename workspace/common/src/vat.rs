//! VAT identification number checks.
//!
//! Numbers are normalised (separators removed, upper-cased), split into the
//! two-letter VIES country prefix and the national part, matched against the
//! published national format and, for NL, BE and DE, verified against the
//! national check digit rule. Other member states are format checked only.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Reasons a VAT number is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VatError {
    #[error("VAT number is empty")]
    Empty,

    #[error("unknown VAT country prefix '{0}'")]
    UnknownCountry(String),

    #[error("'{number}' does not match the {country} VAT number format")]
    InvalidFormat { country: String, number: String },

    #[error("check digits of {country}{number} do not match")]
    InvalidChecksum { country: String, number: String },

    /// The checking backend could not answer. Callers may retry later.
    #[error("VAT registry unavailable: {0}")]
    BackendUnavailable(String),
}

impl VatError {
    /// True when the error says nothing about the number itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, VatError::BackendUnavailable(_))
    }
}

/// A VAT number that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VatNumber {
    country: String,
    number: String,
}

impl VatNumber {
    /// Two-letter VIES prefix, e.g. `NL` or `EL` for Greece.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// National part without the prefix.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for VatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.country, self.number)
    }
}

/// Checks a raw VAT number.
///
/// Implementations backed by a remote registry must report outages as
/// [`VatError::BackendUnavailable`] so they are not mistaken for rejections.
pub trait VatValidator {
    fn validate(&self, raw: &str) -> Result<VatNumber, VatError>;
}

/// Format and check digit validation without any network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineVatValidator;

impl VatValidator for OfflineVatValidator {
    fn validate(&self, raw: &str) -> Result<VatNumber, VatError> {
        validate_vat_number(raw)
    }
}

/// National number formats as published by the VIES service. Digits are
/// ASCII only; the check digit rules below index into the number by byte.
static FORMATS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    [
        ("AT", r"^U[0-9]{8}$"),
        ("BE", r"^[01][0-9]{9}$"),
        ("BG", r"^[0-9]{9,10}$"),
        ("CY", r"^[0-9]{8}[A-Z]$"),
        ("CZ", r"^[0-9]{8,10}$"),
        ("DE", r"^[0-9]{9}$"),
        ("DK", r"^[0-9]{8}$"),
        ("EE", r"^[0-9]{9}$"),
        ("EL", r"^[0-9]{9}$"),
        ("ES", r"^[A-Z0-9][0-9]{7}[A-Z0-9]$"),
        ("FI", r"^[0-9]{8}$"),
        ("FR", r"^[A-HJ-NP-Z0-9]{2}[0-9]{9}$"),
        ("HR", r"^[0-9]{11}$"),
        ("HU", r"^[0-9]{8}$"),
        ("IE", r"^([0-9]{7}[A-W][A-I]?|[0-9][A-Z+*][0-9]{5}[A-W])$"),
        ("IT", r"^[0-9]{11}$"),
        ("LT", r"^([0-9]{9}|[0-9]{12})$"),
        ("LU", r"^[0-9]{8}$"),
        ("LV", r"^[0-9]{11}$"),
        ("MT", r"^[0-9]{8}$"),
        ("NL", r"^[0-9]{9}B[0-9]{2}$"),
        ("PL", r"^[0-9]{10}$"),
        ("PT", r"^[0-9]{9}$"),
        ("RO", r"^[1-9][0-9]{1,9}$"),
        ("SE", r"^[0-9]{12}$"),
        ("SI", r"^[0-9]{8}$"),
        ("SK", r"^[0-9]{10}$"),
        ("XI", r"^([0-9]{9}|[0-9]{12}|GD[0-9]{3}|HA[0-9]{3})$"),
    ]
    .into_iter()
    .filter_map(|(country, pattern)| Regex::new(pattern).ok().map(|re| (country, re)))
    .collect()
});

/// Removes whitespace, dots and hyphens and upper-cases the rest.
pub fn normalize_vat_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Validates a VAT number with the offline rules.
pub fn validate_vat_number(raw: &str) -> Result<VatNumber, VatError> {
    let normalized = normalize_vat_number(raw);
    trace!(raw, %normalized, "Validating VAT number");

    if normalized.is_empty() {
        return Err(VatError::Empty);
    }

    let (country, number) = match (normalized.get(..2), normalized.get(2..)) {
        (Some(country), Some(number)) => (country, number),
        _ => return Err(VatError::UnknownCountry(normalized.clone())),
    };

    let format = FORMATS
        .get(country)
        .ok_or_else(|| VatError::UnknownCountry(country.to_string()))?;

    if !format.is_match(number) {
        debug!(country, number, "VAT number format mismatch");
        return Err(VatError::InvalidFormat {
            country: country.to_string(),
            number: number.to_string(),
        });
    }

    let checksum_ok = match country {
        "NL" => nl_checksum(number),
        "BE" => be_checksum(number),
        "DE" => de_checksum(number),
        _ => true,
    };

    if !checksum_ok {
        debug!(country, number, "VAT number checksum mismatch");
        return Err(VatError::InvalidChecksum {
            country: country.to_string(),
            number: number.to_string(),
        });
    }

    Ok(VatNumber {
        country: country.to_string(),
        number: number.to_string(),
    })
}

fn digits(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Dutch numbers pass either the legacy eleven-test on the first nine
/// digits or, for sole proprietors, ISO 7064 mod 97 over the full number.
fn nl_checksum(number: &str) -> bool {
    let d = digits(number.get(..9).unwrap_or_default());
    if d.len() != 9 {
        return false;
    }
    let weighted: i64 = d[..8]
        .iter()
        .zip((2..=9).rev())
        .map(|(digit, weight)| i64::from(*digit) * weight)
        .sum::<i64>()
        - i64::from(d[8]);
    if weighted % 11 == 0 {
        return true;
    }

    mod97(&format!("NL{number}")) == 1
}

/// Belgian numbers: the last two digits equal 97 minus the first eight mod 97.
fn be_checksum(number: &str) -> bool {
    let (Some(base), Some(check)) = (number.get(..8), number.get(8..)) else {
        return false;
    };
    let (Ok(base), Ok(check)) = (base.parse::<u64>(), check.parse::<u64>()) else {
        return false;
    };
    97 - base % 97 == check
}

/// German numbers: ISO 7064 MOD 11,10.
fn de_checksum(number: &str) -> bool {
    let d = digits(number);
    if d.len() != 9 {
        return false;
    }
    let mut product = 10;
    for digit in &d[..8] {
        let mut sum = (digit + product) % 10;
        if sum == 0 {
            sum = 10;
        }
        product = (2 * sum) % 11;
    }
    let check = match 11 - product {
        10 => 0,
        c => c,
    };
    check == d[8]
}

/// Remainder of the number obtained by replacing letters with 10..35.
fn mod97(s: &str) -> u32 {
    s.chars().fold(0u32, |acc, c| match c.to_digit(36) {
        Some(v) if v >= 10 => (acc * 100 + v) % 97,
        Some(v) => (acc * 10 + v) % 97,
        None => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_vat_number(" nl 1234.5678-2b01 "), "NL123456782B01");
    }

    #[test]
    fn test_valid_dutch_numbers() {
        // Eleven-test
        let vat = validate_vat_number("NL123456782B01").unwrap();
        assert_eq!(vat.country(), "NL");
        assert_eq!(vat.number(), "123456782B01");
        assert_eq!(vat.to_string(), "NL123456782B01");

        // Mod 97 (sole proprietor)
        assert!(validate_vat_number("NL000099998B57").is_ok());
    }

    #[test]
    fn test_dutch_checksum_mismatch() {
        assert_eq!(
            validate_vat_number("NL123456789B01"),
            Err(VatError::InvalidChecksum {
                country: "NL".to_string(),
                number: "123456789B01".to_string(),
            })
        );
    }

    #[test]
    fn test_belgian_numbers() {
        assert!(validate_vat_number("BE0417497106").is_ok());
        assert!(validate_vat_number("BE 0403.170.701").is_ok());
        assert!(matches!(
            validate_vat_number("BE0417497107"),
            Err(VatError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn test_german_numbers() {
        assert!(validate_vat_number("DE136695976").is_ok());
        assert!(validate_vat_number("DE811569869").is_ok());
        assert!(matches!(
            validate_vat_number("DE123456789"),
            Err(VatError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn test_format_only_countries() {
        assert!(validate_vat_number("ATU12345678").is_ok());
        assert!(validate_vat_number("FR12345678901").is_ok());
        assert!(matches!(
            validate_vat_number("AT12345678"),
            Err(VatError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_prefix_and_empty() {
        assert_eq!(
            validate_vat_number("US123456789"),
            Err(VatError::UnknownCountry("US".to_string()))
        );
        assert_eq!(
            validate_vat_number("1"),
            Err(VatError::UnknownCountry("1".to_string()))
        );
        assert_eq!(validate_vat_number("  "), Err(VatError::Empty));
    }

    #[test]
    fn test_dutch_format_requires_b_block() {
        assert!(matches!(
            validate_vat_number("NL123456782"),
            Err(VatError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_every_country_format_compiles() {
        assert_eq!(FORMATS.len(), 28);
        for country in ["AT", "BE", "DE", "EL", "IE", "NL", "XI"] {
            assert!(FORMATS.contains_key(country), "missing format for {country}");
        }
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        // Arabic-Indic digits
        assert_eq!(
            validate_vat_number("NL١٢٣٤٥٦٧٨٢B01"),
            Err(VatError::InvalidFormat {
                country: "NL".to_string(),
                number: "١٢٣٤٥٦٧٨٢B01".to_string(),
            })
        );
        assert!(matches!(
            validate_vat_number("DE١٣٦٦٩٥٩٧٦"),
            Err(VatError::InvalidFormat { .. })
        ));
        // Fullwidth digits
        assert!(matches!(
            validate_vat_number("BE０４１７４９７１０６"),
            Err(VatError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_multibyte_prefix() {
        assert_eq!(
            validate_vat_number("ÉS12345678"),
            Err(VatError::UnknownCountry("É".to_string()))
        );
        // The two-byte split falls inside the second character
        assert_eq!(
            validate_vat_number("NÉ123456782B01"),
            Err(VatError::UnknownCountry("NÉ123456782B01".to_string()))
        );
        assert!(matches!(
            validate_vat_number("ＮＬ123456782B01"),
            Err(VatError::UnknownCountry(_))
        ));
    }

    #[test]
    fn test_normalize_multibyte_input() {
        // Upper-casing may change the length
        assert_eq!(normalize_vat_number("de ß1"), "DESS1");
        assert!(matches!(
            validate_vat_number("deß36695976"),
            Err(VatError::InvalidFormat { .. })
        ));
        assert_eq!(normalize_vat_number("nl\u{00a0}123"), "NL123");
    }

    #[test]
    fn test_offline_validator_matches_function() {
        let validator = OfflineVatValidator;
        assert_eq!(
            validator.validate("DE136695976"),
            validate_vat_number("DE136695976")
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(VatError::BackendUnavailable("timeout".into()).is_transient());
        assert!(!VatError::Empty.is_transient());
    }

    #[test]
    fn test_vat_number_serde() {
        let vat = validate_vat_number("BE0417497106").unwrap();
        let json = serde_json::to_string(&vat).unwrap();
        assert_eq!(json, r#"{"country":"BE","number":"0417497106"}"#);
    }
}
