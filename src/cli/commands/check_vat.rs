use anyhow::{Context, Result};
use common::{OfflineVatValidator, VatNumber, VatValidator};
use tracing::{debug, warn};

/// Validates `raw` with the offline VAT rules and prints the normalised number.
pub fn check_vat(raw: &str) -> Result<()> {
    let vat = check_with(&OfflineVatValidator, raw)?;
    println!("{vat}");
    Ok(())
}

fn check_with<V: VatValidator>(validator: &V, raw: &str) -> Result<VatNumber> {
    debug!(raw, "Checking VAT number");
    validator
        .validate(raw)
        .inspect_err(|error| warn!(raw, %error, "VAT number rejected"))
        .with_context(|| format!("'{raw}' is not a valid VAT number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_number_is_normalised() {
        let vat = check_with(&OfflineVatValidator, "nl 1234.567.82 b01").unwrap();
        assert_eq!(vat.to_string(), "NL123456782B01");
    }

    #[test]
    fn test_rejection_keeps_the_reason() {
        let error = check_with(&OfflineVatValidator, "BE0417497107").unwrap_err();
        assert!(error.to_string().contains("BE0417497107"));
        assert!(error.chain().count() >= 2);
        assert!(check_vat("DE123456789").is_err());
    }
}
