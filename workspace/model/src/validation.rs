//! Errors and shared helpers for the pre-save record rules.
//!
//! Every rule runs twice on the normal write path: once explicitly through the
//! `persist` helpers (returning a typed [`ValidationError`]) and once inside
//! SeaORM's `before_save` hook, where a violation aborts the write as
//! `DbErr::Custom`. Raw `insert`/`update` calls are therefore gated as well.

use common::VatError;
use sea_orm::{ActiveValue, DbErr, Value};
use thiserror::Error;

/// A record failed one of its pre-save rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The {field_name} field is mandatory for this account type")]
    MissingMandatoryField { field_name: &'static str },

    #[error("Invalid VAT number '{value}': {reason}")]
    InvalidVatNumber { value: String, reason: VatError },

    /// The VAT check could not be performed. Not a verdict on the number.
    #[error("VAT validation backend unavailable: {reason}")]
    ValidationBackendUnavailable { reason: String },

    #[error("The {field_name} field must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field_name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    /// Whether retrying the same record later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ValidationError::ValidationBackendUnavailable { .. })
    }

    /// Maps a VAT checker result onto the record error for `value`.
    pub fn from_vat_error(value: &str, error: VatError) -> Self {
        match error {
            VatError::BackendUnavailable(reason) => {
                ValidationError::ValidationBackendUnavailable { reason }
            }
            reason => ValidationError::InvalidVatNumber {
                value: value.to_string(),
                reason,
            },
        }
    }
}

impl From<ValidationError> for DbErr {
    fn from(error: ValidationError) -> Self {
        DbErr::Custom(error.to_string())
    }
}

/// Failure of a validated save.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl SaveError {
    /// The rule violation, if this failure was one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SaveError::Validation(error) => Some(error),
            SaveError::Database(_) => None,
        }
    }
}

/// The value a column will hold after the write: the pending value when the
/// active model carries one, otherwise the stored row's value.
pub(crate) fn effective<'a, V>(active: &'a ActiveValue<V>, stored: Option<&'a V>) -> Option<&'a V>
where
    V: Into<Value>,
{
    match active {
        ActiveValue::Set(value) | ActiveValue::Unchanged(value) => Some(value),
        ActiveValue::NotSet => stored,
    }
}

/// Absent or empty. Whitespace counts as content.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Set;

    #[test]
    fn test_effective_prefers_pending_value() {
        let active: ActiveValue<Option<String>> = Set(Some("new".to_string()));
        let stored = Some("old".to_string());
        assert_eq!(effective(&active, Some(&stored)), Some(&Some("new".to_string())));
    }

    #[test]
    fn test_effective_falls_back_to_stored() {
        let active: ActiveValue<Option<String>> = ActiveValue::NotSet;
        let stored = Some("old".to_string());
        assert_eq!(effective(&active, Some(&stored)), Some(&stored));
        assert_eq!(effective(&active, None), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(!is_blank(Some(" ")));
        assert!(!is_blank(Some("x")));
    }

    #[test]
    fn test_backend_errors_stay_distinct() {
        let error = ValidationError::from_vat_error(
            "NL123456782B01",
            VatError::BackendUnavailable("connection refused".to_string()),
        );
        assert!(error.is_transient());
        assert!(matches!(error, ValidationError::ValidationBackendUnavailable { .. }));

        let error = ValidationError::from_vat_error("XX1", VatError::UnknownCountry("XX".into()));
        assert!(!error.is_transient());
        assert_eq!(
            error,
            ValidationError::InvalidVatNumber {
                value: "XX1".to_string(),
                reason: VatError::UnknownCountry("XX".into()),
            }
        );
    }

    #[test]
    fn test_into_db_err_keeps_message() {
        let error: DbErr = ValidationError::MissingMandatoryField { field_name: "kvk" }.into();
        assert!(matches!(
            error,
            DbErr::Custom(message) if message == "The kvk field is mandatory for this account type"
        ));
    }
}
