use std::fmt;

use super::{AccountType, ActiveModel, Model};
use crate::validation::{ValidationError, effective, is_blank};

/// A field that can be mandatory depending on the account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MandatoryField {
    Email,
    Password,
    BusinessName,
    ContactPersonName,
    ContactPersonPhoneNumber,
    Vat,
    Kvk,
}

impl MandatoryField {
    pub(super) const BASE: &'static [MandatoryField] =
        &[MandatoryField::Email, MandatoryField::Password];

    pub(super) const BUSINESS: &'static [MandatoryField] = &[
        MandatoryField::Email,
        MandatoryField::Password,
        MandatoryField::BusinessName,
        MandatoryField::ContactPersonName,
        MandatoryField::ContactPersonPhoneNumber,
        MandatoryField::Vat,
        MandatoryField::Kvk,
    ];

    /// Column name, as reported in validation errors.
    pub fn name(self) -> &'static str {
        match self {
            MandatoryField::Email => "email",
            MandatoryField::Password => "password",
            MandatoryField::BusinessName => "business_name",
            MandatoryField::ContactPersonName => "contact_person_name",
            MandatoryField::ContactPersonPhoneNumber => "contact_person_phone_number",
            MandatoryField::Vat => "vat",
            MandatoryField::Kvk => "kvk",
        }
    }
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The account as it will look after a pending write.
pub(super) struct PendingAccount<'a> {
    active: &'a ActiveModel,
    stored: Option<&'a Model>,
}

impl ActiveModel {
    pub(super) fn pending<'a>(&'a self, stored: Option<&'a Model>) -> PendingAccount<'a> {
        PendingAccount {
            active: self,
            stored,
        }
    }
}

impl PendingAccount<'_> {
    /// Unset on a new row means the column default.
    pub(super) fn account_type(&self) -> AccountType {
        effective(&self.active.account_type, self.stored.map(|m| &m.account_type))
            .copied()
            .unwrap_or_default()
    }

    fn value(&self, field: MandatoryField) -> Option<&str> {
        let (active, stored) = (self.active, self.stored);
        match field {
            MandatoryField::Email => {
                effective(&active.email, stored.map(|m| &m.email)).map(String::as_str)
            }
            MandatoryField::Password => {
                effective(&active.password, stored.map(|m| &m.password)).map(String::as_str)
            }
            MandatoryField::BusinessName => {
                effective(&active.business_name, stored.map(|m| &m.business_name))
                    .and_then(|v| v.as_deref())
            }
            MandatoryField::ContactPersonName => effective(
                &active.contact_person_name,
                stored.map(|m| &m.contact_person_name),
            )
            .and_then(|v| v.as_deref()),
            MandatoryField::ContactPersonPhoneNumber => effective(
                &active.contact_person_phone_number,
                stored.map(|m| &m.contact_person_phone_number),
            )
            .and_then(|v| v.as_deref()),
            MandatoryField::Vat => {
                effective(&active.vat, stored.map(|m| &m.vat)).and_then(|v| v.as_deref())
            }
            MandatoryField::Kvk => {
                effective(&active.kvk, stored.map(|m| &m.kvk)).and_then(|v| v.as_deref())
            }
        }
    }

    fn missing(&self) -> impl Iterator<Item = MandatoryField> + '_ {
        self.account_type()
            .mandatory_fields()
            .iter()
            .copied()
            .filter(|field| is_blank(self.value(*field)))
    }

    /// Stops at the first empty field.
    pub(super) fn check_mandatory_fields(&self) -> Result<(), ValidationError> {
        match self.missing().next() {
            Some(field) => Err(ValidationError::MissingMandatoryField {
                field_name: field.name(),
            }),
            None => Ok(()),
        }
    }

    pub(super) fn missing_mandatory_fields(&self) -> Vec<MandatoryField> {
        self.missing().collect()
    }
}

#[cfg(test)]
impl MandatoryField {
    pub(super) fn clear(self, account: &mut ActiveModel) {
        use sea_orm::Set;

        match self {
            MandatoryField::Email => account.email = Set(String::new()),
            MandatoryField::Password => account.password = Set(String::new()),
            MandatoryField::BusinessName => account.business_name = Set(None),
            MandatoryField::ContactPersonName => account.contact_person_name = Set(Some(String::new())),
            MandatoryField::ContactPersonPhoneNumber => account.contact_person_phone_number = Set(None),
            MandatoryField::Vat => account.vat = Set(Some(String::new())),
            MandatoryField::Kvk => account.kvk = Set(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_sets_per_type() {
        assert_eq!(AccountType::Particular.mandatory_fields(), MandatoryField::BASE);
        assert_eq!(AccountType::Admin.mandatory_fields(), MandatoryField::BASE);
        assert_eq!(AccountType::Special.mandatory_fields(), MandatoryField::BUSINESS);
        assert_eq!(AccountType::Wholesaler.mandatory_fields().len(), 7);
        assert!(AccountType::Supermarket.requires_business_details());
    }

    #[test]
    fn test_unset_type_means_particular() {
        let account = ActiveModel::default();
        assert_eq!(account.pending(None).account_type(), AccountType::Particular);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(MandatoryField::ContactPersonPhoneNumber.to_string(), "contact_person_phone_number");
        assert_eq!(MandatoryField::Kvk.name(), "kvk");
    }
}
