use std::fmt;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use tracing::{debug, instrument, warn};

use crate::validation::{SaveError, ValidationError};

mod rules;

pub use rules::MandatoryField;

/// Customer classification. Decides which fields an account must fill in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountType {
    #[sea_orm(string_value = "special")]
    Special,
    #[sea_orm(string_value = "wholesaler")]
    Wholesaler,
    #[sea_orm(string_value = "supermarket")]
    Supermarket,
    #[default]
    #[sea_orm(string_value = "particular")]
    Particular,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl AccountType {
    /// Business accounts must carry company, contact and registration details.
    pub fn requires_business_details(self) -> bool {
        !matches!(self, AccountType::Particular | AccountType::Admin)
    }

    /// The fields that must be non-empty, in the order they are checked.
    pub fn mandatory_fields(self) -> &'static [MandatoryField] {
        if self.requires_business_details() {
            MandatoryField::BUSINESS
        } else {
            MandatoryField::BASE
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountType::Special => "Special",
            AccountType::Wholesaler => "Wholesaler",
            AccountType::Supermarket => "Supermarket",
            AccountType::Particular => "Particular",
            AccountType::Admin => "Admin",
        }
    }
}

/// A customer or staff account. Accounts log in with their e-mail address.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// Password hash as produced by the password hasher.
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub mobile_number: Option<String>,
    #[sea_orm(column_name = "type")]
    pub account_type: AccountType,

    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,

    pub business_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub contact_person_phone_number: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_eligible_to_work_with: bool,
    pub department: Option<String>,
    pub classification: Option<String>,
    pub branch: Option<String>,
    #[sea_orm(default_value = "false")]
    pub inform_when_new_products: bool,
    pub inform_via: Option<String>,
    pub invoice_language: Option<String>,

    pub iban: Option<String>,
    pub bic: Option<String>,
    pub account_holder_name: Option<String>,
    pub account_holder_city: Option<String>,
    /// VAT identification number.
    pub vat: Option<String>,
    /// Dutch Chamber of Commerce number.
    pub kvk: Option<String>,
    pub payment_method: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub customer_percentage: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub invoice_discount: Option<Decimal>,
    pub payment_termin: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_payment_termin_active: bool,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub credit_limit: Option<Decimal>,
    /// Direct debit authorised.
    #[sea_orm(default_value = "false")]
    pub incasseren: bool,
    pub invoice_address: Option<String>,
    pub discount_group: Option<String>,
    /// Hex colour, e.g. `#1a2b3c`.
    pub customer_color: Option<String>,
    pub relation_type: Option<String>,
    pub relation_via: Option<String>,
    #[sea_orm(default_value = "false")]
    pub notify: bool,
    pub days_closed: Option<String>,
    pub days_no_delivery: Option<String>,

    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub fax: Option<String>,
    pub contact_person_email: Option<String>,
    pub website: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_subscribed_newsletters: bool,
    #[sea_orm(default_value = "false")]
    pub is_access_granted_social_media: bool,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub pinterest: Option<String>,
    pub tiktok: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub last_login: Option<DateTimeUtc>,
    pub last_transaction_date: Option<DateTimeUtc>,
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_action_log::Entity")]
    ActionLog,
}

impl Related<super::account_action_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActionLog.def()
    }
}

impl Model {
    /// First and last name separated by a space, or the e-mail when both are empty.
    pub fn full_name(&self) -> String {
        let full_name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.email.clone()
        } else {
            full_name.to_string()
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

impl ActiveModel {
    /// Applies the account rules to this pending write.
    ///
    /// Admin accounts get `is_staff` and `is_superuser` forced on before the
    /// mandatory fields are checked, so the flags are set on `self` even when
    /// the check then fails. `stored` is the current row for updates; it
    /// supplies the values of columns this model leaves `NotSet`.
    pub fn validate(&mut self, stored: Option<&Model>) -> Result<(), ValidationError> {
        if self.pending(stored).account_type() == AccountType::Admin {
            self.grant_admin_privileges();
        }

        let result = self.pending(stored).check_mandatory_fields();
        if let Err(error) = &result {
            debug!(%error, "Account rejected");
        }
        result
    }

    /// Every mandatory field that is still empty, in check order.
    pub fn missing_mandatory_fields(&self, stored: Option<&Model>) -> Vec<MandatoryField> {
        self.pending(stored).missing_mandatory_fields()
    }

    pub fn grant_admin_privileges(&mut self) {
        self.is_staff = Set(true);
        self.is_superuser = Set(true);
    }

    /// Loads the row this model would update, if there is one.
    pub async fn stored<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Model>, DbErr> {
        match &self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => {
                Entity::find_by_id(*id).one(db).await
            }
            ActiveValue::NotSet => Ok(None),
        }
    }

    /// Validates and writes the account, inserting when no row exists yet.
    #[instrument(skip_all, fields(id = ?self.id))]
    pub async fn persist<C: ConnectionTrait>(mut self, db: &C) -> Result<Model, SaveError> {
        let stored = self.stored(db).await?;
        self.validate(stored.as_ref())?;

        let model = match stored {
            Some(_) => self.update(db).await?,
            None => self.insert(db).await?,
        };
        debug!(id = model.id, email = %model.email, "Account saved");
        Ok(model)
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let stored = if insert { None } else { self.stored(db).await? };

        if let Err(error) = self.validate(stored.as_ref()) {
            warn!(%error, insert, "Refusing to save account");
            return Err(error.into());
        }

        if insert && self.date_joined.is_not_set() {
            self.date_joined = Set(Utc::now());
        }
        Ok(self)
    }
}
