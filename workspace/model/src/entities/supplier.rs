use common::{OfflineVatValidator, VatValidator};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use tracing::{debug, instrument, warn};

use crate::validation::{SaveError, ValidationError, effective};

/// How a supplier is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(255))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Cash register.
    #[sea_orm(string_value = "kas")]
    Kas,
    #[sea_orm(string_value = "pin")]
    Pin,
}

/// How orders are placed with a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(255))")]
pub enum OrderMethod {
    #[sea_orm(string_value = "mail")]
    Mail,
    #[sea_orm(string_value = "whatsapp")]
    Whatsapp,
    #[sea_orm(string_value = "phone")]
    Phone,
}

/// A company products are bought from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub contact_person: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// Standing payment order given.
    #[sea_orm(default_value = "true")]
    pub has_given_payment_auth: bool,
    /// Markup in percent, 0 to 100.
    pub percentage_to_add: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub supplier_extra_info: Option<String>,
    #[sea_orm(default_value = "false")]
    pub has_connection_with_supplier_system: bool,

    pub iban: Option<String>,
    pub bic: Option<String>,
    pub account_holder_name: Option<String>,
    pub account_holder_city: Option<String>,
    pub vat_number: Option<String>,
    /// Chamber of Commerce number.
    pub kvk_number: Option<String>,
    pub debtor_number: Option<String>,
    pub payment_terms: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub payment_instruction: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub order_method: Option<OrderMethod>,
    /// Lead time in days.
    pub delivery_time_of_order: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub minimum_order_amount: Option<Decimal>,

    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub email: Option<String>,
    pub email_extra: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub pinterest: Option<String>,
    pub tiktok: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub memo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

const PERCENTAGE_RANGE: (i64, i64) = (0, 100);

impl ActiveModel {
    /// Checks the supplier with the offline VAT rules.
    pub fn validate(&self, stored: Option<&Model>) -> Result<(), ValidationError> {
        self.validate_with(stored, &OfflineVatValidator)
    }

    /// Checks the VAT number (when there is one) with `vat` and the markup range.
    pub fn validate_with<V>(&self, stored: Option<&Model>, vat: &V) -> Result<(), ValidationError>
    where
        V: VatValidator + ?Sized,
    {
        let vat_number = effective(&self.vat_number, stored.map(|m| &m.vat_number))
            .and_then(|v| v.as_deref());

        if let Some(value) = vat_number.filter(|v| !v.is_empty()) {
            vat.validate(value)
                .map_err(|error| ValidationError::from_vat_error(value, error))?;
        }

        let percentage = effective(&self.percentage_to_add, stored.map(|m| &m.percentage_to_add))
            .copied()
            .flatten();
        if let Some(value) = percentage {
            let (min, max) = PERCENTAGE_RANGE;
            let value = i64::from(value);
            if !(min..=max).contains(&value) {
                return Err(ValidationError::ValueOutOfRange {
                    field_name: "percentage_to_add",
                    value,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }

    pub async fn stored<C: ConnectionTrait>(&self, db: &C) -> Result<Option<Model>, DbErr> {
        match &self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => {
                Entity::find_by_id(*id).one(db).await
            }
            ActiveValue::NotSet => Ok(None),
        }
    }

    /// Validates and writes the supplier, inserting when no row exists yet.
    #[instrument(skip_all, fields(id = ?self.id))]
    pub async fn persist<C: ConnectionTrait>(self, db: &C) -> Result<Model, SaveError> {
        let stored = self.stored(db).await?;
        if let Err(error) = self.validate(stored.as_ref()) {
            debug!(%error, "Supplier rejected");
            return Err(error.into());
        }

        let model = match stored {
            Some(_) => self.update(db).await?,
            None => self.insert(db).await?,
        };
        debug!(id = model.id, name = %model.name, "Supplier saved");
        Ok(model)
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let stored = if insert { None } else { self.stored(db).await? };

        if let Err(error) = self.validate(stored.as_ref()) {
            warn!(%error, insert, "Refusing to save supplier");
            return Err(error.into());
        }
        Ok(self)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
