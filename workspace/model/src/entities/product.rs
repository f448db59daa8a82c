use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, QueryOrder, Set};
use tracing::trace;

use super::{brand, category, image, language, supplier, tag};
use crate::validation::{effective, ValidationError};

/// Packaging unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(255))")]
pub enum Unit {
    #[sea_orm(string_value = "piece")]
    Piece,
    #[sea_orm(string_value = "package")]
    Package,
    #[sea_orm(string_value = "box")]
    Box,
    #[sea_orm(string_value = "pallet_layer")]
    PalletLayer,
    #[sea_orm(string_value = "pallet_full")]
    PalletFull,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Piece => "Piece",
            Unit::Package => "Package",
            Unit::Box => "Box",
            Unit::PalletLayer => "Pallet Layer",
            Unit::PalletFull => "Pallet Full",
        }
    }
}

/// Promised delivery time. Stored as the codes "0" to "3".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(255))")]
pub enum DeliveryTime {
    #[sea_orm(string_value = "0")]
    NextDay,
    #[sea_orm(string_value = "1")]
    ThreeToFiveDays,
    #[sea_orm(string_value = "2")]
    FiveToTenDays,
    #[sea_orm(string_value = "3")]
    OnRequest,
}

impl DeliveryTime {
    /// Label shown to customers.
    pub fn label(self) -> &'static str {
        match self {
            DeliveryTime::NextDay => "Vandaag Besteld Morgen In Huis",
            DeliveryTime::ThreeToFiveDays => "3 / 5 Dagen",
            DeliveryTime::FiveToTenDays => "5 / 10 Dagen",
            DeliveryTime::OnRequest => "Op Aanvragen",
        }
    }
}

/// Promotional badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(255))")]
pub enum Chip {
    #[sea_orm(string_value = "multi_pack")]
    MultiPack,
    #[sea_orm(string_value = "deal")]
    Deal,
}

impl Chip {
    pub fn label(self) -> &'static str {
        match self {
            Chip::MultiPack => "Multi Pack",
            Chip::Deal => "Deal Pack",
        }
    }
}

/// A sellable product. Variants point at their parent product and carry the
/// fields that differ between variants (titles, prices, stock, sizes).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Set on variants; deleting the parent deletes its variants.
    pub parent_product_id: Option<i32>,

    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", default_value = "")]
    pub title_long: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", default_value = "")]
    pub description_long: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_piece: Decimal,
    /// `price_per_piece * quantity_per_unit` whenever the quantity is known.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_unit: Decimal,
    /// Recommended consumer price.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price_consumers: Option<Decimal>,
    /// Purchase price.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price_cost: Option<Decimal>,

    pub unit: Option<Unit>,
    #[sea_orm(default_value = "0")]
    pub quantity_per_unit: i32,
    #[sea_orm(default_value = "0")]
    pub quantity_total_content: i32,
    #[sea_orm(default_value = "0")]
    pub max_order_allowed_per_unit: i32,
    /// Always `free + ordered_in_progress + work_in_progress`.
    #[sea_orm(default_value = "0")]
    pub overall_stock: i32,
    #[sea_orm(default_value = "0")]
    pub free_stock: i32,
    #[sea_orm(default_value = "0")]
    pub ordered_in_progress_stock: i32,
    #[sea_orm(default_value = "0")]
    pub work_in_progress_stock: i32,
    #[sea_orm(default_value = "false")]
    pub stock_disable_when_sold_out: bool,
    #[sea_orm(default_value = "")]
    pub ean: String,
    #[sea_orm(default_value = "")]
    pub article_code: String,

    pub delivery_time: Option<DeliveryTime>,
    #[sea_orm(default_value = "")]
    pub location: String,
    #[sea_orm(default_value = "")]
    pub extra_location: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub size_x_value: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub size_y_value: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub size_z_value: Option<Decimal>,
    #[sea_orm(default_value = "")]
    pub size_unit: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub weight: Option<Decimal>,
    #[sea_orm(default_value = "")]
    pub weight_unit: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub volume_value: Option<Decimal>,
    #[sea_orm(default_value = "")]
    pub volume_unit: String,
    #[sea_orm(default_value = "")]
    pub volume: String,
    pub buy_min: Option<i32>,
    pub buy_max: Option<i32>,

    #[sea_orm(column_type = "Text", default_value = "")]
    pub important_information: String,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,

    #[sea_orm(default_value = "")]
    pub meta_title: String,
    #[sea_orm(column_type = "Text", default_value = "")]
    pub meta_description: String,
    #[sea_orm(default_value = "")]
    pub meta_keywords: String,
    #[sea_orm(default_value = "")]
    pub url: String,

    /// Second-hand goods.
    #[sea_orm(default_value = "false")]
    pub is_used: bool,
    /// Regular assortment, as opposed to a one-off lot.
    #[sea_orm(default_value = "true")]
    pub is_regular: bool,
    #[sea_orm(default_value = "false")]
    pub is_featured: bool,
    #[sea_orm(default_value = "true")]
    pub is_visible_on_web: bool,
    #[sea_orm(default_value = "true")]
    pub is_visible_on_mobile: bool,
    #[sea_orm(default_value = "false")]
    pub is_only_for_export: bool,
    /// Only shown to logged in business customers.
    #[sea_orm(column_name = "is_only_for_b2b", default_value = "false")]
    pub is_only_for_b2b: bool,
    #[sea_orm(default_value = "false")]
    pub is_listed_on_marktplaats: bool,
    #[sea_orm(column_name = "is_listed_on_2dehands", default_value = "false")]
    pub is_listed_on_2dehands: bool,
    /// VAT rate in percent.
    #[sea_orm(default_value = "0")]
    pub vat: i32,
    #[sea_orm(default_value = "false")]
    pub stock_alert: bool,

    #[sea_orm(default_value = "")]
    pub sku: String,
    #[sea_orm(default_value = "")]
    pub supplier_article_code: String,
    #[sea_orm(default_value = "")]
    pub hs_code: String,
    #[sea_orm(default_value = "false")]
    pub has_electronic_barcode: bool,
    /// Fits a letterbox parcel: at most 1 kg and 26.4 x 38 x 3.2 cm.
    #[sea_orm(default_value = "false")]
    pub is_brief_box: bool,

    pub created_at: DateTimeUtc,
    pub expiry_date: Option<DateTimeUtc>,
    pub chip: Option<Chip>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub average_rating: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentProductId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "brand::Entity",
        from = "Column::BrandId",
        to = "brand::Column::Id",
        on_delete = "Cascade"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "supplier::Entity",
        from = "Column::SupplierId",
        to = "supplier::Column::Id",
        on_delete = "Cascade"
    )]
    Supplier,
    #[sea_orm(has_many = "super::product_image::Entity")]
    ProductImage,
    #[sea_orm(has_many = "super::product_category::Entity")]
    ProductCategory,
    #[sea_orm(has_many = "super::product_language::Entity")]
    ProductLanguage,
    #[sea_orm(has_many = "super::product_tag::Entity")]
    ProductTag,
}

impl Related<Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }

    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<image::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_image::Relation::Image.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_image::Relation::Product.def().rev())
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_category::Relation::Category.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_category::Relation::Product.def().rev())
    }
}

impl Related<language::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_language::Relation::Language.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_language::Relation::Product.def().rev())
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_tag::Relation::Product.def().rev())
    }
}

impl ActiveModel {
    /// Recomputes the derived stock and unit price columns.
    ///
    /// `stored` supplies the values of columns left `NotSet` on an update.
    /// Derived columns are only touched when their value changes.
    ///
    /// Fails when the stock columns add up to more than the overall stock
    /// column can hold.
    pub fn apply_derivations(&mut self, stored: Option<&Model>) -> Result<(), ValidationError> {
        let free = effective(&self.free_stock, stored.map(|m| &m.free_stock));
        let ordered = effective(
            &self.ordered_in_progress_stock,
            stored.map(|m| &m.ordered_in_progress_stock),
        );
        let in_progress = effective(
            &self.work_in_progress_stock,
            stored.map(|m| &m.work_in_progress_stock),
        );
        let total: i64 = [free, ordered, in_progress]
            .into_iter()
            .map(|v| i64::from(v.copied().unwrap_or_default()))
            .sum();
        let overall = i32::try_from(total).map_err(|_| ValidationError::ValueOutOfRange {
            field_name: "overall_stock",
            value: total,
            min: i64::from(i32::MIN),
            max: i64::from(i32::MAX),
        })?;
        if effective(&self.overall_stock, stored.map(|m| &m.overall_stock)) != Some(&overall) {
            trace!(overall, "Deriving overall stock");
            self.overall_stock = Set(overall);
        }

        let quantity = effective(&self.quantity_per_unit, stored.map(|m| &m.quantity_per_unit))
            .copied()
            .unwrap_or_default();
        let piece = effective(&self.price_per_piece, stored.map(|m| &m.price_per_piece)).copied();
        if let Some(piece) = piece.filter(|_| quantity > 0) {
            let per_unit = piece * Decimal::from(quantity);
            if effective(&self.price_per_unit, stored.map(|m| &m.price_per_unit)) != Some(&per_unit)
            {
                trace!(%per_unit, "Deriving price per unit");
                self.price_per_unit = Set(per_unit);
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
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let stored = if insert { None } else { self.stored(db).await? };
        self.apply_derivations(stored.as_ref())?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(chrono::Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    pub fn is_variant(&self) -> bool {
        self.parent_product_id.is_some()
    }

    /// Sold out products flagged to disappear are not offered.
    pub fn is_available(&self) -> bool {
        !(self.stock_disable_when_sold_out && self.free_stock <= 0)
    }

    /// All variants of this product, oldest first.
    pub async fn variants<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ParentProductId.eq(self.id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
