use sea_orm::entity::prelude::*;

/// A language that can be printed on a product's packaging.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// ISO 639-1 code, e.g. "nl".
    pub code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_language::Entity")]
    ProductLanguage,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_language::Relation::Product.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_language::Relation::Language.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
