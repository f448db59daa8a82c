use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, RelationTrait};

/// A product category. Categories nest (e.g. "Drinks" -> "Soda"); deleting a
/// category deletes its subcategories.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Self-referencing foreign key for nested categories.
    pub parent_category_id: Option<i32>,
    /// Cleared when the image is deleted.
    pub image_id: Option<i32>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// Position among its siblings, ascending.
    #[sea_orm(default_value = "0")]
    pub order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Defines the self-referencing relationship for the parent category.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCategoryId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "SetNull"
    )]
    Image,
    #[sea_orm(has_many = "super::product_category::Entity")]
    ProductCategory,
}

// Implement Related trait for self-referencing relationship
impl Related<Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }

    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_category::Relation::Product.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_category::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns this category followed by its parents up to the root.
    pub async fn ancestors<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        let mut categories = vec![self.clone()];
        let mut current = self.clone();

        while let Some(parent_id) = current.parent_category_id {
            match Entity::find_by_id(parent_id).one(db).await? {
                // A cycle would otherwise never end.
                Some(parent) if categories.iter().any(|c| c.id == parent.id) => break,
                Some(parent) => {
                    categories.push(parent.clone());
                    current = parent;
                }
                None => break,
            }
        }

        Ok(categories)
    }

    /// Direct subcategories in display order.
    pub async fn children<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ParentCategoryId.eq(self.id))
            .order_by_asc(Column::Order)
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection, PaginatorTrait, Set};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn create_test_category(
        db: &DatabaseConnection,
        id: i32,
        name: &str,
        parent_category_id: Option<i32>,
        order: i32,
    ) -> Model {
        let category = ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            parent_category_id: Set(parent_category_id),
            image_id: Set(None),
            is_active: Set(true),
            order: Set(order),
        };

        category.insert(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_ancestors_of_root_category() {
        let db = setup_test_db().await;

        let root = create_test_category(&db, 1, "Drinks", None, 0).await;

        let ancestors = root.ancestors(&db).await.unwrap();

        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0].id, 1);
        assert_eq!(ancestors[0].parent_category_id, None);
    }

    #[tokio::test]
    async fn test_ancestors_multi_level_hierarchy() {
        let db = setup_test_db().await;

        // Drinks -> Soda -> Cola
        create_test_category(&db, 1, "Drinks", None, 0).await;
        create_test_category(&db, 2, "Soda", Some(1), 0).await;
        let cola = create_test_category(&db, 3, "Cola", Some(2), 0).await;

        let ancestors = cola.ancestors(&db).await.unwrap();

        assert_eq!(ancestors.len(), 3);
        assert_eq!(ancestors[0].name, "Cola");
        assert_eq!(ancestors[1].name, "Soda");
        assert_eq!(ancestors[2].name, "Drinks");
    }

    #[tokio::test]
    async fn test_children_in_display_order() {
        let db = setup_test_db().await;

        let root = create_test_category(&db, 1, "Root", None, 0).await;
        let first = create_test_category(&db, 2, "Zzz", Some(1), 1).await;
        create_test_category(&db, 3, "Aaa", Some(1), 2).await;
        create_test_category(&db, 4, "Grandchild", Some(2), 0).await;

        let children = root.children(&db).await.unwrap();
        assert_eq!(
            children.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Zzz", "Aaa"]
        );

        let grandchildren = first.children(&db).await.unwrap();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].id, 4);
    }

    #[tokio::test]
    async fn test_deleting_parent_cascades() {
        let db = setup_test_db().await;

        let root = create_test_category(&db, 1, "Root", None, 0).await;
        create_test_category(&db, 2, "Child", Some(1), 0).await;
        create_test_category(&db, 3, "Other", None, 0).await;

        root.delete(&db).await.unwrap();

        assert_eq!(Entity::find().count(&db).await.unwrap(), 1);
    }
}
