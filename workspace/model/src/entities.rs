//! This file serves as the root for all SeaORM entity modules.
//! Each module holds one table of the wholesale catalog: customer accounts,
//! suppliers, brands, categories, tags, images, languages and products, plus
//! the join tables linking products to the latter four.

pub mod account;
pub mod account_action_log;
pub mod brand;
pub mod category;
pub mod image;
pub mod language;
pub mod product;
pub mod product_category;
pub mod product_image;
pub mod product_language;
pub mod product_tag;
pub mod supplier;
pub mod tag;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::account_action_log::Entity as AccountActionLog;
    pub use super::brand::Entity as Brand;
    pub use super::category::Entity as Category;
    pub use super::image::Entity as Image;
    pub use super::language::Entity as Language;
    pub use super::product::Entity as Product;
    pub use super::product_category::Entity as ProductCategory;
    pub use super::product_image::Entity as ProductImage;
    pub use super::product_language::Entity as ProductLanguage;
    pub use super::product_tag::Entity as ProductTag;
    pub use super::supplier::Entity as Supplier;
    pub use super::tag::Entity as Tag;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use rust_decimal_macros::dec;
    use sea_orm::{
        ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait,
        ModelTrait, PaginatorTrait, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let logo = image::ActiveModel {
            url: Set("https://cdn.example.com/logo.png".to_string()),
            alt_text: Set(Some("Logo".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let brand = brand::ActiveModel {
            name: Set("Fizz".to_string()),
            description: Set(Some("Soft drinks".to_string())),
            logo_id: Set(Some(logo.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let supplier = supplier::ActiveModel {
            name: Set("Drinks Direct".to_string()),
            vat_number: Set(Some("NL123456782B01".to_string())),
            payment_method: Set(Some(supplier::PaymentMethod::Bank)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let drinks = category::ActiveModel {
            name: Set("Drinks".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let dutch = language::ActiveModel {
            name: Set("Dutch".to_string()),
            code: Set(Some("nl".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let sale = tag::ActiveModel {
            name: Set("Sale".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let product = product::ActiveModel {
            title: Set("Fizz Lemon 1L".to_string()),
            description: Set("Lemon soda".to_string()),
            price_per_piece: Set(dec!(1.10)),
            price_per_unit: Set(dec!(6.60)),
            quantity_per_unit: Set(6),
            brand_id: Set(Some(brand.id)),
            supplier_id: Set(Some(supplier.id)),
            chip: Set(Some(product::Chip::MultiPack)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        product_image::ActiveModel {
            product_id: Set(product.id),
            image_id: Set(logo.id),
        }
        .insert(&db)
        .await?;
        product_category::ActiveModel {
            product_id: Set(product.id),
            category_id: Set(drinks.id),
        }
        .insert(&db)
        .await?;
        product_language::ActiveModel {
            product_id: Set(product.id),
            language_id: Set(dutch.id),
        }
        .insert(&db)
        .await?;
        product_tag::ActiveModel {
            product_id: Set(product.id),
            tag_id: Set(sale.id),
        }
        .insert(&db)
        .await?;

        // Join rows resolve to both of their sides
        let (link, linked_tag) = ProductTag::find()
            .find_also_related(Tag)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(linked_tag.map(|t| t.id), Some(sale.id));
        let linked_product = link.find_related(Product).one(&db).await?.unwrap();
        assert_eq!(linked_product.id, product.id);

        let link = ProductCategory::find().one(&db).await?.unwrap();
        let linked_category = link.find_related(Category).one(&db).await?.unwrap();
        assert_eq!(linked_category.id, drinks.id);

        let link = ProductLanguage::find().one(&db).await?.unwrap();
        let linked_language = link.find_related(Language).one(&db).await?.unwrap();
        assert_eq!(linked_language.id, dutch.id);

        let link = ProductImage::find().one(&db).await?.unwrap();
        let linked_image = link.find_related(Image).one(&db).await?.unwrap();
        assert_eq!(linked_image.id, logo.id);

        // Defaults come from the schema
        let product = Product::find_by_id(product.id).one(&db).await?.unwrap();
        assert!(product.is_regular);
        assert!(product.is_visible_on_web);
        assert!(!product.is_only_for_b2b);
        assert_eq!(product.title_long, "");
        assert_eq!(product.vat, 0);

        // Many-to-many lookups through the join tables
        let tags = product.find_related(Tag).all(&db).await?;
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Sale");

        let categories = product.find_related(Category).all(&db).await?;
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, drinks.id);

        let languages = product.find_related(Language).all(&db).await?;
        assert_eq!(languages[0].code.as_deref(), Some("nl"));

        let images = product.find_related(Image).all(&db).await?;
        assert_eq!(images[0].url, "https://cdn.example.com/logo.png");

        let products_of_supplier = supplier.find_related(Product).all(&db).await?;
        assert_eq!(products_of_supplier.len(), 1);

        // Deleting the logo image keeps the brand but clears the reference,
        // and removes the image from the product gallery.
        logo.delete(&db).await?;
        let brand = Brand::find_by_id(brand.id).one(&db).await?.unwrap();
        assert_eq!(brand.logo_id, None);
        assert_eq!(ProductImage::find().count(&db).await?, 0);

        // Deleting the brand deletes its products and their links
        brand.delete(&db).await?;
        assert_eq!(Product::find().count(&db).await?, 0);
        assert_eq!(ProductTag::find().count(&db).await?, 0);
        assert_eq!(ProductCategory::find().count(&db).await?, 0);
        assert_eq!(Tag::find().count(&db).await?, 1);
        assert_eq!(Category::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_account_action_log() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let account = account::ActiveModel {
            email: Set("klant@winkel.nl".to_string()),
            password: Set("hash".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let entry = account_action_log::Model::record(&db, account.id, "login").await?;
        assert_eq!(entry.action, "login");
        assert!(entry.to_string().starts_with(&format!("{} - login - ", account.id)));

        let log = account.find_related(AccountActionLog).all(&db).await?;
        assert_eq!(log.len(), 1);

        account.delete(&db).await?;
        assert_eq!(AccountActionLog::find().count(&db).await?, 0);
        Ok(())
    }
}
