use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create images table
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(pk_auto(Images::Id))
                    .col(string(Images::Url))
                    .col(string_null(Images::AltText))
                    .col(timestamp_with_time_zone(Images::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create languages table
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(pk_auto(Languages::Id))
                    .col(string(Languages::Name).string_len(100).unique_key())
                    .col(string_null(Languages::Code).string_len(10))
                    .to_owned(),
            )
            .await?;

        // Create brands table
        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(pk_auto(Brands::Id))
                    .col(string(Brands::Name).unique_key())
                    .col(text_null(Brands::Description))
                    .col(integer_null(Brands::LogoId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brand_logo")
                            .from(Brands::Table, Brands::LogoId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name).unique_key())
                    .col(integer_null(Categories::ParentCategoryId))
                    .col(integer_null(Categories::ImageId))
                    .col(boolean(Categories::IsActive).default(true))
                    .col(integer(Categories::Order).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(Categories::Table, Categories::ParentCategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_image")
                            .from(Categories::Table, Categories::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create tags table
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_auto(Tags::Id))
                    .col(string(Tags::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create suppliers table
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(pk_auto(Suppliers::Id))
                    .col(string(Suppliers::Name).unique_key())
                    .col(string_null(Suppliers::ContactPerson))
                    .col(boolean(Suppliers::IsActive).default(true))
                    .col(boolean(Suppliers::HasGivenPaymentAuth).default(true))
                    .col(integer_null(Suppliers::PercentageToAdd))
                    .col(text_null(Suppliers::SupplierExtraInfo))
                    .col(boolean(Suppliers::HasConnectionWithSupplierSystem).default(false))
                    .col(string_null(Suppliers::Iban))
                    .col(string_null(Suppliers::Bic))
                    .col(string_null(Suppliers::AccountHolderName))
                    .col(string_null(Suppliers::AccountHolderCity))
                    .col(string_null(Suppliers::VatNumber))
                    .col(string_null(Suppliers::KvkNumber))
                    .col(string_null(Suppliers::DebtorNumber))
                    .col(string_null(Suppliers::PaymentTerms))
                    .col(text_null(Suppliers::PaymentInstruction))
                    .col(string_null(Suppliers::PaymentMethod))
                    .col(string_null(Suppliers::OrderMethod))
                    .col(integer_null(Suppliers::DeliveryTimeOfOrder))
                    .col(decimal_null(Suppliers::MinimumOrderAmount).decimal_len(10, 2))
                    .col(string_null(Suppliers::Phone))
                    .col(string_null(Suppliers::MobilePhone))
                    .col(string_null(Suppliers::Email))
                    .col(string_null(Suppliers::EmailExtra))
                    .col(string_null(Suppliers::Website))
                    .col(string_null(Suppliers::Facebook))
                    .col(string_null(Suppliers::Twitter))
                    .col(string_null(Suppliers::Linkedin))
                    .col(string_null(Suppliers::Instagram))
                    .col(string_null(Suppliers::Pinterest))
                    .col(string_null(Suppliers::Tiktok))
                    .col(text_null(Suppliers::Memo))
                    .to_owned(),
            )
            .await?;

        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(integer_null(Products::ParentProductId))
                    .col(text(Products::Title))
                    .col(text(Products::TitleLong).default(""))
                    .col(text(Products::Description))
                    .col(text(Products::DescriptionLong).default(""))
                    .col(decimal(Products::PricePerPiece).decimal_len(10, 2))
                    .col(decimal(Products::PricePerUnit).decimal_len(10, 2))
                    .col(decimal_null(Products::PriceConsumers).decimal_len(10, 2))
                    .col(decimal_null(Products::PriceCost).decimal_len(10, 2))
                    .col(string_null(Products::Unit))
                    .col(integer(Products::QuantityPerUnit).default(0))
                    .col(integer(Products::QuantityTotalContent).default(0))
                    .col(integer(Products::MaxOrderAllowedPerUnit).default(0))
                    .col(integer(Products::OverallStock).default(0))
                    .col(integer(Products::FreeStock).default(0))
                    .col(integer(Products::OrderedInProgressStock).default(0))
                    .col(integer(Products::WorkInProgressStock).default(0))
                    .col(boolean(Products::StockDisableWhenSoldOut).default(false))
                    .col(string(Products::Ean).default(""))
                    .col(string(Products::ArticleCode).default(""))
                    .col(string_null(Products::DeliveryTime))
                    .col(string(Products::Location).default(""))
                    .col(string(Products::ExtraLocation).default(""))
                    .col(decimal_null(Products::SizeXValue).decimal_len(10, 2))
                    .col(decimal_null(Products::SizeYValue).decimal_len(10, 2))
                    .col(decimal_null(Products::SizeZValue).decimal_len(10, 2))
                    .col(string(Products::SizeUnit).default(""))
                    .col(decimal_null(Products::Weight).decimal_len(10, 2))
                    .col(string(Products::WeightUnit).default(""))
                    .col(decimal_null(Products::VolumeValue).decimal_len(10, 2))
                    .col(string(Products::VolumeUnit).default(""))
                    .col(string(Products::Volume).default(""))
                    .col(integer_null(Products::BuyMin))
                    .col(integer_null(Products::BuyMax))
                    .col(text(Products::ImportantInformation).default(""))
                    .col(integer_null(Products::BrandId))
                    .col(integer_null(Products::SupplierId))
                    .col(string(Products::MetaTitle).default(""))
                    .col(text(Products::MetaDescription).default(""))
                    .col(string(Products::MetaKeywords).default(""))
                    .col(string(Products::Url).default(""))
                    .col(boolean(Products::IsUsed).default(false))
                    .col(boolean(Products::IsRegular).default(true))
                    .col(boolean(Products::IsFeatured).default(false))
                    .col(boolean(Products::IsVisibleOnWeb).default(true))
                    .col(boolean(Products::IsVisibleOnMobile).default(true))
                    .col(boolean(Products::IsOnlyForExport).default(false))
                    .col(boolean(Products::IsOnlyForB2b).default(false))
                    .col(boolean(Products::IsListedOnMarktplaats).default(false))
                    .col(boolean(Products::IsListedOn2dehands).default(false))
                    .col(integer(Products::Vat).default(0))
                    .col(boolean(Products::StockAlert).default(false))
                    .col(string(Products::Sku).default(""))
                    .col(string(Products::SupplierArticleCode).default(""))
                    .col(string(Products::HsCode).default(""))
                    .col(boolean(Products::HasElectronicBarcode).default(false))
                    .col(boolean(Products::IsBriefBox).default(false))
                    .col(timestamp_with_time_zone(Products::CreatedAt))
                    .col(timestamp_with_time_zone_null(Products::ExpiryDate))
                    .col(string_null(Products::Chip))
                    .col(decimal_null(Products::AverageRating).decimal_len(10, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_parent")
                            .from(Products::Table, Products::ParentProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_brand")
                            .from(Products::Table, Products::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_supplier")
                            .from(Products::Table, Products::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Join tables between products and images, categories, languages and tags
        create_product_link(
            manager,
            ProductLink::ProductsImages,
            ProductLink::ImageId,
            Images::Table,
            Images::Id,
        )
        .await?;
        create_product_link(
            manager,
            ProductLink::ProductsCategories,
            ProductLink::CategoryId,
            Categories::Table,
            Categories::Id,
        )
        .await?;
        create_product_link(
            manager,
            ProductLink::ProductsLanguages,
            ProductLink::LanguageId,
            Languages::Table,
            Languages::Id,
        )
        .await?;
        create_product_link(
            manager,
            ProductLink::ProductsTags,
            ProductLink::TagId,
            Tags::Table,
            Tags::Id,
        )
        .await?;

        // Index for variant lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_products_parent_product_id")
                    .table(Products::Table)
                    .col(Products::ParentProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        for link in [
            ProductLink::ProductsTags,
            ProductLink::ProductsLanguages,
            ProductLink::ProductsCategories,
            ProductLink::ProductsImages,
        ] {
            manager
                .drop_table(Table::drop().table(link).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Languages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// Creates a `products_<other>` join table keyed by both ids. Removing either
/// side removes the link.
async fn create_product_link(
    manager: &SchemaManager<'_>,
    table: ProductLink,
    other_id: ProductLink,
    other_table: impl IntoIden + 'static,
    other_pk: impl IntoIden + 'static,
) -> Result<(), DbErr> {
    let table_name = table.to_string();

    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(integer(ProductLink::ProductId))
                .col(integer(other_id))
                .primary_key(
                    Index::create()
                        .name(format!("pk_{table_name}"))
                        .col(ProductLink::ProductId)
                        .col(other_id),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{table_name}_product"))
                        .from(table, ProductLink::ProductId)
                        .to(Products::Table, Products::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{table_name}_other"))
                        .from(table, other_id)
                        .to(other_table, other_pk)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
enum Images {
    Table,
    Id,
    Url,
    AltText,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Languages {
    Table,
    Id,
    Name,
    Code,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
    Name,
    Description,
    LogoId,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    ParentCategoryId,
    ImageId,
    IsActive,
    Order,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    Name,
    ContactPerson,
    IsActive,
    HasGivenPaymentAuth,
    PercentageToAdd,
    SupplierExtraInfo,
    HasConnectionWithSupplierSystem,
    Iban,
    Bic,
    AccountHolderName,
    AccountHolderCity,
    VatNumber,
    KvkNumber,
    DebtorNumber,
    PaymentTerms,
    PaymentInstruction,
    PaymentMethod,
    OrderMethod,
    DeliveryTimeOfOrder,
    MinimumOrderAmount,
    Phone,
    MobilePhone,
    Email,
    EmailExtra,
    Website,
    Facebook,
    Twitter,
    Linkedin,
    Instagram,
    Pinterest,
    Tiktok,
    Memo,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    ParentProductId,
    Title,
    TitleLong,
    Description,
    DescriptionLong,
    PricePerPiece,
    PricePerUnit,
    PriceConsumers,
    PriceCost,
    Unit,
    QuantityPerUnit,
    QuantityTotalContent,
    MaxOrderAllowedPerUnit,
    OverallStock,
    FreeStock,
    OrderedInProgressStock,
    WorkInProgressStock,
    StockDisableWhenSoldOut,
    Ean,
    ArticleCode,
    DeliveryTime,
    Location,
    ExtraLocation,
    SizeXValue,
    SizeYValue,
    SizeZValue,
    SizeUnit,
    Weight,
    WeightUnit,
    VolumeValue,
    VolumeUnit,
    Volume,
    BuyMin,
    BuyMax,
    ImportantInformation,
    BrandId,
    SupplierId,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    Url,
    IsUsed,
    IsRegular,
    IsFeatured,
    IsVisibleOnWeb,
    IsVisibleOnMobile,
    IsOnlyForExport,
    #[sea_orm(iden = "is_only_for_b2b")]
    IsOnlyForB2b,
    IsListedOnMarktplaats,
    #[sea_orm(iden = "is_listed_on_2dehands")]
    IsListedOn2dehands,
    Vat,
    StockAlert,
    Sku,
    SupplierArticleCode,
    HsCode,
    HasElectronicBarcode,
    IsBriefBox,
    CreatedAt,
    ExpiryDate,
    Chip,
    AverageRating,
}

#[derive(DeriveIden, Clone, Copy)]
enum ProductLink {
    ProductsImages,
    ProductsCategories,
    ProductsLanguages,
    ProductsTags,
    ProductId,
    ImageId,
    CategoryId,
    LanguageId,
    TagId,
}
