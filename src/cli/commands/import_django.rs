use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use model::SaveError;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, NotSet, Set,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, trace, warn};

use model::entities::{
    account, brand, category, image, language, product, product_category, product_image,
    product_language, product_tag, supplier, tag,
};

/// Main structure for Django dump
#[derive(Debug, Deserialize)]
pub struct DjangoRecord {
    model: String,
    #[serde(deserialize_with = "deserialize_pk")]
    pk: i32,
    fields: serde_json::Value,
}

/// Custom deserializer for pk field that handles both string and integer PKs
fn deserialize_pk<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;

    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom("pk number out of i32 range")),
        // String keys belong to models we never import (sessions and the like)
        serde_json::Value::String(_s) => Ok(0),
        _ => Err(D::Error::custom("pk must be a number or string")),
    }
}

fn default_true() -> bool {
    true
}

/// Django Image Model
#[derive(Debug, Deserialize)]
struct DjangoImage {
    image: String,
    alt_text: Option<String>,
    created_at: Option<String>,
}

/// Django Language Model
#[derive(Debug, Deserialize)]
struct DjangoLanguage {
    name: String,
    code: Option<String>,
}

/// Django Brand Model
#[derive(Debug, Deserialize)]
struct DjangoBrand {
    name: String,
    description: Option<String>,
    logo: Option<i32>,
}

/// Django Category Model
#[derive(Debug, Deserialize)]
struct DjangoCategory {
    name: String,
    parent_category: Option<i32>,
    image: Option<i32>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    order: i32,
}

/// Django Tag Model
#[derive(Debug, Deserialize)]
struct DjangoTag {
    name: String,
}

/// Django Supplier Model
#[derive(Debug, Deserialize)]
struct DjangoSupplier {
    name: String,
    contact_person: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(rename = "hasGivenPaymentAuth", default = "default_true")]
    has_given_payment_auth: bool,
    percentage_to_add: Option<i32>,
    supplier_extra_info: Option<String>,
    #[serde(default)]
    has_connection_with_supplier_system: bool,
    iban: Option<String>,
    bic: Option<String>,
    account_holder_name: Option<String>,
    account_holder_city: Option<String>,
    vat_number: Option<String>,
    kvk_number: Option<String>,
    debtor_number: Option<String>,
    payment_terms: Option<String>,
    payment_instruction: Option<String>,
    payment_method: Option<String>,
    order_method: Option<String>,
    delivery_time_of_order: Option<i32>,
    minimum_order_amount: Option<String>,
    phone: Option<String>,
    mobile_phone: Option<String>,
    email: Option<String>,
    email_extra: Option<String>,
    website: Option<String>,
    facebook: Option<String>,
    twitter: Option<String>,
    linkedin: Option<String>,
    instagram: Option<String>,
    pinterest: Option<String>,
    tiktok: Option<String>,
    memo: Option<String>,
}

/// Django Custom User Model
#[derive(Debug, Deserialize)]
struct DjangoUser {
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    birthdate: Option<String>,
    phone_number: Option<String>,
    mobile_number: Option<String>,
    #[serde(rename = "type", default)]
    account_type: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    is_staff: bool,
    #[serde(default)]
    is_superuser: bool,
    business_name: Option<String>,
    contact_person_name: Option<String>,
    contact_person_phone_number: Option<String>,
    #[serde(default = "default_true")]
    is_eligible_to_work_with: bool,
    department: Option<String>,
    classification: Option<String>,
    branch: Option<String>,
    invoice_language: Option<String>,
    iban: Option<String>,
    bic: Option<String>,
    account_holder_name: Option<String>,
    account_holder_city: Option<String>,
    vat: Option<String>,
    kvk: Option<String>,
    payment_method: Option<String>,
    customer_percentage: Option<String>,
    invoice_discount: Option<String>,
    credit_limit: Option<String>,
    notes: Option<String>,
    last_login: Option<String>,
    date_joined: Option<String>,
}

/// Django Product Model
#[derive(Debug, Deserialize)]
struct DjangoProduct {
    parent_product: Option<i32>,
    title: String,
    #[serde(default)]
    title_long: String,
    description: String,
    #[serde(default)]
    description_long: String,
    #[serde(default)]
    images: Vec<i32>,
    price_per_piece: String,
    price_per_unit: Option<String>,
    price_consumers: Option<String>,
    price_cost: Option<String>,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    quantity_per_unit: i32,
    #[serde(default)]
    quantity_total_content: i32,
    #[serde(default)]
    max_order_allowed_per_unit: i32,
    #[serde(default)]
    free_stock: i32,
    #[serde(default)]
    ordered_in_progress_stock: i32,
    #[serde(default)]
    work_in_progress_stock: i32,
    #[serde(default)]
    stock_disable_when_sold_out: bool,
    #[serde(default)]
    ean: String,
    #[serde(default)]
    article_code: String,
    delivery_time: Option<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    extra_location: String,
    size_x_value: Option<String>,
    size_y_value: Option<String>,
    size_z_value: Option<String>,
    #[serde(default)]
    size_unit: String,
    weight: Option<String>,
    #[serde(default)]
    weight_unit: String,
    volume_value: Option<String>,
    #[serde(default)]
    volume_unit: String,
    #[serde(default)]
    volume: String,
    buy_min: Option<i32>,
    buy_max: Option<i32>,
    #[serde(default)]
    important_information: String,
    brand: Option<i32>,
    supplier: Option<i32>,
    #[serde(default)]
    meta_title: String,
    #[serde(default)]
    meta_description: String,
    #[serde(default)]
    meta_keywords: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    is_used: bool,
    #[serde(default = "default_true")]
    is_regular: bool,
    #[serde(default)]
    is_featured: bool,
    #[serde(default = "default_true")]
    is_visible_on_web: bool,
    #[serde(default = "default_true")]
    is_visible_on_mobile: bool,
    #[serde(default)]
    is_only_for_export: bool,
    #[serde(rename = "is_only_for_B2B", default)]
    is_only_for_b2b: bool,
    #[serde(default)]
    is_listed_on_marktplaats: bool,
    #[serde(default)]
    is_listed_on_2dehands: bool,
    #[serde(default)]
    categories: Vec<i32>,
    #[serde(default)]
    vat: i32,
    #[serde(default)]
    stock_alert: bool,
    #[serde(default)]
    sku: String,
    #[serde(default)]
    supplier_article_code: String,
    #[serde(default)]
    hs_code: String,
    #[serde(default)]
    has_electronic_barcode: bool,
    #[serde(default)]
    languages_on_item_package: Vec<i32>,
    #[serde(default)]
    is_brief_box: bool,
    #[serde(default)]
    tags: Vec<i32>,
    created_at: Option<String>,
    expiry_date: Option<String>,
    #[serde(default)]
    chip: String,
    average_rating: Option<String>,
}

/// Number of rows written per model, and records left out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub images: usize,
    pub languages: usize,
    pub brands: usize,
    pub categories: usize,
    pub tags: usize,
    pub suppliers: usize,
    pub accounts: usize,
    pub products: usize,
    pub skipped: usize,
}

pub async fn import_django(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_django function");
    info!("Starting Django data import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    // Connect to database
    trace!("Connecting to database");
    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    // Load JSON file
    trace!("Loading JSON file");
    let path = Path::new(json_path);
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", json_path))?;

    info!("Parsing JSON data...");
    let records: Vec<DjangoRecord> = serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from Django dump", records.len());

    let summary = import_records(&db, &records).await?;
    info!(?summary, "Django import finished");
    Ok(())
}

/// Imports `records` in dependency order, remapping Django primary keys to
/// the ids assigned here.
pub async fn import_records(
    db: &DatabaseConnection,
    records: &[DjangoRecord],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut image_map = HashMap::new();
    let mut language_map = HashMap::new();
    let mut brand_map = HashMap::new();
    let mut category_map = HashMap::new();
    let mut tag_map = HashMap::new();
    let mut supplier_map = HashMap::new();
    let mut product_map = HashMap::new();

    // First pass: images
    info!("Importing images...");
    for (pk, django_image) in fields_of::<DjangoImage>(records, "images.image", &mut summary) {
        let created_at = match parse_datetime(django_image.created_at.as_deref()) {
            Ok(created_at) => created_at,
            Err(e) => {
                skip(&mut summary, "images.image", pk, &e);
                continue;
            }
        };
        let new_image = image::ActiveModel {
            url: Set(django_image.image),
            alt_text: Set(django_image.alt_text),
            created_at: created_at.map_or(NotSet, Set),
            ..Default::default()
        };
        let inserted = new_image.insert(db).await?;
        image_map.insert(pk, inserted.id);
        debug!("Imported image {} -> ID {}", pk, inserted.id);
    }
    summary.images = image_map.len();
    info!("Imported {} images", summary.images);

    // Second pass: languages
    info!("Importing languages...");
    for (pk, django_language) in
        fields_of::<DjangoLanguage>(records, "languages.language", &mut summary)
    {
        let inserted = language::ActiveModel {
            name: Set(django_language.name),
            code: Set(django_language.code),
            ..Default::default()
        }
        .insert(db)
        .await?;
        language_map.insert(pk, inserted.id);
        debug!("Imported language {} -> ID {}", inserted.name, inserted.id);
    }
    summary.languages = language_map.len();
    info!("Imported {} languages", summary.languages);

    // Third pass: brands
    info!("Importing brands...");
    for (pk, django_brand) in fields_of::<DjangoBrand>(records, "brands.brand", &mut summary) {
        let inserted = brand::ActiveModel {
            name: Set(django_brand.name),
            description: Set(django_brand.description),
            logo_id: Set(mapped(&image_map, django_brand.logo)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        brand_map.insert(pk, inserted.id);
        debug!("Imported brand {} -> ID {}", inserted.name, inserted.id);
    }
    summary.brands = brand_map.len();
    info!("Imported {} brands", summary.brands);

    // Fourth pass: categories, parents before children
    info!("Importing categories...");
    let mut pending = fields_of::<DjangoCategory>(records, "categories.category", &mut summary);
    while !pending.is_empty() {
        let (ready, waiting): (Vec<_>, Vec<_>) = pending.into_iter().partition(|(_, c)| {
            c.parent_category
                .is_none_or(|parent| category_map.contains_key(&parent))
        });
        if ready.is_empty() {
            for (pk, django_category) in waiting {
                warn!(
                    pk,
                    "Skipping category {}: parent {:?} was not imported",
                    django_category.name,
                    django_category.parent_category
                );
                summary.skipped += 1;
            }
            break;
        }

        for (pk, django_category) in ready {
            let parent_id = mapped(&category_map, django_category.parent_category);
            let inserted = category::ActiveModel {
                name: Set(django_category.name),
                parent_category_id: Set(parent_id),
                image_id: Set(mapped(&image_map, django_category.image)),
                is_active: Set(django_category.is_active),
                order: Set(django_category.order),
                ..Default::default()
            }
            .insert(db)
            .await?;
            category_map.insert(pk, inserted.id);
            debug!(
                "Imported category {} -> ID {} (parent: {:?})",
                inserted.name, inserted.id, parent_id
            );
        }
        pending = waiting;
    }
    summary.categories = category_map.len();
    info!("Imported {} categories", summary.categories);

    // Fifth pass: tags
    info!("Importing tags...");
    for (pk, django_tag) in fields_of::<DjangoTag>(records, "products.tag", &mut summary) {
        let inserted = tag::ActiveModel {
            name: Set(django_tag.name),
            ..Default::default()
        }
        .insert(db)
        .await?;
        tag_map.insert(pk, inserted.id);
        debug!("Imported tag {} -> ID {}", inserted.name, inserted.id);
    }
    summary.tags = tag_map.len();
    info!("Imported {} tags", summary.tags);

    // Sixth pass: suppliers, validated
    info!("Importing suppliers...");
    for (pk, django_supplier) in
        fields_of::<DjangoSupplier>(records, "suppliers.supplier", &mut summary)
    {
        let new_supplier = match supplier_model(django_supplier) {
            Ok(new_supplier) => new_supplier,
            Err(e) => {
                skip(&mut summary, "suppliers.supplier", pk, &e);
                continue;
            }
        };
        match new_supplier.persist(db).await {
            Ok(inserted) => {
                supplier_map.insert(pk, inserted.id);
                debug!("Imported supplier {} -> ID {}", inserted.name, inserted.id);
            }
            Err(SaveError::Validation(e)) => {
                warn!(pk, "Skipping supplier: {}", e);
                summary.skipped += 1;
            }
            Err(SaveError::Database(e)) => return Err(e).context("Failed to insert supplier"),
        }
    }
    summary.suppliers = supplier_map.len();
    info!("Imported {} suppliers", summary.suppliers);

    // Seventh pass: accounts, validated
    info!("Importing accounts...");
    for (pk, django_user) in
        fields_of::<DjangoUser>(records, "authentication.customuser", &mut summary)
    {
        let new_account = match account_model(django_user) {
            Ok(new_account) => new_account,
            Err(e) => {
                skip(&mut summary, "authentication.customuser", pk, &e);
                continue;
            }
        };
        match new_account.persist(db).await {
            Ok(inserted) => {
                summary.accounts += 1;
                debug!("Imported account {} -> ID {}", inserted.email, inserted.id);
            }
            Err(SaveError::Validation(e)) => {
                warn!(pk, "Skipping account: {}", e);
                summary.skipped += 1;
            }
            Err(SaveError::Database(e)) => return Err(e).context("Failed to insert account"),
        }
    }
    info!("Imported {} accounts", summary.accounts);

    // Eighth pass: products, parents before variants
    info!("Importing products...");
    let mut products = fields_of::<DjangoProduct>(records, "products.product", &mut summary);
    products.sort_by_key(|(_, p)| p.parent_product.is_some());
    for (pk, django_product) in products {
        let parent_id = match django_product.parent_product {
            None => None,
            Some(parent) => match product_map.get(&parent) {
                Some(&id) => Some(id),
                None => {
                    warn!(pk, "Skipping variant: parent product {} was not imported", parent);
                    summary.skipped += 1;
                    continue;
                }
            },
        };

        let links = ProductLinks {
            images: mapped_all(&image_map, &django_product.images),
            categories: mapped_all(&category_map, &django_product.categories),
            languages: mapped_all(&language_map, &django_product.languages_on_item_package),
            tags: mapped_all(&tag_map, &django_product.tags),
        };
        let brand_id = mapped(&brand_map, django_product.brand);
        let supplier_id = mapped(&supplier_map, django_product.supplier);

        let mut new_product = match product_model(django_product) {
            Ok(new_product) => new_product,
            Err(e) => {
                skip(&mut summary, "products.product", pk, &e);
                continue;
            }
        };
        new_product.parent_product_id = Set(parent_id);
        new_product.brand_id = Set(brand_id);
        new_product.supplier_id = Set(supplier_id);
        if let Err(e) = new_product.apply_derivations(None) {
            skip(&mut summary, "products.product", pk, &anyhow::Error::from(e));
            continue;
        }

        let inserted = new_product.insert(db).await?;
        links.insert(db, inserted.id).await?;
        product_map.insert(pk, inserted.id);
        debug!("Imported product {} -> ID {}", inserted.title, inserted.id);
    }
    summary.products = product_map.len();
    info!("Imported {} products", summary.products);

    Ok(summary)
}

/// Deserializes the fields of every `model` record. Unreadable records are
/// counted as skipped.
fn fields_of<T: DeserializeOwned>(
    records: &[DjangoRecord],
    model: &str,
    summary: &mut ImportSummary,
) -> Vec<(i32, T)> {
    records
        .iter()
        .filter(|record| record.model == model)
        .filter_map(|record| match serde_json::from_value(record.fields.clone()) {
            Ok(fields) => Some((record.pk, fields)),
            Err(e) => {
                warn!(model, pk = record.pk, "Skipping unreadable record: {}", e);
                summary.skipped += 1;
                None
            }
        })
        .collect()
}

fn skip(summary: &mut ImportSummary, model: &str, pk: i32, error: &anyhow::Error) {
    warn!(model, pk, "Skipping record: {:#}", error);
    summary.skipped += 1;
}

fn mapped(map: &HashMap<i32, i32>, pk: Option<i32>) -> Option<i32> {
    let pk = pk?;
    let id = map.get(&pk).copied();
    if id.is_none() {
        debug!("No imported row for pk {}, leaving the reference empty", pk);
    }
    id
}

fn mapped_all(map: &HashMap<i32, i32>, pks: &[i32]) -> Vec<i32> {
    pks.iter().filter_map(|pk| map.get(pk).copied()).collect()
}

fn parse_decimal(field: &str, raw: Option<&str>) -> Result<Option<Decimal>> {
    raw.filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<Decimal>()
                .with_context(|| format!("invalid {field} '{v}'"))
        })
        .transpose()
}

fn parse_datetime(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|v| {
        DateTime::parse_from_rfc3339(v)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("invalid timestamp '{v}'"))
    })
    .transpose()
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|v| {
        NaiveDate::parse_from_str(v, "%Y-%m-%d").with_context(|| format!("invalid date '{v}'"))
    })
    .transpose()
}

/// Parses a Django choice value. Blank means no choice.
fn parse_choice<T>(field: &str, raw: Option<&str>) -> Result<Option<T>>
where
    T: ActiveEnum<Value = String>,
{
    raw.filter(|v| !v.is_empty())
        .map(|v| T::try_from_value(&v.to_string()).with_context(|| format!("unknown {field} '{v}'")))
        .transpose()
}

fn supplier_model(s: DjangoSupplier) -> Result<supplier::ActiveModel> {
    Ok(supplier::ActiveModel {
        payment_method: Set(parse_choice("payment_method", s.payment_method.as_deref())?),
        order_method: Set(parse_choice("order_method", s.order_method.as_deref())?),
        minimum_order_amount: Set(parse_decimal(
            "minimum_order_amount",
            s.minimum_order_amount.as_deref(),
        )?),
        name: Set(s.name),
        contact_person: Set(s.contact_person),
        is_active: Set(s.is_active),
        has_given_payment_auth: Set(s.has_given_payment_auth),
        percentage_to_add: Set(s.percentage_to_add),
        supplier_extra_info: Set(s.supplier_extra_info),
        has_connection_with_supplier_system: Set(s.has_connection_with_supplier_system),
        iban: Set(s.iban),
        bic: Set(s.bic),
        account_holder_name: Set(s.account_holder_name),
        account_holder_city: Set(s.account_holder_city),
        vat_number: Set(s.vat_number),
        kvk_number: Set(s.kvk_number),
        debtor_number: Set(s.debtor_number),
        payment_terms: Set(s.payment_terms),
        payment_instruction: Set(s.payment_instruction),
        delivery_time_of_order: Set(s.delivery_time_of_order),
        phone: Set(s.phone),
        mobile_phone: Set(s.mobile_phone),
        email: Set(s.email),
        email_extra: Set(s.email_extra),
        website: Set(s.website),
        facebook: Set(s.facebook),
        twitter: Set(s.twitter),
        linkedin: Set(s.linkedin),
        instagram: Set(s.instagram),
        pinterest: Set(s.pinterest),
        tiktok: Set(s.tiktok),
        memo: Set(s.memo),
        ..Default::default()
    })
}

/// The Django password hash is kept as is.
fn account_model(u: DjangoUser) -> Result<account::ActiveModel> {
    let account_type = parse_choice::<account::AccountType>("type", u.account_type.as_deref())?
        .unwrap_or_default();

    Ok(account::ActiveModel {
        birthdate: Set(parse_date(u.birthdate.as_deref())?),
        customer_percentage: Set(parse_decimal(
            "customer_percentage",
            u.customer_percentage.as_deref(),
        )?),
        invoice_discount: Set(parse_decimal("invoice_discount", u.invoice_discount.as_deref())?),
        credit_limit: Set(parse_decimal("credit_limit", u.credit_limit.as_deref())?),
        last_login: Set(parse_datetime(u.last_login.as_deref())?),
        date_joined: parse_datetime(u.date_joined.as_deref())?.map_or(NotSet, Set),
        email: Set(u.email),
        password: Set(u.password),
        first_name: Set(u.first_name),
        last_name: Set(u.last_name),
        gender: Set(u.gender),
        phone_number: Set(u.phone_number),
        mobile_number: Set(u.mobile_number),
        account_type: Set(account_type),
        is_active: Set(u.is_active),
        is_staff: Set(u.is_staff),
        is_superuser: Set(u.is_superuser),
        business_name: Set(u.business_name),
        contact_person_name: Set(u.contact_person_name),
        contact_person_phone_number: Set(u.contact_person_phone_number),
        is_eligible_to_work_with: Set(u.is_eligible_to_work_with),
        department: Set(u.department),
        classification: Set(u.classification),
        branch: Set(u.branch),
        invoice_language: Set(u.invoice_language),
        iban: Set(u.iban),
        bic: Set(u.bic),
        account_holder_name: Set(u.account_holder_name),
        account_holder_city: Set(u.account_holder_city),
        vat: Set(u.vat),
        kvk: Set(u.kvk),
        payment_method: Set(u.payment_method),
        notes: Set(u.notes),
        ..Default::default()
    })
}

/// Stock totals and the unit price are derived again on insert.
fn product_model(p: DjangoProduct) -> Result<product::ActiveModel> {
    let price_per_piece = parse_decimal("price_per_piece", Some(p.price_per_piece.as_str()))?
        .with_context(|| "price_per_piece is required")?;
    let price_per_unit =
        parse_decimal("price_per_unit", p.price_per_unit.as_deref())?.unwrap_or(price_per_piece);

    Ok(product::ActiveModel {
        price_per_piece: Set(price_per_piece),
        price_per_unit: Set(price_per_unit),
        price_consumers: Set(parse_decimal("price_consumers", p.price_consumers.as_deref())?),
        price_cost: Set(parse_decimal("price_cost", p.price_cost.as_deref())?),
        unit: Set(parse_choice("unit", Some(p.unit.as_str()))?),
        delivery_time: Set(parse_choice("delivery_time", p.delivery_time.as_deref())?),
        size_x_value: Set(parse_decimal("size_x_value", p.size_x_value.as_deref())?),
        size_y_value: Set(parse_decimal("size_y_value", p.size_y_value.as_deref())?),
        size_z_value: Set(parse_decimal("size_z_value", p.size_z_value.as_deref())?),
        weight: Set(parse_decimal("weight", p.weight.as_deref())?),
        volume_value: Set(parse_decimal("volume_value", p.volume_value.as_deref())?),
        created_at: parse_datetime(p.created_at.as_deref())?.map_or(NotSet, Set),
        expiry_date: Set(parse_datetime(p.expiry_date.as_deref())?),
        chip: Set(parse_choice("chip", Some(p.chip.as_str()))?),
        average_rating: Set(parse_decimal("average_rating", p.average_rating.as_deref())?),
        title: Set(p.title),
        title_long: Set(p.title_long),
        description: Set(p.description),
        description_long: Set(p.description_long),
        quantity_per_unit: Set(p.quantity_per_unit),
        quantity_total_content: Set(p.quantity_total_content),
        max_order_allowed_per_unit: Set(p.max_order_allowed_per_unit),
        free_stock: Set(p.free_stock),
        ordered_in_progress_stock: Set(p.ordered_in_progress_stock),
        work_in_progress_stock: Set(p.work_in_progress_stock),
        stock_disable_when_sold_out: Set(p.stock_disable_when_sold_out),
        ean: Set(p.ean),
        article_code: Set(p.article_code),
        location: Set(p.location),
        extra_location: Set(p.extra_location),
        size_unit: Set(p.size_unit),
        weight_unit: Set(p.weight_unit),
        volume_unit: Set(p.volume_unit),
        volume: Set(p.volume),
        buy_min: Set(p.buy_min),
        buy_max: Set(p.buy_max),
        important_information: Set(p.important_information),
        meta_title: Set(p.meta_title),
        meta_description: Set(p.meta_description),
        meta_keywords: Set(p.meta_keywords),
        url: Set(p.url),
        is_used: Set(p.is_used),
        is_regular: Set(p.is_regular),
        is_featured: Set(p.is_featured),
        is_visible_on_web: Set(p.is_visible_on_web),
        is_visible_on_mobile: Set(p.is_visible_on_mobile),
        is_only_for_export: Set(p.is_only_for_export),
        is_only_for_b2b: Set(p.is_only_for_b2b),
        is_listed_on_marktplaats: Set(p.is_listed_on_marktplaats),
        is_listed_on_2dehands: Set(p.is_listed_on_2dehands),
        vat: Set(p.vat),
        stock_alert: Set(p.stock_alert),
        sku: Set(p.sku),
        supplier_article_code: Set(p.supplier_article_code),
        hs_code: Set(p.hs_code),
        has_electronic_barcode: Set(p.has_electronic_barcode),
        is_brief_box: Set(p.is_brief_box),
        ..Default::default()
    })
}

/// Many-to-many rows of one product, already remapped to local ids.
struct ProductLinks {
    images: Vec<i32>,
    categories: Vec<i32>,
    languages: Vec<i32>,
    tags: Vec<i32>,
}

impl ProductLinks {
    async fn insert<C: ConnectionTrait>(self, db: &C, product_id: i32) -> Result<()> {
        for image_id in self.images {
            product_image::ActiveModel {
                product_id: Set(product_id),
                image_id: Set(image_id),
            }
            .insert(db)
            .await?;
        }
        for category_id in self.categories {
            product_category::ActiveModel {
                product_id: Set(product_id),
                category_id: Set(category_id),
            }
            .insert(db)
            .await?;
        }
        for language_id in self.languages {
            product_language::ActiveModel {
                product_id: Set(product_id),
                language_id: Set(language_id),
            }
            .insert(db)
            .await?;
        }
        for tag_id in self.tags {
            product_tag::ActiveModel {
                product_id: Set(product_id),
                tag_id: Set(tag_id),
            }
            .insert(db)
            .await?;
        }
        trace!(product_id, "Linked product relations");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_tracing, setup_test_db};
    use model::entities::prelude::*;
    use rust_decimal_macros::dec;
    use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};

    const DUMP: &str = r#"[
        {"model": "sessions.session", "pk": "abc", "fields": {}},
        {"model": "images.image", "pk": 7, "fields": {"image": "uploads/fizz.png", "alt_text": "Fizz", "created_at": "2023-05-01T09:30:00Z"}},
        {"model": "languages.language", "pk": 3, "fields": {"name": "Nederlands", "code": "nl"}},
        {"model": "brands.brand", "pk": 11, "fields": {"name": "Fizz", "description": null, "logo": 7}},
        {"model": "categories.category", "pk": 21, "fields": {"name": "Cola", "parent_category": 20, "image": null, "is_active": true, "order": 1}},
        {"model": "categories.category", "pk": 20, "fields": {"name": "Frisdrank", "parent_category": null, "image": 7, "is_active": true, "order": 0}},
        {"model": "categories.category", "pk": 22, "fields": {"name": "Wees", "parent_category": 99, "image": null}},
        {"model": "products.tag", "pk": 5, "fields": {"name": "Actie"}},
        {"model": "suppliers.supplier", "pk": 31, "fields": {"name": "Drankenhandel", "hasGivenPaymentAuth": false, "vat_number": "NL123456782B01", "payment_method": "kas", "order_method": "whatsapp", "minimum_order_amount": "150.00", "percentage_to_add": 25}},
        {"model": "suppliers.supplier", "pk": 32, "fields": {"name": "Nep B.V.", "vat_number": "NL123456789B01"}},
        {"model": "authentication.customuser", "pk": 41, "fields": {"email": "inkoop@super.nl", "password": "pbkdf2_sha256$600000$x$y", "type": "supermarket", "business_name": "Super B.V.", "contact_person_name": "Els", "contact_person_phone_number": "0201234567", "vat": "NL123456782B01", "kvk": "12345678", "date_joined": "2022-01-10T08:00:00.123Z", "credit_limit": "2500.00"}},
        {"model": "authentication.customuser", "pk": 42, "fields": {"email": "leeg@super.nl", "password": "x", "type": "wholesaler", "business_name": ""}},
        {"model": "authentication.customuser", "pk": 43, "fields": {"email": "baas@winkel.nl", "password": "x", "type": "admin", "is_staff": false}},
        {"model": "products.product", "pk": 52, "fields": {"parent_product": 51, "title": "Cola 6-pack", "description": "Six cans", "price_per_piece": "0.80", "quantity_per_unit": 6, "free_stock": 4, "chip": "multi_pack", "supplier": 32}},
        {"model": "products.product", "pk": 51, "fields": {"parent_product": null, "title": "Cola", "description": "Can", "price_per_piece": "0.85", "price_per_unit": "0.85", "unit": "piece", "delivery_time": "1", "free_stock": 10, "ordered_in_progress_stock": 5, "brand": 11, "supplier": 31, "is_only_for_B2B": true, "images": [7], "categories": [21, 22], "languages_on_item_package": [3], "tags": [5], "created_at": "2023-06-01T12:00:00Z"}},
        {"model": "products.product", "pk": 53, "fields": {"parent_product": 999, "title": "Wees", "description": "", "price_per_piece": "1.00"}},
        {"model": "products.product", "pk": 54, "fields": {"parent_product": null, "title": "Raar", "description": "", "price_per_piece": "1.00", "unit": "crate"}}
    ]"#;

    async fn import_dump() -> (DatabaseConnection, ImportSummary) {
        let _guard = init_test_tracing();
        let db = setup_test_db().await;
        let records: Vec<DjangoRecord> = serde_json::from_str(DUMP).unwrap();
        let summary = import_records(&db, &records).await.unwrap();
        (db, summary)
    }

    #[tokio::test]
    async fn test_import_summary() {
        let (_db, summary) = import_dump().await;

        assert_eq!(
            summary,
            ImportSummary {
                images: 1,
                languages: 1,
                brands: 1,
                categories: 2,
                tags: 1,
                suppliers: 1,
                accounts: 2,
                products: 2,
                // orphan category, bad VAT, missing business name,
                // orphan variant, unknown unit
                skipped: 5,
            }
        );
    }

    #[tokio::test]
    async fn test_import_remaps_references() {
        let (db, _) = import_dump().await;

        let cola = Product::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.title == "Cola")
            .unwrap();
        assert_eq!(cola.unit, Some(product::Unit::Piece));
        assert_eq!(cola.delivery_time, Some(product::DeliveryTime::ThreeToFiveDays));
        assert!(cola.is_only_for_b2b);
        assert_eq!(cola.overall_stock, 15);

        let brand = cola.find_related(Brand).one(&db).await.unwrap().unwrap();
        assert_eq!(brand.name, "Fizz");
        assert!(brand.logo_id.is_some());

        let categories = cola.find_related(Category).all(&db).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Cola");
        let ancestors = categories[0].ancestors(&db).await.unwrap();
        assert_eq!(ancestors.last().unwrap().name, "Frisdrank");

        assert_eq!(cola.find_related(Tag).all(&db).await.unwrap().len(), 1);
        assert_eq!(cola.find_related(Language).all(&db).await.unwrap().len(), 1);
        assert_eq!(cola.find_related(Image).all(&db).await.unwrap().len(), 1);

        // Variant of the imported parent, supplier reference dropped
        let variants = cola.variants(&db).await.unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].supplier_id, None);
        assert_eq!(variants[0].price_per_unit, dec!(4.80));
        assert_eq!(variants[0].chip, Some(product::Chip::MultiPack));
    }

    #[tokio::test]
    async fn test_import_validates_suppliers_and_accounts() {
        let (db, _) = import_dump().await;

        let suppliers = Supplier::find().all(&db).await.unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].name, "Drankenhandel");
        assert!(!suppliers[0].has_given_payment_auth);
        assert_eq!(suppliers[0].payment_method, Some(supplier::PaymentMethod::Kas));
        assert_eq!(suppliers[0].minimum_order_amount, Some(dec!(150.00)));

        let accounts = Account::find().all(&db).await.unwrap();
        assert_eq!(accounts.len(), 2);

        let supermarket = accounts.iter().find(|a| a.email == "inkoop@super.nl").unwrap();
        assert_eq!(supermarket.account_type, account::AccountType::Supermarket);
        assert_eq!(supermarket.password, "pbkdf2_sha256$600000$x$y");
        assert_eq!(supermarket.credit_limit, Some(dec!(2500.00)));

        let admin = accounts.iter().find(|a| a.email == "baas@winkel.nl").unwrap();
        assert!(admin.is_staff);
        assert!(admin.is_superuser);

        assert_eq!(AccountActionLog::find().count(&db).await.unwrap(), 0);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_decimal("x", Some("")).unwrap(), None);
        assert_eq!(parse_decimal("x", Some("1.50")).unwrap(), Some(dec!(1.50)));
        assert!(parse_decimal("x", Some("abc")).is_err());

        assert_eq!(parse_choice::<product::Chip>("chip", Some("")).unwrap(), None);
        assert_eq!(
            parse_choice::<product::Chip>("chip", Some("deal")).unwrap(),
            Some(product::Chip::Deal)
        );
        let error = parse_choice::<product::Chip>("chip", Some("bundle")).unwrap_err();
        assert!(error.to_string().contains("bundle"));

        assert!(parse_datetime(Some("2023-06-01T12:00:00.5+02:00")).unwrap().is_some());
        assert!(parse_date(Some("01-06-2023")).is_err());
    }

    #[tokio::test]
    async fn test_product_with_unrepresentable_stock_is_skipped() {
        let _guard = init_test_tracing();
        let db = setup_test_db().await;
        let records: Vec<DjangoRecord> = serde_json::from_str(
            r#"[
                {"model": "products.product", "pk": 1, "fields": {"parent_product": null, "title": "Bulk", "description": "", "price_per_piece": "1.00", "free_stock": 2000000000, "ordered_in_progress_stock": 1000000000}},
                {"model": "products.product", "pk": 2, "fields": {"parent_product": null, "title": "Regular", "description": "", "price_per_piece": "1.00", "free_stock": 3}}
            ]"#,
        )
        .unwrap();

        let summary = import_records(&db, &records).await.unwrap();
        assert_eq!(summary.products, 1);
        assert_eq!(summary.skipped, 1);

        let products = Product::find().all(&db).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Regular");
        assert_eq!(products[0].overall_stock, 3);
    }

    #[test]
    fn test_string_pk_is_tolerated() {
        let record: DjangoRecord =
            serde_json::from_str(r#"{"model": "sessions.session", "pk": "k", "fields": {}}"#)
                .unwrap();
        assert_eq!(record.pk, 0);
        assert!(serde_json::from_str::<DjangoRecord>(r#"{"model": "a.b", "pk": [], "fields": {}}"#).is_err());
    }
}
