//! Account manager: creates customer and staff accounts with hashed passwords.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use common::normalize_email;
use model::entities::account::{self, AccountType};
use model::entities::account_action_log;
use model::SaveError;
use sea_orm::{DatabaseConnection, DbErr, Set, TransactionTrait};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Prefix marking a password that can never be used to log in.
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

#[derive(Debug, Error)]
pub enum AccountManagerError {
    #[error("email must be set")]
    MissingEmail,

    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Optional details for a new account. Fields left `None` use the column defaults.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub account_type: Option<AccountType>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub business_name: Option<String>,
    pub contact_person_name: Option<String>,
    pub contact_person_phone_number: Option<String>,
    pub vat: Option<String>,
    pub kvk: Option<String>,
}

/// Hashes `password` with argon2 and a fresh salt, in PHC string format.
pub fn hash_password(password: &str) -> Result<String, AccountManagerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountManagerError::PasswordHash(e.to_string()))
}

/// A random value that no password hashes to.
pub fn unusable_password() -> String {
    format!(
        "{UNUSABLE_PASSWORD_PREFIX}{}",
        SaltString::generate(&mut OsRng).as_str()
    )
}

pub fn has_usable_password(hash: &str) -> bool {
    !hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    if !has_usable_password(hash) {
        return false;
    }
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Creates an account, validating it with the account type rules.
///
/// The e-mail domain is lower-cased. Without a password the account gets an
/// unusable one. The account and its "created" log entry are written in one
/// transaction.
#[instrument(skip(db, password, details), fields(account_type = ?details.account_type))]
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password: Option<&str>,
    details: NewAccount,
) -> Result<account::Model, AccountManagerError> {
    if email.trim().is_empty() {
        return Err(AccountManagerError::MissingEmail);
    }
    let email = normalize_email(email);
    let password = match password {
        Some(password) => hash_password(password)?,
        None => unusable_password(),
    };

    let new_account = account::ActiveModel {
        email: Set(email),
        password: Set(password),
        account_type: Set(details.account_type.unwrap_or_default()),
        first_name: Set(details.first_name),
        last_name: Set(details.last_name),
        is_staff: Set(details.is_staff.unwrap_or(false)),
        is_superuser: Set(details.is_superuser.unwrap_or(false)),
        business_name: Set(details.business_name),
        contact_person_name: Set(details.contact_person_name),
        contact_person_phone_number: Set(details.contact_person_phone_number),
        vat: Set(details.vat),
        kvk: Set(details.kvk),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let created = new_account.persist(&txn).await?;
    account_action_log::Model::record(&txn, created.id, "created").await?;
    txn.commit().await?;

    info!(
        id = created.id,
        email = %created.email,
        account_type = created.account_type.label(),
        "Account created"
    );
    Ok(created)
}

/// Creates an admin account. `is_staff`, `is_superuser` and the admin type
/// are defaulted when the caller left them unset.
pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    password: Option<&str>,
    mut details: NewAccount,
) -> Result<account::Model, AccountManagerError> {
    details.is_staff.get_or_insert(true);
    details.is_superuser.get_or_insert(true);
    details.account_type.get_or_insert(AccountType::Admin);
    debug!(account_type = ?details.account_type, "Creating superuser");

    create_user(db, email, password, details).await
}
