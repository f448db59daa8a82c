use anyhow::{Context, Result};
use sea_orm::Database;
use tracing::{error, info, trace};

use crate::accounts::{self, NewAccount};

/// Connects to `database_url` and creates an account, or a superuser when
/// `superuser` is set.
pub async fn create_account(
    database_url: &str,
    email: &str,
    password: Option<&str>,
    details: NewAccount,
    superuser: bool,
) -> Result<()> {
    trace!("Connecting to database");
    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let result = if superuser {
        accounts::create_superuser(&db, email, password, details).await
    } else {
        accounts::create_user(&db, email, password, details).await
    };

    match result {
        Ok(account) => {
            info!(id = account.id, "Created account {}", account);
            println!("{} ({})", account.email, account.account_type.label());
            Ok(())
        }
        Err(e) => {
            error!("Failed to create account '{}': {}", email, e);
            Err(e).context("Account was not created")
        }
    }
}
