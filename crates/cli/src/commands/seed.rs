//! Seed the store database from the bundled SQL dump.
//!
//! Seeding runs in two phases on one connection:
//!
//! 1. [`load_dump`] streams the dump line by line through a
//!    [`SeedScanner`] and executes every complete `INSERT INTO` block with
//!    the configured table prefix.
//! 2. [`apply_fixups`] replaces the admin account, store email, encryption
//!    key and API credential, and stamps the current year into the invoice
//!    prefix.
//!
//! The first failing statement aborts the install. Statements already
//! executed are not rolled back.

use std::io::ErrorKind;
use std::path::Path;

use oc_install_core::options::InstallOptions;
use oc_install_core::seed::fixups::{
    CONFIG_API_ID, CONFIG_EMAIL, CONFIG_ENCRYPTION, RELAX_SQL_MODE, SET_CHARSET,
};
use oc_install_core::seed::{Escaped, Fixups, SeedScanner, rewrite_prefix};
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::InstallError;
use crate::secrets::{self, API_KEY_BITS, ENCRYPTION_KEY_BITS};

/// What [`seed_database`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Dump statements executed
    pub statements: usize,
    /// Dump statements dropped because another one started first
    pub abandoned: usize,
    /// Whether the dump ended inside a statement (never executed)
    pub unterminated: bool,
    /// Id of the API credential created for the admin panel
    pub api_id: u64,
}

/// Load the dump and apply the fixups, then close `db`.
///
/// The connection is closed whether or not seeding succeeded; a seeding
/// error takes precedence over an error while closing.
///
/// # Errors
///
/// Returns the first dump, database or secret-generation error.
pub async fn seed_database<D: Database>(
    mut db: D,
    dump: &Path,
    options: &InstallOptions,
    year: i32,
) -> Result<SeedSummary, InstallError> {
    let outcome = seed(&mut db, dump, options, year).await;
    let closed = db.close().await;

    let summary = outcome?;
    closed?;
    Ok(summary)
}

async fn seed<D: Database>(
    db: &mut D,
    dump: &Path,
    options: &InstallOptions,
    year: i32,
) -> Result<SeedSummary, InstallError> {
    let mut summary = load_dump(db, dump, &options.database.prefix).await?;
    summary.api_id = apply_fixups(db, options, year).await?;
    Ok(summary)
}

/// Execute every complete `INSERT INTO` block of the dump, in file order.
///
/// # Errors
///
/// Returns [`InstallError::SqlDumpNotFound`] if the file does not exist,
/// [`InstallError::Read`] if it cannot be read, and
/// [`InstallError::Database`] for the first rejected statement.
pub async fn load_dump<D: Database>(
    db: &mut D,
    dump: &Path,
    prefix: &str,
) -> Result<SeedSummary, InstallError> {
    let read_error = |source| InstallError::Read {
        path: dump.to_path_buf(),
        source,
    };

    let file = match tokio::fs::File::open(dump).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(InstallError::SqlDumpNotFound(dump.to_path_buf()));
        }
        Err(e) => return Err(read_error(e)),
    };

    info!(path = %dump.display(), prefix, "Loading SQL dump");

    let mut lines = BufReader::new(file).lines();
    let mut scanner = SeedScanner::new();
    let mut summary = SeedSummary::default();

    while let Some(line) = lines.next_line().await.map_err(read_error)? {
        let Some(statement) = scanner.feed(&line) else {
            continue;
        };
        summary.statements += 1;
        debug!(statement = summary.statements, "Executing seed statement");
        db.query(&rewrite_prefix(&statement, prefix)).await?;
    }

    summary.abandoned = scanner.abandoned();
    summary.unterminated = scanner.finish().is_some();

    if summary.abandoned > 0 {
        warn!(
            abandoned = summary.abandoned,
            "Dropped INSERT statements that were never terminated"
        );
    }
    if summary.unterminated {
        warn!("SQL dump ends inside an INSERT statement; it was not executed");
    }

    info!(statements = summary.statements, "SQL dump loaded");
    Ok(summary)
}

/// Run the post-seed statements and return the new API credential's id.
///
/// # Errors
///
/// Returns [`InstallError::Secret`] if the password cannot be hashed or no
/// randomness is available, and [`InstallError::Database`] for the first
/// rejected statement.
pub async fn apply_fixups<D: Database>(
    db: &mut D,
    options: &InstallOptions,
    year: i32,
) -> Result<u64, InstallError> {
    let fixups = Fixups::new(&options.database.prefix);
    let admin = &options.admin;

    let password_hash = secrets::hash_password(&admin.password)?;
    let encryption_key = secrets::random_token(ENCRYPTION_KEY_BITS)?;
    let api_key = secrets::random_token(API_KEY_BITS)?;

    db.query(SET_CHARSET).await?;
    db.query(RELAX_SQL_MODE).await?;

    info!(username = %admin.username, email = %admin.email, "Creating admin user");
    let username = db.escape(&admin.username);
    let password_hash = db.escape(&password_hash);
    let email = db.escape(admin.email.as_str());
    db.query(&fixups.delete_admin_user()).await?;
    db.query(&fixups.insert_admin_user(&username, &password_hash, &email))
        .await?;

    db.query(&fixups.delete_setting(CONFIG_EMAIL)).await?;
    db.query(&fixups.insert_setting(CONFIG_EMAIL, &email)).await?;

    let encryption_key = db.escape(encryption_key.expose_secret());
    db.query(&fixups.delete_setting(CONFIG_ENCRYPTION)).await?;
    db.query(&fixups.insert_setting(CONFIG_ENCRYPTION, &encryption_key))
        .await?;

    db.query(&fixups.reset_product_views()).await?;

    let api_key = db.escape(api_key.expose_secret());
    db.query(&fixups.insert_api(&api_key)).await?;
    let api_id = db.last_insert_id();

    db.query(&fixups.delete_setting(CONFIG_API_ID)).await?;
    db.query(&fixups.insert_setting(CONFIG_API_ID, &Escaped::from(api_id)))
        .await?;

    db.query(&fixups.invoice_prefix(year)).await?;

    info!(api_id, year, "Store settings initialised");
    Ok(api_id)
}
