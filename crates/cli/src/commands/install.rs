//! The `install` command.
//!
//! Steps, each aborting the run on failure:
//!
//! 1. Parse the `--name value` pairs, validate them and check the port and
//!    email.
//! 2. Check the server prerequisites (unless disabled).
//! 3. Connect and seed the database.
//! 4. Write both configuration files.
//! 5. Open up the runtime directories.

use chrono::Datelike;
use oc_install_core::options::InstallOptions;
use oc_install_core::requirements::{self, RuntimeProbe};
use oc_install_core::{RawOptions, config_file};
use tracing::{info, warn};

use super::config::write_config_files;
use super::permissions::open_permissions;
use super::seed::{SeedSummary, seed_database};
use crate::config::InstallerConfig;
use crate::db::{Database, MySqlDatabase};
use crate::error::InstallError;
use crate::probe::PhpRuntime;

/// A finished installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Storefront URL
    pub store_url: String,
    /// Admin panel URL
    pub admin_url: String,
    pub seed: SeedSummary,
}

/// Run the full install from raw command-line arguments.
///
/// # Errors
///
/// Returns the first [`InstallError`] encountered; see the module docs for
/// the order of steps.
pub async fn run<S: AsRef<str>>(
    args: &[S],
    config: &InstallerConfig,
) -> Result<Installation, InstallError> {
    let options = RawOptions::parse(args)?.validate()?;
    options.check_values()?;

    if config.skip_checks {
        warn!("Skipping pre-installation checks");
    } else {
        let runtime = PhpRuntime::detect(&config.php_binary).await?;
        check_prerequisites(&runtime)?;
    }

    ensure_dump_exists(config).await?;

    let db = MySqlDatabase::connect(&options.database).await?;
    install_with(db, &options, config, chrono::Local::now().year()).await
}

/// Fail with the first unmet server prerequisite.
///
/// # Errors
///
/// Returns [`InstallError::PrerequisiteFailed`] naming the failed rule.
pub fn check_prerequisites(probe: &dyn RuntimeProbe) -> Result<(), InstallError> {
    requirements::check(probe)?;
    info!("Pre-installation checks passed");
    Ok(())
}

/// Seed through `db`, then write the configuration and fix permissions.
///
/// `year` is stamped into the invoice prefix.
///
/// # Errors
///
/// Returns the first seeding or file error.
pub async fn install_with<D: Database>(
    db: D,
    options: &InstallOptions,
    config: &InstallerConfig,
    year: i32,
) -> Result<Installation, InstallError> {
    let layout = config.layout();

    let seed = seed_database(db, &config.sql_dump, options, year).await?;

    let generated = config_file::render(options, &layout);
    write_config_files(&generated, &layout).await?;

    open_permissions(&layout);

    let installation = Installation {
        store_url: options.base_url.as_str().to_owned(),
        admin_url: options.base_url.admin(),
        seed,
    };
    info!(
        store = %installation.store_url,
        admin = %installation.admin_url,
        statements = seed.statements,
        "OpenCart installed"
    );
    Ok(installation)
}

/// The dump is checked before connecting so a broken package does not
/// touch the database.
async fn ensure_dump_exists(config: &InstallerConfig) -> Result<(), InstallError> {
    match tokio::fs::try_exists(&config.sql_dump).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(InstallError::SqlDumpNotFound(config.sql_dump.clone())),
        Err(source) => Err(InstallError::Read {
            path: config.sql_dump.clone(),
            source,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Bare;

    impl RuntimeProbe for Bare {
        fn version(&self) -> &str {
            "5.3.29"
        }
        fn ini_enabled(&self, _directive: &str) -> bool {
            false
        }
        fn extension_loaded(&self, _name: &str) -> bool {
            false
        }
        fn function_exists(&self, _name: &str) -> bool {
            false
        }
        fn constant_defined(&self, _name: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_prerequisite_failure_message() {
        let err = check_prerequisites(&Bare).unwrap_err();
        assert!(err.is_prerequisite());
        assert_eq!(
            err.to_string(),
            "Pre-installation check failed: Warning: You need to use PHP7.3+ or above for OpenCart to work!"
        );
    }

    #[tokio::test]
    async fn test_missing_fields_stop_before_anything_else() {
        let config = InstallerConfig::for_root("/nonexistent/shop");
        let err = run(&["--db_username", "root"], &config).await.unwrap_err();
        assert!(matches!(err, InstallError::MissingFields(_)));
    }

    #[tokio::test]
    async fn test_malformed_argument() {
        let config = InstallerConfig::for_root("/nonexistent/shop");
        let err = run(&["db_username", "root"], &config).await.unwrap_err();
        assert!(matches!(err, InstallError::Options(_)));
    }

    #[tokio::test]
    async fn test_unusable_email_stops_before_checks() {
        let config = InstallerConfig::for_root("/nonexistent/shop");
        let args = [
            "--db_username", "root",
            "--db_password", "secret",
            "--password", "hunter2",
            "--email", "nobody",
            "--http_server", "localhost/shop",
        ];

        let err = run(&args, &config).await.unwrap_err();
        assert!(matches!(err, InstallError::Options(_)));
        assert!(err.report().starts_with("FAILED!: Invalid email: "));
    }

    #[tokio::test]
    async fn test_missing_dump_detected_before_connecting() {
        let root = tempfile::tempdir().unwrap();
        let mut config = InstallerConfig::for_root(root.path());
        config.skip_checks = true;
        let args = [
            "--db_username", "root",
            "--db_password", "secret",
            "--username", "admin",
            "--password", "hunter2",
            "--email", "admin@example.com",
            "--http_server", "http://localhost/shop/",
            // Unreachable host: a connection attempt would fail differently.
            "--db_hostname", "256.256.256.256",
        ];

        let err = run(&args, &config).await.unwrap_err();
        assert!(matches!(err, InstallError::SqlDumpNotFound(_)));
        assert_eq!(
            err.to_string(),
            format!("Could not load sql file: {}", config.sql_dump.display())
        );
    }
}
