//! Integration tests for the OpenCart installer.
//!
//! The installer's seeding flow is written against the
//! [`Database`] trait; these tests drive it with
//! [`RecordingDatabase`], which keeps every statement in memory instead of
//! talking to MySQL.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oc-install-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `seed_loader` - SQL dump scanning and the post-seed statements
//! - `install_flow` - Seeding plus config generation on a temporary root

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use oc_install_cli::InstallerConfig;
use oc_install_cli::db::{Database, DatabaseError};
use oc_install_core::options::InstallOptions;
use oc_install_core::RawOptions;

/// What a [`RecordingDatabase`] saw.
#[derive(Debug, Default)]
pub struct Recording {
    /// Statements in execution order, failed ones included
    pub statements: Vec<String>,
    pub closed: bool,
}

/// In-memory [`Database`] that records statements.
///
/// Clones share one [`Recording`], so a test can keep a handle after
/// passing the database to code that consumes it.
#[derive(Debug, Clone)]
pub struct RecordingDatabase {
    recording: Arc<Mutex<Recording>>,
    fail_on: Option<String>,
    insert_id: u64,
    last_insert_id: u64,
}

impl Default for RecordingDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recording: Arc::default(),
            fail_on: None,
            insert_id: 1,
            last_insert_id: 0,
        }
    }

    /// Reject every statement containing `needle`.
    #[must_use]
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_owned());
        self
    }

    /// Id reported after every `INSERT`.
    #[must_use]
    pub const fn with_insert_id(mut self, id: u64) -> Self {
        self.insert_id = id;
        self
    }

    pub fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.recording().statements.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.recording().closed
    }
}

impl Database for RecordingDatabase {
    async fn query(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.recording().statements.push(sql.to_owned());

        if self.fail_on.as_deref().is_some_and(|needle| sql.contains(needle)) {
            return Err(DatabaseError::query(
                sql,
                sqlx::Error::Protocol("statement rejected by test".to_owned()),
            ));
        }

        self.last_insert_id = if sql.trim_start().starts_with("INSERT") {
            self.insert_id
        } else {
            0
        };
        Ok(1)
    }

    fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    async fn close(self) -> Result<(), DatabaseError> {
        self.recording().closed = true;
        Ok(())
    }
}

/// The options from the installer's usage example, with `extra` pairs
/// appended (later pairs win).
///
/// # Panics
///
/// Panics if the options do not validate.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn sample_options(extra: &[&str]) -> InstallOptions {
    let mut args = vec![
        "--db_hostname",
        "localhost",
        "--db_username",
        "root",
        "--db_password",
        "pass",
        "--db_database",
        "opencart",
        "--db_driver",
        "mysqli",
        "--db_port",
        "3306",
        "--username",
        "admin",
        "--password",
        "admin",
        "--email",
        "youremail@example.com",
        "--http_server",
        "http://localhost/shop",
    ];
    args.extend_from_slice(extra);
    RawOptions::parse(&args).unwrap().validate().unwrap()
}

/// A temporary OpenCart root: `install/opencart.sql` holding `dump`, plus
/// the `admin`, `image` and `system/storage` directories.
///
/// # Panics
///
/// Panics if the directory tree cannot be created.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn install_root(dump: &str) -> (tempfile::TempDir, InstallerConfig) {
    let root = tempfile::tempdir().unwrap();
    let config = InstallerConfig::for_root(root.path());
    let layout = config.layout();

    std::fs::create_dir_all(layout.root().join("install")).unwrap();
    std::fs::create_dir_all(layout.admin_dir()).unwrap();
    for dir in layout.writable_dirs() {
        std::fs::create_dir_all(dir).unwrap();
    }
    write_dump(&config.sql_dump, dump);

    (root, config)
}

/// Write `contents` to `path`.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[allow(clippy::unwrap_used)]
pub fn write_dump(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}
