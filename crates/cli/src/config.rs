//! Installer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `OC_INSTALL_ROOT` - OpenCart root directory (default: parent of the
//!   working directory, i.e. the installer is run from `<root>/install`)
//! - `OC_INSTALL_SQL` - SQL dump to load (default: `<root>/install/opencart.sql`)
//! - `OC_INSTALL_PHP` - PHP binary used for the prerequisite check (default: `php`)
//! - `OC_INSTALL_SKIP_CHECKS` - `1`/`true` skips the prerequisite check
//! - `LOG_FORMAT` - `json` for JSON log lines on stderr
//! - `RUST_LOG` - log filter (default: `oc_install_cli=info`)

use std::path::{Path, PathBuf};

use oc_install_core::Layout;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where and how the installer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// OpenCart installation root
    pub root: PathBuf,
    /// SQL dump loaded into the database
    pub sql_dump: PathBuf,
    /// PHP binary probed for prerequisites
    pub php_binary: PathBuf,
    /// Skip the prerequisite check entirely
    pub skip_checks: bool,
}

impl InstallerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the working directory cannot be read or a
    /// flag variable holds something other than a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let root = match get_optional_env("OC_INSTALL_ROOT") {
            Some(root) => PathBuf::from(root),
            None => default_root(&std::env::current_dir().map_err(ConfigError::WorkingDirectory)?),
        };

        Ok(Self {
            sql_dump: get_optional_env("OC_INSTALL_SQL")
                .map_or_else(|| Layout::new(&root).sql_dump(), PathBuf::from),
            php_binary: PathBuf::from(get_env_or_default("OC_INSTALL_PHP", "php")),
            skip_checks: get_bool_env("OC_INSTALL_SKIP_CHECKS")?,
            root,
        })
    }

    /// Configuration for an installation root with every other setting at
    /// its default.
    #[must_use]
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            sql_dump: Layout::new(&root).sql_dump(),
            php_binary: PathBuf::from("php"),
            skip_checks: false,
            root,
        }
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::new(&self.root)
    }
}

/// The installer ships in `<root>/install`, so the root is one level up.
fn default_root(working_dir: &Path) -> PathBuf {
    working_dir
        .parent()
        .map_or_else(|| working_dir.to_path_buf(), Path::to_path_buf)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a boolean flag; unset means `false`.
fn get_bool_env(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_bool(&value).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got {value}"))
    }))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
