//! Install option resolution.
//!
//! `oc-install install` takes its settings as alternating `--name value`
//! pairs. [`RawOptions::parse`] merges them over [`DEFAULT_OPTIONS`], and
//! [`RawOptions::validate`] turns the merged map into [`InstallOptions`]
//! or reports every absent or empty required field at once.
//!
//! Validation only checks presence. Values are checked for shape later by
//! [`InstallOptions::check_values`], which reports the first bad value.
//!
//! # Example
//!
//! ```
//! use oc_install_core::RawOptions;
//!
//! let raw = RawOptions::parse(&["--db_username", "root", "--email", "a@b.com"]).unwrap();
//! let missing = raw.validate().unwrap_err();
//! assert_eq!(missing.fields(), ["db_password", "password", "http_server"]);
//! ```

use std::collections::BTreeMap;

use secrecy::SecretString;
use thiserror::Error;

use crate::types::{BaseUrl, Email};

/// Values used when a flag is not supplied.
pub const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    ("db_hostname", "localhost"),
    ("db_database", "opencart"),
    ("db_prefix", "oc_"),
    ("db_driver", "mysqli"),
    ("db_port", "3306"),
    ("username", "admin"),
];

/// Fields that must be present and non-empty, in reporting order.
pub const REQUIRED_FIELDS: &[&str] = &[
    "db_hostname",
    "db_username",
    "db_password",
    "db_database",
    "db_prefix",
    "db_port",
    "username",
    "password",
    "email",
    "http_server",
];

const DEFAULT_DRIVER: &str = "mysqli";

/// Errors raised while reading the raw argument list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// A token in a name position does not look like `--name`.
    #[error("{0} found in command line args instead of a valid option name starting with '--'")]
    MalformedArgument(String),
    /// The final `--name` has no value after it.
    #[error("--{0} is missing a value")]
    MissingValue(String),
    /// A supplied value cannot be used.
    #[error("Invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Required fields that were absent or empty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Following inputs were missing or invalid: {}", .0.join(", "))]
pub struct MissingFields(Vec<String>);

impl MissingFields {
    /// Field names in [`REQUIRED_FIELDS`] order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

/// Merged `--name value` map, defaults included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions(BTreeMap<String, String>);

impl Default for RawOptions {
    fn default() -> Self {
        Self(
            DEFAULT_OPTIONS
                .iter()
                .map(|&(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
        )
    }
}

impl RawOptions {
    /// Parse alternating `--name value` tokens on top of the defaults.
    ///
    /// Later occurrences of a name win. Names that the installer does not
    /// know are kept but never read.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::MalformedArgument`] when a name position holds
    /// something other than `--name`, and [`OptionsError::MissingValue`] when
    /// the list ends right after a name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, OptionsError> {
        let mut options = Self::default();
        let mut tokens = args.iter().map(AsRef::as_ref);

        while let Some(token) = tokens.next() {
            let name = token
                .strip_prefix("--")
                .filter(|name| !name.is_empty())
                .ok_or_else(|| OptionsError::MalformedArgument(token.to_owned()))?;
            let value = tokens
                .next()
                .ok_or_else(|| OptionsError::MissingValue(name.to_owned()))?;
            options.0.insert(name.to_owned(), value.to_owned());
        }

        Ok(options)
    }

    /// Value of `name` unless it is absent or empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Check the required fields and build the options.
    ///
    /// # Errors
    ///
    /// Returns [`MissingFields`] naming exactly the required fields that are
    /// absent or empty.
    pub fn validate(&self) -> Result<InstallOptions, MissingFields> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|&&field| self.get(field).is_none())
            .map(|&field| field.to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        let text = |name: &str| self.get(name).unwrap_or_default().to_owned();
        Ok(InstallOptions {
            database: DatabaseOptions {
                driver: self.get("db_driver").unwrap_or(DEFAULT_DRIVER).to_owned(),
                hostname: text("db_hostname"),
                username: text("db_username"),
                password: SecretString::from(text("db_password")),
                database: text("db_database"),
                prefix: text("db_prefix"),
                port: text("db_port"),
            },
            admin: AdminAccount {
                username: text("username"),
                password: SecretString::from(text("password")),
                email: text("email"),
            },
            base_url: BaseUrl::new(&text("http_server")),
        })
    }
}

/// Fully validated installation settings.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Database connection and table prefix
    pub database: DatabaseOptions,
    /// Administrator account created during seeding
    pub admin: AdminAccount,
    /// Public storefront URL, always ending with `/`
    pub base_url: BaseUrl,
}

impl InstallOptions {
    /// Check the values that must have a particular shape before the
    /// database is touched: the port and the admin email.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidValue`] for the first unusable value.
    pub fn check_values(&self) -> Result<(), OptionsError> {
        self.database.port_number()?;
        Email::parse(&self.admin.email).map_err(|e| OptionsError::InvalidValue {
            field: "email",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Database connection settings.
///
/// `Debug` output redacts the password.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// Driver id written to `DB_DRIVER` (e.g. `mysqli`)
    pub driver: String,
    pub hostname: String,
    pub username: String,
    pub password: SecretString,
    /// Database (schema) name
    pub database: String,
    /// Table prefix substituted for `oc_` in the dump
    pub prefix: String,
    /// Port as supplied; written to `DB_PORT` verbatim
    pub port: String,
}

impl DatabaseOptions {
    /// The port as a TCP port number.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidValue`] unless the port is a number
    /// between 1 and 65535.
    pub fn port_number(&self) -> Result<u16, OptionsError> {
        self.port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|&port| port != 0)
            .ok_or_else(|| OptionsError::InvalidValue {
                field: "db_port",
                reason: format!("{} is not a port number", self.port),
            })
    }
}

/// The administrator account written as user 1.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: SecretString,
    pub email: String,
}
