//! Installer error type.
//!
//! Every variant aborts the run with exit code 1. Nothing is retried and a
//! half-finished install is left as-is.

use std::path::PathBuf;

use oc_install_core::requirements::RequirementFailure;
use oc_install_core::{MissingFields, OptionsError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DatabaseError;
use crate::probe::ProbeError;
use crate::secrets::SecretError;

/// Errors that can occur while installing.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The argument list is not a sequence of `--name value` pairs, or a
    /// supplied value cannot be used.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Required inputs are absent or unusable.
    #[error(transparent)]
    MissingFields(#[from] MissingFields),

    /// A server prerequisite is not met.
    #[error("Pre-installation check failed: {0}")]
    PrerequisiteFailed(#[from] RequirementFailure),

    /// The PHP runtime could not be inspected.
    #[error("Pre-installation check failed: {0}")]
    Probe(#[from] ProbeError),

    /// The bundled SQL dump is missing.
    #[error("Could not load sql file: {}", .0.display())]
    SqlDumpNotFound(PathBuf),

    /// A database operation failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A generated config file could not be written.
    #[error("Could not write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the SQL dump failed part-way.
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Password hashing or token generation failed.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// The installer's own environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InstallError {
    /// Line printed to stdout when the install fails.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_prerequisite() || matches!(self, Self::MissingFields(_)) {
            format!("FAILED! {self}")
        } else {
            format!("FAILED!: {self}")
        }
    }
}

impl InstallError {
    /// Failures reported with the pre-installation banner.
    #[must_use]
    pub const fn is_prerequisite(&self) -> bool {
        matches!(self, Self::PrerequisiteFailed(_) | Self::Probe(_))
    }
}
