//! Inspecting the PHP runtime that will serve the store.
//!
//! The `php` binary is run once with a small script that prints one fact
//! per line:
//!
//! ```text
//! version:8.2.12
//! ini:file_uploads=1
//! ini:session.auto_start=0
//! ext:mysqli
//! fn:openssl_encrypt
//! const:PASSWORD_ARGON2ID
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

use oc_install_core::requirements::{CONSTANTS, FUNCTIONS, INI_DIRECTIVES, RuntimeProbe};
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur while probing the runtime.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} exited with {status}: {stderr}")]
    Failed {
        binary: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("PHP did not report its version")]
    MissingVersion,
}

/// Facts collected from a PHP runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhpRuntime {
    version: String,
    ini: HashMap<String, String>,
    extensions: HashSet<String>,
    functions: HashSet<String>,
    constants: HashSet<String>,
}

impl PhpRuntime {
    /// Run `php` and collect the facts the prerequisite rules need.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the binary cannot be started, exits with an
    /// error, or prints no version.
    pub async fn detect(php: &Path) -> Result<Self, ProbeError> {
        let binary = php.display().to_string();
        tracing::debug!(%binary, "Probing PHP runtime");

        let output = Command::new(php)
            .arg("-r")
            .arg(probe_script())
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                binary: binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                binary,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let runtime = Self::parse(&String::from_utf8_lossy(&output.stdout))?;
        tracing::info!(version = %runtime.version, extensions = runtime.extensions.len(), "PHP runtime detected");
        Ok(runtime)
    }

    /// Parse the probe script's report. Unknown lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::MissingVersion`] if no `version:` line is present.
    pub fn parse(report: &str) -> Result<Self, ProbeError> {
        let mut runtime = Self::default();

        for line in report.lines().map(str::trim) {
            if let Some(version) = line.strip_prefix("version:") {
                version.clone_into(&mut runtime.version);
            } else if let Some(setting) = line.strip_prefix("ini:") {
                let (name, value) = setting.split_once('=').unwrap_or((setting, ""));
                runtime.ini.insert(name.to_owned(), value.to_owned());
            } else if let Some(extension) = line.strip_prefix("ext:") {
                runtime.extensions.insert(extension.to_ascii_lowercase());
            } else if let Some(function) = line.strip_prefix("fn:") {
                runtime.functions.insert(function.to_owned());
            } else if let Some(constant) = line.strip_prefix("const:") {
                runtime.constants.insert(constant.to_owned());
            }
        }

        if runtime.version.is_empty() {
            return Err(ProbeError::MissingVersion);
        }
        Ok(runtime)
    }
}

impl RuntimeProbe for PhpRuntime {
    fn version(&self) -> &str {
        &self.version
    }

    fn ini_enabled(&self, directive: &str) -> bool {
        self.ini.get(directive).is_some_and(|value| {
            let value = value.trim();
            !value.is_empty()
                && value != "0"
                && !value.eq_ignore_ascii_case("off")
                && !value.eq_ignore_ascii_case("false")
        })
    }

    fn extension_loaded(&self, name: &str) -> bool {
        self.extensions.contains(&name.to_ascii_lowercase())
    }

    fn function_exists(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    fn constant_defined(&self, name: &str) -> bool {
        self.constants.contains(name)
    }
}

/// PHP snippet passed to `php -r`.
///
/// Writing to a `String` cannot fail, so the `write!` results are ignored.
fn probe_script() -> String {
    let mut script = String::from("echo 'version:', PHP_VERSION, \"\\n\";");
    for directive in INI_DIRECTIVES {
        let _ = write!(
            script,
            " echo 'ini:{directive}=', ini_get('{directive}'), \"\\n\";"
        );
    }
    script.push_str(" foreach (get_loaded_extensions() as $e) { echo 'ext:', $e, \"\\n\"; }");
    for function in FUNCTIONS {
        let _ = write!(
            script,
            " if (function_exists('{function}')) {{ echo 'fn:{function}', \"\\n\"; }}"
        );
    }
    for constant in CONSTANTS {
        let _ = write!(
            script,
            " if (defined('{constant}')) {{ echo 'const:{constant}', \"\\n\"; }}"
        );
    }
    script
}
