//! Server prerequisites for running OpenCart.
//!
//! The rules are evaluated against a [`RuntimeProbe`], which answers
//! questions about the PHP runtime that will serve the storefront. The
//! `cli` crate provides a probe backed by the `php` binary.

use thiserror::Error;

/// Minimum supported PHP version, `(major, minor)`.
///
/// The admin password is stored as an Argon2id hash, which PHP's
/// `password_verify` understands from 7.3 on.
pub const MINIMUM_VERSION: (u32, u32) = (7, 3);

/// Constant PHP defines when it can verify the admin password hash.
pub const PASSWORD_HASH_CONSTANT: &str = "PASSWORD_ARGON2ID";

/// `php.ini` directives the rules read.
pub const INI_DIRECTIVES: &[&str] = &["file_uploads", "session.auto_start"];

/// Functions whose availability the rules read.
pub const FUNCTIONS: &[&str] = &["openssl_encrypt"];

/// Constants whose definition the rules read.
pub const CONSTANTS: &[&str] = &[PASSWORD_HASH_CONSTANT];

/// Answers questions about the target runtime.
pub trait RuntimeProbe {
    /// Version string as reported by the runtime (e.g. `8.2.12`).
    fn version(&self) -> &str;

    /// Whether a boolean `php.ini` directive is switched on.
    fn ini_enabled(&self, directive: &str) -> bool;

    /// Whether an extension is loaded. Names are compared case-insensitively.
    fn extension_loaded(&self, name: &str) -> bool;

    fn function_exists(&self, name: &str) -> bool;

    /// Whether a global constant is defined.
    fn constant_defined(&self, name: &str) -> bool;
}

/// A failed prerequisite, carrying the message shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{0}")]
pub struct RequirementFailure(pub &'static str);

struct Rule {
    message: &'static str,
    satisfied: fn(&dyn RuntimeProbe) -> bool,
}

/// Rules in reporting order.
const RULES: &[Rule] = &[
    Rule {
        message: "Warning: You need to use PHP7.3+ or above for OpenCart to work!",
        satisfied: |probe| version_at_least(probe.version(), MINIMUM_VERSION),
    },
    Rule {
        message: "Warning: file_uploads needs to be enabled!",
        satisfied: |probe| probe.ini_enabled("file_uploads"),
    },
    Rule {
        message: "Warning: OpenCart will not work with session.auto_start enabled!",
        satisfied: |probe| !probe.ini_enabled("session.auto_start"),
    },
    Rule {
        message: "Warning: MySQLi extension needs to be loaded for OpenCart to work!",
        satisfied: |probe| probe.extension_loaded("mysqli"),
    },
    Rule {
        message: "Warning: GD extension needs to be loaded for OpenCart to work!",
        satisfied: |probe| probe.extension_loaded("gd"),
    },
    Rule {
        message: "Warning: CURL extension needs to be loaded for OpenCart to work!",
        satisfied: |probe| probe.extension_loaded("curl"),
    },
    Rule {
        message: "Warning: OpenSSL extension needs to be loaded for OpenCart to work!",
        satisfied: |probe| probe.function_exists("openssl_encrypt"),
    },
    Rule {
        message: "Warning: ZLIB extension needs to be loaded for OpenCart to work!",
        satisfied: |probe| probe.extension_loaded("zlib"),
    },
    Rule {
        message: "Warning: PHP needs Argon2id password hashing (PASSWORD_ARGON2ID) for OpenCart to work!",
        satisfied: |probe| probe.constant_defined(PASSWORD_HASH_CONSTANT),
    },
];

/// Run every rule and report the first one that fails.
///
/// # Errors
///
/// Returns the [`RequirementFailure`] of the first unsatisfied rule.
pub fn check(probe: &dyn RuntimeProbe) -> Result<(), RequirementFailure> {
    RULES
        .iter()
        .find(|rule| !(rule.satisfied)(probe))
        .map_or(Ok(()), |rule| Err(RequirementFailure(rule.message)))
}

/// Compare the leading numeric components of a version string.
///
/// Suffixes such as `-1ubuntu2` or `RC1` are ignored; a string without a
/// leading number never satisfies the minimum.
#[must_use]
pub fn version_at_least(version: &str, (major, minor): (u32, u32)) -> bool {
    let mut parts = version.split('.').map(|part| {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    });

    match (parts.next().flatten(), parts.next().flatten()) {
        (Some(found_major), found_minor) => {
            (found_major, found_minor.unwrap_or(0)) >= (major, minor)
        }
        (None, _) => false,
    }
}
