//! OpenCart installer core - pure building blocks for `oc-install`.
//!
//! This crate holds everything the installer decides without touching the
//! outside world:
//! - [`options`] - `--name value` flag parsing, defaults and validation
//! - [`layout`] - Directory layout of an OpenCart installation
//! - [`seed`] - SQL dump scanner, prefix rewriting and post-seed statements
//! - [`config_file`] - Rendering (and reading back) the generated `config.php` files
//! - [`requirements`] - Server prerequisite rules evaluated against a runtime probe
//! - [`types`] - Validated newtypes shared by the modules above
//!
//! # Architecture
//!
//! No I/O, no database access, no process spawning. The `cli` crate owns the
//! side effects and feeds this crate plain data.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config_file;
pub mod layout;
pub mod options;
pub mod requirements;
pub mod seed;
pub mod types;

pub use config_file::{GeneratedConfig, render};
pub use layout::Layout;
pub use options::{InstallOptions, MissingFields, OptionsError, RawOptions};
pub use types::*;
