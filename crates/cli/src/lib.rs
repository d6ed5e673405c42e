//! OpenCart installer - the side-effecting half of `oc-install`.
//!
//! - [`commands`] - The installation steps and the `install` command
//! - [`config`] - Installer settings from environment variables
//! - [`db`] - Database connection used while seeding
//! - [`probe`] - PHP runtime inspection for the prerequisite check
//! - [`secrets`] - Password hashing and random tokens
//! - [`error`] - The installer's error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod probe;
pub mod secrets;

pub use config::InstallerConfig;
pub use error::InstallError;
