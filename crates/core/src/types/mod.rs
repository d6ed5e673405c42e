//! Validated value types used across the installer.

pub mod base_url;
pub mod email;

pub use base_url::BaseUrl;
pub use email::{Email, EmailError};
