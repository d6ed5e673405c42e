//! Installation steps, in the order `install` runs them.
//!
//! - [`seed`] - load the SQL dump and apply the post-seed statements
//! - [`config`] - write `config.php` and `admin/config.php`
//! - [`permissions`] - open up the runtime directories
//! - [`install`] - option handling, prerequisite check and the steps above

pub mod config;
pub mod install;
pub mod permissions;
pub mod seed;
