//! Seeding the storefront database from the bundled SQL dump.
//!
//! - [`scanner`] - extracts `INSERT INTO ... );` blocks from dump lines and
//!   rewrites the table prefix
//! - [`fixups`] - statements run after the dump (admin user, store
//!   settings, API credential)
//! - [`escape`] - MySQL string escaping for interpolated values

pub mod escape;
pub mod fixups;
pub mod scanner;

pub use escape::Escaped;
pub use fixups::Fixups;
pub use scanner::{ScanState, SeedScanner, rewrite_prefix};
