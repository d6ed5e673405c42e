//! Statements run after the dump has been loaded.
//!
//! Every builder takes the configured table prefix and values that have
//! already been escaped by the database connection.

use super::escape::Escaped;

/// `setting` keys rewritten during installation.
pub const CONFIG_EMAIL: &str = "config_email";
pub const CONFIG_ENCRYPTION: &str = "config_encryption";
pub const CONFIG_API_ID: &str = "config_api_id";
pub const CONFIG_INVOICE_PREFIX: &str = "config_invoice_prefix";

/// Label of the API credential created for the admin panel.
pub const DEFAULT_API_USERNAME: &str = "Default";

/// Placeholder name on the admin account.
pub const ADMIN_FIRSTNAME: &str = "John";
pub const ADMIN_LASTNAME: &str = "Doe";

/// Switch the session to UTF-8.
pub const SET_CHARSET: &str = "SET CHARACTER SET utf8";

/// Drop strict SQL modes for the legacy statements that follow.
pub const RELAX_SQL_MODE: &str = "SET @@session.sql_mode = 'NO_ENGINE_SUBSTITUTION'";

/// Builds the post-seed statements for one table prefix.
#[derive(Debug, Clone, Copy)]
pub struct Fixups<'a> {
    prefix: &'a str,
}

impl<'a> Fixups<'a> {
    #[must_use]
    pub const fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    #[must_use]
    pub fn delete_admin_user(&self) -> String {
        format!("DELETE FROM `{}user` WHERE user_id = '1'", self.prefix)
    }

    /// Insert user 1 into the top admin group.
    ///
    /// `salt` stays empty: the password hash carries its own salt.
    #[must_use]
    pub fn insert_admin_user(
        &self,
        username: &Escaped,
        password_hash: &Escaped,
        email: &Escaped,
    ) -> String {
        format!(
            "INSERT INTO `{}user` SET user_id = '1', user_group_id = '1', username = '{username}', \
             salt = '', password = '{password_hash}', firstname = '{ADMIN_FIRSTNAME}', \
             lastname = '{ADMIN_LASTNAME}', email = '{email}', status = '1', date_added = NOW()",
            self.prefix
        )
    }

    #[must_use]
    pub fn delete_setting(&self, key: &str) -> String {
        format!("DELETE FROM `{}setting` WHERE `key` = '{key}'", self.prefix)
    }

    #[must_use]
    pub fn insert_setting(&self, key: &str, value: &Escaped) -> String {
        format!(
            "INSERT INTO `{}setting` SET `code` = 'config', `key` = '{key}', value = '{value}'",
            self.prefix
        )
    }

    /// Zero the view counter of every product.
    #[must_use]
    pub fn reset_product_views(&self) -> String {
        format!("UPDATE `{}product` SET `viewed` = '0'", self.prefix)
    }

    /// Create the admin panel's API credential.
    #[must_use]
    pub fn insert_api(&self, key: &Escaped) -> String {
        format!(
            "INSERT INTO `{}api` SET username = '{DEFAULT_API_USERNAME}', `key` = '{key}', \
             status = 1, date_added = NOW(), date_modified = NOW()",
            self.prefix
        )
    }

    /// Set the invoice prefix to `INV-<year>-00`.
    #[must_use]
    pub fn invoice_prefix(&self, year: i32) -> String {
        format!(
            "UPDATE `{}setting` SET `value` = 'INV-{year}-00' WHERE `key` = '{CONFIG_INVOICE_PREFIX}'",
            self.prefix
        )
    }
}
