//! Directory layout of an OpenCart installation.
//!
//! ```text
//! <root>/
//! ├── admin/            admin application, admin/config.php
//! ├── catalog/          storefront application
//! ├── image/
//! ├── install/          installer, opencart.sql
//! ├── system/
//! │   ├── config/
//! │   └── storage/      cache, download, logs, modification, session, upload
//! └── config.php
//! ```

use std::path::{Path, PathBuf};

/// Runtime directories under `system/storage/`.
pub const STORAGE_DIRS: [&str; 6] = [
    "cache",
    "download",
    "logs",
    "modification",
    "session",
    "upload",
];

/// Paths of one installation, derived from its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root as written into the generated config files: forward slashes and
    /// a trailing `/`.
    #[must_use]
    pub fn root_prefix(&self) -> String {
        let root = self.root.to_string_lossy().replace('\\', "/");
        if root.ends_with('/') {
            root
        } else {
            format!("{root}/")
        }
    }

    #[must_use]
    pub fn admin_dir(&self) -> PathBuf {
        self.root.join("admin")
    }

    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.root.join("image")
    }

    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.root.join("system").join("storage")
    }

    /// Schema and seed data shipped with the installer.
    #[must_use]
    pub fn sql_dump(&self) -> PathBuf {
        self.root.join("install").join("opencart.sql")
    }

    /// Storefront configuration, `<root>/config.php`.
    #[must_use]
    pub fn storefront_config(&self) -> PathBuf {
        self.root.join("config.php")
    }

    /// Admin configuration, `<root>/admin/config.php`.
    #[must_use]
    pub fn admin_config(&self) -> PathBuf {
        self.admin_dir().join("config.php")
    }

    /// Directories the web server must be able to write to.
    #[must_use]
    pub fn writable_dirs(&self) -> Vec<PathBuf> {
        let storage = self.storage_dir();
        std::iter::once(self.image_dir())
            .chain(STORAGE_DIRS.iter().map(|dir| storage.join(dir)))
            .collect()
    }
}
