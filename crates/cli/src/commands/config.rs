//! Write the generated configuration files.
//!
//! Existing files are replaced in full; nothing is merged or backed up.

use std::path::Path;

use oc_install_core::{GeneratedConfig, Layout};
use tracing::info;

use crate::error::InstallError;

/// Write `config.php` and `admin/config.php` under the installation root.
///
/// # Errors
///
/// Returns [`InstallError::FileWrite`] for the first file that cannot be
/// written.
pub async fn write_config_files(
    generated: &GeneratedConfig,
    layout: &Layout,
) -> Result<(), InstallError> {
    write(&layout.storefront_config(), &generated.storefront).await?;
    write(&layout.admin_config(), &generated.admin).await?;
    Ok(())
}

async fn write(path: &Path, contents: &str) -> Result<(), InstallError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| InstallError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "Configuration written");
    Ok(())
}
