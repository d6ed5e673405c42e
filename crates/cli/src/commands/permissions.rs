//! Make the runtime directories writable by the web server.
//!
//! Adds group and other write permission to the image and storage
//! directories and everything beneath them. Best effort: failures are
//! logged and skipped.

use std::io;
use std::path::Path;

use oc_install_core::Layout;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Permission bits added to every entry.
#[cfg(unix)]
const WRITABLE_BITS: u32 = 0o022;

/// Open up every writable directory of `layout`, recursively.
pub fn open_permissions(layout: &Layout) {
    let mut updated = 0_usize;
    let mut failed = 0_usize;

    for dir in layout.writable_dirs() {
        for entry in WalkDir::new(&dir) {
            let result = entry
                .map_err(io::Error::from)
                .and_then(|entry| {
                    if entry.path_is_symlink() {
                        Ok(false)
                    } else {
                        make_writable(entry.path()).map(|()| true)
                    }
                });

            match result {
                Ok(true) => updated += 1,
                Ok(false) => {}
                Err(e) => {
                    failed += 1;
                    warn!(dir = %dir.display(), error = %e, "Could not update permissions");
                }
            }
        }
    }

    info!(updated, failed, "Directory permissions updated");
}

#[cfg(unix)]
fn make_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | WRITABLE_BITS);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_writable(path: &Path) -> io::Result<()> {
    tracing::debug!(path = %path.display(), "Permission bits not supported on this platform");
    Ok(())
}
