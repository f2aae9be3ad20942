//! Working folder management.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{error, info};

/// Delete `folder` and everything in it, then create it again.
///
/// A failed delete is logged and creation is still attempted.
pub fn reset_folder(folder: &Path) -> io::Result<()> {
    if folder.exists() {
        match fs::remove_dir_all(folder) {
            Ok(()) => info!("Deleted folder: {}", folder.display()),
            Err(e) => error!("Error deleting folder {}: {}", folder.display(), e),
        }
    }

    fs::create_dir_all(folder)?;
    info!("Created folder: {}", folder.display());
    Ok(())
}

/// Rename `path` to `new_name` within the same directory.
pub fn rename_in_place(path: &Path, new_name: &str) -> io::Result<std::path::PathBuf> {
    let target = path.with_file_name(new_name);
    if target != path && target.exists() {
        info!("Replacing existing {}", target.display());
    }
    fs::rename(path, &target)?;
    Ok(target)
}
