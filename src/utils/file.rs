use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Context, Result};

/// Replace `path` with `contents`, writing through a sibling temporary file so that a
/// failed write never leaves a truncated file behind.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path)?;

    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .with_context(|| format!("Failed to write {}", tmp.display()));

    let result = written.and_then(|()| {
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move output into place at {}", path.display()))
    });

    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            log::debug!("could not remove {}: {err}", tmp.display());
        }
    }

    result.map_err(AppError::from)
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|segment| segment.to_str())
        .ok_or_else(|| AppError::message(format!("Invalid output path {}", path.display())))?;
    Ok(path.with_file_name(format!(".{name}.tmp")))
}
