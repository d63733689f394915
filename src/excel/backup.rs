use std::path::{Path, PathBuf};

use super::reader::compute_checksum;
use super::types::ExcelError;

/// Timestamp format appended to backup file names
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Copy `path` to `<backup_dir>/<file name>.backup_<YYYYMMDD_HHMMSS>` and verify the copy.
///
/// The backup directory is created when missing. The copy is checked against the source
/// by SHA-256; any failure here means the caller must not touch the file.
pub fn create_backup(path: &Path, backup_dir: &Path) -> Result<PathBuf, ExcelError> {
    if !path.is_file() {
        return Err(ExcelError::backup_error(format!(
            "Cannot back up missing file: {}",
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| ExcelError::backup_error(format!("Not a file path: {}", path.display())))?;

    std::fs::create_dir_all(backup_dir).map_err(|e| {
        ExcelError::backup_error(format!(
            "Failed to create backup directory {}: {}",
            backup_dir.display(),
            e
        ))
    })?;

    let backup_path = unused_backup_path(
        backup_dir,
        &format!(
            "{}.backup_{}",
            file_name.to_string_lossy(),
            chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT)
        ),
    );

    std::fs::copy(path, &backup_path)
        .map_err(|e| ExcelError::backup_error(format!("Failed to create backup: {}", e)))?;

    let source_sum = compute_checksum(path).map_err(|e| ExcelError::backup_error(e.message))?;
    let backup_sum =
        compute_checksum(&backup_path).map_err(|e| ExcelError::backup_error(e.message))?;

    if source_sum != backup_sum {
        return Err(ExcelError::backup_error(format!(
            "Backup {} does not match source (checksum {} vs {})",
            backup_path.display(),
            backup_sum,
            source_sum
        )));
    }

    tracing::info!("Backup created: {}", backup_path.display());
    Ok(backup_path)
}

/// First of `<name>`, `<name>_1`, `<name>_2`, ... that does not exist yet, so backups
/// taken within the same second never replace each other.
fn unused_backup_path(backup_dir: &Path, name: &str) -> PathBuf {
    let mut candidate = backup_dir.join(name);
    let mut n = 1;
    while candidate.exists() {
        candidate = backup_dir.join(format!("{}_{}", name, n));
        n += 1;
    }
    candidate
}

/// Copy a backup back over `target`.
pub fn restore_backup(backup_path: &Path, target: &Path) -> Result<(), ExcelError> {
    if !backup_path.is_file() {
        return Err(ExcelError::file_not_found(&backup_path.display().to_string()));
    }

    std::fs::copy(backup_path, target).map_err(|e| {
        ExcelError::backup_error(format!(
            "Failed to restore {} to {}: {}",
            backup_path.display(),
            target.display(),
            e
        ))
    })?;

    tracing::info!("Restored from backup: {}", backup_path.display());
    Ok(())
}
