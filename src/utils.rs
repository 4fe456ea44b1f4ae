use std::fs::Metadata;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{CleanError, Result};

/// Home directory of the invoking user.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(CleanError::HomeDirUnavailable)
}

/// Bytes actually allocated on disk for this entry.
///
/// Sparse files (disk images, VM containers) report far less than their
/// logical length here.
#[cfg(unix)]
pub fn allocated_size(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    // st_blocks is always in 512-byte units, whatever the filesystem block size.
    metadata.blocks() * 512
}

#[cfg(not(unix))]
pub fn allocated_size(metadata: &Metadata) -> u64 {
    metadata.len()
}

/// Lower-cased extension without a leading dot, so "DMG", ".dmg" and "dmg" compare equal.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// True if no filter is set or the file extension matches it case-insensitively.
pub fn matches_extension(path: &Path, filter: Option<&str>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let wanted = normalize_extension(filter);
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase() == wanted)
        .unwrap_or(false)
}

/// Allocated size of every regular file under `path`, optionally limited to
/// one extension.
///
/// Symlinks are never followed. Entries that vanish or cannot be read are
/// skipped; only a root that cannot be listed is an error.
pub fn dir_size(path: &Path, filter: Option<&str>) -> Result<u64> {
    std::fs::read_dir(path).map_err(|source| CleanError::RootUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut total = 0u64;
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping entry under {}: {e}", path.display());
                continue;
            }
        };
        if !entry.file_type().is_file() || !matches_extension(entry.path(), filter) {
            continue;
        }
        match entry.metadata() {
            Ok(metadata) => total += allocated_size(&metadata),
            Err(e) => debug!("no metadata for {}: {e}", entry.path().display()),
        }
    }
    Ok(total)
}

/// Size of a file or a whole directory tree. Unreadable entries count as zero.
pub fn entry_size(path: &Path) -> u64 {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => dir_size(path, None).unwrap_or_else(|e| {
            debug!("{e}");
            0
        }),
        Ok(metadata) => allocated_size(&metadata),
        Err(e) => {
            debug!("cannot stat {}: {e}", path.display());
            0
        }
    }
}

/// Remove a file, symlink or directory tree. Symlinks are removed, not followed.
pub fn remove_entry(path: &Path) -> std::io::Result<()> {
    if std::fs::symlink_metadata(path)?.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Parse a Docker-style size ("512B", "1.5KB", "2GB") into bytes.
///
/// Units are binary and case-insensitive. Anything outside B/KB/MB/GB is
/// rejected rather than guessed.
pub fn parse_size(s: &str) -> Result<u64> {
    let upper = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = upper.strip_suffix("KB") {
        (n, 1_024u64)
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = upper.strip_suffix("GB") {
        (n, 1_073_741_824)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        return Err(CleanError::InvalidSize(s.to_string()));
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| CleanError::InvalidSize(s.to_string()))?;
    if !num.is_finite() || num < 0.0 {
        return Err(CleanError::InvalidSize(s.to_string()));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Like [`parse_size`], but a bare number is taken as bytes.
pub fn parse_threshold(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(bytes) => Ok(bytes),
        Err(_) => parse_size(s),
    }
}

/// Shorten a path for display by replacing the home dir with ~.
pub fn display_path(path: &Path, home: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(home) {
        format!("~/{}", relative.display())
    } else {
        path.display().to_string()
    }
}
