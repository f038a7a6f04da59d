use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::Serialize;

use crate::error::Result;

/// Regular `*.json` files directly inside `dir`, sorted. Subdirectories are
/// never descended into. A missing directory yields an empty list.
pub fn json_file_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Copy a file, then carry over its access and modification times.
pub fn copy_preserving_times(src: &Path, dst: &Path) -> std::io::Result<u64> {
    let bytes = fs::copy(src, dst)?;
    let meta = fs::metadata(src)?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;
    Ok(bytes)
}

/// Serialize with two-space indentation, overwriting any existing file.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
