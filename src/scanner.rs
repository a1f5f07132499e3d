//! Project scanning: collect JavaScript/TypeScript sources as [`FileRecord`]s

use crate::FileRecord;
use globset::GlobSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Extensions treated as code files
pub const CODE_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];
/// Directory names never descended into
pub const IGNORED_DIRS: [&str; 6] = ["node_modules", ".git", "dist", "build", "coverage", ".next"];
/// Files above this size are skipped so analysis stays bounded
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("File must be a JavaScript/TypeScript file (.js, .ts, .jsx, .tsx): {}", .0.display())]
    NotCodeFile(PathBuf),
    #[error("Failed to scan project: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// True for `.js/.ts/.jsx/.tsx` file names
pub fn is_code_file(name: &str) -> bool {
    CODE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|n| IGNORED_DIRS.contains(&n))
            .unwrap_or(false)
}

/// Scan a file or a directory.
///
/// A single file must carry a code extension; its relative path is its name.
pub fn scan_target(path: &Path, exclude: Option<&GlobSet>) -> Result<Vec<FileRecord>, ScanError> {
    if path.is_file() {
        let name = file_name(path);
        if !is_code_file(&name) {
            return Err(ScanError::NotCodeFile(path.to_path_buf()));
        }
        return Ok(read_record(path, &name, &name)?.into_iter().collect());
    }
    scan_directory(path, exclude)
}

/// Recursively collect code files under `root`, sorted by path
pub fn scan_directory(root: &Path, exclude: Option<&GlobSet>) -> Result<Vec<FileRecord>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_code_file(&name) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        if let Some(set) = exclude {
            if set.is_match(&relative) {
                debug!(path = %relative.display(), "excluded by pattern");
                continue;
            }
        }
        let relative = relative.to_string_lossy().replace('\\', "/");
        if let Some(record) = read_record(entry.path(), &name, &relative)? {
            files.push(record);
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Read one file; oversized or non-text files are skipped with a warning
fn read_record(path: &Path, name: &str, relative: &str) -> Result<Option<FileRecord>, ScanError> {
    let read_err = |source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(read_err)?.len();
    if size > MAX_FILE_BYTES {
        warn!(path = %path.display(), size, "skipping file larger than 1 MB");
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(read_err)?;
    match FileRecord::from_bytes(name, path.to_string_lossy(), relative, bytes) {
        Ok(mut record) => {
            record.size = size;
            Ok(Some(record))
        }
        Err(e) => {
            warn!("skipping {}", e);
            Ok(None)
        }
    }
}
