//! Per-request scratch directory, removed when dropped

use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const FALLBACK_SOURCE_NAME: &str = "source.js";

/// A uniquely named directory owned by one request.
///
/// The directory and everything in it are deleted on drop, on every exit
/// path of the request that created it.
#[derive(Debug)]
pub struct ScratchWorkspace {
    path: PathBuf,
}

impl ScratchWorkspace {
    /// Create `<root>/testgen-<millis>-<uuid>`
    pub fn create(root: &Path) -> io::Result<Self> {
        let name = format!(
            "testgen-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        );
        let path = root.join(name);
        fs::create_dir_all(&path)?;
        debug!(path = %path.display(), "created scratch workspace");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the source file under its bare file name (directories in `name` are dropped)
    pub fn write_source(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_SOURCE_NAME);
        let path = self.path.join(file_name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed scratch workspace"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "failed to remove scratch workspace: {}", e),
        }
    }
}
