//! File system watcher for watch mode

use crate::detector::is_test_file_name;
use crate::scanner::{is_code_file, IGNORED_DIRS};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a project for source changes and emits paths on a channel
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    /// Watched directory; event paths are judged relative to it
    root: PathBuf,
    /// Generated tests land here (as given and canonical); changes inside never trigger regeneration
    output_dirs: Vec<PathBuf>,
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

impl SourceWatcher {
    /// Start watching the given path (file or directory)
    pub fn watch(path: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let root = if path.is_dir() {
            path.to_path_buf()
        } else {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        };
        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            root,
            output_dirs: Vec::new(),
        })
    }

    /// Ignore everything under the output directory
    pub fn ignoring_output(mut self, output_dir: &Path) -> Self {
        self.output_dirs.push(output_dir.to_path_buf());
        if let Ok(canonical) = output_dir.canonicalize() {
            self.output_dirs.push(canonical);
        }
        self
    }

    /// Check if the path is a source file whose change should regenerate tests.
    /// Directory checks apply to every component, so pass paths relative to the project.
    pub fn is_source_file(p: &Path) -> bool {
        let name = match p.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return false,
        };
        if !is_code_file(name) || is_test_file_name(name) {
            return false;
        }
        !p.components().any(|c| match c {
            Component::Normal(part) => part
                .to_str()
                .map(|s| IGNORED_DIRS.contains(&s) || (s.starts_with('.') && s.len() > 1))
                .unwrap_or(false),
            _ => false,
        })
    }

    fn is_relevant(&self, p: &Path) -> bool {
        if self.output_dirs.iter().any(|out| p.starts_with(out)) {
            return false;
        }
        Self::is_source_file(p.strip_prefix(&self.root).unwrap_or(p))
    }

    /// Collect source paths from an event
    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| self.is_relevant(p))
            .cloned()
            .collect()
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(_)) | Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        let mut paths: Vec<_> = all.into_iter().collect();
        paths.sort();
        paths
    }
}
