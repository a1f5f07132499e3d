//! Generation orchestrator: tiered remote-then-local test generation
//!
//! Every eligible file gets exactly one remote attempt (Tier 1). Any remote
//! failure is logged as a warning and answered by the local template
//! synthesizer (Tier 2), which cannot fail. Only enumeration errors abort a
//! batch.

pub mod remote;

pub use remote::{HttpRemoteClient, RemoteError, RemoteGenerator, RemoteOutput};

use crate::analyzer::analyze;
use crate::config::Settings;
use crate::detector::is_eligible;
use crate::scanner::{scan_target, ScanError};
use crate::template::synthesize_with;
use crate::{FileRecord, Framework, GeneratedTest, GenerationMethod, GenerationOptions};
use globset::GlobSet;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    /// File enumeration failed; the whole batch is abandoned
    #[error("Test generation failed: {0}")]
    Enumeration(#[from] ScanError),
}

/// Remote generator that is never reachable; every file goes to Tier 2
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl RemoteGenerator for LocalOnly {
    fn generate(
        &self,
        _file: &FileRecord,
        _framework: Framework,
        _options: &GenerationOptions,
    ) -> Result<RemoteOutput, RemoteError> {
        Err(RemoteError::Transport {
            refused: true,
            message: "remote generation disabled".to_string(),
        })
    }
}

/// Runs the tiered generation protocol over a batch of files
pub struct Orchestrator<R = HttpRemoteClient> {
    remote: R,
    jobs: usize,
    options: GenerationOptions,
}

impl Orchestrator<HttpRemoteClient> {
    /// Orchestrator talking to the remote service configured in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, RemoteError> {
        Ok(Self::new(HttpRemoteClient::new(settings)?, settings))
    }
}

impl<R: RemoteGenerator> Orchestrator<R> {
    pub fn new(remote: R, settings: &Settings) -> Self {
        Self {
            remote,
            jobs: settings.jobs.max(1),
            options: GenerationOptions::default(),
        }
    }

    /// Override the options sent to the remote service and used by templates
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Generate one test per eligible file, in input order.
    ///
    /// Ineligible files are skipped silently.
    pub fn generate_tests(&self, files: &[FileRecord], framework: Framework) -> Vec<GeneratedTest> {
        let eligible: Vec<&FileRecord> = files.iter().filter(|f| is_eligible(f)).collect();

        if self.jobs == 1 || eligible.len() < 2 {
            return eligible
                .into_iter()
                .map(|f| self.generate_single(f, framework))
                .collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            // indexed collect keeps input order
            Ok(pool) => pool.install(|| {
                eligible
                    .par_iter()
                    .map(|f| self.generate_single(f, framework))
                    .collect()
            }),
            Err(e) => {
                warn!("worker pool unavailable ({}), generating sequentially", e);
                eligible
                    .into_iter()
                    .map(|f| self.generate_single(f, framework))
                    .collect()
            }
        }
    }

    /// Scan `target` and generate tests for what it contains
    pub fn generate_for_target(
        &self,
        target: &Path,
        exclude: Option<&GlobSet>,
        framework: Framework,
    ) -> Result<Vec<GeneratedTest>, GenerateError> {
        let files = scan_target(target, exclude)?;
        Ok(self.generate_tests(&files, framework))
    }

    /// Run both tiers for one file
    pub fn generate_single(&self, file: &FileRecord, framework: Framework) -> GeneratedTest {
        info!("Generating test for: {}", file.name);
        let (content, method) = match self.remote.generate(file, framework, &self.options) {
            Ok(output) => {
                info!(
                    "Test generated via {} for {}",
                    output.method.as_deref().unwrap_or("API"),
                    file.name
                );
                (output.content, GenerationMethod::Remote)
            }
            Err(e) => {
                warn!("{}; using local fallback for {}", e, file.name);
                (
                    local_test(file, framework, &self.options),
                    GenerationMethod::Local,
                )
            }
        };

        GeneratedTest {
            filename: framework.test_filename(file.base_name()),
            content,
            source_file: file.name.clone(),
            method,
        }
    }
}

/// Tier 2: analyze the file and render the framework template
pub fn local_test(file: &FileRecord, framework: Framework, options: &GenerationOptions) -> String {
    let analysis = analyze(&file.content);
    synthesize_with(file.base_name(), &analysis, framework, file, options)
}

/// Write generated tests into `output_dir`, creating it if needed
pub fn write_tests(output_dir: &Path, tests: &[GeneratedTest]) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    tests
        .iter()
        .map(|test| {
            let path = output_dir.join(&test.filename);
            fs::write(&path, &test.content)?;
            Ok(path)
        })
        .collect()
}
