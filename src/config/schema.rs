//! Config schema and deserialization

use crate::Framework;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default remote generation endpoint base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
/// Timeout for one remote generation request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Project config file (`.testgenrc.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Target framework (jest, vitest, mocha)
    #[serde(default)]
    pub framework: Framework,
    /// Directory generated tests are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Source globs the project considers (informational for editors and CI)
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,
    /// Globs (relative to the project root) excluded from scanning
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./tests")
}

fn default_file_patterns() -> Vec<String> {
    ["**/*.js", "**/*.ts", "**/*.jsx", "**/*.tsx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    ["node_modules/**", "dist/**", "build/**", "**/*.test.*"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            framework: Framework::default(),
            output_dir: default_output_dir(),
            file_patterns: default_file_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl ProjectConfig {
    /// Apply CLI flags on top of file values (flags win)
    pub fn merge_with_cli(mut self, framework: Option<Framework>, output: Option<PathBuf>) -> Self {
        if let Some(framework) = framework {
            self.framework = framework;
        }
        if let Some(output) = output {
            self.output_dir = output;
        }
        self
    }
}

/// Process-wide runtime settings, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the remote generation service (no trailing slash)
    pub api_base_url: String,
    /// Timeout for one remote request
    pub request_timeout: Duration,
    /// Worker count for per-file generation (1 = sequential)
    pub jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl Settings {
    /// Settings pointing at a given base URL
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the worker count (clamped to at least 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Full URL of the analyze endpoint
    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.api_base_url)
    }
}
