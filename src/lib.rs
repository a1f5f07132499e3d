//! Testgen: test scaffold generator for JavaScript/TypeScript projects
//!
//! This library scans source files, runs a lightweight regex-based analysis on
//! each one and produces Jest, Vitest or Mocha test scaffolds, either through a
//! remote generation service or through the local template synthesizer.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod generator;
pub mod protocol;
pub mod reporter;
pub mod scanner;
pub mod template;
pub mod watcher;

use serde::{Deserialize, Serialize};

pub use analyzer::{analyze, AnalyzeError};
pub use detector::is_eligible;
pub use generator::{GenerateError, Orchestrator};
pub use template::{synthesize, synthesize_with};

/// Source extensions stripped when deriving a base name
const SOURCE_EXTENSIONS: [&str; 4] = [".tsx", ".jsx", ".ts", ".js"];

/// A source file handed over by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Base name including extension (e.g. `math.js`)
    pub name: String,
    /// Path as found on disk
    pub path: String,
    /// Path relative to the scanned project root
    pub relative_path: String,
    /// Full source text
    pub content: String,
    /// Size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Build a record from already-decoded text
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        relative_path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            path: path.into(),
            relative_path: relative_path.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Build a record from raw bytes; fails when the bytes are not UTF-8 text
    pub fn from_bytes(
        name: impl Into<String>,
        path: impl Into<String>,
        relative_path: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AnalyzeError> {
        let name = name.into();
        let content = String::from_utf8(bytes).map_err(|e| AnalyzeError::InvalidInput {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(name, path, relative_path, content))
    }

    /// Path sent to the remote service: relative path when known, else the disk path
    pub fn preferred_path(&self) -> &str {
        if self.relative_path.is_empty() {
            &self.path
        } else {
            &self.relative_path
        }
    }

    /// Base name with its `.js/.ts/.jsx/.tsx` extension removed
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }
}

/// Strip one trailing `.js/.ts/.jsx/.tsx` extension from a file name
pub fn base_name(file_name: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

/// Structural summary of one source file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Unique function names in first-seen order
    pub functions: Vec<String>,
    /// Class names (duplicates kept)
    pub classes: Vec<String>,
    /// Module references from ES imports, then CommonJS requires
    pub imports: Vec<String>,
    pub has_async: bool,
    pub has_promises: bool,
    pub has_exports: bool,
    pub is_react_component: bool,
    pub is_api_route: bool,
    pub has_database: bool,
    #[serde(rename = "hasTypeScript")]
    pub has_typescript: bool,
    #[serde(rename = "hasJSX")]
    pub has_jsx: bool,
    /// Control-flow complexity (always >= 1)
    pub complexity: u32,
}

/// Target test framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Jest,
    Vitest,
    Mocha,
}

impl Framework {
    /// Normalize a framework name; anything unrecognized becomes Jest
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "vitest" => Framework::Vitest,
            "mocha" => Framework::Mocha,
            _ => Framework::Jest,
        }
    }

    /// Lowercase identifier used on the wire and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Jest => "jest",
            Framework::Vitest => "vitest",
            Framework::Mocha => "mocha",
        }
    }

    /// Suffix appended to the base name of a generated test file
    pub fn test_suffix(&self) -> &'static str {
        match self {
            Framework::Jest => ".test.js",
            Framework::Vitest => ".test.ts",
            Framework::Mocha => ".spec.js",
        }
    }

    /// Test file name for a base name (e.g. `math` -> `math.test.js`)
    pub fn test_filename(&self, base_name: &str) -> String {
        format!("{}{}", base_name, self.test_suffix())
    }

    /// npm package to install for this framework
    pub fn package(&self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Framework::Jest => write!(f, "Jest"),
            Framework::Vitest => write!(f, "Vitest"),
            Framework::Mocha => write!(f, "Mocha"),
        }
    }
}

impl std::str::FromStr for Framework {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Framework::from_name(s))
    }
}

/// Options forwarded to remote/agent prompts and template verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Ask for broader edge-case coverage
    #[serde(default = "default_true")]
    pub generate_edge_cases: bool,
    /// Ask for setup/teardown scaffolding
    #[serde(default = "default_true")]
    pub include_setup: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            generate_edge_cases: true,
            include_setup: true,
        }
    }
}

/// How a test's content was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Returned verbatim by the remote service
    Remote,
    /// Rendered by the local template synthesizer
    Local,
}

impl std::fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMethod::Remote => write!(f, "remote"),
            GenerationMethod::Local => write!(f, "local"),
        }
    }
}

/// A generated test file ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTest {
    /// Output file name (e.g. `math.test.js`)
    pub filename: String,
    /// Test file text
    pub content: String,
    /// Name of the source file the test was generated for
    pub source_file: String,
    /// Which tier produced the content
    pub method: GenerationMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_code_extensions() {
        assert_eq!(base_name("math.js"), "math");
        assert_eq!(base_name("App.tsx"), "App");
        assert_eq!(base_name("Button.jsx"), "Button");
        assert_eq!(base_name("types.ts"), "types");
    }

    #[test]
    fn test_base_name_strips_only_last_extension() {
        assert_eq!(base_name("vite.config.js"), "vite.config");
        assert_eq!(base_name("README.md"), "README.md");
    }

    #[test]
    fn test_framework_naming() {
        assert_eq!(Framework::Jest.test_filename("math"), "math.test.js");
        assert_eq!(Framework::Vitest.test_filename("math"), "math.test.ts");
        assert_eq!(Framework::Mocha.test_filename("math"), "math.spec.js");
        assert_eq!(
            Framework::from_name("jasmine").test_filename("math"),
            "math.test.js"
        );
    }

    #[test]
    fn test_framework_from_name_is_case_insensitive() {
        assert_eq!(Framework::from_name("Vitest"), Framework::Vitest);
        assert_eq!(Framework::from_name(" MOCHA "), Framework::Mocha);
        assert_eq!(Framework::from_name(""), Framework::Jest);
    }

    #[test]
    fn test_file_record_from_bytes_rejects_binary() {
        let err = FileRecord::from_bytes("blob.js", "blob.js", "blob.js", vec![0xff, 0xfe, 0x00])
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidInput { .. }));
    }

    #[test]
    fn test_preferred_path_falls_back_to_path() {
        let mut file = FileRecord::new("a.js", "/abs/a.js", "src/a.js", "");
        assert_eq!(file.preferred_path(), "src/a.js");
        file.relative_path.clear();
        assert_eq!(file.preferred_path(), "/abs/a.js");
    }

    #[test]
    fn test_generation_options_deserialize_defaults() {
        let opts: GenerationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, GenerationOptions::default());
        let opts: GenerationOptions =
            serde_json::from_str(r#"{"generateEdgeCases": false}"#).unwrap();
        assert!(!opts.generate_edge_cases);
        assert!(opts.include_setup);
    }
}
