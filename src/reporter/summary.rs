//! Pre-generation project summary

use crate::analyzer::analyze;
use crate::detector::{detect_project_type, is_eligible, ProjectType};
use crate::{FileRecord, Framework};

/// Eligible files listed individually in the summary
pub const LISTED_FILES: usize = 8;
/// Function names listed per file
pub const LISTED_FUNCTIONS: usize = 3;

/// One eligible file in the summary
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub name: String,
    pub size_kb: f64,
    pub functions: Vec<String>,
    /// Feature tags: async, React, API
    pub features: Vec<&'static str>,
    pub complexity: u32,
}

/// What the analyze command is about to do
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project_type: ProjectType,
    pub framework: Framework,
    pub total_files: usize,
    pub testable: Vec<FileSummary>,
}

impl ProjectSummary {
    pub fn build(files: &[FileRecord], framework: Framework) -> Self {
        let testable = files
            .iter()
            .filter(|f| is_eligible(f))
            .map(|f| {
                let analysis = analyze(&f.content);
                let mut features = Vec::new();
                if analysis.has_async {
                    features.push("async");
                }
                if analysis.is_react_component {
                    features.push("React");
                }
                if analysis.is_api_route {
                    features.push("API");
                }
                FileSummary {
                    name: f.name.clone(),
                    size_kb: f.size as f64 / 1024.0,
                    functions: analysis.functions,
                    features,
                    complexity: analysis.complexity,
                }
            })
            .collect();

        Self {
            project_type: detect_project_type(files),
            framework,
            total_files: files.len(),
            testable,
        }
    }

    /// Mean complexity of eligible files, 0 when there are none
    pub fn average_complexity(&self) -> f64 {
        if self.testable.is_empty() {
            return 0.0;
        }
        let total: u32 = self.testable.iter().map(|f| f.complexity).sum();
        total as f64 / self.testable.len() as f64
    }

    /// Rough minutes needed: half a minute per file, at least one
    pub fn estimated_minutes(&self) -> usize {
        (self.testable.len() as f64 * 0.5).ceil().max(1.0) as usize
    }
}
