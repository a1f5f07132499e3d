//! Project type detection from scanned files

use crate::analyzer::analyze;
use crate::FileRecord;
use serde::{Deserialize, Serialize};

/// Coarse project flavor shown in the analysis summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Next,
    React,
    Express,
    TypeScript,
    JavaScript,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::Next => write!(f, "Next.js"),
            ProjectType::React => write!(f, "React"),
            ProjectType::Express => write!(f, "Express"),
            ProjectType::TypeScript => write!(f, "TypeScript"),
            ProjectType::JavaScript => write!(f, "JavaScript"),
        }
    }
}

/// Detect the project type; the first matching rule wins:
/// Next (imports `next` or `next/*`), React, Express, TypeScript, JavaScript.
pub fn detect_project_type(files: &[FileRecord]) -> ProjectType {
    let analyses: Vec<_> = files.iter().map(|f| analyze(&f.content)).collect();
    let imports = || analyses.iter().flat_map(|a| a.imports.iter());

    if imports().any(|m| m == "next" || m.starts_with("next/")) {
        return ProjectType::Next;
    }
    if analyses.iter().any(|a| a.is_react_component) {
        return ProjectType::React;
    }
    if imports().any(|m| m == "express") {
        return ProjectType::Express;
    }
    if files
        .iter()
        .any(|f| f.name.ends_with(".ts") || f.name.ends_with(".tsx"))
    {
        return ProjectType::TypeScript;
    }
    ProjectType::JavaScript
}
