//! Content analysis: regex heuristics over JavaScript/TypeScript source text
//!
//! The analysis is deliberately approximate. Each flag is a substring or
//! pattern presence test, and false positives are accepted behavior. The
//! output depends on the content alone, so the same text always yields the
//! same [`AnalysisRecord`].

mod complexity;
mod extract;
mod patterns;

pub use complexity::calculate_complexity;
pub use extract::{extract_classes, extract_functions, extract_imports};

use crate::AnalysisRecord;
use patterns::patterns;
use thiserror::Error;

/// Errors raised before analysis can run
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The content handed to the analyzer is not text
    #[error("{name}: content must be text ({reason})")]
    InvalidInput { name: String, reason: String },
}

/// Analyze source text and return its structural summary
pub fn analyze(content: &str) -> AnalysisRecord {
    let imports = extract_imports(content);
    let is_react_component = imports.iter().any(|module| module == "react");

    AnalysisRecord {
        functions: extract_functions(content),
        classes: extract_classes(content),
        has_async: patterns().async_keyword.is_match(content),
        has_promises: content.contains("Promise"),
        has_exports: content.contains("export") || content.contains("module.exports"),
        is_react_component,
        is_api_route: content.contains("req") && content.contains("res"),
        has_database: content.contains("db.")
            || content.contains("mongoose")
            || content.contains("prisma"),
        has_typescript: content.contains("interface") || content.contains("type "),
        has_jsx: content.contains("jsx") || patterns().jsx_tag.is_match(content),
        complexity: calculate_complexity(content),
        imports,
    }
}

/// Analyze raw bytes, rejecting anything that is not UTF-8 text
pub fn analyze_bytes(name: &str, bytes: &[u8]) -> Result<AnalysisRecord, AnalyzeError> {
    let content = std::str::from_utf8(bytes).map_err(|e| AnalyzeError::InvalidInput {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(analyze(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_function_scenario() {
        let analysis = analyze("export function add(a,b) { return a+b; }");
        assert_eq!(analysis.functions, vec!["add"]);
        assert!(analysis.has_exports);
        assert_eq!(analysis.complexity, 1);
        assert!(!analysis.has_async);
        assert!(!analysis.is_react_component);
    }

    #[test]
    fn test_async_requires_token_boundary() {
        assert!(analyze("async function load() {}").has_async);
        assert!(analyze("const f = async () => 1;").has_async);
        assert!(analyze("const f = async(x) => x;").has_async);
        assert!(!analyze("const asyncQueue = [];").has_async);
        assert!(!analyze("import { isAsync } from './util';").has_async);
    }

    #[test]
    fn test_react_detected_from_import_statement() {
        assert!(analyze("import React from 'react';").is_react_component);
        assert!(analyze("import { useState } from \"react\";").is_react_component);
        assert!(analyze("const React = require('react');").is_react_component);
        assert!(!analyze("// uses react under the hood").is_react_component);
        assert!(!analyze("import { render } from 'react-dom';").is_react_component);
    }

    #[test]
    fn test_api_route_is_coarse() {
        assert!(analyze("app.get('/', (req, res) => res.send('ok'));").is_api_route);
        // "request" and "response" both contain the substrings
        assert!(analyze("const request = 1; const response = 2;").is_api_route);
        assert!(!analyze("const request = 1;").is_api_route);
    }

    #[test]
    fn test_database_markers() {
        assert!(analyze("await db.users.find()").has_database);
        assert!(analyze("const mongoose = require('mongoose');").has_database);
        assert!(analyze("import { PrismaClient } from '@prisma/client'; const p = prisma;").has_database);
        assert!(!analyze("const x = 1;").has_database);
    }

    #[test]
    fn test_typescript_markers() {
        assert!(analyze("interface User { id: number }").has_typescript);
        assert!(analyze("type Id = string;").has_typescript);
        assert!(!analyze("const typed = 1;").has_typescript);
    }

    #[test]
    fn test_jsx_markers() {
        assert!(analyze("return <Button onClick={go}>Go</Button>;").has_jsx);
        assert!(analyze("// see App.jsx").has_jsx);
        assert!(!analyze("if (a < 3) { b = a; }").has_jsx);
    }

    #[test]
    fn test_exports_markers() {
        assert!(analyze("module.exports = { add };").has_exports);
        assert!(analyze("export default App;").has_exports);
        assert!(!analyze("function local() {}").has_exports);
    }

    #[test]
    fn test_promises_marker() {
        assert!(analyze("return new Promise((resolve) => resolve(1));").has_promises);
        assert!(!analyze("return promise;").has_promises);
    }

    #[test]
    fn test_empty_content() {
        let analysis = analyze("");
        assert!(analysis.functions.is_empty());
        assert!(analysis.classes.is_empty());
        assert!(analysis.imports.is_empty());
        assert_eq!(analysis.complexity, 1);
    }

    #[test]
    fn test_word_boundaries_are_ascii() {
        assert!(analyze("éasync function f() {}").has_async);
        assert!(analyze("const g = ñasync(x);").has_async);
        assert!(analyze("<divé>").has_jsx);
        assert!(!analyze("const asyncé = 1;").has_async);
    }

    #[test]
    fn test_analyze_bytes_rejects_invalid_utf8() {
        let err = analyze_bytes("logo.js", &[0xc3, 0x28]).unwrap_err();
        let AnalyzeError::InvalidInput { name, .. } = err;
        assert_eq!(name, "logo.js");
    }

    #[test]
    fn test_analyze_bytes_matches_analyze() {
        let src = "function greet(name) { if (name) { return name; } }";
        assert_eq!(analyze_bytes("g.js", src.as_bytes()).unwrap(), analyze(src));
    }
}
