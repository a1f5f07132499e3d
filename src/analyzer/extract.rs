//! Identifier extraction: functions, classes and module references.

use super::patterns::patterns;
use regex::Regex;
use std::collections::HashSet;

fn first_group<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Unique function names, in the order the four detection patterns first see them.
///
/// Patterns run one after another over the whole content (declarations,
/// expressions, arrows, exported declarations), so a name's position is
/// decided by the first pattern that finds it.
pub fn extract_functions(content: &str) -> Vec<String> {
    let p = patterns();
    let mut seen = HashSet::new();
    let mut functions = Vec::new();

    let candidates = first_group(&p.named_function, content)
        .chain(first_group(&p.function_expression, content))
        .chain(first_group(&p.arrow_function, content))
        .chain(first_group(&p.exported_function, content));

    for name in candidates {
        if !name.is_empty() && seen.insert(name) {
            functions.push(name.to_string());
        }
    }
    functions
}

/// Class names from `class X` and `export class X`; duplicates are kept.
pub fn extract_classes(content: &str) -> Vec<String> {
    patterns()
        .class
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Module references: ES imports first, then CommonJS requires. Not deduplicated.
pub fn extract_imports(content: &str) -> Vec<String> {
    let p = patterns();
    first_group(&p.es_import, content)
        .chain(first_group(&p.require, content))
        .map(str::to_string)
        .collect()
}
