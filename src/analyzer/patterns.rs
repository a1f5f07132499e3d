//! Compiled regex set shared by the analyzer (compile once per process).

use regex::Regex;
use std::sync::OnceLock;

pub(crate) struct Patterns {
    /// `function name(`
    pub named_function: Regex,
    /// `name = [async] function(`
    pub function_expression: Regex,
    /// `name = [async] (params) =>`
    pub arrow_function: Regex,
    /// `export [async] function name(`
    pub exported_function: Regex,
    /// `class Name` or `export class Name`
    pub class: Regex,
    /// `import ... from 'module'`
    pub es_import: Regex,
    /// `require('module')`
    pub require: Regex,
    /// `async function` or `async (` as whole words. Word boundaries here
    /// are ASCII-only, so a non-ASCII letter next to a keyword still counts
    /// as a boundary.
    pub async_keyword: Regex,
    /// `<Tag ...>`
    pub jsx_tag: Regex,
    /// Control structures counted by complexity, in scoring order
    pub complexity: Vec<Regex>,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("analyzer pattern must compile")
}

impl Patterns {
    fn new() -> Self {
        Self {
            named_function: compile(r"function\s+([A-Za-z0-9_]+)\s*\("),
            function_expression: compile(r"([A-Za-z0-9_]+)\s*=\s*(?:async\s+)?function\s*\("),
            arrow_function: compile(r"([A-Za-z0-9_]+)\s*=\s*(?:async\s+)?\([^)]*\)\s*=>"),
            exported_function: compile(r"export\s+(?:async\s+)?function\s+([A-Za-z0-9_]+)\s*\("),
            class: compile(r"class\s+([A-Za-z0-9_]+)|export\s+class\s+([A-Za-z0-9_]+)"),
            es_import: compile(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#),
            require: compile(r#"require\(['"]([^'"]+)['"]\)"#),
            async_keyword: compile(
                r"(?-u:\b)async\s+function(?-u:\b)|(?-u:\b)async\s*\(",
            ),
            jsx_tag: compile(r"<([A-Za-z][A-Za-z0-9]*)(?-u:\b)[^>]*>"),
            complexity: [
                r"if\s*\(",
                r"else\s+if",
                r"switch\s*\(",
                r"case\s+",
                r"for\s*\(",
                r"while\s*\(",
                r"catch\s*\(",
                r"&&|\|\|",
            ]
            .into_iter()
            .map(compile)
            .collect(),
        }
    }
}

pub(crate) fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::new)
}
