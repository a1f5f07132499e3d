//! Generation prompt for the coding agent

use testgen::{AnalysisRecord, Framework, GenerationOptions};

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Build the instruction handed to the agent.
///
/// `output_file` is the name the agent should write, relative to its working
/// directory (the scratch workspace, which also holds `source_name`).
pub fn build_prompt(
    source_name: &str,
    analysis: &AnalysisRecord,
    framework: Framework,
    options: &GenerationOptions,
    output_file: &str,
) -> String {
    let mut requirements = vec![
        format!("Use {} syntax and assertions", framework),
        "Cover every exported function and class".to_string(),
    ];
    if options.generate_edge_cases {
        requirements.push("Include edge cases: empty, null/undefined and boundary inputs".to_string());
    }
    if options.include_setup {
        requirements.push("Include setup/teardown (beforeEach/afterEach) where state is shared".to_string());
    }
    if analysis.has_async || analysis.has_promises {
        requirements.push("Await async functions and test rejected promises".to_string());
    }
    if analysis.is_react_component {
        requirements.push("Render components with @testing-library/react".to_string());
    }
    if analysis.is_api_route {
        requirements.push("Mock request and response objects for route handlers".to_string());
    }
    if analysis.has_database {
        requirements.push("Mock all database access".to_string());
    }

    let requirements = requirements
        .iter()
        .map(|r| format!("- {}", r))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Generate a complete {framework} unit test file for `{source}` in the current directory.

## Source Analysis
- Functions: {functions}
- Classes: {classes}
- Imports: {imports}
- Async code: {is_async}
- Promises: {promises}
- React component: {react}
- API route: {api}
- Complexity: {complexity}

## Requirements
{requirements}

## Output
Write the test file to `{output}`. Import the code under test from './{source}'.
Do not modify `{source}`. Respond with the test code in a single fenced code block as well."#,
        framework = framework,
        source = source_name,
        functions = list_or_none(&analysis.functions),
        classes = list_or_none(&analysis.classes),
        imports = list_or_none(&analysis.imports),
        is_async = yes_no(analysis.has_async),
        promises = yes_no(analysis.has_promises),
        react = yes_no(analysis.is_react_component),
        api = yes_no(analysis.is_api_route),
        complexity = analysis.complexity,
        requirements = requirements,
        output = output_file,
    )
}
