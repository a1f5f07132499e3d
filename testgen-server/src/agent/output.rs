//! Recover generated test content from what the agent left behind

use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// String fields of a JSON output line that may carry agent text
const TEXT_FIELDS: [&str; 3] = ["text", "content", "result"];

/// Content counts as a test only if it declares a suite or a case
pub fn is_test_content(content: &str) -> bool {
    content.contains("describe(") || content.contains("test(") || content.contains("it(")
}

/// Find test content: the expected file, then any test-named file, then stdout
pub fn recover(dir: &Path, expected_file: &str, stdout: &str) -> Option<String> {
    read_test_file(&dir.join(expected_file))
        .or_else(|| find_test_file(dir))
        .or_else(|| from_stdout(stdout))
}

fn read_test_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .filter(|content| is_test_content(content))
}

fn find_test_file(dir: &Path) -> Option<String> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.contains(".test.") || name.contains(".spec.")
        })
        .find_map(|e| read_test_file(e.path()))
}

/// Parse structured (JSON lines) stdout; plain stdout is used as-is
pub fn from_stdout(stdout: &str) -> Option<String> {
    let mut text = String::new();
    for line in stdout.lines() {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(line.trim()) else {
            continue;
        };
        for field in TEXT_FIELDS {
            if let Some(Value::String(s)) = map.get(field) {
                text.push_str(s);
                text.push('\n');
            }
        }
    }
    if text.is_empty() {
        text = stdout.to_string();
    }
    code_blocks(&text)
        .into_iter()
        .find(|code| is_test_content(code))
        .map(str::to_string)
}

const FENCE: &str = "```";

/// Fenced code blocks in the order they appear. The rest of an opening fence
/// line is its info string (`js`, `json`, `typescript`, ...) and is skipped.
fn code_blocks(output: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = output;
    while let Some(open) = rest.find(FENCE) {
        let after = &rest[open + FENCE.len()..];
        let Some(line_end) = after.find('\n') else {
            break;
        };
        let body = &after[line_end + 1..];
        let Some(close) = body.find(FENCE) else {
            break;
        };
        blocks.push(body[..close].trim());
        rest = &body[close + FENCE.len()..];
    }
    blocks
}

/// The first fenced code block in `output`, whatever its language tag
pub fn extract_code_block(output: &str) -> Option<String> {
    code_blocks(output).first().map(|code| code.to_string())
}
