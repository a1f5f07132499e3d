//! Decide which source files get a generated test

use crate::FileRecord;

/// Config file names that never get a test
pub const CONFIG_FILES: [&str; 6] = [
    "webpack.config.js",
    "vite.config.js",
    "jest.config.js",
    "package.json",
    "tsconfig.json",
    ".eslintrc.js",
];

/// True when the file name marks an existing test (`.test.` or `.spec.` infix)
pub fn is_test_file_name(name: &str) -> bool {
    name.contains(".test.") || name.contains(".spec.")
}

/// Whether a test should be generated for this file.
///
/// Only the file name is inspected. Matching is case-sensitive: substring for
/// the test infixes, exact for config names.
pub fn is_eligible(file: &FileRecord) -> bool {
    !is_test_file_name(&file.name) && !CONFIG_FILES.contains(&file.name.as_str())
}
