//! Reporter module for output formatting

pub mod console;
pub mod summary;

pub use console::ConsoleReporter;
pub use summary::{FileSummary, ProjectSummary};
