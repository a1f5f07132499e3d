//! Console reporter with colored output

use super::summary::{ProjectSummary, LISTED_FILES, LISTED_FUNCTIONS};
use crate::{GeneratedTest, GenerationMethod};
use colored::Colorize;
use std::path::Path;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to show per-file details
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { verbose: true }
    }

    /// Only print totals
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    /// Print the pre-generation analysis summary
    pub fn report_summary(&self, summary: &ProjectSummary) {
        println!();
        println!("{}", "📊 PROJECT ANALYSIS".blue().bold());
        println!("   Project Type: {}", summary.project_type.to_string().cyan());
        println!("   Framework: {}", summary.framework.to_string().cyan());
        println!("   Total Files: {}", summary.total_files.to_string().cyan());
        println!();

        if self.verbose {
            println!("   {}", "Files to test:".bold());
            for (i, file) in summary.testable.iter().take(LISTED_FILES).enumerate() {
                println!(
                    "   {}. {} {}",
                    i + 1,
                    file.name,
                    format!("({:.1}KB)", file.size_kb).dimmed()
                );
                if !file.functions.is_empty() {
                    let shown = file
                        .functions
                        .iter()
                        .take(LISTED_FUNCTIONS)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ");
                    let extra = if file.functions.len() > LISTED_FUNCTIONS {
                        format!(" +{} more", file.functions.len() - LISTED_FUNCTIONS)
                    } else {
                        String::new()
                    };
                    println!("      {}", format!("Functions: {}{}", shown, extra).dimmed());
                }
                if !file.features.is_empty() {
                    println!(
                        "      {}",
                        format!("Features: {}", file.features.join(", ")).dimmed()
                    );
                }
            }
            if summary.testable.len() > LISTED_FILES {
                println!(
                    "   {}",
                    format!("... and {} more files", summary.testable.len() - LISTED_FILES)
                        .dimmed()
                );
            }
            println!();
        }

        println!("   {}", "Summary:".bold());
        println!(
            "   Test files to generate: {}",
            summary.testable.len().to_string().cyan()
        );
        println!(
            "   Average complexity: {}",
            format!("{:.1}", summary.average_complexity()).cyan()
        );
        println!(
            "   Estimated time: ~{} minutes",
            summary.estimated_minutes().to_string().cyan()
        );
        println!();
    }

    /// Print what was written
    pub fn report_written(&self, tests: &[GeneratedTest], output_dir: &Path) {
        if self.verbose {
            for test in tests {
                let tag = match test.method {
                    GenerationMethod::Remote => "remote".green(),
                    GenerationMethod::Local => "local".yellow(),
                };
                println!("  {} {} {}", "✓".green(), test.filename, format!("[{}]", tag).dimmed());
            }
        }
        println!(
            "\n{} Generated {} test files in {}",
            "✅".green(),
            tests.len(),
            output_dir.display()
        );
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
