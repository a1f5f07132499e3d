//! Detector module for test eligibility and project type

pub mod eligibility;
pub mod project;

pub use eligibility::{is_eligible, is_test_file_name, CONFIG_FILES};
pub use project::{detect_project_type, ProjectType};
