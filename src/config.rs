use std::path::PathBuf;

use crate::error::Result;
use crate::scanner::{ScanTarget, SCAN_TARGETS};
use crate::utils;

/// Children at or below this size are left out of the large-folder survey.
pub const LARGE_FOLDER_THRESHOLD: u64 = 500 * 1024 * 1024;

/// Roots whose immediate children are surveyed, as (category, path under home).
pub const SURVEY_ROOTS: &[(&str, &str)] = &[
    ("Containers", "Library/Containers"),
    ("Application Support", "Library/Application Support"),
];

/// Where everything is looked up. Nothing here is read from disk; the fixed
/// tables above are the whole configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub targets: &'static [ScanTarget],
    pub survey_roots: &'static [(&'static str, &'static str)],
    pub large_folder_threshold: u64,
    pub docker_binary: String,
}

impl Config {
    /// Configuration rooted at the current user's home directory.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_home(utils::home_dir()?))
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            targets: SCAN_TARGETS,
            survey_roots: SURVEY_ROOTS,
            large_folder_threshold: LARGE_FOLDER_THRESHOLD,
            docker_binary: "docker".to_string(),
        }
    }
}
