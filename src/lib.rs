//! Disk-space reclamation for a workstation home directory.
//!
//! Sizes a fixed catalog of caches, logs, build artifacts and backups,
//! deletes the selected ones, surveys oversized application folders, and
//! drives `docker` to remove dangling volumes or prune images.

pub mod cleaner;
pub mod config;
pub mod disk_info;
pub mod docker;
pub mod error;
pub mod large_folders;
pub mod scanner;
pub mod utils;
pub mod worker;

pub use cleaner::{CleanReport, Cleaner};
pub use config::Config;
pub use docker::{CleanupLevel, DockerCleaner};
pub use error::{CleanError, Result};
pub use large_folders::{LargeFolderItem, LargeFolderSurvey};
pub use scanner::{CatalogScan, CleanableCatalog, CleanableItem, ScanTarget};
