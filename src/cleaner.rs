use std::collections::VecDeque;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::scanner::CleanableItem;
use crate::utils;
use crate::worker::{BusyFlag, Task};

/// How many recent failure messages a report keeps.
pub const MAX_RECENT_ERRORS: usize = 10;

/// End-of-clean summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Sum of the sizes observed just before each successful removal.
    pub bytes_freed: u64,
    pub error_count: usize,
    pub last_error: Option<String>,
    /// Oldest first, at most [`MAX_RECENT_ERRORS`].
    pub recent_errors: VecDeque<String>,
}

impl CleanReport {
    fn record_error(&mut self, message: String) {
        warn!("{message}");
        self.error_count += 1;
        if self.recent_errors.len() == MAX_RECENT_ERRORS {
            self.recent_errors.pop_front();
        }
        self.recent_errors.push_back(message.clone());
        self.last_error = Some(message);
    }
}

/// Deletes the contents of selected cleanable items.
///
/// Only the immediate children of each item's directory are removed (whole
/// subtrees included); the directory itself is kept.
pub struct Cleaner {
    remove: fn(&Path) -> io::Result<()>,
    busy: BusyFlag,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::with_remover(utils::remove_entry)
    }
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different removal function; tests use this to make deletions fail.
    pub fn with_remover(remove: fn(&Path) -> io::Result<()>) -> Self {
        Self {
            remove,
            busy: BusyFlag::new("clean"),
        }
    }

    pub fn is_cleaning(&self) -> bool {
        self.busy.is_running()
    }

    pub fn clean(&self, items: &[CleanableItem]) -> CleanReport {
        clean_items(self.remove, items)
    }

    pub fn spawn_clean(&self, items: Vec<CleanableItem>) -> Result<Task<CleanReport>> {
        let remove = self.remove;
        self.busy.spawn(move || clean_items(remove, &items))
    }
}

fn clean_items(remove: fn(&Path) -> io::Result<()>, items: &[CleanableItem]) -> CleanReport {
    let mut report = CleanReport::default();

    for item in items.iter().filter(|i| i.selected) {
        let read_dir = match std::fs::read_dir(&item.path) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                report.record_error(format!("Cannot read {}: {e}", item.path.display()));
                continue;
            }
        };

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.record_error(format!("Cannot read {}: {e}", item.path.display()));
                    continue;
                }
            };
            let path = entry.path();
            if !utils::matches_extension(&path, item.extension.as_deref()) {
                continue;
            }

            let size = utils::entry_size(&path);
            match remove(&path) {
                Ok(()) => report.bytes_freed += size,
                Err(e) => report.record_error(format!(
                    "Failed to delete {}: {e}",
                    entry.file_name().to_string_lossy()
                )),
            }
        }
    }

    info!(
        "cleaned {} bytes with {} errors",
        report.bytes_freed, report.error_count
    );
    report
}
