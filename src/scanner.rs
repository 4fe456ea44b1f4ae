use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::utils;
use crate::worker::{BusyFlag, Task};

/// One cleanable location: display name, path under home, optional extension filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTarget {
    pub name: &'static str,
    pub relative_path: &'static str,
    pub extension: Option<&'static str>,
}

pub const SCAN_TARGETS: &[ScanTarget] = &[
    ScanTarget {
        name: "User Caches",
        relative_path: "Library/Caches",
        extension: None,
    },
    ScanTarget {
        name: "User Logs",
        relative_path: "Library/Logs",
        extension: None,
    },
    ScanTarget {
        name: "Xcode DerivedData",
        relative_path: "Library/Developer/Xcode/DerivedData",
        extension: None,
    },
    ScanTarget {
        name: "iOS Backups",
        relative_path: "Library/Application Support/MobileSync/Backups",
        extension: None,
    },
    ScanTarget {
        name: "Message Attachments",
        relative_path: "Library/Messages/Attachments",
        extension: None,
    },
    ScanTarget {
        name: "Mail Downloads",
        relative_path: "Library/Containers/com.apple.mail/Data/Library/Mail Downloads",
        extension: None,
    },
    ScanTarget {
        name: "Unused Disk Images",
        relative_path: "Downloads",
        extension: Some("dmg"),
    },
];

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
pub struct CleanableItem {
    pub id: ItemId,
    pub name: String,
    pub path: PathBuf,
    /// Allocated bytes at scan time. Not updated by cleaning; rescan instead.
    pub size: u64,
    pub selected: bool,
    /// Lower-case, no leading dot.
    pub extension: Option<String>,
}

/// Result of one catalog scan. Replaces the previous one wholesale.
#[derive(Debug, Clone, Default)]
pub struct CatalogScan {
    pub items: Vec<CleanableItem>,
    pub total_size: u64,
}

impl CatalogScan {
    pub fn selected_bytes(&self) -> u64 {
        self.items.iter().filter(|i| i.selected).map(|i| i.size).sum()
    }

    pub fn set_all_selected(&mut self, selected: bool) {
        for item in &mut self.items {
            item.selected = selected;
        }
    }

    /// Keep only items whose display name matches one of `names` (case-insensitive).
    pub fn select_only(&mut self, names: &[String]) {
        for item in &mut self.items {
            item.selected = names.iter().any(|n| n.eq_ignore_ascii_case(&item.name));
        }
    }

    /// Deselect items whose display name matches one of `names` (case-insensitive).
    pub fn deselect(&mut self, names: &[String]) {
        for item in &mut self.items {
            if names.iter().any(|n| n.eq_ignore_ascii_case(&item.name)) {
                item.selected = false;
            }
        }
    }
}

/// What a target looks like on disk right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetProbe {
    Found(u64),
    Missing,
    NotADirectory,
    Unreadable(String),
}

pub struct CleanableCatalog {
    config: Config,
    busy: BusyFlag,
}

impl CleanableCatalog {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            busy: BusyFlag::new("catalog scan"),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.busy.is_running()
    }

    /// Size every target that exists. Items of zero size are left out.
    pub fn scan(&self) -> CatalogScan {
        scan_targets(&self.config.home, self.config.targets)
    }

    pub fn spawn_scan(&self) -> Result<Task<CatalogScan>> {
        let home = self.config.home.clone();
        let targets = self.config.targets;
        self.busy.spawn(move || scan_targets(&home, targets))
    }

    /// Per-target status report, including the locations `scan` skips.
    pub fn probe(&self) -> Vec<(ScanTarget, TargetProbe)> {
        probe_targets(&self.config.home, self.config.targets)
    }

    pub fn spawn_probe(&self) -> Result<Task<Vec<(ScanTarget, TargetProbe)>>> {
        let home = self.config.home.clone();
        let targets = self.config.targets;
        self.busy.spawn(move || probe_targets(&home, targets))
    }
}

fn scan_targets(home: &Path, targets: &[ScanTarget]) -> CatalogScan {
    let mut scan = CatalogScan::default();

    for target in targets {
        let path = home.join(target.relative_path);
        if !path.is_dir() {
            debug!("{} not present at {}", target.name, path.display());
            continue;
        }
        let size = match utils::dir_size(&path, target.extension) {
            Ok(size) => size,
            Err(e) => {
                debug!("{}: {e}", target.name);
                continue;
            }
        };
        if size == 0 {
            continue;
        }
        scan.total_size += size;
        scan.items.push(CleanableItem {
            id: ItemId::next(),
            name: target.name.to_string(),
            path,
            size,
            selected: true,
            extension: target.extension.map(utils::normalize_extension),
        });
    }

    info!(
        "catalog scan found {} items, {} bytes",
        scan.items.len(),
        scan.total_size
    );
    scan
}

fn probe_targets(home: &Path, targets: &[ScanTarget]) -> Vec<(ScanTarget, TargetProbe)> {
    targets
        .iter()
        .map(|target| {
            let path = home.join(target.relative_path);
            let probe = if !path.exists() {
                TargetProbe::Missing
            } else if !path.is_dir() {
                TargetProbe::NotADirectory
            } else {
                match utils::dir_size(&path, target.extension) {
                    Ok(size) => TargetProbe::Found(size),
                    Err(e) => TargetProbe::Unreadable(e.to_string()),
                }
            };
            (*target, probe)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TARGETS: &[ScanTarget] = &[
        ScanTarget {
            name: "Caches",
            relative_path: "Library/Caches",
            extension: None,
        },
        ScanTarget {
            name: "Empty",
            relative_path: "Library/Empty",
            extension: None,
        },
        ScanTarget {
            name: "Images",
            relative_path: "Downloads",
            extension: Some("dmg"),
        },
        ScanTarget {
            name: "Absent",
            relative_path: "Nowhere",
            extension: None,
        },
    ];

    fn write(path: &Path, len: usize) -> u64 {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![1u8; len]).unwrap();
        utils::allocated_size(&fs::metadata(path).unwrap())
    }

    fn catalog(home: &Path) -> CleanableCatalog {
        let mut config = Config::with_home(home);
        config.targets = TARGETS;
        CleanableCatalog::new(config)
    }

    #[test]
    fn scan_skips_empty_and_missing_targets() {
        let tmp = TempDir::new().unwrap();
        let cache = write(&tmp.path().join("Library/Caches/app/blob"), 12_000);
        fs::create_dir_all(tmp.path().join("Library/Empty")).unwrap();
        let dmg = write(&tmp.path().join("Downloads/Setup.DMG"), 40_000);
        write(&tmp.path().join("Downloads/keep.pdf"), 40_000);

        let scan = catalog(tmp.path()).scan();

        let names: Vec<_> = scan.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Caches", "Images"]);
        assert_eq!(scan.items[0].size, cache);
        assert_eq!(scan.items[1].size, dmg);
        assert_eq!(scan.items[1].extension.as_deref(), Some("dmg"));
        assert!(scan.items.iter().all(|i| i.selected && i.size > 0));
        assert_eq!(scan.total_size, cache + dmg);
    }

    #[test]
    fn scan_ignores_target_that_is_a_file() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("Downloads"), 5_000);

        let scan = catalog(tmp.path()).scan();
        assert!(scan.items.is_empty());
        assert_eq!(scan.total_size, 0);
    }

    #[test]
    fn ids_differ_between_scans() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("Library/Caches/x"), 8_192);
        let catalog = catalog(tmp.path());

        let first = catalog.scan();
        let second = catalog.scan();
        assert_ne!(first.items[0].id, second.items[0].id);
    }

    #[test]
    fn selection_helpers() {
        let tmp = TempDir::new().unwrap();
        let cache = write(&tmp.path().join("Library/Caches/x"), 8_192);
        let dmg = write(&tmp.path().join("Downloads/a.dmg"), 16_384);
        let mut scan = catalog(tmp.path()).scan();

        assert_eq!(scan.selected_bytes(), cache + dmg);
        scan.select_only(&["images".to_string()]);
        assert_eq!(scan.selected_bytes(), dmg);
        scan.set_all_selected(true);
        scan.deselect(&["Images".to_string()]);
        assert_eq!(scan.selected_bytes(), cache);
        scan.set_all_selected(false);
        assert_eq!(scan.selected_bytes(), 0);
        // Selection never changes the total.
        assert_eq!(scan.total_size, cache + dmg);
    }

    #[test]
    fn probe_reports_every_target() {
        let tmp = TempDir::new().unwrap();
        let cache = write(&tmp.path().join("Library/Caches/x"), 8_192);
        fs::create_dir_all(tmp.path().join("Library/Empty")).unwrap();
        write(&tmp.path().join("Downloads"), 10);

        let probes = catalog(tmp.path()).probe();
        let states: Vec<_> = probes.into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            states,
            [
                TargetProbe::Found(cache),
                TargetProbe::Found(0),
                TargetProbe::NotADirectory,
                TargetProbe::Missing,
            ]
        );
    }

    #[test]
    fn spawn_scan_rejects_overlap() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("Library/Caches/x"), 8_192);
        let catalog = catalog(tmp.path());

        let guard = catalog.busy.try_begin().unwrap();
        assert!(catalog.spawn_scan().is_err());
        drop(guard);

        let scan = catalog.spawn_scan().unwrap().wait().unwrap();
        assert_eq!(scan.items.len(), 1);
    }

    #[test]
    fn default_catalog_has_one_filtered_target() {
        let filtered: Vec<_> = SCAN_TARGETS.iter().filter(|t| t.extension.is_some()).collect();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].relative_path, "Downloads");
    }
}
