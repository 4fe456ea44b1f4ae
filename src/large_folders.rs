use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::ItemId;
use crate::utils;
use crate::worker::{BusyFlag, Task};

#[derive(Debug, Clone)]
pub struct LargeFolderItem {
    pub id: ItemId,
    /// "Category/child", e.g. "Containers/com.docker.docker".
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

pub struct LargeFolderSurvey {
    home: PathBuf,
    roots: &'static [(&'static str, &'static str)],
    threshold: u64,
    busy: BusyFlag,
}

impl LargeFolderSurvey {
    pub fn new(config: &Config) -> Self {
        Self {
            home: config.home.clone(),
            roots: config.survey_roots,
            threshold: config.large_folder_threshold,
            busy: BusyFlag::new("large folder survey"),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.busy.is_running()
    }

    /// Children strictly larger than the threshold, biggest first.
    pub fn scan(&self) -> Vec<LargeFolderItem> {
        survey(&self.home, self.roots, self.threshold)
    }

    pub fn spawn_scan(&self) -> Result<Task<Vec<LargeFolderItem>>> {
        let home = self.home.clone();
        let roots = self.roots;
        let threshold = self.threshold;
        self.busy.spawn(move || survey(&home, roots, threshold))
    }
}

fn survey(home: &Path, roots: &[(&str, &str)], threshold: u64) -> Vec<LargeFolderItem> {
    let mut children: Vec<(String, PathBuf)> = Vec::new();
    for (category, relative) in roots {
        let root = home.join(relative);
        match std::fs::read_dir(&root) {
            Ok(read_dir) => {
                for entry in read_dir.flatten() {
                    let name = format!("{category}/{}", entry.file_name().to_string_lossy());
                    children.push((name, entry.path()));
                }
            }
            Err(e) => debug!("cannot read {}: {e}", root.display()),
        }
    }

    // Sizing is the slow part; spread it over the rayon pool.
    let mut items: Vec<LargeFolderItem> = children
        .into_par_iter()
        .filter_map(|(name, path)| {
            let size = utils::entry_size(&path);
            (size > threshold).then(|| LargeFolderItem {
                id: ItemId::next(),
                name,
                path,
                size,
            })
        })
        .collect();

    items.sort_by(|a, b| b.size.cmp(&a.size));
    info!("large folder survey found {} items", items.len());
    items
}
