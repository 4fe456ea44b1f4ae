mod levels;
mod parse;
mod runner;

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::scanner::ItemId;
use crate::worker::{BusyFlag, Task};

pub use levels::{CleanupLevel, PruneCommand};
pub use parse::parse_dangling_volumes;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Volume,
    Image,
    BuildCache,
}

impl ResourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Image => "Image",
            Self::BuildCache => "Build Cache",
        }
    }
}

/// A reclaimable Docker resource. Only dangling volumes are produced today.
#[derive(Debug, Clone)]
pub struct VolumeItem {
    pub id: ItemId,
    pub kind: ResourceKind,
    pub name: String,
    pub size: u64,
    pub selected: bool,
}

pub fn selected_bytes(items: &[VolumeItem]) -> u64 {
    items.iter().filter(|i| i.selected).map(|i| i.size).sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStatus {
    pub available: bool,
    pub containers: usize,
    pub images: usize,
}

/// Outcome of `docker volume rm`, with the list rescanned afterwards.
#[derive(Debug, Clone)]
pub struct VolumeRemoval {
    /// True only if the command printed something. A silent success reads as failure.
    pub success: bool,
    pub output: String,
    pub remaining: Vec<VolumeItem>,
}

#[derive(Debug, Clone)]
pub struct PruneReport {
    /// True only if every step printed something (stop steps always count as success).
    pub success: bool,
    pub output: String,
    pub status: RuntimeStatus,
}

#[derive(Clone)]
pub struct DockerCleaner {
    binary: String,
    runner: Arc<dyn CommandRunner>,
    status: Arc<Mutex<RuntimeStatus>>,
    busy: BusyFlag,
}

impl DockerCleaner {
    pub fn new(config: &Config) -> Self {
        Self::with_runner(&config.docker_binary, Arc::new(SystemRunner))
    }

    pub fn with_runner(binary: &str, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: binary.to_string(),
            runner,
            status: Arc::new(Mutex::new(RuntimeStatus::default())),
            busy: BusyFlag::new("docker operation"),
        }
    }

    /// Last known availability and counts.
    pub fn status(&self) -> RuntimeStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_running()
    }

    /// `docker info` exiting zero means available; counts are refreshed then.
    pub fn check_availability(&self) -> RuntimeStatus {
        let available = match self.run(&["info"]) {
            Some(out) => out.success,
            None => false,
        };
        if available {
            self.refresh_counts(true)
        } else {
            debug!("docker not available");
            self.store(RuntimeStatus::default())
        }
    }

    /// Container and image counts from `ps -aq` and `images -q`.
    pub fn refresh_stats(&self) -> RuntimeStatus {
        self.refresh_counts(self.status().available)
    }

    fn refresh_counts(&self, available: bool) -> RuntimeStatus {
        let count = |args: &[&str]| match self.run(args) {
            Some(out) if out.success => out.line_count(),
            _ => 0,
        };
        let containers = count(&["ps", "-aq"]);
        let images = count(&["images", "-q"]);
        self.store(RuntimeStatus {
            available,
            containers,
            images,
        })
    }

    /// Dangling volumes from `docker system df -v`.
    pub fn scan_volumes(&self) -> Vec<VolumeItem> {
        let volumes = match self.run(&["system", "df", "-v"]) {
            Some(out) => parse_dangling_volumes(&out.text),
            None => Vec::new(),
        };
        info!("found {} dangling docker volumes", volumes.len());
        volumes
    }

    /// Remove the selected volumes in one `docker volume rm`, then rescan.
    pub fn delete_volumes(&self, items: &[VolumeItem]) -> VolumeRemoval {
        let names: Vec<&str> = items
            .iter()
            .filter(|i| i.selected && i.kind == ResourceKind::Volume)
            .map(|i| i.name.as_str())
            .collect();

        let mut success = true;
        let mut output = String::new();
        if !names.is_empty() {
            let mut args = vec!["volume", "rm"];
            args.extend(names.iter().copied());
            match self.run(&args) {
                Some(out) if out.has_output() => {
                    output.push_str(&format!("Removed volumes:\n{}\n", out.text.trim_end()));
                }
                _ => {
                    warn!("docker volume rm produced no output");
                    success = false;
                    output.push_str("Failed to remove some volumes\n");
                }
            }
        }

        VolumeRemoval {
            success,
            output,
            remaining: self.scan_volumes(),
        }
    }

    /// Run every step of `level` in order, then refresh counts.
    pub fn prune(&self, level: CleanupLevel) -> PruneReport {
        info!("docker prune: {}", level.title());
        let mut success = true;
        let mut output = String::new();

        for command in level.commands() {
            match command {
                PruneCommand::StopAllContainers => {
                    if let Some(text) = self.stop_all_containers() {
                        output.push_str(&text);
                        output.push('\n');
                    }
                }
                PruneCommand::Docker(args) => match self.run(args) {
                    Some(out) if out.has_output() => {
                        output.push_str(out.text.trim_end());
                        output.push('\n');
                    }
                    _ => {
                        warn!("docker {} produced no output", args.join(" "));
                        success = false;
                    }
                },
            }
        }

        PruneReport {
            success,
            output,
            status: self.refresh_stats(),
        }
    }

    pub fn spawn_check_availability(&self) -> Result<Task<RuntimeStatus>> {
        let this = self.clone();
        self.busy.spawn(move || this.check_availability())
    }

    pub fn spawn_scan_volumes(&self) -> Result<Task<Vec<VolumeItem>>> {
        let this = self.clone();
        self.busy.spawn(move || this.scan_volumes())
    }

    pub fn spawn_delete_volumes(&self, items: Vec<VolumeItem>) -> Result<Task<VolumeRemoval>> {
        let this = self.clone();
        self.busy.spawn(move || this.delete_volumes(&items))
    }

    pub fn spawn_prune(&self, level: CleanupLevel) -> Result<Task<PruneReport>> {
        let this = self.clone();
        self.busy.spawn(move || this.prune(level))
    }

    /// Stop whatever `ps -aq` lists. Failures are ignored, as with `|| true`.
    fn stop_all_containers(&self) -> Option<String> {
        let listing = self.run(&["ps", "-aq"])?;
        let ids: Vec<&str> = listing
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if !listing.success || ids.is_empty() {
            return None;
        }
        let mut args = vec!["stop"];
        args.extend(ids);
        self.run(&args).map(|out| out.text.trim_end().to_string())
    }

    /// `None` if the binary could not be launched.
    fn run(&self, args: &[&str]) -> Option<CommandOutput> {
        match self.runner.run(&self.binary, args) {
            Ok(out) => Some(out),
            Err(e) => {
                debug!("{e}");
                None
            }
        }
    }

    fn store(&self, status: RuntimeStatus) -> RuntimeStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = status;
        status
    }
}
