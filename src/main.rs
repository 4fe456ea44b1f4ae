mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;

use maccleaner::disk_info::disk_info;
use maccleaner::docker::{self, DockerCleaner};
use maccleaner::utils::{display_path, parse_threshold};
use maccleaner::{CleanableCatalog, Cleaner, CleanupLevel, Config, LargeFolderSurvey, Result};

use cli::{Cli, Command, DockerCommand};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.home {
        Some(home) => Config::with_home(home),
        None => Config::from_env()?,
    };
    output::print_banner();

    match cli.command {
        Command::Scan => scan(&config),
        Command::Report => report(&config),
        Command::Large { min_size } => large(config, min_size.as_deref()),
        Command::Clean {
            confirm,
            only,
            skip,
        } => clean(&config, confirm, &only, &skip),
        Command::Docker { command } => run_docker(&config, command),
    }
}

fn scan(config: &Config) -> Result<()> {
    let catalog = CleanableCatalog::new(config.clone());
    let scan = catalog.spawn_scan()?.wait()?;

    output::print_scan_header("Safe to Clean");
    if scan.items.is_empty() {
        output::print_info("Nothing to clean.");
    }
    for item in &scan.items {
        output::print_item(
            item.selected,
            &item.name,
            &display_path(&item.path, &config.home),
            item.size,
        );
    }
    output::print_separator();
    output::print_grand_total("Total reclaimable:", scan.total_size);
    Ok(())
}

fn report(config: &Config) -> Result<()> {
    let catalog = CleanableCatalog::new(config.clone());
    let probes = catalog.spawn_probe()?.wait()?;

    output::print_scan_header("Configured Locations");
    let mut total = 0;
    for (target, probe) in &probes {
        if let maccleaner::scanner::TargetProbe::Found(bytes) = probe {
            total += bytes;
        }
        let path = config.home.join(target.relative_path);
        output::print_probe(target.name, &display_path(&path, &config.home), probe);
    }
    output::print_separator();
    output::print_grand_total("Total potential reclaimable:", total);
    Ok(())
}

fn large(mut config: Config, min_size: Option<&str>) -> Result<()> {
    if let Some(min_size) = min_size {
        config.large_folder_threshold = parse_threshold(min_size)?;
    }
    let survey = LargeFolderSurvey::new(&config);
    let items = survey.spawn_scan()?.wait()?;

    output::print_scan_header("Large Folders (Review Only)");
    if items.is_empty() {
        output::print_info(&format!(
            "No folders larger than {}.",
            output::format_size(config.large_folder_threshold)
        ));
    }
    for item in &items {
        output::print_large_item(&item.name, &display_path(&item.path, &config.home), item.size);
    }
    Ok(())
}

fn clean(config: &Config, confirm: bool, only: &[String], skip: &[String]) -> Result<()> {
    let catalog = CleanableCatalog::new(config.clone());
    let mut scan = catalog.spawn_scan()?.wait()?;
    if !only.is_empty() {
        scan.select_only(only);
    }
    scan.deselect(skip);

    output::print_scan_header("Selected for Cleaning");
    for item in &scan.items {
        output::print_item(
            item.selected,
            &item.name,
            &display_path(&item.path, &config.home),
            item.size,
        );
    }
    output::print_separator();
    output::print_grand_total("Selected:", scan.selected_bytes());

    if !confirm {
        output::print_confirm_hint("clean");
        return Ok(());
    }
    if scan.selected_bytes() == 0 {
        output::print_info("Nothing selected.");
        return Ok(());
    }

    let before = disk_info(&config.home);
    let report = Cleaner::new().spawn_clean(scan.items)?.wait()?;
    output::print_clean_report(&report);

    let rescan = catalog.spawn_scan()?.wait()?;
    output::print_grand_total("Still reclaimable:", rescan.total_size);
    if let (Some(before), Some(after)) = (before, disk_info(&config.home)) {
        output::print_disk("Before:", &before);
        output::print_disk("After:", &after);
    }
    Ok(())
}

fn run_docker(config: &Config, command: DockerCommand) -> Result<()> {
    let docker = DockerCleaner::new(config);

    match command {
        DockerCommand::Status => {
            docker_status(&docker)?;
            Ok(())
        }
        DockerCommand::Scan => {
            if !docker_status(&docker)? {
                return Ok(());
            }
            let volumes = docker.spawn_scan_volumes()?.wait()?;
            print_volumes(&volumes);
            Ok(())
        }
        DockerCommand::Rm { confirm, keep } => {
            if !docker_status(&docker)? {
                return Ok(());
            }
            let mut volumes = docker.spawn_scan_volumes()?.wait()?;
            for volume in &mut volumes {
                if keep.contains(&volume.name) {
                    volume.selected = false;
                }
            }
            print_volumes(&volumes);
            if !confirm {
                output::print_confirm_hint("docker rm");
                return Ok(());
            }
            let removal = docker.spawn_delete_volumes(volumes)?.wait()?;
            output::print_command_result(removal.success, &removal.output);
            print_volumes(&removal.remaining);
            Ok(())
        }
        DockerCommand::Prune { level, confirm } => {
            let level = CleanupLevel::from(level);
            output::print_prune_plan(level);
            if !confirm {
                output::print_confirm_hint("docker prune --level <LEVEL>");
                return Ok(());
            }
            prune(&docker, level)
        }
    }
}

/// Print the runtime status; `false` means there is nothing further to do.
fn docker_status(docker: &DockerCleaner) -> Result<bool> {
    let status = docker.spawn_check_availability()?.wait()?;
    output::print_scan_header("Docker");
    output::print_docker_status(&status);
    Ok(status.available)
}

fn prune(docker: &DockerCleaner, level: CleanupLevel) -> Result<()> {
    let status = docker.spawn_check_availability()?.wait()?;
    if !status.available {
        output::print_docker_status(&status);
        return Ok(());
    }
    let report = docker.spawn_prune(level)?.wait()?;
    output::print_command_result(report.success, &report.output);
    output::print_docker_status(&report.status);
    Ok(())
}

fn print_volumes(volumes: &[docker::VolumeItem]) {
    output::print_scan_header("Unused Volumes (not attached to any container)");
    if volumes.is_empty() {
        output::print_info("No unused Docker volumes found.");
        return;
    }
    for volume in volumes {
        output::print_volume(volume);
    }
    output::print_separator();
    output::print_grand_total("Total selected:", docker::selected_bytes(volumes));
}
