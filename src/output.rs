use colored::Colorize;
use humansize::{format_size as humanize, BINARY};

use maccleaner::disk_info::DiskInfo;
use maccleaner::docker::{PruneCommand, RuntimeStatus, VolumeItem};
use maccleaner::scanner::TargetProbe;
use maccleaner::{CleanReport, CleanupLevel};

pub fn format_size(bytes: u64) -> String {
    humanize(bytes, BINARY)
}

pub fn print_banner() {
    println!(
        "{}",
        format!("maccleaner v{}", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_scan_header(label: &str) {
    println!("{}", format!("=== {label} ===").bold().white());
}

pub fn print_item(selected: bool, name: &str, path: &str, bytes: u64) {
    let mark = if selected { "[x]".green() } else { "[ ]".dimmed() };
    println!(
        "  {mark} {:<24} {:>12}  {}",
        name,
        format_size(bytes).yellow(),
        path.dimmed()
    );
}

pub fn print_large_item(name: &str, path: &str, bytes: u64) {
    println!(
        "  {:<40} {:>12}  {}",
        name,
        format_size(bytes).yellow(),
        path.dimmed()
    );
}

pub fn print_probe(name: &str, path: &str, probe: &TargetProbe) {
    let state = match probe {
        TargetProbe::Found(bytes) => format_size(*bytes).green().to_string(),
        TargetProbe::Missing => "not found".dimmed().to_string(),
        TargetProbe::NotADirectory => "not a directory".yellow().to_string(),
        TargetProbe::Unreadable(e) => e.red().to_string(),
    };
    println!("  {:<24} {:<14} {}", name, state, path.dimmed());
}

pub fn print_separator() {
    println!("  {}", "─".repeat(45).dimmed());
}

pub fn print_grand_total(label: &str, bytes: u64) {
    println!(
        "  {:<30} {}",
        label.bold(),
        format_size(bytes).green().bold()
    );
    println!();
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

/// Deletion needs explicit confirmation; this is what an unconfirmed run ends with.
pub fn print_confirm_hint(command: &str) {
    println!(
        "{}",
        format!("Nothing was deleted. Confirm with `maccleaner {command} --confirm`.")
            .yellow()
            .bold()
    );
}

pub fn print_clean_report(report: &CleanReport) {
    if report.error_count == 0 {
        println!(
            "{} {}",
            "Cleaned!".green().bold(),
            format!("{} freed.", format_size(report.bytes_freed)).green()
        );
        return;
    }
    println!(
        "{} {} freed, {} errors.",
        "Cleaned".yellow().bold(),
        format_size(report.bytes_freed),
        report.error_count.to_string().red()
    );
    for err in &report.recent_errors {
        println!("  {} {}", "Failed".red().bold(), err.dimmed());
    }
    if let Some(last) = &report.last_error {
        println!("  {} {}", "Last error:".bold(), last.red());
    }
}

pub fn print_disk(label: &str, info: &DiskInfo) {
    println!(
        "  {:<30} {} free of {} ({:.0}% used)",
        label,
        format_size(info.available).green(),
        format_size(info.total),
        info.usage_percent() * 100.0
    );
}

pub fn print_docker_status(status: &RuntimeStatus) {
    if !status.available {
        print_warning("Docker is not available (is the daemon running?)");
        return;
    }
    println!("  {:<20} {}", "Containers:", status.containers);
    println!("  {:<20} {}", "Images:", status.images);
}

pub fn print_volume(volume: &VolumeItem) {
    print_item(volume.selected, &volume.name, volume.kind.label(), volume.size);
}

pub fn print_prune_plan(level: CleanupLevel) {
    print_scan_header(level.title());
    println!("  {}", level.description());
    for command in level.commands() {
        let line = match command {
            PruneCommand::StopAllContainers => "docker stop $(docker ps -aq)".to_string(),
            PruneCommand::Docker(args) => format!("docker {}", args.join(" ")),
        };
        println!("    {}", line.dimmed());
    }
    if level.is_destructive() {
        print_warning("this removes ALL volumes, including ones holding data in use.");
    }
    println!();
}

pub fn print_command_result(success: bool, output: &str) {
    if success {
        println!("{}", "Docker cleanup completed.".green().bold());
    } else {
        println!("{}", "Docker cleanup encountered issues.".yellow().bold());
    }
    if !output.trim().is_empty() {
        println!("{}", output.trim_end().dimmed());
    }
}
