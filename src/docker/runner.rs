use std::process::Command;

use log::debug;

use crate::error::{CleanError, Result};

/// Exit status plus stdout and stderr merged into one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub text: String,
}

impl CommandOutput {
    /// Any bytes at all, whitespace included; a bare newline counts.
    pub fn has_output(&self) -> bool {
        !self.text.is_empty()
    }

    /// Non-empty lines, e.g. one ID per line from `ps -aq`.
    pub fn line_count(&self) -> usize {
        self.text.lines().filter(|l| !l.trim().is_empty()).count()
    }
}

/// Runs a program to completion. No timeout: a hung binary hangs the caller.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("running {program} {}", args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CleanError::CommandLaunch {
                program: program.to_string(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandOutput {
            success: output.status.success(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_launch_error() {
        let err = SystemRunner
            .run("maccleaner-test-no-such-binary", &["info"])
            .unwrap_err();
        assert!(matches!(err, CleanError::CommandLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn merges_stdout_and_stderr() {
        let out = SystemRunner
            .run("sh", &["-c", "echo out; echo err >&2; exit 3"])
            .unwrap();
        assert!(!out.success);
        assert!(out.text.contains("out"));
        assert!(out.text.contains("err"));
        assert_eq!(out.line_count(), 2);
    }

    #[test]
    fn line_count_ignores_blank_lines() {
        let out = CommandOutput {
            success: true,
            text: "abc\n\n  \ndef\n".to_string(),
        };
        assert_eq!(out.line_count(), 2);
        assert!(out.has_output());
        assert!(!CommandOutput::default().has_output());
    }

    #[test]
    fn bare_newline_counts_as_output() {
        let out = CommandOutput {
            success: true,
            text: "\n".to_string(),
        };
        assert!(out.has_output());
        assert_eq!(out.line_count(), 0);
    }
}
