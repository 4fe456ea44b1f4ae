/// One step of a prune sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneCommand {
    /// `docker stop` every container listed by `docker ps -aq`. Never fails the level.
    StopAllContainers,
    /// Arguments passed to the docker binary.
    Docker(&'static [&'static str]),
}

const SYSTEM_PRUNE: PruneCommand = PruneCommand::Docker(&["system", "prune", "-a", "-f"]);
const SYSTEM_PRUNE_VOLUMES: PruneCommand =
    PruneCommand::Docker(&["system", "prune", "-a", "-f", "--volumes"]);
const BUILDER_PRUNE: PruneCommand = PruneCommand::Docker(&["builder", "prune", "-a", "-f"]);

/// Bulk cleanup presets, in order of increasing destructiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CleanupLevel {
    /// Unused images and build cache.
    #[default]
    Unused,
    /// Stops every container first, then removes all images and build cache.
    All,
    /// Like `All`, and removes volumes too. Data loss.
    Volumes,
}

impl CleanupLevel {
    pub const ALL: [CleanupLevel; 3] = [Self::Unused, Self::All, Self::Volumes];

    pub fn title(self) -> &'static str {
        match self {
            Self::Unused => "Remove Unused Images & Build Cache",
            Self::All => "Stop All Containers & Remove All Images",
            Self::Volumes => "Remove All Volumes (DANGER)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Unused => "Removes unused images and build cache (safe)",
            Self::All => "Stops all containers and removes all images and build cache",
            Self::Volumes => "Also removes all volumes (DATA LOSS RISK)",
        }
    }

    pub fn is_destructive(self) -> bool {
        self == Self::Volumes
    }

    /// Run in order; later steps rely on earlier ones (containers stopped first).
    pub fn commands(self) -> &'static [PruneCommand] {
        match self {
            Self::Unused => &[SYSTEM_PRUNE, BUILDER_PRUNE],
            Self::All => &[PruneCommand::StopAllContainers, SYSTEM_PRUNE, BUILDER_PRUNE],
            Self::Volumes => &[
                PruneCommand::StopAllContainers,
                SYSTEM_PRUNE_VOLUMES,
                BUILDER_PRUNE,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_safe_level() {
        assert_eq!(CleanupLevel::default(), CleanupLevel::Unused);
        assert!(!CleanupLevel::default().is_destructive());
    }

    #[test]
    fn only_volumes_is_destructive() {
        let destructive: Vec<_> = CleanupLevel::ALL
            .into_iter()
            .filter(|l| l.is_destructive())
            .collect();
        assert_eq!(destructive, [CleanupLevel::Volumes]);
    }

    #[test]
    fn levels_escalate() {
        assert!(!CleanupLevel::Unused
            .commands()
            .contains(&PruneCommand::StopAllContainers));
        assert_eq!(CleanupLevel::All.commands()[0], PruneCommand::StopAllContainers);
        assert_eq!(CleanupLevel::Volumes.commands()[0], PruneCommand::StopAllContainers);
        assert!(CleanupLevel::Volumes
            .commands()
            .contains(&PruneCommand::Docker(&["system", "prune", "-a", "-f", "--volumes"])));
        assert!(!CleanupLevel::All.commands().iter().any(|c| matches!(
            c,
            PruneCommand::Docker(args) if args.contains(&"--volumes")
        )));
    }
}
