use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("could not determine home directory")]
    HomeDirUnavailable,

    /// The top of a walk could not be listed at all.
    #[error("cannot read {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scan or clean was requested while the previous one is still running.
    #[error("{0} is already running")]
    Busy(&'static str),

    #[error("failed to launch {program}: {source}")]
    CommandLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid size: '{0}'")]
    InvalidSize(String),

    /// The background thread went away without sending a result.
    #[error("background worker exited without a result")]
    WorkerLost,
}

pub type Result<T> = std::result::Result<T, CleanError>;
