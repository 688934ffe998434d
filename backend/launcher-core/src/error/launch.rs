use common::ErrorLocation;

use std::io::Error as IoError;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error as ThisError;

/// Terminal outcome of a failed helper launch.
///
/// Cloned out of the launch cache to every caller, so sources are shared.
#[derive(Debug, Clone, ThisError)]
pub enum LaunchError {
    #[error("Executable Not Found Error: {message} {location}")]
    ExecutableNotFound {
        message: String,
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Spawn Error: {message} {location}")]
    SpawnFailed {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Arc<IoError>,
    },

    #[error("No Output Error: {message} {location}")]
    NoOutputReceived {
        message: String,
        location: ErrorLocation,
    },

    #[error("Ready Without Address Error: {message} {location}")]
    ReadyWithoutAddress {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    LaunchTimedOut {
        message: String,
        location: ErrorLocation,
    },

    #[error("Output Read Error: {message} {location}")]
    OutputRead {
        message: String,
        location: ErrorLocation,
        #[source]
        source: Arc<IoError>,
    },

    #[error("Invalid Request Error: {message} {location}")]
    InvalidRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error("Launch Task Error: {message} {location}")]
    TaskFailed {
        message: String,
        location: ErrorLocation,
    },
}
