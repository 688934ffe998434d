pub mod builder;

use std::path::{Path, PathBuf};

/// Everything needed to start the debug proxy helper once.
///
/// Built through [`builder::LaunchRequestBuilder`]; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub(crate) executable: PathBuf,
    pub(crate) launcher: PathBuf,
    pub(crate) owner_pid: u32,
    pub(crate) address_hint: String,
}

impl LaunchRequest {
    /// Path of the helper binary handed to the launcher's `exec` command.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Runtime launcher used to invoke the helper.
    pub fn launcher(&self) -> &Path {
        &self.launcher
    }

    /// PID of the hosting process; the helper exits when this process dies.
    pub fn owner_pid(&self) -> u32 {
        self.owner_pid
    }

    pub fn address_hint(&self) -> &str {
        &self.address_hint
    }
}
