use crate::LaunchRequest;
use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

/// Builder for creating validated LaunchRequest instances.
#[derive(Debug, Default)]
pub struct LaunchRequestBuilder {
    executable: Option<PathBuf>,
    launcher: Option<PathBuf>,
    owner_pid: Option<u32>,
    address_hint: Option<String>,
}

impl LaunchRequestBuilder {
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_launcher(mut self, path: impl Into<PathBuf>) -> Self {
        self.launcher = Some(path.into());
        self
    }

    pub fn with_owner_pid(mut self, pid: u32) -> Self {
        self.owner_pid = Some(pid);
        self
    }

    pub fn with_address_hint(mut self, hint: impl Into<String>) -> Self {
        self.address_hint = Some(hint.into());
        self
    }

    /// Build the LaunchRequest with validation.
    #[track_caller]
    pub fn build(self) -> Result<LaunchRequest, ModelError> {
        let executable = self.executable.ok_or_else(|| ModelError::Validation {
            message: String::from("Executable path is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if executable.as_os_str().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Executable path cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let launcher = self.launcher.ok_or_else(|| ModelError::Validation {
            message: String::from("Launcher path is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if launcher.as_os_str().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Launcher path cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let owner_pid = self.owner_pid.ok_or_else(|| ModelError::Validation {
            message: String::from("Owner PID is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if owner_pid == 0 {
            return Err(ModelError::Validation {
                message: String::from("Owner PID must be non-zero"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let address_hint = self.address_hint.ok_or_else(|| ModelError::Validation {
            message: String::from("Address hint is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if address_hint.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Address hint cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(LaunchRequest {
            executable,
            launcher,
            owner_pid,
            address_hint,
        })
    }
}
