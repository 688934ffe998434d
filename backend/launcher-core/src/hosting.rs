//! The hosting application as seen by the launcher.
//!
//! The web host owns the application name and its install root; the launcher
//! only needs those to find the helper binary and the runtime to run it with.

use crate::{DEBUG_PROXY_BINARY, DEBUG_PROXY_FOLDER};

use std::env::var_os;
use std::path::{Path, PathBuf};

const DOTNET_HOST_PATH_VARIABLE: &str = "DOTNET_HOST_PATH";
const DOTNET_MUXER: &str = "dotnet";

pub trait HostingContext: Send + Sync {
    fn application_name(&self) -> &str;

    /// Directory the hosting application was installed into.
    fn application_root(&self) -> &Path;

    fn runtime_launcher(&self) -> PathBuf {
        resolve_runtime_launcher()
    }
}

/// Hosting context built from plain values.
#[derive(Debug, Clone)]
pub struct StaticHostingContext {
    name: String,
    root: PathBuf,
    launcher: Option<PathBuf>,
}

impl StaticHostingContext {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            launcher: None,
        }
    }

    pub fn with_runtime_launcher(mut self, launcher: impl Into<PathBuf>) -> Self {
        self.launcher = Some(launcher.into());
        self
    }
}

impl HostingContext for StaticHostingContext {
    fn application_name(&self) -> &str {
        &self.name
    }

    fn application_root(&self) -> &Path {
        &self.root
    }

    fn runtime_launcher(&self) -> PathBuf {
        self.launcher
            .clone()
            .unwrap_or_else(resolve_runtime_launcher)
    }
}

/// Path of the runtime muxer: `DOTNET_HOST_PATH` if set, otherwise `dotnet` from `PATH`.
pub fn resolve_runtime_launcher() -> PathBuf {
    match var_os(DOTNET_HOST_PATH_VARIABLE) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DOTNET_MUXER),
    }
}

/// `<application_root>/BlazorDebugProxy/BrowserDebugHost.dll`
pub fn debug_proxy_executable(application_root: &Path) -> PathBuf {
    application_root
        .join(DEBUG_PROXY_FOLDER)
        .join(DEBUG_PROXY_BINARY)
}
