pub mod config;
pub mod environment;
pub mod error;
pub mod hosting;
pub mod launch;
pub mod logger;
pub mod output;


pub use config::LauncherConfig;
pub use error::launch::LaunchError;
pub use hosting::{HostingContext, StaticHostingContext};
pub use launch::DebugProxyLauncher;
pub use output::sink::{ConsoleSink, OutputSink};

pub const DEBUG_PROXY_FOLDER: &str = "BlazorDebugProxy";
pub const DEBUG_PROXY_BINARY: &str = "BrowserDebugHost.dll";
pub const RESERVED_ENV_PREFIX: &str = "ASPNETCORE_";
