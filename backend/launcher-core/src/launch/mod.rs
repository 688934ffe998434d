//! Single-flight launch of the debug proxy helper.
//!
//! [`coordinator::DebugProxyLauncher`] owns the one cached launch. The
//! [`spawn`] helpers build the command line, run the readiness wait and look
//! after the child once the launch has resolved.

pub mod coordinator;
pub mod spawn;

pub use coordinator::DebugProxyLauncher;
