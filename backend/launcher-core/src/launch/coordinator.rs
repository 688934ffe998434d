use crate::config::LauncherConfig;
use crate::error::launch::LaunchError;
use crate::hosting::{HostingContext, debug_proxy_executable};
use crate::launch::spawn::{
    drain_detached, output_lines, spawn_debug_proxy, terminate, wait_for_readiness,
};
use crate::output::sink::{ConsoleSink, OutputSink};

use common::ErrorLocation;
use models::LaunchRequestBuilder;

use std::io::Error as IoError;
use std::panic::Location;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, trace, warn};
use tokio::spawn as TokioSpawn;
use tokio::time::timeout as TokioTimeout;

type SharedLaunch = Shared<BoxFuture<'static, Result<String, LaunchError>>>;

/// Inputs captured from the first caller; owned by the launch task.
#[derive(Debug)]
struct LaunchPlan {
    application_name: String,
    executable: PathBuf,
    launcher: PathBuf,
    owner_pid: u32,
    address_hint: String,
    timeout: Duration,
    kill_on_failure: bool,
}

/// Single-flight launcher for the debug proxy helper.
///
/// The first call to [`ensure_launched_and_get_address`] spawns the helper;
/// every call, concurrent or later, awaits that same launch and receives the
/// same address or the same error. Nothing is retried: a failed launch stays
/// failed for the lifetime of this value.
///
/// [`ensure_launched_and_get_address`]: DebugProxyLauncher::ensure_launched_and_get_address
pub struct DebugProxyLauncher {
    config: LauncherConfig,
    sink: Arc<dyn OutputSink>,
    launch: Mutex<Option<SharedLaunch>>,
    spawned: Arc<AtomicUsize>,
}

impl DebugProxyLauncher {
    /// Create a launcher that shows helper output on stdout.
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_sink(config, Arc::new(ConsoleSink))
    }

    pub fn with_sink(config: LauncherConfig, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            config,
            sink,
            launch: Mutex::new(None),
            spawned: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start the helper on first use and wait for its stream endpoint.
    ///
    /// `address_hint` is forwarded as `--DevToolsUrl`. Only the first caller's
    /// `host` and hint are used.
    ///
    /// # Returns
    ///
    /// * `Ok(address)` - `ws://` or `wss://` endpoint the helper listens on
    /// * `Err(LaunchError)` - The cached failure of the one launch attempt
    pub async fn ensure_launched_and_get_address(
        &self,
        host: &dyn HostingContext,
        address_hint: &str,
    ) -> Result<String, LaunchError> {
        let launch = self.pending_launch(host, address_hint);
        launch.await
    }

    /// Number of helper processes spawned so far (0 or 1).
    pub fn spawn_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    /// The resolved outcome, if the launch has finished.
    pub fn outcome(&self) -> Option<Result<String, LaunchError>> {
        self.launch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|launch| launch.peek().cloned())
    }

    /// Check-and-set of the shared launch. Never awaits while holding the lock.
    fn pending_launch(&self, host: &dyn HostingContext, address_hint: &str) -> SharedLaunch {
        let mut slot = self.launch.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = slot.as_ref() {
            trace!("Debug proxy launch already in progress or finished");
            return existing.clone();
        }

        let plan = LaunchPlan {
            application_name: host.application_name().to_string(),
            executable: debug_proxy_executable(host.application_root()),
            launcher: self
                .config
                .runtime_launcher
                .clone()
                .unwrap_or_else(|| host.runtime_launcher()),
            owner_pid: process::id(),
            address_hint: address_hint.to_string(),
            timeout: self.config.launch_timeout(),
            kill_on_failure: self.config.kill_on_failure,
        };

        info!("Launching debug proxy for {}", plan.application_name);

        let task = TokioSpawn(run_launch(
            plan,
            Arc::clone(&self.sink),
            Arc::clone(&self.spawned),
        ));

        let launch = async move {
            task.await.unwrap_or_else(|e| {
                Err(LaunchError::TaskFailed {
                    message: format!("Debug proxy launch task failed: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })
            })
        }
        .boxed()
        .shared();

        *slot = Some(launch.clone());
        launch
    }
}

async fn run_launch(
    plan: LaunchPlan,
    sink: Arc<dyn OutputSink>,
    spawned: Arc<AtomicUsize>,
) -> Result<String, LaunchError> {
    if !plan.executable.is_file() {
        return Err(LaunchError::ExecutableNotFound {
            message: format!(
                "Cannot start debug proxy for {}: {} does not exist",
                plan.application_name,
                plan.executable.display()
            ),
            path: plan.executable,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let request = LaunchRequestBuilder::default()
        .with_executable(plan.executable)
        .with_launcher(plan.launcher)
        .with_owner_pid(plan.owner_pid)
        .with_address_hint(plan.address_hint)
        .build()
        .map_err(|e| LaunchError::InvalidRequest {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let mut child = spawn_debug_proxy(&request)?;
    spawned.fetch_add(1, Ordering::SeqCst);

    let Some(stdout) = child.stdout.take() else {
        terminate(&mut child).await;
        return Err(LaunchError::SpawnFailed {
            message: "Debug proxy stdout was not captured".to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: Arc::new(IoError::other("stdout not piped")),
        });
    };

    let mut lines = output_lines(stdout);

    let outcome = match TokioTimeout(plan.timeout, wait_for_readiness(&mut lines, sink.as_ref()))
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(LaunchError::LaunchTimedOut {
            message: format!(
                "Debug proxy did not report readiness within {:?}",
                plan.timeout
            ),
            location: ErrorLocation::from(Location::caller()),
        }),
    };

    match outcome {
        Ok(address) => {
            info!(
                "Debug proxy ready at {address} (PID: {:?})",
                child.id()
            );
            TokioSpawn(drain_detached(child, lines));
            Ok(address)
        }
        Err(err) if plan.kill_on_failure => {
            warn!("Debug proxy launch failed, killing it: {err}");
            terminate(&mut child).await;
            Err(err)
        }
        Err(err) => {
            warn!("Debug proxy launch failed, leaving it running: {err}");
            debug!("Detaching debug proxy (PID: {:?})", child.id());
            TokioSpawn(drain_detached(child, lines));
            Err(err)
        }
    }
}
