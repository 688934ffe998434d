use crate::environment::sanitized_environment;
use crate::error::launch::LaunchError;
use crate::output::readiness::{LineAction, ReadinessDetector, ReadinessFailure};
use crate::output::sink::OutputSink;

use common::ErrorLocation;
use models::LaunchRequest;

use std::collections::HashMap;
use std::ffi::OsString;
use std::panic::Location;
use std::process::Stdio;
use std::sync::Arc;

use log::{debug, info, trace, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Split};
use tokio::process::Child as TokioChild;
use tokio::process::ChildStdout;
use tokio::process::Command as TokioCommand;

const EXEC_COMMAND: &str = "exec";
const OWNER_PID_FLAG: &str = "--OwnerPid";
const DEV_TOOLS_URL_FLAG: &str = "--DevToolsUrl";

pub(crate) const HELPER_OUTPUT_TARGET: &str = "launcher_core::helper_output";

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

pub(crate) type OutputLines = Split<BufReader<ChildStdout>>;

/// Newline-delimited segments of the helper's stdout.
pub(crate) fn output_lines<R>(reader: R) -> Split<BufReader<R>>
where
    R: AsyncRead + Unpin,
{
    BufReader::new(reader).split(LINE_FEED)
}

/// Helper output is not guaranteed to be UTF-8; decode lossily and drop a trailing `\r`.
pub(crate) fn decode_line(mut segment: Vec<u8>) -> String {
    if segment.last() == Some(&CARRIAGE_RETURN) {
        segment.pop();
    }

    String::from_utf8_lossy(&segment).into_owned()
}

/// `<launcher> exec <executable> --OwnerPid <pid> --DevToolsUrl <hint>` with only stdout captured.
pub(crate) fn build_launch_command(
    request: &LaunchRequest,
    environment: &HashMap<OsString, OsString>,
) -> TokioCommand {
    let mut cmd = TokioCommand::new(request.launcher());
    cmd.arg(EXEC_COMMAND)
        .arg(request.executable())
        .arg(OWNER_PID_FLAG)
        .arg(request.owner_pid().to_string())
        .arg(DEV_TOOLS_URL_FLAG)
        .arg(request.address_hint())
        .env_clear()
        .envs(environment)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    cmd
}

#[track_caller]
pub(crate) fn spawn_debug_proxy(request: &LaunchRequest) -> Result<TokioChild, LaunchError> {
    debug!(
        "Spawning {} {EXEC_COMMAND} {}",
        request.launcher().display(),
        request.executable().display()
    );

    let environment = sanitized_environment();

    match build_launch_command(request, &environment).spawn() {
        Ok(child) => {
            info!("Spawned debug proxy (PID: {:?})", child.id());
            Ok(child)
        }
        Err(err) => Err(LaunchError::SpawnFailed {
            message: format!(
                "Could not start debug proxy with {}: {err}",
                request.launcher().display()
            ),
            location: ErrorLocation::from(Location::caller()),
            source: Arc::new(err),
        }),
    }
}

#[track_caller]
fn readiness_error(failure: ReadinessFailure) -> LaunchError {
    let message = failure.describe().to_string();
    let location = ErrorLocation::from(Location::caller());

    match failure {
        ReadinessFailure::NoOutputReceived => LaunchError::NoOutputReceived { message, location },
        ReadinessFailure::ReadyWithoutAddress => {
            LaunchError::ReadyWithoutAddress { message, location }
        }
    }
}

/// Read output lines in order until the detector resolves.
///
/// Pass-through lines go to `sink`; everything else is dropped.
pub(crate) async fn wait_for_readiness<R>(
    lines: &mut Split<R>,
    sink: &dyn OutputSink,
) -> Result<String, LaunchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut detector = ReadinessDetector::new();

    loop {
        match lines.next_segment().await {
            Ok(Some(segment)) => {
                let line = decode_line(segment);
                trace!(target: HELPER_OUTPUT_TARGET, "{line}");

                if let LineAction::Display(text) = detector.observe(&line) {
                    sink.display(text);
                }
            }
            Ok(None) => {
                debug!("Debug proxy output ended");
                detector.finish();
            }
            Err(e) => {
                return Err(LaunchError::OutputRead {
                    message: format!("Failed to read debug proxy output: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                    source: Arc::new(e),
                });
            }
        }

        match detector.outcome() {
            Some(Ok(address)) => return Ok(address.to_string()),
            Some(Err(failure)) => return Err(readiness_error(failure)),
            None => {}
        }
    }
}

/// Keep the pipe drained after readiness and reap the helper when it exits.
pub(crate) async fn drain_detached(mut child: TokioChild, mut lines: OutputLines) {
    loop {
        match lines.next_segment().await {
            Ok(Some(segment)) => trace!(target: HELPER_OUTPUT_TARGET, "{}", decode_line(segment)),
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped reading debug proxy output: {e}");
                break;
            }
        }
    }

    match child.wait().await {
        Ok(status) => debug!("Debug proxy exited: {status}"),
        Err(e) => warn!("Failed to wait for debug proxy exit: {e}"),
    }
}

pub(crate) async fn terminate(child: &mut TokioChild) {
    let pid = child.id();

    match child.kill().await {
        Ok(()) => debug!("Killed debug proxy (PID: {pid:?})"),
        Err(e) => warn!("Failed to kill debug proxy (PID: {pid:?}): {e}"),
    }
}
