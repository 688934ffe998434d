use crate::fake_helper::{FakeInstall, RecordingSink, STARTED, kill_process, process_alive};

use launcher_core::{DebugProxyLauncher, LaunchError, LauncherConfig};

use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serial_test::serial;

// ============================================================================
// Public API tests for the single-flight launcher
// These run a fake launcher and helper written as shell scripts
// ============================================================================

const HINT: &str = "http://localhost:9222";

fn ready_body(url: &str) -> String {
    format!(
        "sleep 0.3\n\
         echo 'Hosting environment: Development'\n\
         echo \"args: $*\"\n\
         echo 'Now listening on: {url}'\n\
         echo 'Content root path: /srv/app'\n\
         echo '{STARTED}'\n\
         sleep 1"
    )
}

fn launcher_with(config: LauncherConfig) -> (DebugProxyLauncher, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let launcher = DebugProxyLauncher::with_sink(config, sink.clone());
    (launcher, sink)
}

/// **VALUE**: Verifies that many concurrent callers share one launch and one address.
///
/// **WHY THIS MATTERS**: This is the central property of the launcher. Two helpers
/// would fight over the debugger connection and callers would get different endpoints.
///
/// **BUG THIS CATCHES**: Would catch if the lock is released before the pending launch is
/// stored, letting a second caller start its own helper.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn given_concurrent_callers_when_launching_then_one_spawn_and_same_address() {
    // GIVEN: A healthy fake helper and a shared launcher
    let install = FakeInstall::with_helper(&ready_body("http://127.0.0.1:4321"));
    let host = Arc::new(install.host());
    let (launcher, _sink) = launcher_with(LauncherConfig::default());
    let launcher = Arc::new(launcher);

    // WHEN: Eight tasks ask for the address at once
    let mut handles = Vec::new();
    for _ in 0..8 {
        let launcher = Arc::clone(&launcher);
        let host = Arc::clone(&host);
        handles.push(tokio::spawn(async move {
            launcher
                .ensure_launched_and_get_address(host.as_ref(), HINT)
                .await
        }));
    }

    let mut addresses = Vec::new();
    for handle in handles {
        addresses.push(handle.await.unwrap().unwrap());
    }

    // THEN: Exactly one helper ran and everyone got the same ws:// address
    assert!(addresses.iter().all(|a| a == "ws://127.0.0.1:4321"));
    assert_eq!(launcher.spawn_count(), 1);
    assert_eq!(install.helper_starts(), 1);
}

/// **VALUE**: Verifies that a call after success returns the cached address without a new spawn.
///
/// **BUG THIS CATCHES**: Would catch if the cache is cleared on resolution or if later
/// callers with a different hint trigger a relaunch.
#[tokio::test]
#[serial]
async fn given_resolved_launch_when_called_again_then_returns_cached_address() {
    // GIVEN: A launcher that already resolved
    let install = FakeInstall::with_helper(&ready_body("https://host:443"));
    let host = install.host();
    let (launcher, _sink) = launcher_with(LauncherConfig::default());
    let first = launcher
        .ensure_launched_and_get_address(&host, HINT)
        .await
        .unwrap();

    // WHEN: Calling again with a different hint
    let second = launcher
        .ensure_launched_and_get_address(&host, "http://localhost:1")
        .await
        .unwrap();

    // THEN: Same wss:// address, still one spawn
    assert_eq!(first, "wss://host:443");
    assert_eq!(second, first);
    assert_eq!(launcher.spawn_count(), 1);
    assert_eq!(install.helper_starts(), 1);
    assert_eq!(launcher.outcome().unwrap().unwrap(), first);
}

/// **VALUE**: Verifies the helper receives owner PID and hint, and that only user output
/// reaches the display.
///
/// **WHY THIS MATTERS**: The helper exits when `--OwnerPid` dies and attaches to
/// `--DevToolsUrl`. Banner lines must stay hidden from the user's console.
///
/// **BUG THIS CATCHES**: Would catch a broken command line or banner lines leaking.
#[tokio::test]
#[serial]
async fn given_helper_when_launched_then_receives_contract_arguments() {
    // GIVEN: A helper that echoes its arguments
    let install = FakeInstall::with_helper(&ready_body("http://127.0.0.1:4321"));
    let (launcher, sink) = launcher_with(LauncherConfig::default());

    // WHEN: Launching
    launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await
        .unwrap();

    // THEN: Only the argument echo was displayed
    let expected = format!("args: --OwnerPid {} --DevToolsUrl {HINT}", process::id());
    assert_eq!(sink.lines(), vec![expected]);
}

/// **VALUE**: Verifies that a missing helper binary fails fast and stays failed.
///
/// **WHY THIS MATTERS**: A missing binary is a packaging problem. Retrying cannot fix it,
/// so every caller should see the same clear "not found" error immediately.
///
/// **BUG THIS CATCHES**: Would catch if the launcher spawns anyway, or if a second
/// caller gets a different error from a second attempt.
#[tokio::test]
#[serial]
async fn given_missing_helper_when_launching_then_executable_not_found_for_all_callers() {
    // GIVEN: An install without the helper binary
    let install = FakeInstall::without_helper();
    let host = install.host();
    let (launcher, _sink) = launcher_with(LauncherConfig::default());

    // WHEN: Two sequential calls
    let first = launcher.ensure_launched_and_get_address(&host, HINT).await;
    let second = launcher.ensure_launched_and_get_address(&host, HINT).await;

    // THEN: Both get the identical ExecutableNotFound error and nothing spawned
    let first = first.unwrap_err();
    match &first {
        LaunchError::ExecutableNotFound { path, .. } => {
            assert!(path.ends_with("BlazorDebugProxy/BrowserDebugHost.dll"));
        }
        other => panic!("Expected ExecutableNotFound, got {other:?}"),
    }
    assert_eq!(second.unwrap_err().to_string(), first.to_string());
    assert_eq!(launcher.spawn_count(), 0);
}

/// **VALUE**: Verifies that a launcher that cannot be started fails without waiting for
/// the timeout.
///
/// **BUG THIS CATCHES**: Would catch if spawn errors are swallowed and the caller hangs
/// until the 10 second timeout.
#[tokio::test]
#[serial]
async fn given_unstartable_launcher_when_launching_then_spawn_failed_immediately() {
    // GIVEN: A helper present but a launcher path that does not exist
    let install = FakeInstall::with_helper(&ready_body("http://127.0.0.1:4321"));
    let config = LauncherConfig {
        runtime_launcher: Some(install.dir.path().join("no-such-dotnet")),
        ..LauncherConfig::default()
    };
    let (launcher, _sink) = launcher_with(config);
    let started = Instant::now();

    // WHEN: Launching
    let result = launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await;

    // THEN: SpawnFailed well before the timeout
    assert!(matches!(result, Err(LaunchError::SpawnFailed { .. })));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(launcher.spawn_count(), 0);
    assert_eq!(install.helper_starts(), 0);
}

/// **VALUE**: Verifies that a helper announcing startup without an address fails the launch.
///
/// **BUG THIS CATCHES**: Would catch if the launcher reports success with an empty address.
#[tokio::test]
#[serial]
async fn given_helper_without_address_when_launching_then_ready_without_address() {
    // GIVEN: A helper that only prints the started banner
    let install = FakeInstall::with_helper(&format!("echo '{STARTED}'\nsleep 1"));
    let (launcher, _sink) = launcher_with(LauncherConfig::default());

    // WHEN: Launching
    let result = launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await;

    // THEN: ReadyWithoutAddress
    assert!(matches!(
        result,
        Err(LaunchError::ReadyWithoutAddress { .. })
    ));
    assert_eq!(launcher.spawn_count(), 1);
}

/// **VALUE**: Verifies that a helper exiting without output fails with NoOutputReceived.
///
/// **BUG THIS CATCHES**: Would catch if end of stream is mistaken for a timeout or hangs.
#[tokio::test]
#[serial]
async fn given_silent_helper_when_launching_then_no_output_received() {
    // GIVEN: A helper that exits immediately without writing to stdout
    let install = FakeInstall::with_helper("exit 3");
    let (launcher, _sink) = launcher_with(LauncherConfig::default());

    // WHEN: Launching
    let result = launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await;

    // THEN: NoOutputReceived
    assert!(matches!(result, Err(LaunchError::NoOutputReceived { .. })));
    assert_eq!(install.helper_starts(), 1);
}

/// **VALUE**: Verifies that a hung helper times out for every waiting caller.
///
/// **WHY THIS MATTERS**: Without the timeout a helper that never prints its banner would
/// block every caller forever.
///
/// **BUG THIS CATCHES**: Would catch if the timeout is not applied, or if only the first
/// caller receives the timeout and later ones hang.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn given_hung_helper_when_launching_then_all_callers_time_out() {
    // GIVEN: A helper that prints nothing and sleeps, with a short timeout
    let install = FakeInstall::with_helper("exec sleep 5");
    let host = install.host();
    let config = LauncherConfig {
        launch_timeout_ms: 300,
        ..LauncherConfig::default()
    };
    let (launcher, _sink) = launcher_with(config);
    let started = Instant::now();

    // WHEN: Two callers wait concurrently
    let (first, second) = tokio::join!(
        launcher.ensure_launched_and_get_address(&host, HINT),
        launcher.ensure_launched_and_get_address(&host, HINT),
    );

    // THEN: Both time out after the window, with one spawn
    assert!(matches!(first, Err(LaunchError::LaunchTimedOut { .. })));
    assert!(matches!(second, Err(LaunchError::LaunchTimedOut { .. })));
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(launcher.spawn_count(), 1);
}

/// **VALUE**: Verifies that a helper which times out is killed under the default config.
///
/// **WHY THIS MATTERS**: A failed launch is never retried, so a helper left behind would
/// hold its port and debugger connection until the process exits.
///
/// **BUG THIS CATCHES**: Would catch if `kill_on_failure` stops defaulting to true or the
/// failure branch forgets to terminate the child.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn given_hung_helper_with_default_config_when_timed_out_then_helper_is_killed() {
    // GIVEN: A hung helper that writes its PID, and the default config with a short timeout
    let install = FakeInstall::with_hung_helper_recording_pid();
    let config = LauncherConfig {
        launch_timeout_ms: 500,
        ..LauncherConfig::default()
    };
    let (launcher, _sink) = launcher_with(config);

    // WHEN: Launching
    let result = launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await;

    // THEN: Timed out and the helper process is gone
    assert!(matches!(result, Err(LaunchError::LaunchTimedOut { .. })));
    let pid = install.helper_pid();
    assert!(!process_alive(pid), "Helper {pid} should have been killed");
}

/// **VALUE**: Verifies that `kill_on_failure: false` leaves a timed-out helper running.
///
/// **WHY THIS MATTERS**: Some hosts want to inspect or attach to a helper that failed to
/// report readiness. The opt-out must really keep it alive.
///
/// **BUG THIS CATCHES**: Would catch if the flag is ignored and the child is killed anyway,
/// or dropped with kill-on-drop semantics.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn given_hung_helper_with_kill_disabled_when_timed_out_then_helper_keeps_running() {
    // GIVEN: A hung helper that writes its PID, with kill_on_failure disabled
    let install = FakeInstall::with_hung_helper_recording_pid();
    let config = LauncherConfig {
        launch_timeout_ms: 500,
        kill_on_failure: false,
        ..LauncherConfig::default()
    };
    let (launcher, _sink) = launcher_with(config);

    // WHEN: Launching
    let result = launcher
        .ensure_launched_and_get_address(&install.host(), HINT)
        .await;

    // THEN: Timed out but the helper is still alive
    assert!(matches!(result, Err(LaunchError::LaunchTimedOut { .. })));
    let pid = install.helper_pid();
    let alive = process_alive(pid);
    kill_process(pid);
    assert!(alive, "Helper {pid} should still be running");
}
