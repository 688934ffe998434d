// Unit tests for spawn module private functions
// End-to-end launches with real processes are in integration_tests/launch/coordinator.rs

use crate::error::launch::LaunchError;
use crate::launch::spawn::{build_launch_command, decode_line, output_lines, wait_for_readiness};
use crate::output::sink::OutputSink;

use models::LaunchRequestBuilder;

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn display(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

async fn readiness_of(output: &str, sink: &RecordingSink) -> Result<String, LaunchError> {
    readiness_of_bytes(output.as_bytes(), sink).await
}

async fn readiness_of_bytes(
    output: &[u8],
    sink: &RecordingSink,
) -> Result<String, LaunchError> {
    let mut lines = output_lines(output);
    wait_for_readiness(&mut lines, sink).await
}

/// **VALUE**: Verifies the exact command line handed to the runtime launcher.
///
/// **WHY THIS MATTERS**: The helper parses `--OwnerPid` and `--DevToolsUrl` by name.
/// A reordered or renamed flag means the helper never learns its owner or target.
///
/// **BUG THIS CATCHES**: Would catch regressions in flag names, a missing `exec`
/// subcommand, or the launcher/executable being swapped.
#[test]
fn given_launch_request_when_building_command_then_sets_program_and_arguments() {
    // GIVEN: A launch request
    let request = LaunchRequestBuilder::default()
        .with_executable("/srv/app/BlazorDebugProxy/BrowserDebugHost.dll")
        .with_launcher("/usr/bin/dotnet")
        .with_owner_pid(1234)
        .with_address_hint("http://localhost:9222")
        .build()
        .unwrap();

    // WHEN: Building the command
    let cmd = build_launch_command(&request, &HashMap::new());

    // THEN: Program and arguments match the helper's contract
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), OsStr::new("/usr/bin/dotnet"));
    let args: Vec<&OsStr> = std_cmd.get_args().collect();
    assert_eq!(
        args,
        vec![
            OsStr::new("exec"),
            OsStr::new("/srv/app/BlazorDebugProxy/BrowserDebugHost.dll"),
            OsStr::new("--OwnerPid"),
            OsStr::new("1234"),
            OsStr::new("--DevToolsUrl"),
            OsStr::new("http://localhost:9222"),
        ]
    );
}

/// **VALUE**: Verifies that the child gets exactly the supplied (sanitized) environment.
///
/// **WHY THIS MATTERS**: The command clears the inherited environment and repopulates it.
/// If the clear is dropped, `ASPNETCORE_*` variables leak back in from the parent.
///
/// **BUG THIS CATCHES**: Would catch if `envs()` is not applied or `env_clear()` is removed.
#[test]
fn given_environment_when_building_command_then_passes_only_those_variables() {
    // GIVEN: A request and an explicit environment
    let request = LaunchRequestBuilder::default()
        .with_executable("helper.dll")
        .with_launcher("dotnet")
        .with_owner_pid(1)
        .with_address_hint("http://localhost:9222")
        .build()
        .unwrap();
    let mut environment = HashMap::new();
    environment.insert(OsString::from("PATH"), OsString::from("/usr/bin"));

    // WHEN: Building the command
    let cmd = build_launch_command(&request, &environment);

    // THEN: Only PATH is explicitly set
    let envs: Vec<(&OsStr, Option<&OsStr>)> = cmd.as_std().get_envs().collect();
    assert_eq!(
        envs,
        vec![(OsStr::new("PATH"), Some(OsStr::new("/usr/bin")))]
    );
}

/// **VALUE**: Verifies the full read loop on the canonical banner: ws:// address, no
/// banner lines displayed, user output displayed in order.
///
/// **WHY THIS MATTERS**: This is the path every successful launch takes. Display and
/// resolution are both side effects of the same loop.
///
/// **BUG THIS CATCHES**: Would catch if pass-through lines are dropped, reordered, or if
/// suppressed lines reach the console.
#[tokio::test]
async fn given_banner_with_user_output_when_waiting_then_resolves_and_displays_user_lines() {
    // GIVEN: Helper output mixing banner and user lines
    let output = "Hosting environment: X\n\
                  loading modules\n\
                  Now listening on: http://127.0.0.1:4321\n\
                  Content root path: /srv/app\n\
                  debugger ready\n\
                  Application started. Press Ctrl+C to shut down.\n\
                  after start\n";
    let sink = RecordingSink::default();

    // WHEN: Waiting for readiness
    let result = readiness_of(output, &sink).await;

    // THEN: Address resolved and only user lines displayed, in order
    assert_eq!(result.unwrap(), "ws://127.0.0.1:4321");
    assert_eq!(sink.lines(), vec!["loading modules", "debugger ready"]);
}

/// **VALUE**: Verifies that an immediately empty stream fails with NoOutputReceived.
///
/// **BUG THIS CATCHES**: Would catch the loop spinning forever on EOF instead of resolving.
#[tokio::test]
async fn given_empty_stream_when_waiting_then_fails_no_output_received() {
    // GIVEN: No output at all
    let sink = RecordingSink::default();

    // WHEN: Waiting for readiness
    let result = readiness_of("", &sink).await;

    // THEN: NoOutputReceived, nothing displayed
    assert!(matches!(result, Err(LaunchError::NoOutputReceived { .. })));
    assert!(sink.lines().is_empty());
}

/// **VALUE**: Verifies that the started banner without an address fails the launch.
///
/// **BUG THIS CATCHES**: Would catch if the loop keeps reading after a failure resolution
/// or maps the failure to the wrong error variant.
#[tokio::test]
async fn given_started_without_address_when_waiting_then_fails_ready_without_address() {
    // GIVEN: Only the started banner, followed by a late address
    let output = "Application started. Press Ctrl+C to shut down.\n\
                  Now listening on: http://127.0.0.1:4321\n";
    let sink = RecordingSink::default();

    // WHEN: Waiting for readiness
    let result = readiness_of(output, &sink).await;

    // THEN: ReadyWithoutAddress
    match result {
        Err(LaunchError::ReadyWithoutAddress { message, .. }) => {
            assert!(message.contains("without advertising an address"));
        }
        other => panic!("Expected ReadyWithoutAddress, got {other:?}"),
    }
}

/// **VALUE**: Verifies that Windows line endings do not leak into the address.
///
/// **BUG THIS CATCHES**: Would catch a `\r` ending up in the resolved endpoint.
#[tokio::test]
async fn given_crlf_output_when_waiting_then_address_has_no_carriage_return() {
    // GIVEN: CRLF-terminated banner with an https address
    let output = "Now listening on: https://host:443\r\n\
                  Application started. Press Ctrl+C to shut down.\r\n";
    let sink = RecordingSink::default();

    // WHEN: Waiting for readiness
    let result = readiness_of(output, &sink).await;

    // THEN: Clean wss:// address
    assert_eq!(result.unwrap(), "wss://host:443");
}

/// **VALUE**: Verifies that a line of non-UTF-8 bytes is displayed lossily and the
/// launch still resolves.
///
/// **WHY THIS MATTERS**: Build tools and localized runtimes print Latin-1 text. One such
/// line is not an I/O failure and must not cost the caller their debug proxy.
///
/// **BUG THIS CATCHES**: Would catch a return to strict UTF-8 line reading, which turns
/// the bad line into `OutputRead` and fails the whole launch.
#[tokio::test]
async fn given_invalid_utf8_line_when_waiting_then_resolves_and_displays_lossy_text() {
    // GIVEN: A banner with a Latin-1 encoded line in the middle
    let mut output = b"Now listening on: http://127.0.0.1:4321\n".to_vec();
    output.extend_from_slice(b"caf\xe9 build output\n");
    output.extend_from_slice(b"Application started. Press Ctrl+C to shut down.\n");
    let sink = RecordingSink::default();

    // WHEN: Waiting for readiness
    let result = readiness_of_bytes(&output, &sink).await;

    // THEN: Address resolved and the bad byte replaced in the displayed line
    assert_eq!(result.unwrap(), "ws://127.0.0.1:4321");
    assert_eq!(sink.lines(), vec!["caf\u{FFFD} build output"]);
}

/// **VALUE**: Verifies segment decoding strips only one trailing carriage return.
///
/// **BUG THIS CATCHES**: Would catch trimming that eats meaningful whitespace or leaves
/// `\r` on CRLF output.
#[test]
fn given_raw_segments_when_decoded_then_drops_trailing_carriage_return_only() {
    // GIVEN / WHEN / THEN
    assert_eq!(decode_line(b"ready\r".to_vec()), "ready");
    assert_eq!(decode_line(b"  indented  ".to_vec()), "  indented  ");
    assert_eq!(decode_line(b"\xff\r".to_vec()), "\u{FFFD}");
    assert_eq!(decode_line(Vec::new()), "");
}
