use launcher_core::LaunchError;
use launcher_core::error::CoreError;

use common::ErrorLocation;

use std::error::Error;
use std::io::Error as IoError;
use std::io::ErrorKind;
use std::panic::Location;
use std::sync::Arc;

/// **VALUE**: Verifies that `LaunchError::SpawnFailed` keeps its message, location and source.
///
/// **WHY THIS MATTERS**: A spawn failure is usually "dotnet not on PATH". The source
/// io::Error says so; the location says which launch stage raised it.
///
/// **BUG THIS CATCHES**: Would catch if the `#[source]` attribute is lost when the io
/// error is wrapped in an Arc, or if the location disappears from Display.
#[test]
fn given_spawn_failed_when_formatted_then_includes_message_location_and_source() {
    // GIVEN: A SpawnFailed error with an io source
    let io_err = IoError::new(ErrorKind::NotFound, "dotnet not found");
    let err = LaunchError::SpawnFailed {
        message: "Could not start debug proxy with dotnet".to_string(),
        location: ErrorLocation::from(Location::caller()),
        source: Arc::new(io_err),
    };

    // WHEN: Formatting and walking the source chain
    let error_string = err.to_string();
    let source = err.source().map(|s| s.to_string());

    // THEN: Display has type, message and file; source is the io error
    assert!(error_string.contains("Spawn Error"));
    assert!(error_string.contains("Could not start debug proxy with dotnet"));
    assert!(error_string.contains("launch.rs"));
    assert_eq!(source.as_deref(), Some("dotnet not found"));
}

/// **VALUE**: Verifies that a cloned error is indistinguishable from the original.
///
/// **WHY THIS MATTERS**: The cached launch outcome is cloned out to every caller. All
/// of them must see the same message, the same location and the same source.
///
/// **BUG THIS CATCHES**: Would catch a Clone impl that drops the source or rebuilds
/// the location at the clone site.
#[test]
fn given_launch_error_when_cloned_then_clone_matches_original() {
    // GIVEN: A timeout error and an output read error
    let timeout = LaunchError::LaunchTimedOut {
        message: "Debug proxy did not report readiness within 10s".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };
    let read = LaunchError::OutputRead {
        message: "Failed to read debug proxy output".to_string(),
        location: ErrorLocation::from(Location::caller()),
        source: Arc::new(IoError::new(ErrorKind::BrokenPipe, "pipe closed")),
    };

    // WHEN: Cloning both
    let timeout_clone = timeout.clone();
    let read_clone = read.clone();

    // THEN: Display and source are identical
    assert_eq!(timeout_clone.to_string(), timeout.to_string());
    assert_eq!(read_clone.to_string(), read.to_string());
    assert_eq!(
        read_clone.source().map(|s| s.to_string()),
        read.source().map(|s| s.to_string())
    );
}

/// **VALUE**: Verifies the Display prefix of each protocol failure variant.
///
/// **BUG THIS CATCHES**: Would catch copy-pasted `#[error]` strings that make two
/// failure kinds look the same in logs.
#[test]
fn given_protocol_failures_when_formatted_then_prefixes_are_distinct() {
    // GIVEN: One of each protocol-level failure
    let location = ErrorLocation::from(Location::caller());
    let cases = vec![
        (
            LaunchError::NoOutputReceived {
                message: "m".to_string(),
                location,
            },
            "No Output Error",
        ),
        (
            LaunchError::ReadyWithoutAddress {
                message: "m".to_string(),
                location,
            },
            "Ready Without Address Error",
        ),
        (
            LaunchError::ExecutableNotFound {
                message: "m".to_string(),
                path: "/srv/app/BlazorDebugProxy/BrowserDebugHost.dll".into(),
                location,
            },
            "Executable Not Found Error",
        ),
    ];

    // WHEN / THEN: Each renders with its own prefix
    for (err, prefix) in cases {
        assert!(
            err.to_string().starts_with(prefix),
            "Expected '{prefix}' in: {err}"
        );
    }
}

/// **VALUE**: Verifies that `CoreError` forwards launch errors transparently.
///
/// **BUG THIS CATCHES**: Would catch if `#[error(transparent)]` is replaced with a
/// wrapper message that hides the original.
#[test]
fn given_launch_error_when_converted_to_core_error_then_display_is_unchanged() {
    // GIVEN: A launch error
    let err = LaunchError::TaskFailed {
        message: "Debug proxy launch task failed".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };
    let expected = err.to_string();

    // WHEN: Converting via From
    let core: CoreError = err.into();

    // THEN: Display is identical
    assert_eq!(core.to_string(), expected);
}
