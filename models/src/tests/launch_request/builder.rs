use crate::{LaunchRequestBuilder, ModelError};

use std::path::Path;

fn complete_builder() -> LaunchRequestBuilder {
    LaunchRequestBuilder::default()
        .with_executable("/app/BlazorDebugProxy/BrowserDebugHost.dll")
        .with_launcher("dotnet")
        .with_owner_pid(4242)
        .with_address_hint("http://localhost:9222")
}

/// **VALUE**: Verifies that a fully populated builder produces a request with every field intact.
///
/// **WHY THIS MATTERS**: The request is the only carrier of the command line handed to
/// the helper. A dropped or swapped field means the helper binds the wrong debugger target.
///
/// **BUG THIS CATCHES**: Would catch if `build()` swaps the launcher and executable paths
/// or loses the owner PID.
#[test]
fn given_all_fields_when_building_then_returns_request_with_same_values() {
    // GIVEN: A complete builder
    let builder = complete_builder();

    // WHEN: Building
    let request = builder.build().unwrap();

    // THEN: Getters should return what was provided
    assert_eq!(
        request.executable(),
        Path::new("/app/BlazorDebugProxy/BrowserDebugHost.dll")
    );
    assert_eq!(request.launcher(), Path::new("dotnet"));
    assert_eq!(request.owner_pid(), 4242);
    assert_eq!(request.address_hint(), "http://localhost:9222");
}

/// **VALUE**: Verifies that builder validation rejects zero owner PIDs.
///
/// **WHY THIS MATTERS**: The helper watches `--OwnerPid` to exit with its owner.
/// PID 0 would leave an orphaned helper behind when the hosting process dies.
///
/// **BUG THIS CATCHES**: Would catch if the non-zero check is deleted during refactoring.
#[test]
fn given_zero_owner_pid_when_building_then_returns_validation_error() {
    // GIVEN: Builder with owner PID set to zero
    let builder = complete_builder().with_owner_pid(0);

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Owner PID must be non-zero");
        }
    }
}

/// **VALUE**: Verifies that a missing executable path is rejected.
///
/// **WHY THIS MATTERS**: Without an executable the launcher would be invoked as
/// `dotnet exec` with nothing to run, which prints usage text instead of failing clearly.
///
/// **BUG THIS CATCHES**: Would catch if required-field validation is removed.
#[test]
fn given_missing_executable_when_building_then_returns_validation_error() {
    // GIVEN: Builder without an executable
    let builder = LaunchRequestBuilder::default()
        .with_launcher("dotnet")
        .with_owner_pid(1)
        .with_address_hint("http://localhost:9222");

    // WHEN: Attempting to build
    let result = builder.build();

    // THEN: Should return validation error
    match result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Executable path is required");
        }
    }
}

/// **VALUE**: Verifies that empty launcher paths and blank hints are rejected.
///
/// **WHY THIS MATTERS**: Both values go straight onto the child command line.
/// Empty strings there produce confusing "file not found" errors.
///
/// **BUG THIS CATCHES**: Would catch if only presence (not content) is validated.
#[test]
fn given_empty_strings_when_building_then_returns_validation_errors() {
    // GIVEN: Builders with an empty launcher and a blank hint
    let empty_launcher = complete_builder().with_launcher("");
    let blank_hint = complete_builder().with_address_hint("   ");

    // WHEN: Attempting to build each
    let launcher_result = empty_launcher.build();
    let hint_result = blank_hint.build();

    // THEN: Both should be rejected with specific messages
    match launcher_result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Launcher path cannot be empty");
        }
    }
    match hint_result.unwrap_err() {
        ModelError::Validation { message, .. } => {
            assert_eq!(message, "Address hint cannot be empty");
        }
    }
}
