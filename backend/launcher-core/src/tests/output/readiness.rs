// Unit tests for the readiness state machine

use crate::output::readiness::{
    LineAction, ReadinessDetector, ReadinessFailure, ReadinessState, to_stream_endpoint,
};

const STARTED: &str = "Application started. Press Ctrl+C to shut down.";

/// **VALUE**: Verifies the canonical helper banner sequence resolves to a `ws://` address
/// and that none of the banner lines are displayed.
///
/// **WHY THIS MATTERS**: This is the exact output of a healthy helper. Anything else
/// here means the launcher never works.
///
/// **BUG THIS CATCHES**: Would catch if the scheme is not rewritten, or if the
/// hosting/started lines leak to the user's console.
#[test]
fn given_standard_banner_sequence_when_observed_then_ready_with_ws_address() {
    // GIVEN: A fresh detector
    let mut detector = ReadinessDetector::new();

    // WHEN: Feeding the standard banner
    let actions = vec![
        detector.observe("Hosting environment: X"),
        detector.observe("Now listening on: http://127.0.0.1:4321"),
        detector.observe(STARTED),
    ];

    // THEN: Everything suppressed, resolved to the ws:// address
    assert!(actions.iter().all(|a| *a == LineAction::Suppress));
    assert_eq!(detector.outcome(), Some(Ok("ws://127.0.0.1:4321")));
}

/// **VALUE**: Verifies that startup without a prior address is a protocol failure.
///
/// **WHY THIS MATTERS**: A helper that starts without listening is unusable. Reporting
/// success with no address would hand callers an empty endpoint.
///
/// **BUG THIS CATCHES**: Would catch if `Waiting` + started transitions to `Ready`.
#[test]
fn given_started_without_address_when_observed_then_fails_ready_without_address() {
    // GIVEN: A fresh detector
    let mut detector = ReadinessDetector::new();

    // WHEN: The started banner arrives first
    detector.observe(STARTED);

    // THEN: Should fail with ReadyWithoutAddress
    assert_eq!(
        detector.outcome(),
        Some(Err(ReadinessFailure::ReadyWithoutAddress))
    );
}

/// **VALUE**: Verifies that end of stream before resolution fails with NoOutputReceived,
/// both for an empty stream and after a captured address.
///
/// **BUG THIS CATCHES**: Would catch if `finish()` only handles the `Waiting` state.
#[test]
fn given_end_of_stream_before_start_when_finished_then_fails_no_output() {
    // GIVEN: An empty detector and one that captured an address
    let mut empty = ReadinessDetector::new();
    let mut captured = ReadinessDetector::new();
    captured.observe("Now listening on: http://127.0.0.1:1");

    // WHEN: Both streams end
    empty.finish();
    captured.finish();

    // THEN: Both fail with NoOutputReceived
    assert_eq!(empty.outcome(), Some(Err(ReadinessFailure::NoOutputReceived)));
    assert_eq!(
        captured.outcome(),
        Some(Err(ReadinessFailure::NoOutputReceived))
    );
}

/// **VALUE**: Verifies that https addresses become wss and that the latest address wins.
///
/// **WHY THIS MATTERS**: Helpers can print several listening lines. The last one
/// before startup is the endpoint the helper actually uses.
///
/// **BUG THIS CATCHES**: Would catch if the first address is kept instead of overwritten,
/// or if https is rewritten to ws.
#[test]
fn given_multiple_addresses_when_started_then_uses_latest_rewritten_to_wss() {
    // GIVEN: A detector that sees two listening lines
    let mut detector = ReadinessDetector::new();
    detector.observe("Now listening on: http://127.0.0.1:80");
    detector.observe("Now listening on: https://host:443");

    // THEN: The captured state holds the second address
    assert_eq!(
        detector.state(),
        &ReadinessState::AddressCaptured("wss://host:443".to_string())
    );

    // WHEN: Startup completes
    detector.observe(STARTED);

    // THEN: Resolved with the wss:// address
    assert_eq!(detector.outcome(), Some(Ok("wss://host:443")));
}

/// **VALUE**: Verifies that output after resolution is ignored entirely.
///
/// **WHY THIS MATTERS**: Only the first terminal transition counts. A late listening
/// line or end of stream must not change an address callers already received.
///
/// **BUG THIS CATCHES**: Would catch if `observe()` or `finish()` mutate a resolved state.
#[test]
fn given_resolved_detector_when_more_output_arrives_then_outcome_unchanged() {
    // GIVEN: A resolved detector
    let mut detector = ReadinessDetector::new();
    detector.observe("Now listening on: http://127.0.0.1:4321");
    detector.observe(STARTED);

    // WHEN: More output and end of stream arrive
    let late = detector.observe("stray diagnostic");
    detector.observe("Now listening on: http://127.0.0.1:9999");
    detector.finish();

    // THEN: Late lines are not displayed and the outcome is unchanged
    assert_eq!(late, LineAction::Suppress);
    assert_eq!(detector.outcome(), Some(Ok("ws://127.0.0.1:4321")));
}

/// **VALUE**: Verifies that pass-through lines are displayed without resolving anything.
///
/// **BUG THIS CATCHES**: Would catch if pass-through text is swallowed or altered.
#[test]
fn given_pass_through_line_when_observed_then_displayed_verbatim() {
    // GIVEN: A fresh detector
    let mut detector = ReadinessDetector::new();

    // WHEN: Observing arbitrary output
    let action = detector.observe("  warn: something odd  ");

    // THEN: Displayed as-is and still unresolved
    assert_eq!(action, LineAction::Display("  warn: something odd  "));
    assert!(!detector.is_resolved());
    assert_eq!(detector.state(), &ReadinessState::Waiting);
}

/// **VALUE**: Verifies the scheme rewrite table.
///
/// **BUG THIS CATCHES**: Would catch if `https://` were matched by the `http://` branch
/// first (producing `wss://` vs `ws://s://` mix-ups) or if unknown schemes were mangled.
#[test]
fn given_various_schemes_when_rewritten_then_maps_http_family_only() {
    assert_eq!(to_stream_endpoint("http://a:1"), "ws://a:1");
    assert_eq!(to_stream_endpoint("https://a:1"), "wss://a:1");
    assert_eq!(to_stream_endpoint("ws://a:1"), "ws://a:1");
    assert_eq!(to_stream_endpoint("HTTP://a:1"), "HTTP://a:1");
}
