//! Readiness state machine for one helper process.
//!
//! ```text
//! Waiting         --listening--> AddressCaptured
//! AddressCaptured --listening--> AddressCaptured (address replaced)
//! AddressCaptured --started----> Ready(address)
//! Waiting         --started----> Failed(ReadyWithoutAddress)
//! Waiting | AddressCaptured --eof--> Failed(NoOutputReceived)
//! ```
//!
//! The detector does no I/O. It tells the caller what to do with each line
//! and exposes the terminal outcome once one is reached.

use crate::output::classifier::{LineKind, classify};

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";
const WS_SCHEME: &str = "ws://";
const WSS_SCHEME: &str = "wss://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessFailure {
    /// Stream ended before startup completed.
    NoOutputReceived,
    /// Startup completed without a listening address ever being printed.
    ReadyWithoutAddress,
}

impl ReadinessFailure {
    pub fn describe(&self) -> &'static str {
        match self {
            ReadinessFailure::NoOutputReceived => {
                "Debug proxy output ended before it reported startup"
            }
            ReadinessFailure::ReadyWithoutAddress => {
                "Debug proxy started without advertising an address"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessState {
    Waiting,
    AddressCaptured(String),
    Ready(String),
    Failed(ReadinessFailure),
}

/// What the caller should do with a line it just fed to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction<'a> {
    Display(&'a str),
    Suppress,
}

#[derive(Debug)]
pub struct ReadinessDetector {
    state: ReadinessState,
}

impl Default for ReadinessDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessDetector {
    pub fn new() -> Self {
        Self {
            state: ReadinessState::Waiting,
        }
    }

    pub fn state(&self) -> &ReadinessState {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(
            self.state,
            ReadinessState::Ready(_) | ReadinessState::Failed(_)
        )
    }

    /// Feed one output line. Lines arriving after resolution are ignored.
    pub fn observe<'a>(&mut self, line: &'a str) -> LineAction<'a> {
        if self.is_resolved() {
            return LineAction::Suppress;
        }

        match classify(line) {
            LineKind::ListeningAddress(url) => {
                self.state = ReadinessState::AddressCaptured(to_stream_endpoint(url));
                LineAction::Suppress
            }
            LineKind::StartupComplete => {
                let captured = std::mem::replace(&mut self.state, ReadinessState::Waiting);
                self.state = match captured {
                    ReadinessState::AddressCaptured(address) => ReadinessState::Ready(address),
                    _ => ReadinessState::Failed(ReadinessFailure::ReadyWithoutAddress),
                };
                LineAction::Suppress
            }
            LineKind::Suppressed => LineAction::Suppress,
            LineKind::PassThrough => LineAction::Display(line),
        }
    }

    /// Signal end of stream.
    pub fn finish(&mut self) {
        if !self.is_resolved() {
            self.state = ReadinessState::Failed(ReadinessFailure::NoOutputReceived);
        }
    }

    /// `Some` once a terminal state has been reached.
    pub fn outcome(&self) -> Option<Result<&str, ReadinessFailure>> {
        match &self.state {
            ReadinessState::Ready(address) => Some(Ok(address.as_str())),
            ReadinessState::Failed(failure) => Some(Err(*failure)),
            ReadinessState::Waiting | ReadinessState::AddressCaptured(_) => None,
        }
    }
}

/// Rewrite `http://` to `ws://` and `https://` to `wss://`; anything else is kept.
pub fn to_stream_endpoint(url: &str) -> String {
    if let Some(rest) = url.strip_prefix(HTTPS_SCHEME) {
        format!("{WSS_SCHEME}{rest}")
    } else if let Some(rest) = url.strip_prefix(HTTP_SCHEME) {
        format!("{WS_SCHEME}{rest}")
    } else {
        url.to_string()
    }
}
