use std::sync::OnceLock;

use const_format::concatcp;
use regex::Regex;

pub const LISTENING_PREFIX: &str = "Now listening on:";
pub const STARTUP_COMPLETE_LINE: &str = "Application started. Press Ctrl+C to shut down.";

/// Host diagnostics that would be mistaken for the caller's own app output.
pub const SUPPRESSED_PREFIXES: &[&str] = &[
    "Hosting environment:",
    "Content root path:",
    LISTENING_PREFIX,
    STARTUP_COMPLETE_LINE,
];

const LISTENING_PATTERN: &str = concatcp!(r"^\s*", LISTENING_PREFIX, r" (?P<url>\S.*?)\s*$");
const LISTENING_CAPTURE_URL: &str = "url";

static LISTENING_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_listening_regex() -> &'static Regex {
    // Linear-time matching, so no per-match time guard.
    LISTENING_REGEX.get_or_init(|| Regex::new(LISTENING_PATTERN).expect("valid regex pattern"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Now listening on: <url>`, carrying the URL verbatim.
    ListeningAddress(&'a str),
    StartupComplete,
    Suppressed,
    PassThrough,
}

/// Hosts may indent their banner lines, so leading whitespace is ignored.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(url) = get_listening_regex()
        .captures(line)
        .and_then(|caps| caps.name(LISTENING_CAPTURE_URL))
    {
        return LineKind::ListeningAddress(url.as_str());
    }

    let content = line.trim();

    if content == STARTUP_COMPLETE_LINE {
        return LineKind::StartupComplete;
    }

    if SUPPRESSED_PREFIXES
        .iter()
        .any(|prefix| content.starts_with(prefix))
    {
        return LineKind::Suppressed;
    }

    LineKind::PassThrough
}
