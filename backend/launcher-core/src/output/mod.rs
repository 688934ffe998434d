//! Interpretation of the helper's standard output.
//!
//! Lines flow through [`classifier::classify`] into a
//! [`readiness::ReadinessDetector`], which decides whether each line is shown
//! to the user through an [`sink::OutputSink`] and when the launch resolves.

pub mod classifier;
pub mod readiness;
pub mod sink;
