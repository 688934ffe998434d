//! Shared building blocks for the debug proxy launcher workspace.
//!
//! Every error type in the workspace carries an [`ErrorLocation`] so that a
//! failure reported to the caller points back at the line that produced it.

pub mod error;

pub use error::error_location::ErrorLocation;
