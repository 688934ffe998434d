//! Pure data for the debug proxy launcher.
//!
//! - **models** (this crate): immutable launch inputs and their validation
//! - **launcher-core**: spawning, output parsing and single-flight caching

pub mod error;
pub mod launch_request;

pub use error::model_error::ModelError;
pub use launch_request::LaunchRequest;
pub use launch_request::builder::LaunchRequestBuilder;
