//! Environment handed to the helper process.
//!
//! The helper is itself an ASP.NET Core host. Inheriting the parent's
//! `ASPNETCORE_*` settings makes it try to bind the parent's URLs and to answer
//! the parent's IIS token check, so those are stripped before spawning.

use crate::RESERVED_ENV_PREFIX;

use std::collections::HashMap;
use std::env::vars_os;
use std::ffi::OsString;

use log::trace;

/// Remove every variable whose name starts with `ASPNETCORE_` (ordinal comparison).
pub fn remove_reserved_variables(environment: &mut HashMap<OsString, OsString>) {
    environment.retain(|name, _| {
        let reserved = name
            .as_encoded_bytes()
            .starts_with(RESERVED_ENV_PREFIX.as_bytes());
        if reserved {
            trace!("Not passing {} to debug proxy", name.to_string_lossy());
        }
        !reserved
    });
}

/// The current process environment with reserved variables removed.
pub fn sanitized_environment() -> HashMap<OsString, OsString> {
    let mut environment: HashMap<OsString, OsString> = vars_os().collect();
    remove_reserved_variables(&mut environment);
    environment
}
