mod error;
#[cfg(unix)]
mod fake_helper;
#[cfg(unix)]
mod launch;
