pub mod config;
pub mod launch;
pub mod logger;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Launch(#[from] launch::LaunchError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Logger(#[from] logger::LoggerError),
}
