use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;
use will_config::ConfigError;
use will_core::CoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("{0}")]
    InvalidArguments(String),
}
