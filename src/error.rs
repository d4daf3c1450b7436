/// Run-level errors. Anything here ends the run; the terminal is restored
/// before the message is printed.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZineError {
    #[error("terminal unavailable: {0}")]
    Terminal(io::Error),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("unknown zine '{0}' (try --list)")]
    UnknownZine(String),
    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ZineError>;
