//! Startup failures that abort the process

use std::fmt;
use std::io;

use crate::assets::AssetError;

#[derive(Debug)]
pub enum Error {
    /// Raw mode, alternate screen or terminal size query failed
    Terminal(io::Error),
    /// No audio output device could be opened
    Audio(String),
    /// A built-in sprite failed to load
    Asset(AssetError),
}

impl Error {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Terminal(_) => 1,
            Error::Audio(_) => 2,
            Error::Asset(_) => 3,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Terminal(e) => write!(f, "terminal error: {}", e),
            Error::Audio(msg) => write!(f, "audio error: {}", msg),
            Error::Asset(e) => write!(f, "asset error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Terminal(e) => Some(e),
            Error::Audio(_) => None,
            Error::Asset(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Terminal(e)
    }
}

impl From<AssetError> for Error {
    fn from(e: AssetError) -> Self {
        Error::Asset(e)
    }
}
