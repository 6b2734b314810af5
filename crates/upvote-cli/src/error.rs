use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(upvote_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Feature ID must be a number, got '{0}'")]
    InvalidFeatureId(String),
    #[error("Nothing to change: pass --title and/or --description")]
    NothingToEdit,
    #[error("Interrupted")]
    Interrupted,
}

impl From<upvote_core::Error> for CliError {
    fn from(error: upvote_core::Error) -> Self {
        match error {
            upvote_core::Error::Cancelled => Self::Interrupted,
            error => Self::Core(error),
        }
    }
}

impl From<upvote_core::sync::Cancelled> for CliError {
    fn from(_: upvote_core::sync::Cancelled) -> Self {
        Self::Interrupted
    }
}
