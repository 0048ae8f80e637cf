use std::time::Duration;

use thiserror::Error;

/// Why one generation attempt produced nothing for the player.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("composer call failed: {0:#}")]
    Composer(anyhow::Error),
    #[error("composer did not answer within {0:?}")]
    ComposerTimeout(Duration),
    #[error("composer reply contained no playable events")]
    MalformedResponse,
    #[error("sending to player failed: {0:#}")]
    Transmit(anyhow::Error),
}

impl GenerationError {
    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            GenerationError::Composer(_) | GenerationError::ComposerTimeout(_) => "composer",
            GenerationError::MalformedResponse => "parse",
            GenerationError::Transmit(_) => "transmit",
        }
    }
}
