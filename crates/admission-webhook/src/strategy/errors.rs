use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrategyError>;

/// Raised when a decision could not be computed. This is different from a
/// denial: the request may be perfectly fine, the strategy just failed.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
