use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("horizon must be between 1 and 365 days, got {0}")]
    InvalidHorizon(u32),
}

pub type Result<T> = std::result::Result<T, CoverageError>;
