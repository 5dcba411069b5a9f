use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, ModelError>;
