use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid party identifier: {0}")]
    InvalidPartyId(#[from] uuid::Error),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),
}
