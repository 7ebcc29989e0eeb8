use thiserror::Error;
use crate::entities::ProfileId;

#[derive(Error, Debug)]
pub enum HobbytagError {
    #[error("Profile not found: {0}")]
    RecordNotFound(ProfileId),
    #[error("Failed to write profile: {0}")]
    WriteFailed(String),
    #[error("Failed to read/write store file: {0}")]
    StoreIOError(std::io::Error),
    #[error("Failed to serialize/deserialize store contents: {0}")]
    StoreSerializationError(serde_json::Error),
    #[error("Unknown privacy field: {0}")]
    InvalidField(String),
}
