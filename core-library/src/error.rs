use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Failed to decode {column} for {id}: {source}")]
    Decode {
        column: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode column value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl LibraryError {
    /// Returns true when the error reports a missing entity rather than a
    /// store or data failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
