use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse a stored UUID string
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Failed to parse UUID from String '{value}': {source}")]
    ParseUuid {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: uuid::Error,
    },

    /// A registration row carries a status outside the known set.
    #[error("Unknown registration status '{0}'")]
    UnknownStatus(String),

    /// Failure to encode or decode an outbox event payload.
    #[error("Failed to (de)serialize event payload: {0}")]
    EventPayload(#[from] serde_json::Error),

    /// A blocking task (password hashing) panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    BlockingTask(String),
}
