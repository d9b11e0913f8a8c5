//! Error types for the archive client.

/// Errors that can occur when fetching archive resources.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    /// An HTTP request failed (network error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The server returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The server kept answering with a retryable status until the retry budget ran out.
    #[error("Request failed with status {status} after {attempts} attempts")]
    RetriesExhausted { status: u16, attempts: u32 },
}
