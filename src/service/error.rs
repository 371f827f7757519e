/// Errors crossing the service boundary. Internal plumbing stays on
/// `anyhow`; callers of the operation layer get these instead.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request was malformed before any storage was touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No resolved identity; nothing in the pipeline ran.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage kept failing after bounded retries. Retriable by the caller;
    /// no partial write is ever visible.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}
