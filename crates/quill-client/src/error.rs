use thiserror::Error;

/// Errors surfaced by the API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure or an undecodable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a `{success: false}` envelope.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}
