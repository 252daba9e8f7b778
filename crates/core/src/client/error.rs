use thiserror::Error;

/// Why a submission produced no recommendations.
///
/// The string payloads carry diagnostic detail for logs; they are never shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("recommendation service unreachable: {0}")]
    NetworkUnavailable(String),

    #[error("recommendation service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed recommendation response: {0}")]
    MalformedResponse(String),
}
