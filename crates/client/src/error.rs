use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures of the search client's outbound requests.
///
/// Local search failures never reach the user; geocoder failures are turned
/// into a message by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("geocoder returned invalid coordinates")]
    InvalidCoordinates,

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
