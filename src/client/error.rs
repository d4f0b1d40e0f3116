//! Client error taxonomy.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

/// Error type produced by outcome handlers.
pub type HandlerError = Box<dyn StdError + Send + Sync>;

/// Result type returned by outcome handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// The round-trip did not produce a response.
#[derive(Debug, Error)]
#[error("transport failure: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// A socket-level timeout, as a transport would report it.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::new(io::Error::new(io::ErrorKind::TimedOut, message.into()))
    }

    /// Whether any error in the source chain is a connect/read timeout.
    pub fn is_timeout(&self) -> bool {
        let mut current: Option<&(dyn StdError + 'static)> = Some(&*self.source);
        while let Some(err) = current {
            if let Some(e) = err.downcast_ref::<reqwest::Error>() {
                if e.is_timeout() {
                    return true;
                }
            }
            if let Some(e) = err.downcast_ref::<io::Error>() {
                if e.kind() == io::ErrorKind::TimedOut {
                    return true;
                }
            }
            if err.downcast_ref::<tokio::time::error::Elapsed>().is_some() {
                return true;
            }
            current = err.source();
        }
        false
    }
}

/// The response body could not be turned into the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read response body: {0}")]
    Body(#[source] TransportError),

    #[error("failed to decode response entity: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recoverable failure passed to a request's `on_failure` handler.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// No response was obtained.
    Transport(&'a TransportError),
    /// A response was obtained but its entity could not be decoded.
    Decode(&'a DecodeError),
}

impl Failure<'_> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Failure::Transport(e) if e.is_timeout())
    }
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Transport(e) => e.fmt(f),
            Failure::Decode(e) => e.fmt(f),
        }
    }
}

/// Errors surfaced by [`RestClient`](crate::client::RestClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be turned into an invocation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transport failure (other than a timeout) left a raw-outcome call
    /// without a response. `on_failure` has already run.
    #[error("no response obtained: {0}")]
    NoResponse(#[source] TransportError),

    /// An outcome handler failed. The handler's error is carried as-is.
    #[error("{0}")]
    Handler(HandlerError),
}

impl ClientError {
    /// The handler's own error, if this is a handler failure.
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            ClientError::Handler(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connect failed")]
    struct Wrapper(#[source] io::Error);

    #[test]
    fn test_timeout_found_in_chain() {
        let direct = TransportError::timed_out("read timed out");
        assert!(direct.is_timeout());

        let nested = TransportError::new(Wrapper(io::Error::new(io::ErrorKind::TimedOut, "slow")));
        assert!(nested.is_timeout());
    }

    #[test]
    fn test_other_errors_are_not_timeouts() {
        let refused =
            TransportError::new(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(!refused.is_timeout());
        assert!(!TransportError::new("boom").is_timeout());
    }

    #[test]
    fn test_failure_display_and_timeout() {
        let err = TransportError::timed_out("late");
        let failure = Failure::Transport(&err);
        assert!(failure.is_timeout());
        assert!(failure.to_string().contains("late"));

        let decode = DecodeError::Json(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(!Failure::Decode(&decode).is_timeout());
    }

    #[test]
    fn test_handler_error_message_is_verbatim() {
        let err = ClientError::Handler("handler exploded".into());
        assert_eq!(err.to_string(), "handler exploded");
        assert_eq!(err.into_handler_error().unwrap().to_string(), "handler exploded");
    }
}
