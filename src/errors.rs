use std::str::FromStr;

use thiserror::Error;

/// Transport-level errors from the queue collaborator.
///
/// These cover the two network calls a processor issues. Neither variant is
/// ever fatal to a processor loop: a failed receive triggers the configured
/// backoff, a failed delete is logged and the message is left to the queue's
/// visibility-timeout redelivery.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The receive call failed (connectivity, auth, throttling).
    #[error("failed to receive messages: {0}")]
    Receive(String),

    /// The delete call for an already-processed message failed.
    #[error("failed to delete message: {0}")]
    Delete(String),
}

/// Errors from misuse of the supervisor lifecycle.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// `register` or `start` was called after the processors were started.
    ///
    /// Registrations are immutable for the lifetime of the process once
    /// `start` has been called; a new supervisor is required to change them.
    #[error("processors already started")]
    AlreadyStarted,
}

/// Errors surfaced while bootstrapping or serving the HTTP side of the
/// service (configuration, database, listener).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Supervisor(#[from] SupervisorError),
}

/// Opaque failure returned by a message handler.
///
/// Carries only a description; the processor does not inspect handler
/// failures beyond logging them, since redelivery is the queue's job.
#[derive(Debug, Error)]
pub struct HandlerError(String);

impl HandlerError {
    /// Creates a new `HandlerError` with the provided message.
    pub fn new(message: String) -> Self {
        HandlerError(message)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HandlerError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HandlerError::new(s.to_string()))
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        HandlerError::new(s)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::new(e.to_string())
    }
}

impl From<sqlx::Error> for HandlerError {
    fn from(e: sqlx::Error) -> Self {
        HandlerError::new(e.to_string())
    }
}
