use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChatError {
    /// The relay (or anything between us and it) answered with a non-success
    /// status before any stream byte was read.
    #[error("chat request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response stream carried invalid UTF-8")]
    InvalidUtf8,

    #[error("another exchange is already in flight")]
    ExchangeInFlight,

    #[error("exchange was cancelled")]
    Cancelled,
}

pub type ChatResult<T> = Result<T, ChatError>;
