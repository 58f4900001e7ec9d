use thiserror::Error;

use crate::doc::ValueType;

/// Closed status taxonomy every failure maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NullArgument,
    NoType,
    Internal,
    WrongUsage,
    WrongType,
    AllocationFailure,
    IllegalArgument,
    BadCall,
    EndOfInput,
    Sink,
    Decode,
}

#[derive(Debug, Error)]
pub enum Error {
    /// A handle that does not resolve in the arena it was used against.
    #[error("unknown {what} handle {index}")]
    UnknownHandle { what: &'static str, index: usize },

    #[error("handle from arena {found} used with arena {expected}")]
    ForeignHandle { expected: u32, found: u32 },

    #[error("no value type given")]
    NoType,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("wrong usage: {0}")]
    WrongUsage(String),

    #[error("wrong type: expected {expected}, found {found}")]
    WrongType { expected: ValueType, found: ValueType },

    #[error("allocation of {requested} slots failed")]
    AllocationFailure { requested: usize },

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    #[error("bad call: {0}")]
    BadCall(String),

    #[error("unexpected end of input")]
    EndOfInput,

    #[error("sink write failed: {0}")]
    Sink(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownHandle { .. } | Error::ForeignHandle { .. } => ErrorKind::NullArgument,
            Error::NoType => ErrorKind::NoType,
            Error::Internal(_) => ErrorKind::Internal,
            Error::WrongUsage(_) => ErrorKind::WrongUsage,
            Error::WrongType { .. } => ErrorKind::WrongType,
            Error::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Error::IllegalArgument(_) => ErrorKind::IllegalArgument,
            Error::BadCall(_) => ErrorKind::BadCall,
            Error::EndOfInput => ErrorKind::EndOfInput,
            Error::Sink(_) => ErrorKind::Sink,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Error::IllegalArgument(message.into())
    }

    pub fn bad_call(message: impl Into<String>) -> Self {
        Error::BadCall(message.into())
    }

    pub fn wrong_usage(message: impl Into<String>) -> Self {
        Error::WrongUsage(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_eof() {
            Error::EndOfInput
        } else {
            Error::Decode(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
