//! Error types for the gallery media proxy

use std::fmt;

#[derive(Debug)]
pub enum MediaProxyError {
    Store(kv_store::StoreError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for MediaProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaProxyError::Store(err) => write!(f, "Store error: {}", err),
            MediaProxyError::Io(err) => write!(f, "IO error: {}", err),
            MediaProxyError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MediaProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaProxyError::Store(err) => Some(err),
            MediaProxyError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<kv_store::StoreError> for MediaProxyError {
    fn from(err: kv_store::StoreError) -> Self {
        MediaProxyError::Store(err)
    }
}

impl From<std::io::Error> for MediaProxyError {
    fn from(err: std::io::Error) -> Self {
        MediaProxyError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for MediaProxyError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        MediaProxyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MediaProxyError>;
