//! Error types for the key-value store

use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Io(Box<std::io::Error>),
    QuotaExceeded { needed: u64, available: u64 },
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "IO error: {}", err),
            StoreError::QuotaExceeded { needed, available } => write!(
                f,
                "Store quota exceeded: needed {} bytes, {} available",
                needed, available
            ),
            StoreError::InvalidKey(key) => write!(f, "Invalid store key: {}", key),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_display() {
        let err = StoreError::QuotaExceeded {
            needed: 100,
            available: 40,
        };
        assert_eq!(
            format!("{}", err),
            "Store quota exceeded: needed 100 bytes, 40 available"
        );
    }

    #[test]
    fn test_invalid_key_display() {
        let err = StoreError::InvalidKey("a/b".to_string());
        assert_eq!(format!("{}", err), "Invalid store key: a/b");
    }

    #[test]
    fn test_error_is_debug() {
        let err = StoreError::InvalidKey("x".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InvalidKey"));
    }
}
