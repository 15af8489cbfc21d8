//! Error types for image fetching

use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    Http(Box<reqwest::Error>),
    Status { status: u16, url: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "HTTP error: {}", err),
            FetchError::Status { status, url } => {
                write!(f, "Server returned status {} for {}", status, url)
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            status: 404,
            url: "https://example.com/img.png".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Server returned status 404 for https://example.com/img.png"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let err = FetchError::Status {
            status: 500,
            url: "https://x".to_string(),
        };
        assert!(format!("{:?}", err).contains("Status"));
    }
}
