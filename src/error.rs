use std::fmt;

#[derive(Debug)]
pub enum JobOrderError {
    FontEmbedding(String),
    InvalidConfiguration(String),
    NotFound(String),
    Store(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for JobOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOrderError::FontEmbedding(name) => {
                write!(f, "cannot embed font: {}", name)
            }
            JobOrderError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            JobOrderError::NotFound(id) => write!(f, "order not found: {}", id),
            JobOrderError::Store(message) => write!(f, "store error: {}", message),
            JobOrderError::Json(err) => write!(f, "json error: {}", err),
            JobOrderError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for JobOrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobOrderError::Json(err) => Some(err),
            JobOrderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JobOrderError {
    fn from(value: std::io::Error) -> Self {
        JobOrderError::Io(value)
    }
}

impl From<serde_json::Error> for JobOrderError {
    fn from(value: serde_json::Error) -> Self {
        JobOrderError::Json(value)
    }
}
