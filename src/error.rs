// Error taxonomy for the migration. Every variant is caught by the stage
// that produced it and turned into a printed diagnostic; only the
// top-level entry point ever sees them as `anyhow` errors.

use std::path::PathBuf;

/// Failures that can happen while loading the template or talking to the
/// remote collection.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The template file does not exist.
    #[error("file not found: {}", .0.display())]
    FileMissing(PathBuf),

    /// The template file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template is not well-formed JSON.
    #[error("JSON parse error in {}: {source}", path.display())]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The template parsed but a record does not have the expected shape.
    #[error("record #{index} {problem}")]
    InvalidRecord { index: usize, problem: String },

    /// The service answered with a status the operation does not accept.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection refused, timeout, DNS failure and the like.
    #[error("connection error: {0}")]
    Transport(String),

    /// A 200 response whose body is not the expected JSON.
    #[error("unexpected response body: {0}")]
    InvalidResponse(String),
}

impl MigrateError {
    /// HTTP status of the failed request, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            MigrateError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn missing_field(index: usize, field: &str) -> Self {
        MigrateError::InvalidRecord {
            index,
            problem: format!("is missing required field `{}`", field),
        }
    }
}

impl From<reqwest::Error> for MigrateError {
    fn from(err: reqwest::Error) -> Self {
        MigrateError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_for_http_failures() {
        let http = MigrateError::HttpStatus {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(http.status(), Some(500));
        assert_eq!(MigrateError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn missing_field_names_index_and_field() {
        let err = MigrateError::missing_field(3, "stage");
        assert_eq!(err.to_string(), "record #3 is missing required field `stage`");
    }

    #[test]
    fn file_missing_mentions_path() {
        let err = MigrateError::FileMissing(PathBuf::from("MOCKAPI_TEMPLATE.json"));
        assert!(err.to_string().contains("MOCKAPI_TEMPLATE.json"));
    }
}
