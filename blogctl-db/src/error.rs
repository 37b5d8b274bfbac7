//! Error types for blogctl-db

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("post", 7);
        assert_eq!(err.to_string(), "not found: post '7'");
    }

    #[test]
    fn fixture_display() {
        let err = Error::Fixture("no author 'albert'".to_string());
        assert_eq!(err.to_string(), "fixture error: no author 'albert'");
    }
}
