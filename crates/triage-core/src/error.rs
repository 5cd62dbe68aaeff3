use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("snapshot is not a sequence of issues ({0})")]
    NotASequence(String),

    #[error("unknown snapshot format '{0}': expected .json, .yaml, or .yml")]
    UnknownFormat(String),

    #[error("invalid issue state: {0}")]
    InvalidState(String),

    #[error("invalid effort: {0}")]
    InvalidEffort(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TriageError>;
