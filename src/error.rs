use std::io;
use thiserror::Error;

/// Custom error type for the processing time visualizer
#[derive(Error, Debug)]
pub enum VizError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Specified topic '{0}' not found")]
    TopicNotFound(String),

    #[error("No {0} topic found")]
    NoTopics(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Interrupted")]
    Interrupted,
}

/// Result type alias for the visualizer
pub type Result<T> = std::result::Result<T, VizError>;

impl VizError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VizError::Config(msg.into())
    }

    pub fn topic_not_found<S: Into<String>>(topic: S) -> Self {
        VizError::TopicNotFound(topic.into())
    }

    pub fn no_topics<S: Into<String>>(kind: S) -> Self {
        VizError::NoTopics(kind.into())
    }

    /// Create an invalid snapshot error
    pub fn invalid_snapshot<S: Into<String>>(msg: S) -> Self {
        VizError::InvalidSnapshot(msg.into())
    }

    pub fn clipboard<S: Into<String>>(msg: S) -> Self {
        VizError::Clipboard(msg.into())
    }

    /// True for errors raised while discovering or subscribing to topics.
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, VizError::TopicNotFound(_) | VizError::NoTopics(_))
    }

    /// True when an external interrupt cut setup short.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, VizError::Interrupted)
    }
}
