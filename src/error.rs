use thiserror::Error;

use crate::api::RequestError;

/// A write to the backend that did not go through.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to add question: {0}")]
    AddQuestion(#[source] RequestError),

    #[error("failed to delete quiz '{quiz_id}': {source}")]
    DeleteQuiz {
        quiz_id: String,
        #[source]
        source: RequestError,
    },
}

impl PersistenceError {
    /// What to show the user: the backend's own message when it sent one.
    pub fn advisory(&self) -> String {
        let (source, fallback) = match self {
            PersistenceError::AddQuestion(source) => (source, "Failed to add question"),
            PersistenceError::DeleteQuiz { source, .. } => (source, "Failed to delete quiz"),
        };
        source.backend_message().unwrap_or(fallback).to_string()
    }
}

/// The quiz list could not be loaded.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch quizzes: {0}")]
    Request(#[from] RequestError),

    #[error("unexpected quiz list format: {0}")]
    Format(String),
}

impl FetchError {
    pub fn advisory(&self) -> String {
        match self {
            FetchError::Request(source) => source
                .backend_message()
                .unwrap_or("Failed to fetch quizzes")
                .to_string(),
            FetchError::Format(_) => "Unexpected data format from the quiz service.".to_string(),
        }
    }
}
