use thiserror::Error;

use super::{location::LocationProvider, store::QuizDraft};
use crate::model::QuestionEntry;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    MissingQuestion,

    #[error("Please enter an answer.")]
    MissingAnswer,

    #[error("Please select a location on the map.")]
    MissingLocation,
}

/// The question currently being typed, and where it is asked.
#[derive(Debug, Default, Clone)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    pub location: LocationProvider,
}

impl QuestionDraft {
    pub fn validate(&self) -> Result<QuestionEntry, ValidationError> {
        if self.question.is_empty() {
            return Err(ValidationError::MissingQuestion);
        }
        if self.answer.is_empty() {
            return Err(ValidationError::MissingAnswer);
        }
        let location = self
            .location
            .candidate()
            .ok_or(ValidationError::MissingLocation)?;

        Ok(QuestionEntry::new(
            self.question.clone(),
            self.answer.clone(),
            location.clone(),
        ))
    }

    /// Appends the draft to `quiz` and clears the text fields. The location is
    /// kept so it can seed the next question. On error nothing is touched.
    pub fn commit<'q>(&mut self, quiz: &'q mut QuizDraft) -> Result<&'q QuestionEntry, ValidationError> {
        let entry = self.validate()?;
        self.question.clear();
        self.answer.clear();
        Ok(quiz.push(entry))
    }

    pub fn clear(&mut self) {
        self.question.clear();
        self.answer.clear();
        self.location.clear();
    }
}
