use anyhow::Context;
use log::{debug, info, warn};
use serde_json::Value;

use crate::{
    api::QuizBackend,
    error::{FetchError, PersistenceError},
    model::{PersistedQuiz, Token},
};

/// Read-only copy of the quizzes the backend lets the caller see.
#[derive(Debug, Default, Clone)]
pub struct QuizList {
    quizzes: Vec<PersistedQuiz>,
}

impl QuizList {
    pub fn quizzes(&self) -> &[PersistedQuiz] {
        &self.quizzes
    }

    pub fn get(&self, quiz_id: &str) -> Option<&PersistedQuiz> {
        self.quizzes.iter().find(|q| q.quiz_id == quiz_id)
    }

    /// Replaces the cached list with a fresh fetch. A failed fetch leaves the
    /// cache as it was.
    pub fn refresh<B>(&mut self, backend: &B, token: Option<&Token>) -> Result<usize, FetchError>
    where
        B: QuizBackend + ?Sized,
    {
        let body = backend.list_quizzes(token)?;
        let quizzes = parse_quizzes(&body).map_err(|e| {
            warn!("unexpected quiz list: {}", body);
            FetchError::Format(format!("{:#}", e))
        })?;

        debug!("fetched {} quizzes", quizzes.len());
        self.quizzes = quizzes;
        Ok(self.quizzes.len())
    }

    /// Deletes a quiz remotely, then drops it from the cache. Nothing local
    /// changes unless the backend confirmed.
    pub fn delete<B>(&mut self, backend: &B, token: Option<&Token>, quiz_id: &str) -> Result<(), PersistenceError>
    where
        B: QuizBackend + ?Sized,
    {
        backend
            .delete_quiz(token, quiz_id)
            .map_err(|source| PersistenceError::DeleteQuiz {
                quiz_id: quiz_id.to_string(),
                source,
            })?;

        self.quizzes.retain(|q| q.quiz_id != quiz_id);
        info!("deleted quiz {}", quiz_id);
        Ok(())
    }
}

fn parse_quizzes(body: &Value) -> anyhow::Result<Vec<PersistedQuiz>> {
    let quizzes = body
        .get("quizzes")
        .context("no quizzes in response")?
        .as_array()
        .context("quizzes is not an array")?;

    quizzes
        .iter()
        .enumerate()
        .map(|(index, quiz)| {
            serde_json::from_value(quiz.clone()).context(format!("quiz {} is malformed", index))
        })
        .collect()
}
