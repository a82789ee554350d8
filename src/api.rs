mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use serde_json::Value;

use crate::model::{QuestionRecord, Token};

pub use error::{AuthError, RequestError};
pub use http::{HttpBackend, DEFAULT_API_URL};

/// The persistence operations the authoring and listing code needs.
///
/// Every call takes the bearer credential explicitly; `None` sends the request
/// without an `Authorization` header and lets the backend refuse it.
pub trait QuizBackend {
    /// `POST /quiz/question`
    fn add_question(&self, token: Option<&Token>, record: &QuestionRecord<'_>) -> Result<Value, RequestError>;

    /// `GET /quiz`, returning the raw body so callers can check its shape.
    fn list_quizzes(&self, token: Option<&Token>) -> Result<Value, RequestError>;

    /// `DELETE /quiz/{quiz_id}`
    fn delete_quiz(&self, token: Option<&Token>, quiz_id: &str) -> Result<(), RequestError>;
}

impl<B: QuizBackend + ?Sized> QuizBackend for &B {
    fn add_question(&self, token: Option<&Token>, record: &QuestionRecord<'_>) -> Result<Value, RequestError> {
        (**self).add_question(token, record)
    }

    fn list_quizzes(&self, token: Option<&Token>) -> Result<Value, RequestError> {
        (**self).list_quizzes(token)
    }

    fn delete_quiz(&self, token: Option<&Token>, quiz_id: &str) -> Result<(), RequestError> {
        (**self).delete_quiz(token, quiz_id)
    }
}
