use serde_json::{json, Value};
use std::{cell::RefCell, collections::HashMap};

use super::{QuizBackend, RequestError};
use crate::model::{QuestionRecord, Token};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    AddQuestion { name: String, question: String },
    List,
    Delete(String),
}

/// In-memory backend that records calls in order and fails on demand.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub calls: RefCell<Vec<Call>>,
    pub tokens: RefCell<Vec<Option<String>>>,
    add_failures: RefCell<HashMap<usize, RequestError>>,
    list_body: RefCell<Option<Result<Value, RequestError>>>,
    delete_failures: RefCell<HashMap<String, RequestError>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `index`-th (zero based) question post.
    pub fn fail_add(self, index: usize, err: RequestError) -> Self {
        self.add_failures.borrow_mut().insert(index, err);
        self
    }

    pub fn with_list(self, body: Result<Value, RequestError>) -> Self {
        *self.list_body.borrow_mut() = Some(body);
        self
    }

    pub fn fail_delete(self, quiz_id: &str, err: RequestError) -> Self {
        self.delete_failures
            .borrow_mut()
            .insert(quiz_id.to_string(), err);
        self
    }

    pub fn added(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::AddQuestion { question, .. } => Some(question.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, token: Option<&Token>, call: Call) {
        self.tokens
            .borrow_mut()
            .push(token.map(|t| t.as_str().to_string()));
        self.calls.borrow_mut().push(call);
    }
}

pub(crate) fn server_error(status: u16, message: Option<&str>) -> RequestError {
    RequestError::ServerError {
        status,
        message: message.map(str::to_string),
    }
}

impl QuizBackend for FakeBackend {
    fn add_question(&self, token: Option<&Token>, record: &QuestionRecord<'_>) -> Result<Value, RequestError> {
        self.record(
            token,
            Call::AddQuestion {
                name: record.name.to_string(),
                question: record.question.to_string(),
            },
        );
        let index = self.added().len() - 1;
        match self.add_failures.borrow_mut().remove(&index) {
            Some(err) => Err(err),
            None => Ok(json!({ "success": true })),
        }
    }

    fn list_quizzes(&self, token: Option<&Token>) -> Result<Value, RequestError> {
        self.record(token, Call::List);
        self.list_body
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(json!({ "quizzes": [] })))
    }

    fn delete_quiz(&self, token: Option<&Token>, quiz_id: &str) -> Result<(), RequestError> {
        self.record(token, Call::Delete(quiz_id.to_string()));
        match self.delete_failures.borrow_mut().remove(quiz_id) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
