use log::debug;
use serde_json::{json, Value};
use std::time::Duration;

use super::{AuthError, QuizBackend, RequestError};
use crate::model::{QuestionRecord, Token};

pub const DEFAULT_API_URL: &str = "https://fk7zu3f4gj.execute-api.eu-north-1.amazonaws.com";

/// The Quiztopia REST API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth/login`, returning the bearer token on `{success: true}`.
    pub fn login(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        let body = self
            .post_credentials("/auth/login", username, password)
            .map_err(|source| AuthError::Request {
                action: "login",
                source,
            })?;

        if !succeeded(&body) {
            return Err(AuthError::Rejected("login"));
        }

        body.get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(Token::new)
            .ok_or(AuthError::MissingToken)
    }

    /// `POST /auth/signup`.
    pub fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let body = self
            .post_credentials("/auth/signup", username, password)
            .map_err(|source| AuthError::Request {
                action: "signup",
                source,
            })?;

        if succeeded(&body) {
            Ok(())
        } else {
            Err(AuthError::Rejected("signup"))
        }
    }

    fn post_credentials(&self, path: &str, username: &str, password: &str) -> Result<Value, RequestError> {
        debug!("POST {} for user '{}'", path, username);
        let response = self
            .agent
            .post(&self.url(path))
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_json(json!({ "username": username, "password": password }))
            .map_err(RequestError::from_ureq)?;

        Ok(response.into_json()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: ureq::Request, token: Option<&Token>) -> ureq::Request {
        let request = request.set("Content-Type", "application/json");
        match token {
            Some(token) => request.set("Authorization", &token.bearer()),
            None => request,
        }
    }
}

impl QuizBackend for HttpBackend {
    fn add_question(&self, token: Option<&Token>, record: &QuestionRecord<'_>) -> Result<Value, RequestError> {
        debug!("POST /quiz/question for quiz '{}'", record.name);
        let response = self
            .authorized(self.agent.post(&self.url("/quiz/question")), token)
            .send_json(record)
            .map_err(RequestError::from_ureq)?;
        debug!("/quiz/question answered {}", response.status());

        // nothing downstream reads the success body, so tolerate an empty one
        let text = response.into_string()?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    fn list_quizzes(&self, token: Option<&Token>) -> Result<Value, RequestError> {
        debug!("GET /quiz");
        let response = self
            .authorized(self.agent.get(&self.url("/quiz")), token)
            .call()
            .map_err(RequestError::from_ureq)?;

        Ok(response.into_json()?)
    }

    fn delete_quiz(&self, token: Option<&Token>, quiz_id: &str) -> Result<(), RequestError> {
        debug!("DELETE /quiz/{}", quiz_id);
        self.authorized(self.agent.delete(&self.url(&format!("/quiz/{}", quiz_id))), token)
            .call()
            .map_err(RequestError::from_ureq)?;
        Ok(())
    }
}

fn succeeded(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}
