use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] Box<ureq::Transport>),

    #[error("Failed to read response body: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16, message: Option<String> },
}

impl RequestError {
    /// Converts a ureq failure, pulling the backend's explanation out of the
    /// body of non-2xx responses.
    pub(crate) fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let message = response
                    .into_json::<Value>()
                    .ok()
                    .as_ref()
                    .and_then(error_message);
                RequestError::ServerError { status, message }
            }
            ureq::Error::Transport(transport) => RequestError::HttpError(Box::new(transport)),
        }
    }

    /// The message the backend supplied, if it supplied one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            RequestError::ServerError {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

// question endpoints answer `{message}`, quiz endpoints `{error}`
fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{action} failed: {source}")]
    Request {
        action: &'static str,
        #[source]
        source: RequestError,
    },

    #[error("{0} was not successful")]
    Rejected(&'static str),

    #[error("login response did not contain a token")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_message_then_error() {
        assert_eq!(
            error_message(&json!({"message": "db down", "error": "other"})),
            Some("db down".to_string())
        );
        assert_eq!(
            error_message(&json!({"error": "not yours"})),
            Some("not yours".to_string())
        );
        assert_eq!(error_message(&json!({"message": ""})), None);
        assert_eq!(error_message(&json!(["nope"])), None);
    }

    #[test]
    fn only_server_errors_carry_a_message() {
        let err = RequestError::ServerError {
            status: 500,
            message: Some("db down".into()),
        };
        assert_eq!(err.backend_message(), Some("db down"));

        let io = RequestError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "reset"));
        assert_eq!(io.backend_message(), None);
    }
}
