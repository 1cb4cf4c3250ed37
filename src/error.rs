use serde_json::Value;

/// Failure of a single call to the recruiting service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service could not be reached or the connection dropped.
    #[error("could not reach the recruiting service: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the server-provided message, if any.
    #[error("{}", server_message(.status, .detail))]
    Server { status: u16, detail: Option<String> },

    /// A 2xx response whose body does not have the expected shape.
    #[error("{0}")]
    Contract(String),

    /// The configured service URL cannot have paths joined onto it.
    #[error("invalid service URL {0}")]
    InvalidUrl(String),
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request failed with status {}", status),
    }
}

impl ApiError {
    /// Builds a server error from a non-2xx response body, picking up the
    /// `detail` (or `error`) string when the body is JSON.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            ["detail", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        });
        ApiError::Server { status, detail }
    }

    /// The message to show a user: the server detail verbatim when there is
    /// one, `fallback` otherwise.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { detail: Some(detail), .. } => detail.clone(),
            ApiError::Contract(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
