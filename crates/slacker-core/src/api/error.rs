use thiserror::Error;

/// Failure of a single remote action. Never fatal for the batch.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Remote(String),

    #[error("invalid response (status {status}): {body}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Maximum length for response bodies echoed in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ActionError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn decode(status: reqwest::StatusCode, body: &str, source: serde_json::Error) -> Self {
        ActionError::Decode {
            status: status.as_u16(),
            body: Self::truncate_body(body),
            source,
        }
    }
}
