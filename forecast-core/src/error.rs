use reqwest::StatusCode;
use thiserror::Error;

/// Failure to reach or understand a data broker.
///
/// A logical negative result (duplicate id, unknown id) is never an error;
/// brokers report those as `Ok(false)`.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The request never produced a response.
    #[error("Request to forecast API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Forecast API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode forecast API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BrokerError {
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
