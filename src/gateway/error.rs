use std::fmt::Display;

/// Generic message used when the gateway answers an error status without a readable payload.
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred";
/// Used when the gateway answers a success status but reports the request as failed.
pub const UNSUCCESSFUL_MESSAGE: &str = "Payment creation failed";

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum GatewayError {
    /// No response was received (connect failure, timeout, broken body)
    Unreachable(reqwest::Error),
    /// Gateway answered, but with an error payload
    Rejected { status: u16, message: String },
    GatewayDeserialization(serde_json::Error),
}

impl GatewayError {
    pub fn rejected(status: u16, response: ErrorResponse) -> Self {
        let fallback = if (200..300).contains(&status) {
            UNSUCCESSFUL_MESSAGE
        } else {
            SERVER_ERROR_MESSAGE
        };
        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_owned());
        Self::Rejected { status, message }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::GatewayDeserialization(value)
    }
}

impl std::error::Error for GatewayError {}

impl Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Unreachable(e) => write!(f, "http request error: {e}"),
            GatewayError::Rejected { status, message } => {
                write!(f, "gateway response ({status}): {message}")
            }
            GatewayError::GatewayDeserialization(e) => {
                write!(f, "gateway response deserialization: {e}")
            }
        }
    }
}
