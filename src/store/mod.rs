use serde::Serialize;

pub mod api;

pub type Result<T> = std::result::Result<T, StoreErrorResponse>;

/// Error body of the read endpoints. Checkout has its own result type.
#[derive(Debug, Serialize)]
pub struct StoreErrorResponse {
    #[serde(skip)]
    status: reqwest::StatusCode,
    success: bool,
    message: String,
}

impl std::error::Error for StoreErrorResponse {}

impl std::fmt::Display for StoreErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl StoreErrorResponse {
    pub fn new(status: reqwest::StatusCode, text: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: text.into(),
        }
    }

    pub fn not_found(text: impl Into<String>) -> Self {
        Self::new(reqwest::StatusCode::NOT_FOUND, text)
    }

    pub fn bad_gateway(text: impl Into<String>) -> Self {
        Self::new(reqwest::StatusCode::BAD_GATEWAY, text)
    }
}

impl axum::response::IntoResponse for StoreErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(status = %self.status, message = %self.message, "Store API error response");
        (self.status, axum::Json(self)).into_response()
    }
}
