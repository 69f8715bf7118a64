use axum::{Json, extract::State, routing::post};
use reqwest::StatusCode;
use tracing::instrument;

use crate::{
    gateway::{
        callback::{CallbackOutcome, CallbackPayload, process_callback},
        mask,
    },
    state::AppState,
};

#[derive(Debug, serde::Serialize)]
pub struct CallbackReply {
    success: bool,
    message: &'static str,
}

fn reply(
    status: StatusCode,
    success: bool,
    message: &'static str,
) -> (StatusCode, Json<CallbackReply>) {
    (status, Json(CallbackReply { success, message }))
}

#[instrument(skip_all)]
async fn callback_handler(
    State(state): State<AppState>,
    Json(callback): Json<serde_json::Value>,
) -> (StatusCode, Json<CallbackReply>) {
    tracing::trace!(
        data = %mask::secure_value(&callback),
        "Received callback from payment gateway"
    );
    let Ok(callback) = serde_json::from_value::<CallbackPayload>(callback) else {
        tracing::warn!("Failed to deserialize callback body");
        return reply(StatusCode::BAD_REQUEST, false, "Malformed callback");
    };

    match process_callback(&callback, state.gateway.signer(), state.notifier.as_ref()).await {
        CallbackOutcome::Rejected => reply(StatusCode::FORBIDDEN, false, "Invalid signature"),
        CallbackOutcome::Fulfilled => {
            reply(StatusCode::OK, true, "Payment processed successfully")
        }
        CallbackOutcome::Acknowledged(_) => reply(StatusCode::OK, false, "Payment not completed"),
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/callback", post(callback_handler))
}
