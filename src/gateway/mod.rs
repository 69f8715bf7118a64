use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    config::GatewayConfig,
    gateway::{
        auth::authenticated_headers,
        error::{ErrorResponse, GatewayError, SERVER_ERROR_MESSAGE},
        interaction_log::InteractionSpan,
    },
};

pub mod api;
mod auth;
/// Inbound payment callback payload and its processing
pub mod callback;
pub mod channel;
/// Transaction detail lookup
mod detail;
pub mod error;
/// Type conversions between gateway records and store responses
mod from;
pub mod interaction_log;
/// Buyer data masking for logs
pub mod mask;
pub mod signature;
pub mod transaction;

pub type Result<T> = std::result::Result<T, GatewayError>;

const CREATE_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct TripayOkResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Envelope every Tripay endpoint answers with
#[derive(Debug, serde::Deserialize)]
struct TripayEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl TripayEnvelope {
    fn into_std_result<T: DeserializeOwned>(
        self,
        status: u16,
    ) -> Result<TripayOkResponse<T>> {
        match self {
            TripayEnvelope {
                success: true,
                message,
                data: Some(data),
            } => Ok(TripayOkResponse {
                success: true,
                message: message.unwrap_or_default(),
                data: serde_json::from_value(data)?,
            }),
            TripayEnvelope {
                success, message, ..
            } => Err(GatewayError::rejected(
                status,
                ErrorResponse { success, message },
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TripayGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    signer: signature::Signer,
}

impl TripayGateway {
    pub const SERVICE: &'static str = "tripay";

    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            signer: signature::Signer::new(&config.merchant_code, &config.private_key),
        }
    }

    pub fn signer(&self) -> &signature::Signer {
        &self.signer
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends a prepared request and unwraps the Tripay envelope.
    ///
    /// Only a missing response maps to [`GatewayError::Unreachable`]. Any answer,
    /// even an unreadable one with an error status, is a rejection.
    async fn exchange<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        span: &mut InteractionSpan,
    ) -> Result<TripayOkResponse<T>> {
        let res = request
            .headers(authenticated_headers(&self.api_key))
            .send()
            .await
            .map_err(GatewayError::Unreachable)?;
        let status = res.status();
        span.set_response_status(status.as_u16());
        let body = res.bytes().await.map_err(GatewayError::Unreachable)?;

        let server_error = || GatewayError::Rejected {
            status: status.as_u16(),
            message: SERVER_ERROR_MESSAGE.to_owned(),
        };
        let response = match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(response) => response,
            Err(_) if !status.is_success() => return Err(server_error()),
            Err(e) => return Err(e.into()),
        };
        let secured_response = mask::secure_value(&response);
        tracing::debug!(data = %secured_response, %status, "Gateway API response");
        span.set_response(&secured_response);
        let envelope = match serde_json::from_value::<TripayEnvelope>(response) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(server_error()),
            Err(e) => return Err(e.into()),
        };
        envelope.into_std_result(status.as_u16())
    }

    pub async fn create_transaction(
        &self,
        request: &transaction::TransactionRequest<'_>,
    ) -> Result<TripayOkResponse<transaction::TransactionRecord>> {
        let mut span = InteractionSpan::enter(Self::SERVICE);
        let url = self.url("transaction/create");
        let secured_request = mask::secure_serializable(request);
        tracing::debug!(%url, data = %secured_request, "Gateway API create transaction request");
        span.set_request(url.clone(), &secured_request);

        let res = self
            .exchange(
                self.client.post(url).json(request).timeout(CREATE_TIMEOUT),
                &mut span,
            )
            .await;
        span.finish("create_transaction");
        res
    }

    pub async fn list_channels(&self) -> Result<Vec<channel::PaymentChannel>> {
        let mut span = InteractionSpan::enter(Self::SERVICE);
        let url = self.url("merchant/payment-channel");
        tracing::debug!(%url, "Gateway API payment channel request");
        span.set_request(url.clone(), &serde_json::Value::Null);
        let res = self
            .exchange(self.client.get(url).timeout(READ_TIMEOUT), &mut span)
            .await
            .map(|ok| ok.data);
        span.finish("payment_channels");
        res
    }
}
