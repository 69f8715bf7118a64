use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::instrument;

use crate::{
    catalog::{self, CatalogItem, Category},
    checkout::{self, BuyerForm, CheckoutResult, CheckoutSettings, Quote},
    gateway::{TripayGateway, channel::PaymentChannel, transaction::TransactionRecord},
    state::AppState,
    status::StatusSnapshot,
    store::{Result, StoreErrorResponse},
};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub channel: Option<String>,
}

pub async fn list_catalog(
    Query(query): Query<CatalogQuery>,
) -> axum::Json<Vec<&'static CatalogItem>> {
    let items: Vec<_> = match query.category {
        Some(category) => catalog::by_category(category).collect(),
        None => catalog::all().iter().collect(),
    };
    axum::Json(items)
}

fn find_item(id: &str) -> Result<&'static CatalogItem> {
    catalog::find(id).ok_or_else(|| StoreErrorResponse::not_found("Unknown store item"))
}

pub async fn get_item(Path(id): Path<String>) -> Result<axum::Json<&'static CatalogItem>> {
    find_item(&id).map(axum::Json)
}

#[instrument(skip_all)]
pub async fn quote_item(
    State(gate): State<TripayGateway>,
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> Result<axum::Json<Quote>> {
    let item = find_item(&id)?;
    let channels = match query.channel {
        Some(_) => gate.payment_channels().await,
        None => Vec::new(),
    };
    Ok(axum::Json(checkout::quote(
        item,
        &channels,
        query.channel.as_deref(),
    )))
}

#[instrument(skip_all)]
pub async fn channels(State(gate): State<TripayGateway>) -> axum::Json<Vec<PaymentChannel>> {
    axum::Json(gate.payment_channels().await)
}

#[instrument(skip_all)]
pub async fn checkout(
    State(gate): State<TripayGateway>,
    State(settings): State<std::sync::Arc<CheckoutSettings>>,
    Json(form): Json<BuyerForm>,
) -> axum::Json<CheckoutResult> {
    tracing::debug!(item = %form.item_id, channel = ?form.channel, "Store API checkout request");
    axum::Json(checkout::submit(&gate, &settings, &form).await)
}

#[instrument(skip_all)]
pub async fn transaction(
    State(gate): State<TripayGateway>,
    Path(reference): Path<String>,
) -> Result<axum::Json<TransactionRecord>> {
    match gate.transaction_detail(&reference).await {
        Ok(record) => {
            tracing::info!(%reference, status = ?record.status, "Dispatched transaction status");
            Ok(axum::Json(record))
        }
        Err(e) => {
            tracing::error!(%reference, "Failed to fetch transaction status: {e}");
            Err(StoreErrorResponse::bad_gateway(
                CheckoutResult::from(e).message,
            ))
        }
    }
}

pub async fn status(
    State(status): State<watch::Receiver<StatusSnapshot>>,
) -> axum::Json<StatusSnapshot> {
    axum::Json(status.borrow().clone())
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/catalog", get(list_catalog))
        .route("/catalog/{id}", get(get_item))
        .route("/catalog/{id}/quote", get(quote_item))
        .route("/channels", get(channels))
        .route("/checkout", post(checkout))
        .route("/transactions/{reference}", get(transaction))
        .route("/status", get(status))
}

/// `Json` extractor wrapper that answers malformed bodies with a failed [`CheckoutResult`]
pub struct Json<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = axum::Json<CheckoutResult>;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let rejection = match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => return Ok(Self(value)),
            Err(e) => e.body_text(),
        };
        tracing::warn!("Rejected store API request body: {rejection}");
        Err(axum::Json(CheckoutResult::failure(rejection)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::{
        config::GatewayConfig,
        gateway::signature::Signer,
        notify::WebhookNotifier,
        status,
    };

    fn app(gateway_url: String) -> axum::Router {
        let gateway = TripayGateway::new(&GatewayConfig {
            base_url: gateway_url,
            api_key: "DEV-key".into(),
            private_key: "private".into(),
            merchant_code: "T0001".into(),
        });
        let settings = CheckoutSettings {
            reference_prefix: "ARD".into(),
            callback_url: "https://store.test/gateway/callback".into(),
            return_url: "https://store.test/payment-success".into(),
            product_url: None,
            image_url: None,
        };
        let (_tx, status) = watch::channel(status::resolve(
            Err(status::StatusError::Malformed),
            time::OffsetDateTime::now_utc(),
        ));
        let state = AppState::new(
            gateway,
            settings,
            Arc::new(WebhookNotifier::new(None, "Store")),
            status,
        );
        axum::Router::new()
            .merge(router())
            .nest("/gateway", crate::gateway::api::router())
            .with_state(state)
    }

    async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn catalog_filters_by_category() {
        let (status, body) =
            call(app("http://127.0.0.1:9".into()), get("/catalog?category=rank")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|i| i["id"].clone()).collect();
        assert_eq!(ids, vec![json!("novice"), json!("elite"), json!("legend")]);
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let (status, body) =
            call(app("http://127.0.0.1:9".into()), get("/catalog/herobrine")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn quote_uses_fallback_fees_when_gateway_is_down() {
        let (status, body) = call(
            app("http://127.0.0.1:9".into()),
            get("/catalog/novice/quote?channel=OVO"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 17_500);
        assert_eq!(body["fee"], 2_500);
    }

    #[tokio::test]
    async fn malformed_checkout_body_is_a_failed_result() {
        let request = Request::builder()
            .method("POST")
            .uri("/checkout")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = call(app("http://127.0.0.1:9".into()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn checkout_validation_message() {
        let (status, body) = call(
            app("http://127.0.0.1:9".into()),
            post_json(
                "/checkout",
                json!({ "item_id": "elite", "email": "x@y.z", "channel": "QRIS" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": false, "message": "Player name is required" }));
    }

    #[tokio::test]
    async fn transaction_lookup_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transaction/detail"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "Transaction not found"
            })))
            .mount(&server)
            .await;

        let (status, body) = call(app(server.uri()), get("/transactions/DEV-T0001")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Transaction not found");
    }

    #[tokio::test]
    async fn status_serves_latest_snapshot() {
        let (status, body) = call(app("http://127.0.0.1:9".into()), get("/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"]["online"], true);
        assert_eq!(body["advisory"], "Using fallback data - API unavailable");
    }

    #[tokio::test]
    async fn callback_signature_is_enforced() {
        let signer = Signer::new("T0001", "private");
        let mut payload = json!({
            "reference": "DEV-T0001",
            "merchant_ref": "ARD-1-abc",
            "payment_method": "QRIS",
            "total_amount": 16_000,
            "status": "PAID",
            "signature": "00"
        });
        let (status, _) = call(
            app("http://127.0.0.1:9".into()),
            post_json("/gateway/callback", payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        payload["signature"] = json!(signer.sign("ARD-1-abc", 16_000));
        let (status, body) = call(
            app("http://127.0.0.1:9".into()),
            post_json("/gateway/callback", payload),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}
