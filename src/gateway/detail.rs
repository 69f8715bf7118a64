use crate::gateway::{
    Result, TripayGateway, interaction_log::InteractionSpan, transaction::TransactionRecord,
};

impl TripayGateway {
    /// Current record of a gateway transaction. Errors are propagated, there is no fallback.
    pub async fn transaction_detail(&self, reference: &str) -> Result<TransactionRecord> {
        let mut span = InteractionSpan::enter(Self::SERVICE);
        let url = self.url("transaction/detail");
        span.set_request(url.clone(), &serde_json::json!({ "reference": reference }));
        tracing::debug!(%url, %reference, "Gateway API transaction detail request");
        let res = self
            .exchange(
                self.client
                    .get(url)
                    .query(&[("reference", reference)])
                    .timeout(super::READ_TIMEOUT),
                &mut span,
            )
            .await
            .map(|ok| ok.data);
        span.finish("transaction_detail");
        res
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use crate::{
        config::GatewayConfig,
        gateway::{TripayGateway, error::GatewayError, transaction::TransactionStatus},
    };

    fn gateway(base_url: String) -> TripayGateway {
        TripayGateway::new(&GatewayConfig {
            base_url,
            api_key: "DEV-key".into(),
            private_key: "private".into(),
            merchant_code: "T0001".into(),
        })
    }

    #[tokio::test]
    async fn fetches_detail_by_reference() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transaction/detail"))
            .and(query_param("reference", "T0001ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "",
                "data": { "reference": "T0001ABC", "merchant_ref": "ARD-1-a", "amount": 17500, "status": "PAID" }
            })))
            .mount(&server)
            .await;

        let record = gateway(server.uri()).transaction_detail("T0001ABC").await.unwrap();
        assert_eq!(record.status, TransactionStatus::Paid);
        assert_eq!(record.amount, 17500);
    }

    #[tokio::test]
    async fn unknown_reference_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transaction/detail"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "Transaction not found"
            })))
            .mount(&server)
            .await;

        let err = gateway(server.uri()).transaction_detail("NOPE").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Rejected { status: 404, ref message } if message == "Transaction not found"
        ));
    }
}
