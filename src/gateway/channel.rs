use serde::{Deserialize, Serialize};

use crate::gateway::{Result, TripayGateway};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFee {
    #[serde(default)]
    pub flat: u64,
    #[serde(default)]
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentChannel {
    pub code: String,
    pub name: String,
    /// Fee charged to the buyer
    #[serde(default, alias = "fee_customer")]
    pub fee: ChannelFee,
    #[serde(default)]
    pub active: bool,
}

impl PaymentChannel {
    fn flat(code: &str, name: &str, flat: u64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            fee: ChannelFee { flat, percent: 0. },
            active: true,
        }
    }
}

/// Common channels offered when the gateway listing is unavailable
pub fn fallback_channels() -> Vec<PaymentChannel> {
    vec![
        PaymentChannel::flat("DANA", "DANA", 2500),
        PaymentChannel::flat("OVO", "OVO", 2500),
        PaymentChannel::flat("GOPAY", "GoPay", 2500),
        PaymentChannel::flat("QRIS", "QRIS", 1000),
        PaymentChannel::flat("BRIVA", "BRI Virtual Account", 4000),
        PaymentChannel::flat("BNIVA", "BNI Virtual Account", 4000),
        PaymentChannel::flat("MANDIRIVA", "Mandiri Virtual Account", 4000),
    ]
}

/// Active channels from a listing result, or the fallback set on failure
pub fn channels_or_fallback(result: Result<Vec<PaymentChannel>>) -> Vec<PaymentChannel> {
    let channels = match result {
        Ok(channels) => channels,
        Err(e) => {
            tracing::warn!("Failed to fetch payment channels, using fallback list: {e}");
            fallback_channels()
        }
    };
    channels.into_iter().filter(|c| c.active).collect()
}

pub fn find<'a>(channels: &'a [PaymentChannel], code: &str) -> Option<&'a PaymentChannel> {
    channels.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

impl TripayGateway {
    /// Never fails; degrades to [`fallback_channels`]
    pub async fn payment_channels(&self) -> Vec<PaymentChannel> {
        channels_or_fallback(self.list_channels().await)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;
    use crate::{config::GatewayConfig, gateway::error::GatewayError};

    fn gateway(base_url: String) -> TripayGateway {
        TripayGateway::new(&GatewayConfig {
            base_url,
            api_key: "DEV-key".into(),
            private_key: "private".into(),
            merchant_code: "T0001".into(),
        })
    }

    #[test]
    fn fallback_has_seven_priced_channels() {
        let channels = fallback_channels();
        assert_eq!(channels.len(), 7);
        assert!(channels.iter().all(|c| c.active && !c.name.is_empty() && c.fee.flat > 0));
        assert_eq!(find(&channels, "qris").map(|c| c.fee.flat), Some(1000));
    }

    #[test]
    fn failure_yields_fallback() {
        let err = GatewayError::Rejected {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(channels_or_fallback(Err(err)), fallback_channels());
    }

    #[test]
    fn inactive_channels_are_dropped() {
        let mut closed = PaymentChannel::flat("OVO", "OVO", 2500);
        closed.active = false;
        let open = PaymentChannel::flat("QRIS", "QRIS", 750);
        assert_eq!(channels_or_fallback(Ok(vec![closed, open.clone()])), vec![open]);
    }

    #[tokio::test]
    async fn lists_channels_from_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/merchant/payment-channel"))
            .and(header("authorization", "Bearer DEV-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Success",
                "data": [
                    { "group": "Virtual Account", "code": "BRIVA", "name": "BRI Virtual Account",
                      "fee_customer": { "flat": 4250, "percent": 0 }, "active": true },
                    { "code": "OVO", "name": "OVO", "fee_customer": { "flat": 0, "percent": 3 }, "active": false }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let channels = gateway(server.uri()).payment_channels().await;
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].code, "BRIVA");
        assert_eq!(channels[0].fee.flat, 4250);
    }

    #[tokio::test]
    async fn unreachable_gateway_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let channels = gateway(server.uri()).payment_channels().await;
        assert_eq!(channels, fallback_channels());
    }
}
