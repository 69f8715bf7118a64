use crate::{
    checkout::{CheckoutRequest, CheckoutResult, NETWORK_ERROR_MESSAGE},
    gateway::{
        TripayOkResponse,
        callback::CallbackPayload,
        error::GatewayError,
        transaction::{OrderItem, TransactionRecord, TransactionRequest},
    },
    notify::PaymentEvent,
};

impl<'a> TransactionRequest<'a> {
    pub fn from_checkout(
        CheckoutRequest {
            buyer,
            item,
            channel,
            total,
            merchant_ref,
            callback_url,
            return_url,
            product_url,
            image_url,
            expires_at,
        }: &'a CheckoutRequest,
        signature: String,
    ) -> Self {
        Self {
            method: &channel.code,
            merchant_ref,
            amount: *total,
            customer_name: &buyer.name,
            customer_email: &buyer.email,
            customer_phone: &buyer.phone,
            order_items: vec![OrderItem {
                sku: item.id,
                name: item.name,
                price: item.price,
                quantity: 1,
                product_url: product_url.as_deref(),
                image_url: image_url.as_deref(),
            }],
            callback_url,
            return_url,
            expired_time: expires_at.unix_timestamp(),
            signature,
        }
    }
}

impl From<TripayOkResponse<TransactionRecord>> for CheckoutResult {
    fn from(value: TripayOkResponse<TransactionRecord>) -> Self {
        CheckoutResult::success(value.data)
    }
}

impl From<GatewayError> for CheckoutResult {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Unreachable(_) => CheckoutResult::failure(NETWORK_ERROR_MESSAGE),
            GatewayError::Rejected { message, .. } => CheckoutResult::failure(message),
            GatewayError::GatewayDeserialization(e) => CheckoutResult::failure(e.to_string()),
        }
    }
}

impl From<&CallbackPayload> for PaymentEvent {
    fn from(value: &CallbackPayload) -> Self {
        Self {
            merchant_ref: value.merchant_ref.clone(),
            amount: value.total_amount,
            customer_name: value.customer_name.clone(),
            customer_email: value.customer_email.clone(),
            payment_method: value.payment_method.clone(),
            paid_at: value.paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::{
        catalog,
        checkout::{Buyer, PHONE_PLACEHOLDER},
        gateway::{channel::fallback_channels, error::SERVER_ERROR_MESSAGE},
    };

    #[test]
    fn transaction_request_carries_single_order_line() {
        let expires_at = OffsetDateTime::from_unix_timestamp(1_700_086_400).unwrap();
        let checkout = CheckoutRequest {
            buyer: Buyer {
                name: "Alex".into(),
                email: "alex@example.com".into(),
                phone: PHONE_PLACEHOLDER.into(),
            },
            item: catalog::find("legend").unwrap(),
            channel: fallback_channels().remove(0),
            total: 92_500,
            merchant_ref: "ARD-1700000000000-abcdefghi".into(),
            callback_url: "https://store.test/gateway/callback".into(),
            return_url: "https://store.test/payment-success".into(),
            product_url: None,
            image_url: Some("https://store.test/logo.png".into()),
            expires_at,
        };
        let request = TransactionRequest::from_checkout(&checkout, "sig".into());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["method"], "DANA");
        assert_eq!(value["amount"], 92_500);
        assert_eq!(value["expired_time"], 1_700_086_400);
        assert_eq!(value["order_items"][0]["sku"], "legend");
        assert_eq!(value["order_items"][0]["quantity"], 1);
        assert!(value["order_items"][0].get("product_url").is_none());
    }

    #[test]
    fn rejection_message_is_passed_verbatim() {
        let result: CheckoutResult = GatewayError::Rejected {
            status: 500,
            message: SERVER_ERROR_MESSAGE.into(),
        }
        .into();
        assert!(!result.success);
        assert_eq!(result.message, SERVER_ERROR_MESSAGE);
    }
}
