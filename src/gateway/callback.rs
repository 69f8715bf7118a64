use crate::{
    gateway::{signature::Signer, transaction::TransactionStatus},
    notify::{Notify, PaymentEvent},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallbackPayload {
    #[serde(default)]
    pub reference: String,
    pub merchant_ref: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_method_code: String,
    pub total_amount: u64,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    /// Unix seconds
    #[serde(default)]
    pub paid_at: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Signature did not match, nothing was done
    Rejected,
    /// Paid in full: notification dispatched and fulfillment handed off
    Fulfilled,
    /// Valid callback for a transaction that is not paid
    Acknowledged(TransactionStatus),
}

/// Verifies and settles one gateway callback.
///
/// Fulfillment (granting the purchase, bookkeeping) belongs to the game server and is only
/// announced here.
pub async fn process_callback<N>(
    payload: &CallbackPayload,
    signer: &Signer,
    notifier: &N,
) -> CallbackOutcome
where
    N: Notify + ?Sized,
{
    if !signer.verify(&payload.merchant_ref, payload.total_amount, &payload.signature) {
        tracing::warn!(merchant_ref = %payload.merchant_ref, "Callback signature mismatch");
        return CallbackOutcome::Rejected;
    }

    match payload.status {
        TransactionStatus::Paid => {
            notifier.payment_completed(&PaymentEvent::from(payload)).await;
            tracing::info!(
                merchant_ref = %payload.merchant_ref,
                reference = %payload.reference,
                amount = payload.total_amount,
                "Payment settled, fulfillment handed off"
            );
            CallbackOutcome::Fulfilled
        }
        status => {
            tracing::info!(merchant_ref = %payload.merchant_ref, ?status, "Callback without payment");
            CallbackOutcome::Acknowledged(status)
        }
    }
}
