use serde::{Deserialize, Serialize};

use crate::{
    checkout::CheckoutRequest,
    gateway::{Result, TripayGateway, TripayOkResponse},
};

#[derive(Debug, Serialize)]
pub struct TransactionRequest<'a> {
    pub method: &'a str,
    pub merchant_ref: &'a str,
    pub amount: u64,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub order_items: Vec<OrderItem<'a>>,
    pub callback_url: &'a str,
    pub return_url: &'a str,
    /// Unix seconds
    pub expired_time: i64,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct OrderItem<'a> {
    pub sku: &'a str,
    pub name: &'a str,
    pub price: u64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    #[default]
    Unpaid,
    Paid,
    Expired,
    Failed,
    Refund,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Transaction as the gateway reports it after creation or on lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    pub reference: String,
    pub merchant_ref: String,
    pub payment_method: String,
    pub payment_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub amount: u64,
    pub fee_merchant: u64,
    pub fee_customer: u64,
    pub total_fee: u64,
    pub amount_received: u64,
    pub pay_code: Option<String>,
    pub pay_url: Option<String>,
    pub checkout_url: Option<String>,
    pub status: TransactionStatus,
    pub expired_time: i64,
    pub instructions: Vec<Instruction>,
    /// QR payload for QR based channels
    pub qr_string: Option<String>,
    #[serde(alias = "qr_code")]
    pub qr_url: Option<String>,
}

impl TripayGateway {
    /// Signs the checkout attempt with the merchant key and creates the transaction
    pub async fn submit_checkout(
        &self,
        checkout: &CheckoutRequest,
    ) -> Result<TripayOkResponse<TransactionRecord>> {
        let signature = self.signer.sign(&checkout.merchant_ref, checkout.total);
        let request = TransactionRequest::from_checkout(checkout, signature);
        self.create_transaction(&request).await
    }
}
