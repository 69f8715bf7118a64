//! Best effort chat notifications for settled payments.

use std::time::Duration;

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
const SUCCESS_COLOR: u32 = 0x00ff00;

/// Completed payment as reported by the gateway
#[derive(Debug, Clone)]
pub struct PaymentEvent {
    pub merchant_ref: String,
    pub amount: u64,
    pub customer_name: String,
    pub customer_email: String,
    pub payment_method: String,
    /// Unix seconds
    pub paid_at: Option<i64>,
}

/// Receives settled payments. Implementations must swallow their own failures.
#[async_trait::async_trait]
pub trait Notify: Send + Sync {
    async fn payment_completed(&self, event: &PaymentEvent);
}

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// `Rp 1.234.567`
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {grouped}")
}

fn format_paid_at(paid_at: Option<i64>) -> String {
    let format = format_description!("[day]/[month]/[year] [hour]:[minute]:[second] UTC");
    paid_at
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .and_then(|at| at.format(format).ok())
        .unwrap_or_else(|| "-".to_owned())
}

impl WebhookMessage {
    pub fn payment(event: &PaymentEvent, store_name: &str, now: OffsetDateTime) -> Self {
        let field = |name, value: String| EmbedField {
            name,
            value,
            inline: true,
        };
        let embed = Embed {
            title: "Payment received".into(),
            color: SUCCESS_COLOR,
            fields: vec![
                field("Reference", event.merchant_ref.clone()),
                field("Amount", format_rupiah(event.amount)),
                field("Customer", event.customer_name.clone()),
                field("Email", event.customer_email.clone()),
                field("Payment Method", event.payment_method.clone()),
                field("Paid At", format_paid_at(event.paid_at)),
            ],
            timestamp: now.format(&Rfc3339).unwrap_or_default(),
            footer: EmbedFooter {
                text: store_name.to_owned(),
            },
        };
        Self {
            embeds: vec![embed],
        }
    }
}

/// Posts embeds to a Discord compatible webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
    store_name: String,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, store_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            store_name: store_name.into(),
        }
    }

    async fn send(&self, url: &str, message: &WebhookMessage) -> reqwest::Result<()> {
        self.client
            .post(url)
            .json(message)
            .timeout(WEBHOOK_TIMEOUT)
            .send()
            .await
            .and_then(|res| res.error_for_status())?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notify for WebhookNotifier {
    async fn payment_completed(&self, event: &PaymentEvent) {
        let Some(url) = &self.url else {
            tracing::warn!("Webhook url is not configured, skipping payment notification");
            return;
        };
        let message = WebhookMessage::payment(event, &self.store_name, OffsetDateTime::now_utc());
        tracing::debug!(merchant_ref = %event.merchant_ref, "Sending payment notification");
        match self.send(url, &message).await {
            Ok(()) => tracing::info!(merchant_ref = %event.merchant_ref, "Payment notification sent"),
            Err(e) => tracing::error!(
                merchant_ref = %event.merchant_ref,
                "Failed to send payment notification: {e}"
            ),
        }
    }
}
