//! Buyer facing checkout: validation, totals, merchant references and result mapping.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    catalog::{self, CatalogItem},
    config::Config,
    gateway::{
        TripayGateway,
        channel::{self, PaymentChannel},
        transaction::TransactionRecord,
    },
};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";
pub const PHONE_PLACEHOLDER: &str = "08123456789";
const SUCCESS_MESSAGE: &str = "Payment created successfully";
const EXPIRY: time::Duration = time::Duration::hours(24);
const REFERENCE_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown store item")]
    UnknownItem,
    #[error("Player name is required")]
    MissingName,
    #[error("A valid email is required")]
    InvalidEmail,
    #[error("Select a payment method")]
    MissingChannel,
}

/// What the buyer submits from the checkout dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuyerForm {
    pub item_id: String,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Payment channel code
    #[serde(default)]
    pub channel: Option<String>,
}

impl BuyerForm {
    /// Local checks that run before any network call
    pub fn validate(&self) -> Result<&'static CatalogItem, ValidationError> {
        let item = catalog::find(&self.item_id).ok_or(ValidationError::UnknownItem)?;
        if self.player_name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.channel_code().is_none() {
            return Err(ValidationError::MissingChannel);
        }
        Ok(item)
    }

    fn channel_code(&self) -> Option<&str> {
        self.channel.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Loose `text@text.text` shape, any whitespace separated word may match
pub fn is_valid_email(email: &str) -> bool {
    email.split_whitespace().any(|word| {
        word.char_indices().any(|(at, c)| {
            if c != '@' || at == 0 {
                return false;
            }
            let domain = &word[at + 1..];
            domain
                .char_indices()
                .any(|(dot, c)| c == '.' && dot > 0 && dot + 1 < domain.len())
        })
    })
}

/// Item price plus the flat fee of the chosen channel, if any
pub fn total(item: &CatalogItem, channel: Option<&PaymentChannel>) -> u64 {
    item.price.saturating_add(channel.map_or(0, |channel| channel.fee.flat))
}

/// `<prefix>-<epoch millis>-<9 base36 chars>`
pub fn merchant_reference(prefix: &str, now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{prefix}-{millis}-{suffix}")
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub item_id: &'static str,
    pub price: u64,
    pub fee: u64,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Price breakdown for an item. Unknown channel codes quote without a fee.
pub fn quote(
    item: &'static CatalogItem,
    channels: &[PaymentChannel],
    code: Option<&str>,
) -> Quote {
    let channel = code.and_then(|code| channel::find(channels, code));
    Quote {
        item_id: item.id,
        price: item.price,
        fee: channel.map_or(0, |c| c.fee.flat),
        total: total(item, channel),
        channel: channel.map(|c| c.code.clone()),
    }
}

/// Values taken from the deployment rather than from the buyer
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub reference_prefix: String,
    pub callback_url: String,
    pub return_url: String,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Config> for CheckoutSettings {
    fn from(config: &Config) -> Self {
        Self {
            reference_prefix: config.reference_prefix.clone(),
            callback_url: config.callback_url(),
            return_url: config.return_url(),
            product_url: Some(format!("{}/store", config.public_url)),
            image_url: Some(format!("{}/ardentia-logo.png", config.public_url)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Buyer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Fully resolved checkout attempt, ready to be signed and sent
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub buyer: Buyer,
    pub item: &'static CatalogItem,
    pub channel: PaymentChannel,
    pub total: u64,
    pub merchant_ref: String,
    pub callback_url: String,
    pub return_url: String,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
    pub expires_at: OffsetDateTime,
}

impl CheckoutRequest {
    pub fn prepare(
        form: &BuyerForm,
        channels: &[PaymentChannel],
        settings: &CheckoutSettings,
        now: OffsetDateTime,
    ) -> Result<Self, ValidationError> {
        let item = form.validate()?;
        let channel = form
            .channel_code()
            .and_then(|code| channel::find(channels, code))
            .ok_or(ValidationError::MissingChannel)?;
        let phone = form
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(PHONE_PLACEHOLDER);

        Ok(Self {
            buyer: Buyer {
                name: form.player_name.trim().to_owned(),
                email: form.email.trim().to_owned(),
                phone: phone.to_owned(),
            },
            item,
            total: total(item, Some(channel)),
            channel: channel.clone(),
            merchant_ref: merchant_reference(&settings.reference_prefix, now),
            callback_url: settings.callback_url.clone(),
            return_url: settings.return_url.clone(),
            product_url: settings.product_url.clone(),
            image_url: settings.image_url.clone(),
            expires_at: now + EXPIRY,
        })
    }
}

/// Outcome shown to the buyer
#[derive(Debug, Serialize)]
pub struct CheckoutResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TransactionRecord>,
}

impl CheckoutResult {
    pub fn success(record: TransactionRecord) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
            data: Some(record),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Page to open in a new browsing context
    pub fn checkout_url(&self) -> Option<&str> {
        self.data.as_ref()?.checkout_url.as_deref()
    }

    /// Code to display with copy to clipboard
    pub fn pay_code(&self) -> Option<&str> {
        self.data.as_ref()?.pay_code.as_deref()
    }
}

impl From<ValidationError> for CheckoutResult {
    fn from(value: ValidationError) -> Self {
        Self::failure(value.to_string())
    }
}

/// Runs one checkout attempt end to end. Every attempt gets a fresh merchant reference.
pub async fn submit(
    gateway: &TripayGateway,
    settings: &CheckoutSettings,
    form: &BuyerForm,
) -> CheckoutResult {
    if let Err(e) = form.validate() {
        tracing::info!(item = %form.item_id, "Checkout rejected: {e}");
        return e.into();
    }
    let channels = gateway.payment_channels().await;
    let now = OffsetDateTime::now_utc();
    let request = match CheckoutRequest::prepare(form, &channels, settings, now) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(item = %form.item_id, "Checkout rejected: {e}");
            return e.into();
        }
    };

    match gateway.submit_checkout(&request).await {
        Ok(res) => {
            tracing::info!(
                merchant_ref = %request.merchant_ref,
                reference = %res.data.reference,
                total = request.total,
                message = %res.message,
                "Created payment"
            );
            res.into()
        }
        Err(e) => {
            tracing::error!(merchant_ref = %request.merchant_ref, "Failed to create a payment: {e}");
            e.into()
        }
    }
}
