use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    checkout::CheckoutSettings, gateway::TripayGateway, notify::Notify,
    status::StatusSnapshot,
};

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub gateway: TripayGateway,
    pub checkout: Arc<CheckoutSettings>,
    pub notifier: Arc<dyn Notify>,
    pub status: watch::Receiver<StatusSnapshot>,
}

impl AppState {
    pub fn new(
        gateway: TripayGateway,
        checkout: CheckoutSettings,
        notifier: Arc<dyn Notify>,
        status: watch::Receiver<StatusSnapshot>,
    ) -> Self {
        Self {
            gateway,
            checkout: Arc::new(checkout),
            notifier,
            status,
        }
    }
}
