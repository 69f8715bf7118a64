//! Game server status, polled periodically with a generated fallback.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::config::StatusConfig;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MOTD: &str = "Ardentia Network";
const FALLBACK_MOTD: &str = "Ardentia Network - Premium Minecraft Server";
const FALLBACK_VERSION: &str = "1.20.4";
const FALLBACK_MAX_PLAYERS: u32 = 2000;
const FALLBACK_PLAYERS: std::ops::Range<u32> = 800..1300;

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("status query failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed status response")]
    Malformed,
}

impl StatusError {
    /// Non fatal message shown next to the fallback values
    pub fn advisory(&self) -> &'static str {
        match self {
            StatusError::Request(_) => "Failed to fetch server status",
            StatusError::Malformed => "Using fallback data - API unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Players {
    pub online: u32,
    pub max: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motd {
    pub raw: String,
    pub clean: String,
    pub html: String,
}

impl Motd {
    fn uniform(text: &str) -> Self {
        Self {
            raw: text.to_owned(),
            clean: text.to_owned(),
            html: text.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerStatus {
    pub online: bool,
    pub players: Players,
    pub version: String,
    pub motd: Motd,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub status: ServerStatus,
    /// Set while fallback values are displayed
    pub advisory: Option<String>,
    pub loading: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl StatusSnapshot {
    fn initial() -> Self {
        Self {
            status: fallback_status(),
            advisory: None,
            loading: true,
            updated_at: None,
        }
    }
}

mod raw {
    use serde::Deserialize;

    /// Every field may be absent or `null`
    #[derive(Debug, Deserialize)]
    pub struct Status {
        pub online: Option<bool>,
        #[serde(default)]
        pub players: Option<Players>,
        pub version: Option<String>,
        #[serde(default)]
        pub motd: Option<Motd>,
        pub icon: Option<String>,
        pub software: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Players {
        pub online: Option<u32>,
        pub max: Option<u32>,
        pub list: Option<Vec<Player>>,
    }

    /// Older API versions list bare names, newer ones objects
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum Player {
        Name(String),
        Entry { name: String },
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Motd {
        pub raw: Option<Vec<String>>,
        pub clean: Option<Vec<String>>,
        pub html: Option<Vec<String>>,
    }
}

fn first_line(lines: Option<Vec<String>>) -> String {
    lines
        .into_iter()
        .flatten()
        .next()
        .unwrap_or_else(|| DEFAULT_MOTD.to_owned())
}

/// Maps a status query body. A body without an `online` flag is malformed.
pub fn map_response(value: serde_json::Value) -> Result<ServerStatus, StatusError> {
    let raw: raw::Status = serde_json::from_value(value).map_err(|_| StatusError::Malformed)?;
    let online = raw.online.ok_or(StatusError::Malformed)?;
    let players = raw.players.unwrap_or_default();
    let motd = raw.motd.unwrap_or_default();
    Ok(ServerStatus {
        online,
        players: Players {
            online: players.online.unwrap_or_default(),
            max: players.max.unwrap_or_default(),
            list: players
                .list
                .unwrap_or_default()
                .into_iter()
                .map(|player| match player {
                    raw::Player::Name(name) | raw::Player::Entry { name } => name,
                })
                .collect(),
        },
        version: raw.version.unwrap_or_else(|| "Unknown".to_owned()),
        motd: Motd {
            raw: first_line(motd.raw),
            clean: first_line(motd.clean),
            html: first_line(motd.html),
        },
        icon: raw.icon,
        software: raw.software,
    })
}

/// Plausible values shown while the real status is unknown
pub fn fallback_status() -> ServerStatus {
    ServerStatus {
        online: true,
        players: Players {
            online: rand::rng().random_range(FALLBACK_PLAYERS),
            max: FALLBACK_MAX_PLAYERS,
            list: Vec::new(),
        },
        version: FALLBACK_VERSION.to_owned(),
        motd: Motd::uniform(FALLBACK_MOTD),
        icon: None,
        software: None,
    }
}

/// Folds a query result into what gets displayed
pub fn resolve(result: Result<ServerStatus, StatusError>, now: OffsetDateTime) -> StatusSnapshot {
    let (status, advisory) = match result {
        Ok(status) => (status, None),
        Err(e) => {
            tracing::warn!("Server status unavailable, showing fallback: {e}");
            (fallback_status(), Some(e.advisory().to_owned()))
        }
    };
    StatusSnapshot {
        status,
        advisory,
        loading: false,
        updated_at: Some(now),
    }
}

#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
    url: String,
}

impl StatusClient {
    pub fn new(config: &StatusConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.server_address
            ),
        }
    }

    pub async fn fetch(&self) -> Result<ServerStatus, StatusError> {
        tracing::trace!(url = %self.url, "Server status request");
        let response = self
            .client
            .get(&self.url)
            .timeout(QUERY_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            if e.is_decode() {
                StatusError::Malformed
            } else {
                StatusError::Request(e)
            }
        })?;
        map_response(body)
    }
}

/// Owns a running poll loop. Dropping the handle stops polling.
#[derive(Debug)]
pub struct PollHandle {
    updates: watch::Receiver<StatusSnapshot>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.updates.clone()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!("Server status polling stopped");
    }
}

/// Starts polling right away, then once per `period`
pub fn spawn(client: StatusClient, period: Duration) -> PollHandle {
    let (tx, updates) = watch::channel(StatusSnapshot::initial());
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let snapshot = resolve(client.fetch().await, OffsetDateTime::now_utc());
            if tx.send(snapshot).is_err() {
                break;
            }
        }
    });
    PollHandle { updates, task }
}
