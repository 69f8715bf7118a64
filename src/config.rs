//! Runtime configuration, read once from the environment and passed down explicitly.

const PRODUCTION_BASE_URL: &str = "https://tripay.co.id/api";
const SANDBOX_BASE_URL: &str = "https://tripay.co.id/api-sandbox";
const DEFAULT_STATUS_BASE_URL: &str = "https://api.mcsrvstat.us/3";
const DEFAULT_SERVER_ADDRESS: &str = "play.ardentia.net";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3030";
const DEFAULT_STORE_NAME: &str = "Ardentia Network Store";
const DEFAULT_REFERENCE_PREFIX: &str = "ARD";
const DEFAULT_PORT: u16 = 3030;
/// Value shipped in `.env.example`, treated as "not configured"
const WEBHOOK_PLACEHOLDER: &str = "your-discord-webhook-url";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Production,
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub private_key: String,
    pub merchant_code: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("merchant_code", &self.merchant_code)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub base_url: String,
    pub server_address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub gateway: GatewayConfig,
    pub webhook_url: Option<String>,
    pub public_url: String,
    pub status: StatusConfig,
    pub store_name: String,
    pub reference_prefix: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let environment = match get("APP_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Sandbox,
        };
        let base_url = get("GATEWAY_BASE_URL").unwrap_or_else(|| {
            match environment {
                Environment::Production => PRODUCTION_BASE_URL,
                Environment::Sandbox => SANDBOX_BASE_URL,
            }
            .to_owned()
        });
        let gateway = GatewayConfig {
            base_url,
            api_key: required("TRIPAY_API_KEY")?,
            private_key: required("TRIPAY_PRIVATE_KEY")?,
            merchant_code: required("TRIPAY_MERCHANT_CODE")?,
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            gateway,
            webhook_url: get("DISCORD_WEBHOOK_URL").filter(|url| url != WEBHOOK_PLACEHOLDER),
            public_url: get("PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            status: StatusConfig {
                base_url: get("MC_STATUS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_STATUS_BASE_URL.to_owned()),
                server_address: get("MC_SERVER_ADDRESS")
                    .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_owned()),
            },
            store_name: get("STORE_NAME").unwrap_or_else(|| DEFAULT_STORE_NAME.to_owned()),
            reference_prefix: get("MERCHANT_REF_PREFIX")
                .unwrap_or_else(|| DEFAULT_REFERENCE_PREFIX.to_owned()),
            port,
        })
    }

    pub fn callback_url(&self) -> String {
        format!("{}/gateway/callback", self.public_url)
    }

    pub fn return_url(&self) -> String {
        format!("{}/payment-success", self.public_url)
    }
}
