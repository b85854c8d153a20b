use std::time::Duration;

use url::Url;

use crate::error::SyncError;
use crate::net;
use crate::session::UserId;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EXPIRY_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
    pub expiry_soon_days: i64,
    pub default_user: Option<UserId>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env");
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, SyncError> {
        Ok(Self {
            server_url: net::parse_base_url(server_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("PantrySync/{}", env!("CARGO_PKG_VERSION")),
            expiry_soon_days: DEFAULT_EXPIRY_SOON_DAYS,
            default_user: None,
        })
    }

    pub fn from_env() -> Result<Self, SyncError> {
        let server_url =
            env_value("PANTRY_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&server_url)?;

        if let Some(raw) = env_value("PANTRY_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| SyncError::config(format!("invalid PANTRY_TIMEOUT_SECS '{raw}'")))?;
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(raw) = env_value("PANTRY_EXPIRY_SOON_DAYS") {
            config.expiry_soon_days = raw.parse::<i64>().map_err(|_| {
                SyncError::config(format!("invalid PANTRY_EXPIRY_SOON_DAYS '{raw}'"))
            })?;
        }
        if let Some(raw) = env_value("PANTRY_USER_ID") {
            config.default_user = Some(raw.parse::<UserId>()?);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
