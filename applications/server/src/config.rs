/// Server configuration
use crate::error::{Result, ServerError};
use remix_provider_client::{ProviderConfig, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL};
use remix_sync::{CredentialSettings, SyncSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemixConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_provider")]
    pub provider: ProviderSettings,

    #[serde(default = "default_sync")]
    pub sync: SyncConfig,

    #[serde(default = "default_credentials")]
    pub credentials: CredentialConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

/// Spotify application credentials and endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_freshness_window_days")]
    pub freshness_window_days: i64,

    #[serde(default = "default_max_tracks_per_artist")]
    pub max_tracks_per_artist: usize,

    #[serde(default = "default_min_tracks_per_member")]
    pub min_tracks_per_member: usize,

    #[serde(default = "default_max_playlist_tracks")]
    pub max_playlist_tracks: usize,

    /// Minutes between periodic rebuilds of every playlist; 0 disables
    #[serde(default = "default_refresh_interval_minutes")]
    pub refresh_interval_minutes: u64,

    /// Upper bound on one queued rebuild; unset waits forever
    #[serde(default)]
    pub job_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_in_flight_ttl_secs")]
    pub in_flight_ttl_secs: u64,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl RemixConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        Self::load_from(PathBuf::from("config.toml"))
    }

    /// Load configuration from the given file (if it exists) and environment
    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        let mut settings = config::Config::builder();

        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with REMIX_)
        settings = settings.add_source(
            config::Environment::with_prefix("REMIX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider.client_id.is_empty() {
            return Err(ServerError::Config(
                "Provider client id is required (set REMIX_PROVIDER__CLIENT_ID)".to_string(),
            ));
        }

        if self.provider.client_secret.is_empty() {
            return Err(ServerError::Config(
                "Provider client secret is required (set REMIX_PROVIDER__CLIENT_SECRET)"
                    .to_string(),
            ));
        }

        if self.sync.max_playlist_tracks == 0 {
            return Err(ServerError::Config(
                "sync.max_playlist_tracks must be greater than zero".to_string(),
            ));
        }

        if self.credentials.max_attempts == 0 {
            return Err(ServerError::Config(
                "credentials.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(&self.provider.client_id, &self.provider.client_secret)
            .with_urls(&self.provider.api_url, &self.provider.accounts_url)
    }

    pub fn to_sync_settings(&self) -> SyncSettings {
        SyncSettings {
            freshness_window_days: self.sync.freshness_window_days,
            max_tracks_per_artist: self.sync.max_tracks_per_artist,
            min_tracks_per_member: self.sync.min_tracks_per_member,
            max_playlist_tracks: self.sync.max_playlist_tracks,
            job_timeout: self.sync.job_timeout_secs.map(Duration::from_secs),
            credentials: CredentialSettings {
                max_attempts: self.credentials.max_attempts,
                in_flight_ttl: Duration::from_secs(self.credentials.in_flight_ttl_secs),
                retry_backoff: Duration::from_millis(self.credentials.retry_backoff_ms),
            },
        }
    }

    /// `None` when the periodic refresh is disabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.sync.refresh_interval_minutes {
            0 => None,
            minutes => Some(Duration::from_secs(minutes * 60)),
        }
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/remix.db".to_string()
}

fn default_provider() -> ProviderSettings {
    ProviderSettings {
        client_id: String::new(),
        client_secret: String::new(),
        api_url: default_api_url(),
        accounts_url: default_accounts_url(),
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

fn default_sync() -> SyncConfig {
    SyncConfig {
        freshness_window_days: default_freshness_window_days(),
        max_tracks_per_artist: default_max_tracks_per_artist(),
        min_tracks_per_member: default_min_tracks_per_member(),
        max_playlist_tracks: default_max_playlist_tracks(),
        refresh_interval_minutes: default_refresh_interval_minutes(),
        job_timeout_secs: None,
    }
}

fn default_freshness_window_days() -> i64 {
    14
}

fn default_max_tracks_per_artist() -> usize {
    2
}

fn default_min_tracks_per_member() -> usize {
    6
}

fn default_max_playlist_tracks() -> usize {
    48
}

fn default_refresh_interval_minutes() -> u64 {
    60
}

fn default_credentials() -> CredentialConfig {
    CredentialConfig {
        max_attempts: default_max_attempts(),
        in_flight_ttl_secs: default_in_flight_ttl_secs(),
        retry_backoff_ms: default_retry_backoff_ms(),
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_in_flight_ttl_secs() -> u64 {
    60
}

fn default_retry_backoff_ms() -> u64 {
    250
}

impl Default for RemixConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            provider: default_provider(),
            sync: default_sync(),
            credentials: default_credentials(),
        }
    }
}
