//! Application configuration
//!
//! All knobs live in one struct built in `main`. There is no config file and
//! no environment lookup apart from `RUST_LOG`, which belongs to logging.

use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://apitest.suno.com/api/songs";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Endpoint returning one page of songs as JSON
    pub catalog_url: String,
    /// Applied to connect and to the whole catalog or artwork request
    pub request_timeout: Duration,
    /// How often the playback coordinator samples the player position
    pub tick_interval: Duration,
    pub seek_back_secs: f64,
    pub seek_forward_secs: f64,
    /// Upper bound on the summed cost (w * h * 4) of cached cover art
    pub image_cache_cost_limit: usize,
    /// Number of downloaded clip audio buffers kept around for replay
    pub audio_cache_entries: usize,
    /// Poll period for default output device changes
    pub device_poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_millis(250),
            seek_back_secs: 15.0,
            seek_forward_secs: 30.0,
            image_cache_cost_limit: 64 * 1024 * 1024,
            audio_cache_entries: 4,
            device_poll_interval: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    /// Shared HTTP client with the configured timeouts
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.request_timeout)
            .timeout(self.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Client for whole-clip audio downloads. Only connecting is bounded;
    /// a long clip on a slow link may take well past `request_timeout`.
    pub fn audio_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
