//! Desktop audio backend
//!
//! - `fetch`: HTTP download of clip audio with a small LRU of recent buffers
//! - `player`: `rodio` sink driven as a queue player
//! - `probe`: duration lookup by decoding the container headers
//! - `session`: default output device watcher standing in for a platform
//!   audio session

mod fetch;
mod player;
mod probe;
mod session;

pub use fetch::AudioFetcher;
pub use player::RodioQueuePlayer;
pub use probe::HttpMediaProbe;
pub use session::DeviceWatchSession;
