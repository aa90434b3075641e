//! Playback module - queue coordination over a pluggable player
//!
//! - `player`: queue player and media probe seams
//! - `session`: audio session events (interruptions, route changes)
//! - `coordinator`: the state machine the UI talks to

mod coordinator;
mod player;
mod session;

pub use coordinator::PlaybackCoordinator;
pub use player::{MediaProbe, PlayerFactory, PlayerItem, QueuePlayer};
pub use session::{AudioSession, RouteChangeReason, SessionEvent};
