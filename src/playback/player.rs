//! Seams between the coordinator and whatever actually makes sound

use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use reqwest::Url;

/// One queued playable item, tied back to the clip it came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerItem {
    pub clip_id: String,
    pub url: Url,
}

/// A media player holding an ordered queue whose head is the current item.
///
/// Transport calls never fail from the caller's point of view; backends log
/// their own trouble.
pub trait QueuePlayer: Send {
    /// Drop everything queued and enqueue `items` in order
    fn replace_queue(&mut self, items: Vec<PlayerItem>);

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek within the current item
    fn seek(&mut self, position: Duration);

    /// Position within the current item
    fn position(&self) -> Duration;

    fn current_item(&self) -> Option<&PlayerItem>;

    /// Duration of the current item once the backend knows it
    fn current_duration(&self) -> Option<Duration>;

    /// True once per time the current item played through to its end
    fn take_played_to_end(&mut self) -> bool;
}

/// Builds the player lazily, the first time the coordinator needs one
pub type PlayerFactory = Box<dyn Fn() -> Box<dyn QueuePlayer> + Send + Sync>;

/// Loads media metadata for an item
pub trait MediaProbe: Send + Sync {
    /// Duration of the media behind `url`, in seconds
    fn load_duration(&self, url: Url) -> BoxFuture<'static, Result<f64>>;
}
