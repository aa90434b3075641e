//! Audio session abstraction: category setup plus interruption and route
//! change notifications

use anyhow::Result;
use tokio::sync::broadcast;

/// Why the audio route changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteChangeReason {
    Unknown,
    NewDeviceAvailable,
    /// The device we were playing through went away (headphones unplugged)
    OldDeviceUnavailable,
    CategoryChange,
    Override,
    WakeFromSleep,
    NoSuitableRouteForCategory,
    RouteConfigurationChange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    InterruptionBegan,
    InterruptionEnded { should_resume: bool },
    RouteChanged { reason: RouteChangeReason },
}

pub trait AudioSession: Send + Sync {
    /// Put the session in playback mode and activate it
    fn configure(&self) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
