//! Desktop stand-in for a platform audio session.
//!
//! Desktop systems have no session category to negotiate and send no
//! interruption notifications, so this only watches the default output
//! device and turns changes into route change events.

use std::time::Duration;

use anyhow::{bail, Result};
use rodio::cpal::{self, traits::DeviceTrait, traits::HostTrait};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::playback::{AudioSession, RouteChangeReason, SessionEvent};

/// Output devices visible at one instant
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputSnapshot {
    pub default: Option<String>,
    pub available: Vec<String>,
}

fn output_snapshot() -> Result<OutputSnapshot> {
    let host = cpal::default_host();
    let default = host.default_output_device().and_then(|device| device.name().ok());
    let available = host
        .output_devices()?
        .filter_map(|device| device.name().ok())
        .collect();
    Ok(OutputSnapshot { default, available })
}

/// Classify the move from `previous` to `current`, `None` if the default
/// output did not change
pub fn route_change(previous: &OutputSnapshot, current: &OutputSnapshot) -> Option<RouteChangeReason> {
    if previous.default == current.default {
        return None;
    }

    if let Some(old) = &previous.default {
        if !current.available.contains(old) {
            return Some(RouteChangeReason::OldDeviceUnavailable);
        }
    }

    match &current.default {
        Some(new) if !previous.available.contains(new) => Some(RouteChangeReason::NewDeviceAvailable),
        _ => Some(RouteChangeReason::RouteConfigurationChange),
    }
}

pub struct DeviceWatchSession {
    events: broadcast::Sender<SessionEvent>,
    watcher: JoinHandle<()>,
}

impl DeviceWatchSession {
    /// Start polling the default output device. Must be called inside a
    /// tokio runtime.
    pub fn start(poll_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(16);
        let sender = events.clone();

        let watcher = tokio::spawn(async move {
            let mut previous = match tokio::task::spawn_blocking(output_snapshot).await {
                Ok(Ok(snapshot)) => snapshot,
                _ => OutputSnapshot::default(),
            };
            tracing::debug!(default = ?previous.default, "Watching audio output devices");

            loop {
                tokio::time::sleep(poll_interval).await;
                let current = match tokio::task::spawn_blocking(output_snapshot).await {
                    Ok(Ok(snapshot)) => snapshot,
                    Ok(Err(e)) => {
                        tracing::trace!(error = %e, "Output device enumeration failed");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Output device poll panicked");
                        continue;
                    }
                };

                if let Some(reason) = route_change(&previous, &current) {
                    tracing::info!(
                        from = ?previous.default,
                        to = ?current.default,
                        ?reason,
                        "Audio route changed"
                    );
                    // No subscribers is fine
                    let _ = sender.send(SessionEvent::RouteChanged { reason });
                }
                previous = current;
            }
        });

        Self { events, watcher }
    }
}

impl Drop for DeviceWatchSession {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

impl AudioSession for DeviceWatchSession {
    fn configure(&self) -> Result<()> {
        let snapshot = output_snapshot()?;
        match snapshot.default {
            Some(name) => {
                tracing::info!(device = %name, "Audio session ready");
                Ok(())
            }
            None => bail!("no default audio output device"),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
