//! Playback coordinator
//!
//! Wraps a single [`QueuePlayer`] and publishes a small [`PlaybackState`]
//! through a `watch` channel. It reacts to audio session events, samples the
//! player position on a fixed tick and resolves item durations in the
//! background.
//!
//! Every queue rebuild bumps a generation counter. Duration resolutions carry
//! the generation they were started for and are dropped if the queue has
//! moved on by the time they finish.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

use super::player::{MediaProbe, PlayerFactory, PlayerItem, QueuePlayer};
use super::session::{AudioSession, RouteChangeReason, SessionEvent};
use crate::model::{Clip, PlaybackState};

struct CoordinatorInner {
    clips: Vec<Clip>,
    player: Option<Box<dyn QueuePlayer>>,
    state: PlaybackState,
    generation: u64,
}

struct Shared {
    inner: Mutex<CoordinatorInner>,
    state_tx: watch::Sender<PlaybackState>,
    factory: PlayerFactory,
    probe: Arc<dyn MediaProbe>,
    tick_interval: Duration,
    tasks: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let tasks = match self.tasks.get_mut() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

#[derive(Clone)]
pub struct PlaybackCoordinator {
    shared: Arc<Shared>,
}

impl PlaybackCoordinator {
    pub fn new(factory: PlayerFactory, probe: Arc<dyn MediaProbe>, tick_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(CoordinatorInner {
                    clips: Vec::new(),
                    player: None,
                    state: PlaybackState::default(),
                    generation: 0,
                }),
                state_tx,
                factory,
                probe,
                tick_interval,
                tasks: std::sync::Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    pub fn current_clip_id(&self) -> Option<String> {
        self.shared.state_tx.borrow().current_clip_id.clone()
    }

    // ========================================================================
    // Audio session
    // ========================================================================

    /// Configure `session` for playback and start listening to its events.
    ///
    /// A configuration failure is logged and otherwise ignored; playback works
    /// without the category guarantees. The listener stops when the last
    /// coordinator handle is dropped.
    pub fn attach_session(&self, session: &dyn AudioSession) {
        if let Err(e) = session.configure() {
            tracing::error!(error = %e, "Audio session setup failed");
        }

        let mut events = session.subscribe();
        let weak = Arc::downgrade(&self.shared);
        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Missed audio session events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Some(coordinator) = Self::upgrade(&weak) else {
                    break;
                };
                coordinator.handle_session_event(event).await;
            }
            tracing::debug!("Audio session listener stopped");
        });
        self.track_task(task);
    }

    pub async fn handle_session_event(&self, event: SessionEvent) {
        let mut inner = self.shared.inner.lock().await;
        let CoordinatorInner { player, state, .. } = &mut *inner;
        let Some(player) = player.as_mut() else {
            return;
        };

        match event {
            SessionEvent::InterruptionBegan => {
                tracing::info!("Audio interruption began");
                if state.is_playing {
                    player.pause();
                    state.is_playing = false;
                }
            }
            SessionEvent::InterruptionEnded { should_resume } => {
                tracing::info!(should_resume, "Audio interruption ended");
                if should_resume {
                    player.play();
                    state.is_playing = true;
                }
            }
            SessionEvent::RouteChanged { reason } => {
                tracing::debug!(?reason, "Audio route changed");
                if reason == RouteChangeReason::OldDeviceUnavailable && state.is_playing {
                    player.pause();
                    state.is_playing = false;
                }
            }
        }

        self.publish(&inner);
    }

    // ========================================================================
    // Queue
    // ========================================================================

    /// Replace the queue with the playable clips from `clips`.
    ///
    /// Resets timing, leaves playback paused and resolves the duration of the
    /// new head item in the background.
    pub async fn set_clips(&self, clips: Vec<Clip>) {
        let mut inner = self.shared.inner.lock().await;
        inner.clips = clips;
        let items = playable_items(&inner.clips);
        let head = items.first().cloned();
        tracing::info!(clips = inner.clips.len(), playable = items.len(), "Setting playback queue");

        let player = self.ensure_player(&mut inner);
        player.replace_queue(items);
        player.pause();

        inner.state.current_time = 0.0;
        inner.state.duration = 0.0;
        inner.state.is_playing = false;
        inner.state.current_clip_id = head.as_ref().map(|item| item.clip_id.clone());

        inner.generation += 1;
        if let Some(head) = head {
            self.resolve_duration(head.url, inner.generation);
        }
        self.publish(&inner);
    }

    /// Make the clip with `id` current by rotating the queue so it comes
    /// first. Keeps playing if we were playing, stays paused otherwise.
    ///
    /// Unknown ids and clips without a playable URL are ignored.
    pub async fn select_clip(&self, id: &str) {
        let mut inner = self.shared.inner.lock().await;
        let mut items = playable_items(&inner.clips);
        let Some(index) = items.iter().position(|item| item.clip_id == id) else {
            tracing::debug!(clip_id = id, "Ignoring selection of unplayable or unknown clip");
            return;
        };

        items.rotate_left(index);
        let head = items[0].clone();
        let is_playing = inner.state.is_playing;

        let player = self.ensure_player(&mut inner);
        player.replace_queue(items);
        if is_playing {
            player.play();
        } else {
            player.pause();
        }

        inner.state.current_time = 0.0;
        inner.state.duration = 0.0;
        inner.state.current_clip_id = Some(head.clip_id.clone());

        inner.generation += 1;
        tracing::info!(clip_id = id, generation = inner.generation, is_playing, "Selected clip");
        self.resolve_duration(head.url, inner.generation);
        self.publish(&inner);
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub async fn toggle_play_pause(&self) {
        let mut inner = self.shared.inner.lock().await;
        let CoordinatorInner { player, state, .. } = &mut *inner;
        let Some(player) = player.as_mut() else {
            return;
        };

        if state.is_playing {
            player.pause();
        } else {
            player.play();
        }
        state.is_playing = !state.is_playing;
        tracing::debug!(is_playing = state.is_playing, "Toggled playback");
        self.publish(&inner);
    }

    /// Relative seek, clamped to `[0, duration]`
    pub async fn seek_by(&self, delta: f64) {
        let target = {
            let inner = self.shared.inner.lock().await;
            (inner.state.current_time + delta)
                .min(inner.state.duration)
                .max(0.0)
        };
        self.seek_to(target).await;
    }

    /// Absolute seek. The new time is published right away without waiting
    /// for the player to confirm it.
    pub async fn seek_to(&self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let mut inner = self.shared.inner.lock().await;
        let CoordinatorInner { player, state, .. } = &mut *inner;
        let Some(player) = player.as_mut() else {
            return;
        };

        let Ok(position) = Duration::try_from_secs_f64(seconds.max(0.0)) else {
            return;
        };
        player.seek(position);
        state.current_time = seconds;
        self.publish(&inner);
    }

    /// Sample the player: position, late duration, end of item
    pub async fn tick(&self) {
        let mut inner = self.shared.inner.lock().await;
        let CoordinatorInner { player, state, .. } = &mut *inner;
        let Some(player) = player.as_mut() else {
            return;
        };

        state.current_time = player.position().as_secs_f64();
        if let Some(duration) = player.current_duration() {
            let seconds = duration.as_secs_f64();
            if seconds.is_finite() && seconds > 0.0 {
                state.duration = seconds;
            }
        }

        if player.take_played_to_end() {
            let clip_id = player.current_item().map(|item| item.clip_id.clone());
            tracing::debug!(?clip_id, "Item played to end");
            player.pause();
            player.seek(Duration::ZERO);
            state.current_time = 0.0;
            state.is_playing = false;
        }

        self.publish(&inner);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    fn publish(&self, inner: &CoordinatorInner) {
        self.shared.state_tx.send_if_modified(|current| {
            if *current == inner.state {
                false
            } else {
                *current = inner.state.clone();
                true
            }
        });
    }

    fn track_task(&self, task: JoinHandle<()>) {
        let mut tasks = match self.shared.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    fn ensure_player<'a>(&self, inner: &'a mut CoordinatorInner) -> &'a mut Box<dyn QueuePlayer> {
        if inner.player.is_none() {
            self.start_ticker();
        }
        inner.player.get_or_insert_with(|| {
            tracing::debug!("Creating queue player");
            (self.shared.factory)()
        })
    }

    fn start_ticker(&self) {
        let weak = Arc::downgrade(&self.shared);
        let period = self.shared.tick_interval;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(coordinator) = Self::upgrade(&weak) else {
                    break;
                };
                coordinator.tick().await;
            }
        });
        self.track_task(task);
    }

    fn resolve_duration(&self, url: reqwest::Url, generation: u64) {
        let weak = Arc::downgrade(&self.shared);
        let load = self.shared.probe.load_duration(url.clone());
        let task = tokio::spawn(async move {
            let result = load.await;
            let Some(coordinator) = Self::upgrade(&weak) else {
                return;
            };
            let mut inner = coordinator.shared.inner.lock().await;
            if inner.generation != generation {
                tracing::debug!(
                    url = %url,
                    stale = generation,
                    current = inner.generation,
                    "Discarding stale duration"
                );
                return;
            }

            match result {
                Ok(seconds) if seconds.is_finite() => {
                    tracing::debug!(url = %url, seconds, "Resolved duration");
                    inner.state.duration = seconds;
                }
                Ok(seconds) => {
                    tracing::debug!(url = %url, seconds, "Ignoring non-finite duration");
                }
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Duration unavailable");
                }
            }
            coordinator.publish(&inner);
        });
        self.track_task(task);
    }
}

fn playable_items(clips: &[Clip]) -> Vec<PlayerItem> {
    clips
        .iter()
        .filter_map(|clip| {
            clip.playback_url().map(|url| PlayerItem {
                clip_id: clip.id.clone(),
                url,
            })
        })
        .collect()
}
