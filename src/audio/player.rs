//! `rodio` backed queue player
//!
//! Only the head of the queue is ever loaded into the sink; the rest of the
//! queue is bookkeeping, since the coordinator never auto-advances. The
//! output stream lives on its own thread because `rodio::OutputStream` cannot
//! move between threads.

use std::io::Cursor;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::runtime::Handle;

use super::fetch::AudioFetcher;
use crate::playback::{PlayerItem, QueuePlayer};

/// Keeps the output stream alive; dropping it closes the stream thread
struct OutputThread {
    _shutdown: mpsc::Sender<()>,
}

fn open_output() -> Result<(OutputThread, OutputStreamHandle)> {
    let (handle_tx, handle_rx) = mpsc::channel();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    std::thread::Builder::new()
        .name("audio-output".to_string())
        .spawn(move || match OutputStream::try_default() {
            Ok((_stream, handle)) => {
                let _ = handle_tx.send(Ok(handle));
                // Blocks until the player drops its sender
                let _ = shutdown_rx.recv();
                tracing::debug!("Audio output thread exiting");
            }
            Err(e) => {
                let _ = handle_tx.send(Err(e));
            }
        })
        .context("failed to spawn audio output thread")?;

    let handle = handle_rx
        .recv()
        .context("audio output thread exited early")?
        .context("no audio output device")?;

    Ok((OutputThread { _shutdown: shutdown_tx }, handle))
}

/// What we know about the item currently in the sink
#[derive(Default)]
struct LoadedItem {
    generation: u64,
    bytes: Option<Bytes>,
    duration: Option<Duration>,
}

impl LoadedItem {
    /// Record a finished load if it belongs to the current generation
    fn accept(&mut self, generation: u64, bytes: Bytes, duration: Option<Duration>) -> bool {
        if self.generation != generation {
            return false;
        }
        self.bytes = Some(bytes);
        self.duration = duration;
        true
    }
}

pub struct RodioQueuePlayer {
    sink: Option<Arc<Sink>>,
    _output: Option<OutputThread>,
    queue: Vec<PlayerItem>,
    fetcher: AudioFetcher,
    runtime: Handle,
    generation: u64,
    loaded: Arc<std::sync::Mutex<LoadedItem>>,
    end_reported: bool,
}

impl RodioQueuePlayer {
    /// Open the default output device. Without one the player stays silent
    /// but still tracks its queue.
    pub fn new(fetcher: AudioFetcher, runtime: Handle) -> Self {
        let (output, sink) = match open_output().and_then(|(output, handle)| {
            let sink = Sink::try_new(&handle).context("failed to create audio sink")?;
            Ok((output, sink))
        }) {
            Ok((output, sink)) => {
                tracing::info!("Audio output opened");
                (Some(output), Some(Arc::new(sink)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audio output unavailable, playback will be silent");
                (None, None)
            }
        };

        Self {
            sink,
            _output: output,
            queue: Vec::new(),
            fetcher,
            runtime,
            generation: 0,
            loaded: Arc::new(std::sync::Mutex::new(LoadedItem::default())),
            end_reported: false,
        }
    }

    fn loaded(&self) -> std::sync::MutexGuard<'_, LoadedItem> {
        match self.loaded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fetch and decode the head item in the background, then hand it to the
    /// sink unless the queue changed in the meantime.
    fn load_head(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        // Reset before clearing: a load holding the lock finishes its append
        // first and the clear below removes it.
        *self.loaded() = LoadedItem {
            generation,
            ..Default::default()
        };
        self.end_reported = false;

        let (Some(sink), Some(head)) = (self.sink.clone(), self.queue.first().cloned()) else {
            return;
        };
        sink.clear();

        let fetcher = self.fetcher.clone();
        let loaded = self.loaded.clone();
        self.runtime.spawn(async move {
            let bytes = match fetcher.fetch(&head.url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(clip_id = %head.clip_id, error = %e, "Failed to download clip audio");
                    return;
                }
            };

            let buffer = bytes.clone();
            let source = match tokio::task::spawn_blocking(move || Decoder::new(Cursor::new(buffer))).await {
                Ok(Ok(source)) => source,
                Ok(Err(e)) => {
                    tracing::warn!(clip_id = %head.clip_id, error = %e, "Failed to decode clip audio");
                    return;
                }
                Err(e) => {
                    tracing::warn!(clip_id = %head.clip_id, error = %e, "Audio decode task panicked");
                    return;
                }
            };

            let mut loaded = match loaded.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let duration = source.total_duration();
            if !loaded.accept(generation, bytes, duration) {
                tracing::debug!(clip_id = %head.clip_id, "Queue changed before audio loaded");
                return;
            }
            // Still under the lock, so a newer load_head cannot clear in between
            sink.append(source);
            tracing::debug!(clip_id = %head.clip_id, ?duration, "Clip audio ready");
        });
    }

    /// Put the current item back into an exhausted sink
    fn reload_from_buffer(&mut self, sink: &Sink) -> bool {
        let Some(bytes) = self.loaded().bytes.clone() else {
            return false;
        };
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                sink.append(source);
                self.end_reported = false;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to re-decode clip audio");
                false
            }
        }
    }
}

impl QueuePlayer for RodioQueuePlayer {
    fn replace_queue(&mut self, items: Vec<PlayerItem>) {
        tracing::debug!(items = items.len(), "Replacing player queue");
        self.queue = items;
        self.load_head();
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: Duration) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        if sink.empty() && !self.reload_from_buffer(&sink) {
            return;
        }
        if let Err(e) = sink.try_seek(position) {
            tracing::warn!(?position, error = %e, "Seek failed");
        }
    }

    fn position(&self) -> Duration {
        match &self.sink {
            Some(sink) if !sink.empty() => sink.get_pos(),
            _ => Duration::ZERO,
        }
    }

    fn current_item(&self) -> Option<&PlayerItem> {
        self.queue.first()
    }

    fn current_duration(&self) -> Option<Duration> {
        self.loaded().duration
    }

    fn take_played_to_end(&mut self) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };
        let finished = sink.empty() && self.loaded().bytes.is_some();
        if finished && !self.end_reported {
            self.end_reported = true;
            return true;
        }
        false
    }
}
