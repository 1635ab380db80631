// Transport controller
// Drives the audio device and keeps the player store consistent

pub mod device;
pub mod seek;

pub use device::{AudioDevice, DeviceStatus};
pub use seek::{classify, Motion, SeekDetector};

use crate::store::{PlayerStore, NORMAL_RATE};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Tunables for the transport layer
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Rate used while replaying a single phrase
    pub repeat_rate: f64,
    /// How often the bounded-repeat loop samples the device position
    pub poll_interval: Duration,
    /// Position delta treated as a deliberate seek rather than drift
    pub seek_threshold_ms: u64,
    /// How far into a phrase a step-back restarts it instead of moving back
    pub rewind_threshold_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            repeat_rate: 0.75,
            poll_interval: Duration::from_millis(50),
            seek_threshold_ms: 500,
            rewind_threshold_ms: 300,
        }
    }
}

/// Orchestrates the audio device against the player store: seeks, play/pause,
/// the bounded-repeat protocol, and status feedback.
///
/// Holds at most one live repeat-watch task; any command that supersedes a
/// repeat cancels the watch before touching the device, so stale timers can
/// never pause playback or reset the rate after the mode has moved on.
pub struct Transport<D: AudioDevice + 'static> {
    device: Arc<D>,
    store: Arc<Mutex<PlayerStore>>,
    config: TransportConfig,
    detector: Mutex<SeekDetector>,
    repeat_watch: Mutex<Option<JoinHandle<()>>>,
}

impl<D: AudioDevice + 'static> Transport<D> {
    pub fn new(device: Arc<D>, store: Arc<Mutex<PlayerStore>>) -> Self {
        Self::with_config(device, store, TransportConfig::default())
    }

    pub fn with_config(
        device: Arc<D>,
        store: Arc<Mutex<PlayerStore>>,
        config: TransportConfig,
    ) -> Self {
        let detector = Mutex::new(SeekDetector::new(config.seek_threshold_ms));
        Self {
            device,
            store,
            config,
            detector,
            repeat_watch: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<PlayerStore>> {
        &self.store
    }

    /// Start playback at the store's current rate
    pub fn play(&self) -> Result<()> {
        let rate = self.store.lock().rate();
        self.device.set_rate(rate)?;
        self.device.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.device.pause()
    }

    /// Seek to an absolute position. Supersedes any running phrase repeat,
    /// restoring normal rate if one was active.
    pub fn seek_to(&self, ms: u64) -> Result<()> {
        if self.cancel_repeat_watch() {
            self.device.set_rate(NORMAL_RATE)?;
            self.store.lock().set_rate(NORMAL_RATE);
        }
        self.device.seek_to(ms_to_secs(ms))
    }

    /// Jump to a phrase boundary, always resuming at normal rate
    pub fn rewind_to_phrase_start(&self, start_ms: u64) -> Result<()> {
        self.cancel_repeat_watch();
        self.device.set_rate(NORMAL_RATE)?;
        self.store.lock().set_rate(NORMAL_RATE);
        self.device.seek_to(ms_to_secs(start_ms))
    }

    /// Replay one phrase interval at the reduced repeat rate.
    ///
    /// Seeks to `start_ms`, plays, and watches the device position on a fixed
    /// interval; once it reaches `end_ms` the device is paused and normal rate
    /// restored, exactly once. A repeat issued while another is in flight
    /// cancels the earlier watch first, so only one can ever fire.
    pub fn repeat_phrase(&self, start_ms: u64, end_ms: u64) -> Result<()> {
        self.cancel_repeat_watch();

        self.device.set_rate(self.config.repeat_rate)?;
        self.store.lock().set_rate(self.config.repeat_rate);
        self.device.seek_to(ms_to_secs(start_ms))?;
        self.device.play()?;
        tracing::debug!(start_ms, end_ms, "repeat_started");

        let device = Arc::clone(&self.device);
        let store = Arc::clone(&self.store);
        let poll_interval = self.config.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if position_ms(&device.status()) >= end_ms {
                    break;
                }
            }
            if let Err(e) = device.pause() {
                tracing::warn!(error = %e, "repeat_pause_failed");
            }
            if let Err(e) = device.set_rate(NORMAL_RATE) {
                tracing::warn!(error = %e, "repeat_rate_restore_failed");
            }
            store.lock().set_rate(NORMAL_RATE);
            tracing::debug!(end_ms, "repeat_bound_reached");
        });
        *self.repeat_watch.lock() = Some(handle);
        Ok(())
    }

    /// Pull the device status into the store and classify the position motion.
    ///
    /// This is the only path by which position, play flag and loaded flag
    /// enter the store; hosts call it on every device notification or poll
    /// tick, in arrival order.
    pub fn sync_status(&self) -> Motion {
        let status = self.device.status();
        let position = position_ms(&status);
        {
            let mut store = self.store.lock();
            store.mark_loaded(status.loaded);
            store.set_playing(status.playing);
            store.set_position(position);
        }
        self.detector.lock().observe(position, status.playing)
    }

    /// Play/pause toggle, restarting from the first phrase once playback
    /// has finished
    pub fn toggle(&self) -> Result<()> {
        let (playing, finished) = {
            let store = self.store.lock();
            (store.is_playing(), store.is_finished())
        };
        if playing && !finished {
            return self.pause();
        }
        if finished {
            self.store.lock().step_to_index(0);
            self.seek_to(0)?;
        }
        self.play()
    }

    /// Step back: restart the active phrase when already well into it,
    /// otherwise move to the previous phrase. Resumes playback either way.
    pub fn step_back(&self) -> Result<()> {
        enum Target {
            Restart(u64),
            Previous(usize, u64),
        }
        let target = {
            let store = self.store.lock();
            let timeline = store.timeline();
            let Some(current) = timeline.get(store.active_index()) else {
                return Ok(());
            };
            if store.position_ms() > current.start_ms + self.config.rewind_threshold_ms {
                Target::Restart(current.start_ms)
            } else {
                let prev = store.active_index().saturating_sub(1);
                let start_ms = timeline.get(prev).map_or(0, |item| item.start_ms);
                Target::Previous(prev, start_ms)
            }
        };
        match target {
            Target::Restart(start_ms) => {
                self.rewind_to_phrase_start(start_ms)?;
                self.play()
            }
            Target::Previous(index, start_ms) => {
                self.store.lock().step_to_index(index as isize);
                self.seek_to(start_ms)?;
                self.play()
            }
        }
    }

    /// Step to the next phrase, clamping at the end of the timeline
    pub fn step_forward(&self) -> Result<()> {
        let target = {
            let store = self.store.lock();
            let timeline = store.timeline();
            if timeline.is_empty() {
                return Ok(());
            }
            let next = (store.active_index() + 1).min(timeline.len() - 1);
            let start_ms = timeline.get(next).map_or(0, |item| item.start_ms);
            (next, start_ms)
        };
        self.store.lock().step_to_index(target.0 as isize);
        self.seek_to(target.1)
    }

    /// Cancel any outstanding repeat watch. Session teardown must call this
    /// (Drop also does) so no timer outlives the device.
    pub fn shutdown(&self) {
        self.cancel_repeat_watch();
    }

    /// Returns whether a live watch was actually cancelled
    fn cancel_repeat_watch(&self) -> bool {
        match self.repeat_watch.lock().take() {
            Some(handle) => {
                let was_live = !handle.is_finished();
                handle.abort();
                if was_live {
                    tracing::debug!("repeat_watch_cancelled");
                }
                was_live
            }
            None => false,
        }
    }
}

impl<D: AudioDevice + 'static> Drop for Transport<D> {
    fn drop(&mut self) {
        self.cancel_repeat_watch();
    }
}

fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Truncate the device's reported position toward zero at millisecond
/// resolution, clamping negatives from sloppy backends
fn position_ms(status: &DeviceStatus) -> u64 {
    (status.position_secs.max(0.0) * 1000.0).floor() as u64
}
