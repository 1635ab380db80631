// Playback state store
// Single source of truth for position, active phrase, play flag and rate

use crate::timeline::{self, Timeline};
use crate::transcript::{Speaker, TranscriptError};

/// Rate multiplier for ordinary playback
pub const NORMAL_RATE: f64 = 1.0;

/// Live session state, mirroring the last device-confirmed status plus the
/// active phrase derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub position_ms: u64,
    /// Index of the phrase whose interval contains `position_ms`
    pub active_index: usize,
    pub is_playing: bool,
    pub is_loaded: bool,
    pub rate: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            position_ms: 0,
            active_index: 0,
            is_playing: false,
            is_loaded: false,
            rate: NORMAL_RATE,
        }
    }
}

/// Owns the timeline and the playback state; every mutation keeps the
/// position/active-index pairing consistent. Created once per session.
#[derive(Debug, Default)]
pub struct PlayerStore {
    timeline: Timeline,
    state: PlaybackState,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and install a fresh timeline, resetting the session state.
    /// `is_loaded` drops to false until the device re-confirms readiness.
    pub fn load_timeline(
        &mut self,
        speakers: &[Speaker],
        pause_ms: u64,
    ) -> Result<(), TranscriptError> {
        self.timeline = timeline::build(speakers, pause_ms)?;
        self.state.position_ms = 0;
        self.state.active_index = 0;
        self.state.is_loaded = false;
        Ok(())
    }

    /// Record an observed position and re-derive the active phrase.
    ///
    /// Positions outside every interval (past the end, or inside an
    /// inter-phrase pause) pin to the last phrase; an empty timeline leaves
    /// the active index untouched. Idempotent for a fixed position.
    pub fn set_position(&mut self, ms: u64) {
        if !self.timeline.is_empty() {
            self.state.active_index = self
                .timeline
                .index_at(ms)
                .unwrap_or(self.timeline.len() - 1);
        }
        self.state.position_ms = ms;
    }

    /// Move the current-phrase pointer directly, clamping out-of-range
    /// indices. Position snaps to the phrase start so the pointer and the
    /// displayed position never disagree around a seek.
    pub fn step_to_index(&mut self, index: isize) {
        if self.timeline.is_empty() {
            return;
        }
        let clamped = index.clamp(0, self.timeline.len() as isize - 1) as usize;
        if let Some(item) = self.timeline.get(clamped) {
            self.state.active_index = clamped;
            self.state.position_ms = item.start_ms;
        }
    }

    /// Step forward or back relative to the active phrase
    pub fn step_relative(&mut self, delta: isize) {
        self.step_to_index(self.state.active_index as isize + delta);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.is_playing = playing;
    }

    pub fn mark_loaded(&mut self, loaded: bool) {
        self.state.is_loaded = loaded;
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.state.rate = rate;
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn position_ms(&self) -> u64 {
        self.state.position_ms
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded
    }

    pub fn rate(&self) -> f64 {
        self.state.rate
    }

    /// Whether playback has run past the end of the last phrase
    pub fn is_finished(&self) -> bool {
        !self.timeline.is_empty() && self.state.position_ms >= self.timeline.total_ms()
    }
}
