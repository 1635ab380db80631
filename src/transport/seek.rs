// Large-seek detection
// Tells deliberate position jumps apart from natural playback drift

/// How the playback position moved between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Ordinary playback drift; consumers can keep interpolating
    Continuous,
    /// A jump large enough to be a deliberate seek; position-driven
    /// consumers should re-baseline instead of assuming smooth continuation
    Seeked,
}

/// Classify one position delta. Jumps only count while playing; a paused
/// position change is the caller's own scrubbing.
pub fn classify(prev_ms: u64, now_ms: u64, playing: bool, threshold_ms: u64) -> Motion {
    if playing && now_ms.abs_diff(prev_ms) > threshold_ms {
        Motion::Seeked
    } else {
        Motion::Continuous
    }
}

/// Stateful wrapper around `classify` that remembers the previous sample
#[derive(Debug)]
pub struct SeekDetector {
    prev_ms: u64,
    threshold_ms: u64,
}

impl SeekDetector {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            prev_ms: 0,
            threshold_ms,
        }
    }

    /// Feed the next observed position. The previous sample is updated even
    /// while paused, so resuming after a paused scrub reads as continuous.
    pub fn observe(&mut self, now_ms: u64, playing: bool) -> Motion {
        let motion = classify(self.prev_ms, now_ms, playing, self.threshold_ms);
        self.prev_ms = now_ms;
        motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_drift_is_continuous() {
        assert_eq!(classify(1000, 1050, true, 500), Motion::Continuous);
        assert_eq!(classify(1050, 1000, true, 500), Motion::Continuous);
    }

    #[test]
    fn test_large_jump_while_playing_is_a_seek() {
        assert_eq!(classify(1000, 1501, true, 500), Motion::Seeked);
        assert_eq!(classify(5000, 100, true, 500), Motion::Seeked);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert_eq!(classify(0, 500, true, 500), Motion::Continuous);
        assert_eq!(classify(0, 501, true, 500), Motion::Seeked);
    }

    #[test]
    fn test_jump_while_paused_is_continuous() {
        assert_eq!(classify(0, 60_000, false, 500), Motion::Continuous);
    }

    #[test]
    fn test_detector_rebaselines_across_paused_scrub() {
        let mut detector = SeekDetector::new(500);
        assert_eq!(detector.observe(40, true), Motion::Continuous);
        // Paused scrub far ahead: not reported as a seek, but remembered
        assert_eq!(detector.observe(10_000, false), Motion::Continuous);
        assert_eq!(detector.observe(10_050, true), Motion::Continuous);
        assert_eq!(detector.observe(80, true), Motion::Seeked);
    }
}
