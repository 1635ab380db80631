// Timeline construction
// Places interleaved speaker phrases on one absolute time axis

use crate::transcript::{validate_speakers, Speaker, TranscriptError};

/// One utterance by one speaker, tagged with its per-speaker sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub speaker: String,
    pub words: String,
    pub duration_ms: u64,
    pub index_in_speaker: usize,
}

/// A phrase placed on the absolute playback timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem {
    pub phrase: Phrase,
    /// Offset from the start of the audio track, in milliseconds
    pub start_ms: u64,
    pub end_ms: u64,
    pub global_index: usize,
}

/// Ordered, non-overlapping phrase intervals. Immutable once built; the
/// player store replaces it wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    items: Vec<TimelineItem>,
}

impl Timeline {
    /// A timeline with no phrases, the state before any transcript is loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineItem> {
        self.items.get(index)
    }

    pub fn last(&self) -> Option<&TimelineItem> {
        self.items.last()
    }

    pub fn items(&self) -> impl Iterator<Item = &TimelineItem> {
        self.items.iter()
    }

    /// End of the last phrase, which is the total playable span (0 when empty)
    pub fn total_ms(&self) -> u64 {
        self.items.last().map_or(0, |item| item.end_ms)
    }

    /// Find the phrase whose `[start, end)` interval contains `ms`
    pub fn index_at(&self, ms: u64) -> Option<usize> {
        self.items
            .iter()
            .position(|item| ms >= item.start_ms && ms < item.end_ms)
    }
}

/// Build a timeline from per-speaker phrase lists.
///
/// Phrases are interleaved round-robin across speakers in their given order,
/// producing a conversational turn order even with uneven phrase counts.
/// A single cursor then places each phrase back to back with a fixed pause
/// in between, so intervals never overlap.
///
/// Rejects malformed input (empty speaker names, empty words, zero-duration
/// phrases) before placing anything.
pub fn build(speakers: &[Speaker], pause_ms: u64) -> Result<Timeline, TranscriptError> {
    validate_speakers(speakers)?;

    let max_len = speakers
        .iter()
        .map(|speaker| speaker.phrases.len())
        .max()
        .unwrap_or(0);

    let mut ordered = Vec::new();
    for index_in_speaker in 0..max_len {
        for speaker in speakers {
            // Exhausted speakers simply stop contributing
            if let Some(spec) = speaker.phrases.get(index_in_speaker) {
                ordered.push(Phrase {
                    speaker: speaker.name.clone(),
                    words: spec.words.clone(),
                    duration_ms: spec.duration_ms,
                    index_in_speaker,
                });
            }
        }
    }

    let mut cursor = 0u64;
    let items = ordered
        .into_iter()
        .enumerate()
        .map(|(global_index, phrase)| {
            let start_ms = cursor;
            let end_ms = start_ms + phrase.duration_ms;
            cursor = end_ms + pause_ms;
            TimelineItem {
                phrase,
                start_ms,
                end_ms,
                global_index,
            }
        })
        .collect();

    Ok(Timeline { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::PhraseSpec;

    fn speaker(name: &str, durations: &[u64]) -> Speaker {
        Speaker {
            name: name.to_string(),
            phrases: durations
                .iter()
                .enumerate()
                .map(|(i, &duration_ms)| PhraseSpec {
                    words: format!("{} phrase {}", name, i),
                    duration_ms,
                })
                .collect(),
        }
    }

    #[test]
    fn test_interleave_order_and_placement() {
        // A=[500, 300], B=[700], pause=100 -> [a0, b0, a1]
        let speakers = vec![speaker("A", &[500, 300]), speaker("B", &[700])];
        let timeline = build(&speakers, 100).unwrap();

        assert_eq!(timeline.len(), 3);
        let speakers_in_order: Vec<_> = timeline
            .items()
            .map(|item| item.phrase.speaker.as_str())
            .collect();
        assert_eq!(speakers_in_order, ["A", "B", "A"]);

        let starts: Vec<_> = timeline.items().map(|item| item.start_ms).collect();
        let ends: Vec<_> = timeline.items().map(|item| item.end_ms).collect();
        assert_eq!(starts, [0, 600, 1400]);
        assert_eq!(ends, [500, 1300, 1700]);
    }

    #[test]
    fn test_index_in_speaker_tracks_rounds() {
        let speakers = vec![speaker("A", &[500, 300]), speaker("B", &[700])];
        let timeline = build(&speakers, 100).unwrap();
        let rounds: Vec<_> = timeline
            .items()
            .map(|item| item.phrase.index_in_speaker)
            .collect();
        assert_eq!(rounds, [0, 0, 1]);
    }

    #[test]
    fn test_no_overlap_and_uniform_gap() {
        let speakers = vec![speaker("A", &[250, 90, 400]), speaker("B", &[120, 60])];
        let pause = 150;
        let timeline = build(&speakers, pause).unwrap();

        let items: Vec<_> = timeline.items().collect();
        for pair in items.windows(2) {
            assert!(pair[1].start_ms >= pair[0].end_ms);
            assert_eq!(pair[1].start_ms, pair[0].end_ms + pause);
        }
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.global_index, i);
            assert_eq!(item.end_ms, item.start_ms + item.phrase.duration_ms);
            assert!(item.end_ms > item.start_ms);
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let speakers = vec![speaker("A", &[500, 300]), speaker("B", &[700, 200])];
        let first = build(&speakers, 100).unwrap();
        let second = build(&speakers, 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_speaker_list_builds_empty_timeline() {
        let timeline = build(&[], 100).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_ms(), 0);
        assert_eq!(timeline.index_at(0), None);
    }

    #[test]
    fn test_speaker_with_no_phrases_contributes_nothing() {
        let speakers = vec![speaker("A", &[]), speaker("B", &[700])];
        let timeline = build(&speakers, 100).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.get(0).unwrap().phrase.speaker, "B");
    }

    #[test]
    fn test_zero_duration_phrase_is_rejected() {
        let speakers = vec![speaker("A", &[500, 0])];
        assert!(matches!(
            build(&speakers, 100),
            Err(TranscriptError::ZeroDuration { .. })
        ));
    }

    #[test]
    fn test_zero_pause_places_phrases_back_to_back() {
        let speakers = vec![speaker("A", &[500]), speaker("B", &[700])];
        let timeline = build(&speakers, 0).unwrap();
        assert_eq!(timeline.get(1).unwrap().start_ms, 500);
        assert_eq!(timeline.total_ms(), 1200);
    }

    #[test]
    fn test_index_at_finds_containing_interval() {
        let speakers = vec![speaker("A", &[500, 300]), speaker("B", &[700])];
        let timeline = build(&speakers, 100).unwrap();

        assert_eq!(timeline.index_at(0), Some(0));
        assert_eq!(timeline.index_at(499), Some(0));
        // End offsets are exclusive
        assert_eq!(timeline.index_at(500), None);
        assert_eq!(timeline.index_at(650), Some(1));
        assert_eq!(timeline.index_at(1400), Some(2));
        assert_eq!(timeline.index_at(2000), None);
    }
}
