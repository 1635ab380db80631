// Phrasesync - transcript-synchronized playback engine
// Module declarations
pub mod store;
pub mod timeline;
pub mod transcript;
pub mod transport;

pub use store::{PlaybackState, PlayerStore, NORMAL_RATE};
pub use timeline::{Phrase, Timeline, TimelineItem};
pub use transcript::{PhraseSpec, Speaker, Transcript, TranscriptError};
pub use transport::{AudioDevice, DeviceStatus, Motion, SeekDetector, Transport, TransportConfig};
