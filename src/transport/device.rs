// Audio device abstraction
// The engine's only external boundary; adapters wrap the real decoder/output

use anyhow::Result;

/// Snapshot of what the device last reported
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceStatus {
    /// Current playback position, in seconds
    pub position_secs: f64,
    pub playing: bool,
    pub loaded: bool,
}

/// Playback primitives the engine drives.
///
/// Positions cross this boundary in seconds, matching how decoder backends
/// expose them; the transport layer owns the millisecond conversion. Commands
/// may complete asynchronously on the device side — the engine never assumes
/// success and only trusts what `status` reports back.
pub trait AudioDevice: Send + Sync {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn seek_to(&self, seconds: f64) -> Result<()>;
    fn set_rate(&self, multiplier: f64) -> Result<()>;
    fn status(&self) -> DeviceStatus;
}
