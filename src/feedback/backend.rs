//! Output channel traits implemented by audio and haptic backends
//!
//! The feedback controller only ever asks a backend to play a named clip or to
//! stop. Stopping something that is not playing, or a handle that has already
//! been stopped, must be a silent no-op.

use crate::feedback::ClipId;
use crate::input::Hand;

/// Handle to one haptic playback, valid until stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HapticHandle(pub u64);

/// A single audio source attached to the drill
pub trait AudioChannel {
    /// Replaces whatever is playing with `clip`
    fn play(&mut self, clip: &ClipId);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Advances playback by one tick. Engine-driven sources ignore this.
    fn advance(&mut self, _dt: f32) {}
}

/// Haptic clip playback on the hand controllers
pub trait HapticChannel {
    fn play(&mut self, clip: &ClipId, hand: Hand) -> HapticHandle;

    fn stop(&mut self, handle: HapticHandle);

    fn advance(&mut self, _dt: f32) {}
}
