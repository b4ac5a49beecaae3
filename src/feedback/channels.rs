//! Coordinated audio, haptic and rotation output for one drill
//!
//! Every activation goes through [`FeedbackChannelController::activate`], which
//! always stops the running audio and haptic output before starting new output.
//! Rapid contact churn therefore never stacks sounds or vibrations.
//!
//! # Audio watcher
//!
//! ```text
//! activate ──► play audio ──► watcher armed ──► (audio ends) ──► rotation stopped
//!    ▲                              │
//!    └── further activations reuse ─┘
//! ```
//!
//! At most one watcher is pending per controller. It is polled in [`tick`] and
//! observes whatever audio is playing at that moment, so later activations keep
//! the bit spinning as long as their sound runs.
//!
//! [`tick`]: FeedbackChannelController::tick

use crate::feedback::backend::{AudioChannel, HapticChannel, HapticHandle};
use crate::feedback::{ContactState, FeedbackProfile, RotationAnimation};
use crate::input::Hand;
use tracing::{debug, info};

pub struct FeedbackChannelController<A: AudioChannel, H: HapticChannel> {
    profile: FeedbackProfile,
    audio: A,
    haptics: H,
    hand: Hand,
    rotation: RotationAnimation,
    haptic_handle: Option<HapticHandle>,
    watcher_pending: bool,
    powered: bool,
}

impl<A: AudioChannel, H: HapticChannel> FeedbackChannelController<A, H> {
    pub fn new(profile: FeedbackProfile, audio: A, haptics: H, hand: Hand) -> Self {
        Self {
            profile,
            audio,
            haptics,
            hand,
            rotation: RotationAnimation::new(),
            haptic_handle: None,
            watcher_pending: false,
            powered: false,
        }
    }

    /// Gates `activate`; set by the drill's on/off toggle.
    pub fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }

    /// Switches all channels to the feedback of `state`.
    ///
    /// Silently ignored while unpowered.
    pub fn activate(&mut self, state: ContactState) {
        if !self.powered {
            debug!("Ignoring activation for {} while drill is off", state);
            return;
        }

        let entry = self.profile.entry(state);

        self.audio.stop();
        if let Some(handle) = self.haptic_handle.take() {
            self.haptics.stop(handle);
        }

        self.audio.play(&entry.audio_clip);
        self.haptic_handle = Some(self.haptics.play(&entry.haptic_clip, self.hand));
        self.rotation.start(entry.rotation_period);

        if !self.watcher_pending {
            debug!("Arming audio completion watcher");
            self.watcher_pending = true;
        }

        info!(
            "Feedback for {}: audio={} haptic={} period={}s",
            state, entry.audio_clip, entry.haptic_clip, entry.rotation_period
        );
    }

    /// Stops rotation and haptics and releases the haptic handle. Idempotent.
    pub fn deactivate(&mut self) {
        self.rotation.stop_and_reset();
        if let Some(handle) = self.haptic_handle.take() {
            self.haptics.stop(handle);
            debug!("Released haptic handle {:?}", handle);
        }
        self.watcher_pending = false;
    }

    pub fn stop_audio(&mut self) {
        self.audio.stop();
    }

    /// Advances backends and rotation, then polls the audio watcher.
    pub fn tick(&mut self, dt: f32) {
        self.audio.advance(dt);
        self.haptics.advance(dt);
        self.rotation.advance(dt);

        if self.watcher_pending && !self.audio.is_playing() {
            debug!("Audio finished, stopping drill bit rotation");
            self.rotation.stop_and_reset();
            self.watcher_pending = false;
        }
    }

    pub fn profile(&self) -> &FeedbackProfile {
        &self.profile
    }

    pub fn rotation(&self) -> &RotationAnimation {
        &self.rotation
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn haptic_handle(&self) -> Option<HapticHandle> {
        self.haptic_handle
    }

    pub fn watcher_pending(&self) -> bool {
        self.watcher_pending
    }
}
