//! Feedback subsystem for the drill tool
//!
//! Maps a [`ContactState`] onto three output channels that must stay in step:
//!
//! 1. [`backend`] - audio and haptic backend traits
//! 2. [`channels`] - the controller that stops before it starts
//! 3. [`rotation`] - the spinning drill bit
//!
//! ```text
//! ContactState ──► FeedbackProfile ──► FeedbackChannelController ──► audio
//!                                                        ├──────────► haptics
//!                                                        └──────────► rotation
//! ```

pub mod backend;
pub mod channels;
pub mod contact;
pub mod profile;
pub mod rotation;
pub mod simulated;

pub use backend::{AudioChannel, HapticChannel, HapticHandle};
pub use channels::FeedbackChannelController;
pub use contact::ContactState;
pub use profile::{ClipId, FeedbackEntry, FeedbackProfile};
pub use rotation::RotationAnimation;
pub use simulated::{ClipLibrary, SimulatedAudio, SimulatedHaptics};
