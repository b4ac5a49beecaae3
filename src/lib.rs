//! Contact-driven feedback for a hand-held VR drill
//!
//! The drill turns controller input and contact events into synchronized
//! audio, haptic and rotation feedback, and scores targets held under the bit
//! long enough. Everything runs from a single per-frame tick:
//!
//! 1. [`input`] - button snapshots and device re-acquisition
//! 2. [`drill`] - on/off toggle, contact precedence, collision timers
//! 3. [`feedback`] - stop-before-start output channels
//! 4. [`session`] - timed round with score and target spawning
//! 5. [`rig`] - the frame loop tying the above together
//!
//! # Architecture
//!
//! ```text
//! Controller ──► Rig ──► DrillStateMachine ──► FeedbackChannelController
//!                 │            │
//!                 │            └──► CollisionTimers ──► GameSession
//!                 └────────── spawned target ◄──────────────┘
//! ```

pub mod config;
pub mod drill;
pub mod error;
pub mod feedback;
pub mod input;
pub mod rig;
pub mod scenario;
pub mod session;

pub use error::DrillError;
