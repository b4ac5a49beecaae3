//! Game session the drill reports to
//!
//! The drill only needs three things from a session: whether one is running,
//! a place to add score, and a way to ask for the next target. [`GameSession`]
//! is the stock implementation with a fixed-length countdown.

pub mod game_session;

pub use game_session::{GameSession, SessionSettings};

/// Services the drill consumes from the surrounding game
pub trait SessionCollaborator {
    fn is_session_active(&self) -> bool;

    fn add_score(&mut self, amount: i32);

    fn request_new_target(&mut self);
}
