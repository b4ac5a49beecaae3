//! Contact states and their precedence

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the drill bit is currently touching.
///
/// Variants are declared in precedence order, so `Ord` gives
/// `CrossContact > WoodContact > NoContact`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ContactState {
    #[default]
    NoContact,
    WoodContact,
    CrossContact,
}

impl ContactState {
    pub const COUNT: usize = 3;

    pub const ALL: [ContactState; Self::COUNT] = [
        ContactState::NoContact,
        ContactState::WoodContact,
        ContactState::CrossContact,
    ];

    pub fn index(self) -> usize {
        match self {
            ContactState::NoContact => 0,
            ContactState::WoodContact => 1,
            ContactState::CrossContact => 2,
        }
    }

    /// Whether `self` may replace `current` when both contacts are live.
    pub fn overrides(self, current: ContactState) -> bool {
        self >= current
    }
}

impl fmt::Display for ContactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactState::NoContact => write!(f, "NoContact"),
            ContactState::WoodContact => write!(f, "WoodContact"),
            ContactState::CrossContact => write!(f, "CrossContact"),
        }
    }
}
