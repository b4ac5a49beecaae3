//! Contact state → feedback lookup table
//!
//! A [`FeedbackProfile`] can only be built through [`FeedbackProfile::from_entries`],
//! which rejects tables that do not cover every [`ContactState`]. Lookups on a
//! built profile therefore never fail.

use crate::error::DrillError;
use crate::feedback::ContactState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Name of an audio or haptic asset, resolved by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feedback parameters for one contact state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub state: ContactState,
    pub audio_clip: ClipId,
    pub haptic_clip: ClipId,
    /// Seconds per full turn of the drill bit
    pub rotation_period: f32,
}

impl FeedbackEntry {
    pub fn new(
        state: ContactState,
        audio_clip: &str,
        haptic_clip: &str,
        rotation_period: f32,
    ) -> Self {
        Self {
            state,
            audio_clip: ClipId::new(audio_clip),
            haptic_clip: ClipId::new(haptic_clip),
            rotation_period,
        }
    }

    fn validate(&self) -> Result<(), DrillError> {
        if !self.rotation_period.is_finite() || self.rotation_period <= 0.0 {
            return Err(DrillError::InvalidRotationPeriod {
                state: self.state,
                period: self.rotation_period,
            });
        }
        if self.audio_clip.as_str().is_empty() {
            return Err(DrillError::EmptyClipName {
                state: self.state,
                channel: "audio",
            });
        }
        if self.haptic_clip.as_str().is_empty() {
            return Err(DrillError::EmptyClipName {
                state: self.state,
                channel: "haptic",
            });
        }
        Ok(())
    }
}

/// Immutable, complete mapping from contact state to feedback
#[derive(Debug, Clone)]
pub struct FeedbackProfile {
    entries: [FeedbackEntry; ContactState::COUNT],
}

impl FeedbackProfile {
    /// Validates and builds a profile.
    ///
    /// Every contact state needs exactly one entry with a positive rotation
    /// period and non-empty clip names.
    pub fn from_entries(
        entries: impl IntoIterator<Item = FeedbackEntry>,
    ) -> Result<Self, DrillError> {
        let mut slots: [Option<FeedbackEntry>; ContactState::COUNT] = [None, None, None];

        for entry in entries {
            entry.validate()?;
            let slot = &mut slots[entry.state.index()];
            if slot.is_some() {
                return Err(DrillError::DuplicateFeedbackEntry(entry.state));
            }
            *slot = Some(entry);
        }

        let [no_contact, wood, cross] = slots;
        let take = |slot: Option<FeedbackEntry>, state| {
            slot.ok_or(DrillError::MissingFeedbackEntry(state))
        };
        let entries = [
            take(no_contact, ContactState::NoContact)?,
            take(wood, ContactState::WoodContact)?,
            take(cross, ContactState::CrossContact)?,
        ];

        debug!("Feedback profile validated with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn entry(&self, state: ContactState) -> &FeedbackEntry {
        &self.entries[state.index()]
    }

    pub fn rotation_period(&self, state: ContactState) -> f32 {
        self.entry(state).rotation_period
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.entries.iter()
    }
}

impl Default for FeedbackProfile {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

/// Stock drill sounds and rumble clips, slower spin on harder material
pub fn default_entries() -> [FeedbackEntry; ContactState::COUNT] {
    [
        FeedbackEntry::new(
            ContactState::NoContact,
            "drill_no_contact",
            "haptic_no_contact",
            0.25,
        ),
        FeedbackEntry::new(
            ContactState::WoodContact,
            "drill_wood_contact",
            "haptic_wood_contact",
            0.5,
        ),
        FeedbackEntry::new(
            ContactState::CrossContact,
            "drill_cross_contact",
            "haptic_cross_contact",
            0.75,
        ),
    ]
}
