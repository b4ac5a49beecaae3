use crate::feedback::ContactState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a physical volume the drill can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category attached to a contact volume
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionTag {
    WoodPlank,
    Cross,
    Other(String),
}

impl RegionTag {
    pub fn parse(name: &str) -> Self {
        match name {
            "WoodPlank" => RegionTag::WoodPlank,
            "Cross" => RegionTag::Cross,
            other => RegionTag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegionTag::WoodPlank => "WoodPlank",
            RegionTag::Cross => "Cross",
            RegionTag::Other(name) => name,
        }
    }
}

impl From<String> for RegionTag {
    fn from(name: String) -> Self {
        RegionTag::parse(&name)
    }
}

impl From<RegionTag> for String {
    fn from(tag: RegionTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlap notification from the physics layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEvent {
    Enter { tag: RegionTag, target: TargetId },
    Exit { tag: RegionTag, target: TargetId },
}

impl ContactEvent {
    pub fn enter(tag: &str, target: u64) -> Self {
        ContactEvent::Enter {
            tag: RegionTag::parse(tag),
            target: TargetId(target),
        }
    }

    pub fn exit(tag: &str, target: u64) -> Self {
        ContactEvent::Exit {
            tag: RegionTag::parse(tag),
            target: TargetId(target),
        }
    }

    pub fn tag(&self) -> &RegionTag {
        match self {
            ContactEvent::Enter { tag, .. } | ContactEvent::Exit { tag, .. } => tag,
        }
    }
}

/// Power transition observed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    TurnedOn,
    TurnedOff,
}

/// Everything the drill did during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub toggle: Option<Toggle>,
    /// Contact state after each reactivation, in order
    pub activations: Vec<ContactState>,
    pub timers_started: Vec<TargetId>,
    pub timers_cancelled: Vec<TargetId>,
    pub timers_fired: Vec<TargetId>,
    /// Targets to despawn after their timer fired
    pub removed_targets: Vec<TargetId>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        *self == TickReport::default()
    }
}
