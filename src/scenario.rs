//! Scripted controller and contact timelines for headless runs
//!
//! A [`Scenario`] is a list of timed [`ScriptStep`]s. The [`ScenarioPlayer`]
//! presses buttons on a [`VirtualController`] and hands contact events to the
//! rig as their time comes up. Scenarios can be written in TOML:
//!
//! ```toml
//! name = "wood only"
//! duration = 3.0
//!
//! [[steps]]
//! at = 0.0
//! action = "Grip"
//! held = true
//!
//! [[steps]]
//! at = 1.0
//! action = "Enter"
//! tag = "WoodPlank"
//! target = 100
//! ```

use crate::drill::{ContactEvent, RegionTag, TargetId};
use crate::input::VirtualController;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ScriptAction {
    Grip { held: bool },
    Trigger { held: bool },
    Secondary { held: bool },
    Disconnect,
    Reconnect,
    Enter { tag: RegionTag, target: TargetId },
    Exit { tag: RegionTag, target: TargetId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds since the start of the run
    pub at: f32,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Total run time in seconds
    pub duration: f32,
    pub steps: Vec<ScriptStep>,
}

impl Scenario {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Start a round, bore into a cross twice and score on the second try.
    pub fn demo() -> Self {
        use ScriptAction::*;
        let wood = || RegionTag::WoodPlank;
        let cross = || RegionTag::Cross;
        let step = |at: f32, action| ScriptStep { at, action };

        Scenario {
            name: "demo".to_string(),
            duration: 9.0,
            steps: vec![
                step(0.0, Secondary { held: true }),
                step(0.2, Secondary { held: false }),
                step(0.5, Grip { held: true }),
                step(0.6, Trigger { held: true }),
                step(1.0, Enter { tag: wood(), target: TargetId(100) }),
                step(1.5, Enter { tag: cross(), target: TargetId(1) }),
                step(2.5, Exit { tag: cross(), target: TargetId(1) }),
                step(3.0, Enter { tag: cross(), target: TargetId(1) }),
                step(6.0, Enter { tag: cross(), target: TargetId(2) }),
                step(6.5, Disconnect),
                step(7.0, Reconnect),
                step(7.5, Exit { tag: cross(), target: TargetId(2) }),
                step(8.0, Trigger { held: false }),
                step(8.5, Grip { held: false }),
            ],
        }
    }
}

pub struct ScenarioPlayer {
    steps: Vec<ScriptStep>,
    duration: f32,
    cursor: usize,
    clock: f32,
    controller: VirtualController,
}

impl ScenarioPlayer {
    pub fn new(scenario: Scenario, controller: VirtualController) -> Self {
        let mut steps = scenario.steps;
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        debug!("Loaded scenario '{}' with {} steps", scenario.name, steps.len());
        Self {
            steps,
            duration: scenario.duration,
            cursor: 0,
            clock: 0.0,
            controller,
        }
    }

    /// Applies every step that is due at the current time, then moves the
    /// clock forward by `dt`. Returns the contact events for this tick.
    pub fn advance(&mut self, dt: f32) -> Vec<ContactEvent> {
        let mut events = Vec::new();

        while let Some(step) = self.steps.get(self.cursor) {
            if step.at > self.clock {
                break;
            }
            debug!("t={:.2}s {:?}", self.clock, step.action);
            match &step.action {
                ScriptAction::Grip { held } => self.controller.set_grip(*held),
                ScriptAction::Trigger { held } => self.controller.set_trigger(*held),
                ScriptAction::Secondary { held } => self.controller.set_secondary(*held),
                ScriptAction::Disconnect => self.controller.disconnect(),
                ScriptAction::Reconnect => self.controller.reconnect(),
                ScriptAction::Enter { tag, target } => events.push(ContactEvent::Enter {
                    tag: tag.clone(),
                    target: *target,
                }),
                ScriptAction::Exit { tag, target } => events.push(ContactEvent::Exit {
                    tag: tag.clone(),
                    target: *target,
                }),
            }
            self.cursor += 1;
        }

        self.clock += dt;
        events
    }

    pub fn is_finished(&self) -> bool {
        self.clock >= self.duration
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }
}
