//! Drill state machine
//!
//! Turns grip/trigger input and contact events into feedback activations and
//! collision timers. One call to [`DrillStateMachine::tick`] processes a frame
//! in a fixed order:
//!
//! ```text
//! input ──► contact events ──► collision timers ──► feedback tick
//! (on/off)  (state changes,    (score, spawn,       (rotation, audio
//!            reactivation)      target removal)      watcher)
//! ```
//!
//! # Power
//!
//! ```text
//!        grip held + trigger pressed (edge)
//!   Off ───────────────────────────────────► On
//!    ▲                                       │
//!    └───── trigger released while grip ─────┤
//!    └───── grip released ───────────────────┘
//! ```
//!
//! # Contact precedence
//!
//! `CrossContact > WoodContact > NoContact`. Live overlaps are tracked per tag,
//! powered or not, so that leaving the higher-priority contact falls back to
//! whatever is still touched. While off, events only update the overlaps; the
//! recorded contact state is kept and re-applied on the next power-on.

pub mod events;
pub mod timer;

use crate::feedback::{
    AudioChannel, ContactState, FeedbackChannelController, FeedbackProfile, HapticChannel,
};
use crate::input::{ButtonSnapshot, Hand};
use crate::session::SessionCollaborator;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub use events::{ContactEvent, RegionTag, TargetId, TickReport, Toggle};
pub use timer::{CollisionTimer, CollisionTimers};

/// Which drill behaviour to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrillVariant {
    /// Wood and cross contact, collision timers, session scoring
    #[default]
    Full,
    /// Wood contact only; overlap is tracked while off as well
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    pub variant: DrillVariant,
    pub hand: Hand,
    /// Score added when a collision timer expires
    pub score_per_target: i32,
    /// Seconds of continuous cross contact before a target counts
    pub hold_seconds: f32,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            variant: DrillVariant::Full,
            hand: Hand::Right,
            score_per_target: 10,
            hold_seconds: 2.0,
        }
    }
}

pub struct DrillStateMachine<A: AudioChannel, H: HapticChannel> {
    settings: DrillSettings,
    feedback: FeedbackChannelController<A, H>,
    is_on: bool,
    contact_state: ContactState,
    last_trigger: bool,
    wood_contacts: HashSet<TargetId>,
    cross_contacts: HashSet<TargetId>,
    timers: CollisionTimers,
}

impl<A: AudioChannel, H: HapticChannel> DrillStateMachine<A, H> {
    pub fn new(settings: DrillSettings, profile: FeedbackProfile, audio: A, haptics: H) -> Self {
        info!(
            "Creating {:?} drill for {:?} hand",
            settings.variant, settings.hand
        );
        let feedback = FeedbackChannelController::new(profile, audio, haptics, settings.hand);
        let timers = CollisionTimers::new(settings.hold_seconds);
        Self {
            settings,
            feedback,
            is_on: false,
            contact_state: ContactState::NoContact,
            last_trigger: false,
            wood_contacts: HashSet::new(),
            cross_contacts: HashSet::new(),
            timers,
        }
    }

    /// Runs one frame. `input` is `None` when no controller could be read.
    pub fn tick(
        &mut self,
        dt: f32,
        input: Option<ButtonSnapshot>,
        events: &[ContactEvent],
        mut session: Option<&mut dyn SessionCollaborator>,
    ) -> TickReport {
        let mut report = TickReport::default();

        match input {
            Some(buttons) => self.handle_input(buttons, &mut report),
            None => debug!("No input this tick"),
        }

        for event in events {
            let session_active = session.as_deref().is_some_and(|s| s.is_session_active());
            self.handle_contact(event, session_active, &mut report);
        }

        for target in self.timers.advance(dt) {
            self.complete_target(target, &mut session, &mut report);
        }

        self.feedback.tick(dt);
        report
    }

    fn handle_input(&mut self, buttons: ButtonSnapshot, report: &mut TickReport) {
        let trigger_pressed = buttons.trigger && !self.last_trigger;
        self.last_trigger = buttons.trigger;

        if buttons.grip {
            if !self.is_on && trigger_pressed {
                self.toggle(true, report);
            } else if self.is_on && !buttons.trigger {
                self.toggle(false, report);
            }
        } else if self.is_on {
            self.toggle(false, report);
        }
    }

    fn toggle(&mut self, on: bool, report: &mut TickReport) {
        self.is_on = on;
        self.feedback.set_powered(on);
        self.feedback.stop_audio();

        if on {
            if self.settings.variant == DrillVariant::Simple {
                self.contact_state = self.resolve_contacts();
            }
            self.reactivate(report);
            report.toggle = Some(Toggle::TurnedOn);
            info!("Drill ON ({})", self.contact_state);
        } else {
            self.feedback.deactivate();
            report.timers_cancelled.extend(self.timers.cancel_all());
            report.toggle = Some(Toggle::TurnedOff);
            info!("Drill OFF");
        }
    }

    fn handle_contact(
        &mut self,
        event: &ContactEvent,
        session_active: bool,
        report: &mut TickReport,
    ) {
        match self.settings.variant {
            DrillVariant::Full => self.handle_contact_full(event, session_active, report),
            DrillVariant::Simple => self.handle_contact_simple(event, report),
        }
    }

    fn handle_contact_full(
        &mut self,
        event: &ContactEvent,
        session_active: bool,
        report: &mut TickReport,
    ) {
        if !self.record_overlap(event) {
            debug!("Ignoring contact with untracked tag {}", event.tag());
            return;
        }
        if !self.is_on {
            debug!("Drill off, {:?} only updates overlaps", event);
            return;
        }

        match event {
            ContactEvent::Enter {
                tag: RegionTag::Cross,
                target,
            } => {
                self.set_state(ContactState::CrossContact, report);

                if session_active {
                    if self.timers.start(*target) {
                        report.timers_started.push(*target);
                    }
                } else {
                    debug!("No active session, not timing {}", target);
                }
            }
            ContactEvent::Enter {
                tag: RegionTag::WoodPlank,
                target,
            } => {
                if ContactState::WoodContact.overrides(self.contact_state) {
                    self.set_state(ContactState::WoodContact, report);
                } else {
                    debug!("Wood contact {} ignored during cross contact", target);
                }
            }
            ContactEvent::Exit {
                tag: RegionTag::WoodPlank,
                ..
            } => {
                if self.contact_state == ContactState::WoodContact {
                    let next = self.resolve_contacts();
                    self.set_state(next, report);
                }
            }
            ContactEvent::Exit {
                tag: RegionTag::Cross,
                target,
            } => {
                if self.timers.cancel(*target) {
                    report.timers_cancelled.push(*target);
                }
                if self.contact_state == ContactState::CrossContact {
                    let next = self.resolve_contacts();
                    self.set_state(next, report);
                }
            }
            ContactEvent::Enter {
                tag: RegionTag::Other(_),
                ..
            }
            | ContactEvent::Exit {
                tag: RegionTag::Other(_),
                ..
            } => {}
        }
    }

    /// Keeps the live overlap sets current, powered or not. Returns false for
    /// tags the full drill does not track.
    fn record_overlap(&mut self, event: &ContactEvent) -> bool {
        match event {
            ContactEvent::Enter {
                tag: RegionTag::Cross,
                target,
            } => {
                self.cross_contacts.insert(*target);
            }
            ContactEvent::Exit {
                tag: RegionTag::Cross,
                target,
            } => {
                self.cross_contacts.remove(target);
            }
            ContactEvent::Enter {
                tag: RegionTag::WoodPlank,
                target,
            } => {
                self.wood_contacts.insert(*target);
            }
            ContactEvent::Exit {
                tag: RegionTag::WoodPlank,
                target,
            } => {
                self.wood_contacts.remove(target);
            }
            ContactEvent::Enter { .. } | ContactEvent::Exit { .. } => return false,
        }
        true
    }

    fn handle_contact_simple(&mut self, event: &ContactEvent, report: &mut TickReport) {
        match event {
            ContactEvent::Enter {
                tag: RegionTag::WoodPlank,
                target,
            } => {
                self.wood_contacts.insert(*target);
                if self.is_on {
                    self.set_state(ContactState::WoodContact, report);
                }
            }
            ContactEvent::Exit {
                tag: RegionTag::WoodPlank,
                target,
            } => {
                self.wood_contacts.remove(target);
                if self.is_on && self.contact_state == ContactState::WoodContact {
                    let next = self.resolve_contacts();
                    self.set_state(next, report);
                }
            }
            ContactEvent::Enter { tag, .. } | ContactEvent::Exit { tag, .. } => {
                debug!("Simple drill ignores {} contact", tag);
            }
        }
    }

    fn complete_target(
        &mut self,
        target: TargetId,
        session: &mut Option<&mut dyn SessionCollaborator>,
        report: &mut TickReport,
    ) {
        report.timers_fired.push(target);

        match session.as_mut() {
            Some(session) => {
                session.add_score(self.settings.score_per_target);
                session.request_new_target();
            }
            None => warn!("No session attached, skipping score for {}", target),
        }

        self.cross_contacts.remove(&target);
        report.removed_targets.push(target);

        if self.contact_state == ContactState::CrossContact && self.cross_contacts.is_empty() {
            let next = self.resolve_contacts();
            self.set_state(next, report);
        }
    }

    /// Highest-priority contact among the live overlaps
    fn resolve_contacts(&self) -> ContactState {
        if !self.cross_contacts.is_empty() {
            ContactState::CrossContact
        } else if !self.wood_contacts.is_empty() {
            ContactState::WoodContact
        } else {
            ContactState::NoContact
        }
    }

    fn set_state(&mut self, state: ContactState, report: &mut TickReport) {
        if state != self.contact_state {
            debug!("Contact state {} -> {}", self.contact_state, state);
        }
        self.contact_state = state;
        self.reactivate(report);
    }

    fn reactivate(&mut self, report: &mut TickReport) {
        self.feedback.activate(self.contact_state);
        report.activations.push(self.contact_state);
    }

    /// Forces the contact state from outside, e.g. after a target respawn.
    ///
    /// Returns false and changes nothing while the drill is off.
    pub fn set_contact_state(&mut self, state: ContactState) -> bool {
        if !self.is_on {
            debug!("Ignoring forced {} while drill is off", state);
            return false;
        }
        let mut report = TickReport::default();
        self.set_state(state, &mut report);
        true
    }

    /// Destroy hook: powers down and forgets all live contacts.
    pub fn shutdown(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.is_on {
            self.toggle(false, &mut report);
        }
        self.feedback.stop_audio();
        self.feedback.deactivate();
        self.wood_contacts.clear();
        self.cross_contacts.clear();
        info!("Drill shut down");
        report
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn contact_state(&self) -> ContactState {
        self.contact_state
    }

    pub fn settings(&self) -> &DrillSettings {
        &self.settings
    }

    pub fn feedback(&self) -> &FeedbackChannelController<A, H> {
        &self.feedback
    }

    pub fn timers(&self) -> &CollisionTimers {
        &self.timers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{ClipId, ClipLibrary, SimulatedAudio, SimulatedHaptics};

    type TestDrill = DrillStateMachine<SimulatedAudio, SimulatedHaptics>;

    #[derive(Default)]
    struct RecordingSession {
        active: bool,
        score: i32,
        spawn_requests: u32,
    }

    impl SessionCollaborator for RecordingSession {
        fn is_session_active(&self) -> bool {
            self.active
        }

        fn add_score(&mut self, amount: i32) {
            self.score += amount;
        }

        fn request_new_target(&mut self) {
            self.spawn_requests += 1;
        }
    }

    const DT: f32 = 0.1;
    const ON: ButtonSnapshot = ButtonSnapshot {
        grip: true,
        trigger: true,
        secondary: false,
    };
    const GRIP_ONLY: ButtonSnapshot = ButtonSnapshot {
        grip: true,
        trigger: false,
        secondary: false,
    };
    const RELEASED: ButtonSnapshot = ButtonSnapshot {
        grip: false,
        trigger: false,
        secondary: false,
    };

    fn drill_with(variant: DrillVariant) -> TestDrill {
        // Long clips keep the bit spinning for the whole test
        let library = ClipLibrary::new(60.0);
        DrillStateMachine::new(
            DrillSettings {
                variant,
                ..DrillSettings::default()
            },
            FeedbackProfile::default(),
            SimulatedAudio::new(library.clone()),
            SimulatedHaptics::new(library),
        )
    }

    fn drill() -> TestDrill {
        drill_with(DrillVariant::Full)
    }

    fn turned_on() -> TestDrill {
        let mut drill = drill();
        drill.tick(DT, Some(ON), &[], None);
        assert!(drill.is_on());
        drill
    }

    fn step(drill: &mut TestDrill, events: &[ContactEvent]) -> TickReport {
        drill.tick(DT, Some(ON), events, None)
    }

    fn in_session(
        drill: &mut TestDrill,
        dt: f32,
        events: &[ContactEvent],
        session: &mut RecordingSession,
    ) -> TickReport {
        drill.tick(dt, Some(ON), events, Some(session))
    }

    #[test]
    fn grip_and_trigger_edge_turns_on() {
        let mut drill = drill();
        let report = drill.tick(DT, Some(GRIP_ONLY), &[], None);
        assert!(!drill.is_on());
        assert!(report.is_empty());

        let report = drill.tick(DT, Some(ON), &[], None);
        assert!(drill.is_on());
        assert_eq!(report.toggle, Some(Toggle::TurnedOn));
        assert_eq!(report.activations, vec![ContactState::NoContact]);
        assert_eq!(drill.feedback().rotation().period(), Some(0.25));
    }

    #[test]
    fn held_trigger_does_not_turn_on_again() {
        let mut drill = turned_on();
        drill.tick(DT, Some(ButtonSnapshot::new(false, true)), &[], None);
        assert!(!drill.is_on());

        // Grip again with trigger still held: no rising edge
        drill.tick(DT, Some(ON), &[], None);
        assert!(!drill.is_on());

        drill.tick(DT, Some(GRIP_ONLY), &[], None);
        drill.tick(DT, Some(ON), &[], None);
        assert!(drill.is_on());
    }

    #[test]
    fn trigger_without_grip_stays_off() {
        let mut drill = drill();
        drill.tick(DT, Some(ButtonSnapshot::new(false, true)), &[], None);
        assert!(!drill.is_on());
    }

    #[test]
    fn releasing_trigger_or_grip_turns_off() {
        let mut drill = turned_on();
        let report = drill.tick(DT, Some(GRIP_ONLY), &[], None);
        assert_eq!(report.toggle, Some(Toggle::TurnedOff));
        assert!(!drill.is_on());

        drill.tick(DT, Some(ON), &[], None);
        assert!(drill.is_on());
        drill.tick(DT, Some(RELEASED), &[], None);
        assert!(!drill.is_on());
    }

    #[test]
    fn missing_input_keeps_state() {
        let mut drill = turned_on();
        let report = drill.tick(DT, None, &[], None);
        assert!(drill.is_on());
        assert!(report.toggle.is_none());
    }

    #[test]
    fn turning_off_converges_to_rest() {
        let mut drill = turned_on();
        step(&mut drill, &[ContactEvent::enter("Cross", 1)]);
        drill.tick(DT, Some(RELEASED), &[], None);

        let feedback = drill.feedback();
        assert!(!feedback.rotation().is_spinning());
        assert!(feedback.rotation().is_identity());
        assert!(feedback.haptic_handle().is_none());
        assert_eq!(feedback.haptics().active_voices(), 0);
        assert!(!feedback.audio().is_playing());
    }

    #[test]
    fn wood_never_overrides_cross() {
        let mut drill = turned_on();
        step(&mut drill, &[ContactEvent::enter("Cross", 1)]);
        let report = step(&mut drill, &[ContactEvent::enter("WoodPlank", 2)]);
        assert!(report.activations.is_empty());
        assert_eq!(drill.contact_state(), ContactState::CrossContact);

        let report = step(&mut drill, &[ContactEvent::exit("WoodPlank", 2)]);
        assert!(report.activations.is_empty());
        assert_eq!(drill.contact_state(), ContactState::CrossContact);
    }

    #[test]
    fn leaving_cross_falls_back_to_remaining_wood() {
        let mut drill = turned_on();
        step(
            &mut drill,
            &[
                ContactEvent::enter("WoodPlank", 1),
                ContactEvent::enter("Cross", 2),
            ],
        );
        assert_eq!(drill.contact_state(), ContactState::CrossContact);

        step(&mut drill, &[ContactEvent::exit("Cross", 2)]);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        step(&mut drill, &[ContactEvent::exit("WoodPlank", 1)]);
        assert_eq!(drill.contact_state(), ContactState::NoContact);
    }

    #[test]
    fn events_while_off_keep_state_until_power_on() {
        let mut drill = turned_on();
        step(&mut drill, &[ContactEvent::enter("WoodPlank", 1)]);
        drill.tick(DT, Some(GRIP_ONLY), &[], None);

        let report = drill.tick(DT, Some(GRIP_ONLY), &[ContactEvent::enter("Cross", 2)], None);
        assert!(report.activations.is_empty());
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        let report = drill.tick(DT, Some(ON), &[], None);
        assert_eq!(report.activations, vec![ContactState::WoodContact]);
        assert_eq!(drill.feedback().rotation().period(), Some(0.5));
    }

    #[test]
    fn wood_left_while_off_is_forgotten_after_power_on() {
        let mut drill = turned_on();
        step(&mut drill, &[ContactEvent::enter("WoodPlank", 1)]);
        drill.tick(DT, Some(GRIP_ONLY), &[], None);
        drill.tick(DT, Some(GRIP_ONLY), &[ContactEvent::exit("WoodPlank", 1)], None);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        drill.tick(DT, Some(ON), &[], None);
        step(&mut drill, &[ContactEvent::enter("Cross", 2)]);
        step(&mut drill, &[ContactEvent::exit("Cross", 2)]);
        assert_eq!(drill.contact_state(), ContactState::NoContact);
    }

    #[test]
    fn cross_left_while_off_does_not_block_wood() {
        let mut drill = turned_on();
        step(&mut drill, &[ContactEvent::enter("Cross", 1)]);
        drill.tick(DT, Some(GRIP_ONLY), &[], None);
        drill.tick(DT, Some(GRIP_ONLY), &[ContactEvent::exit("Cross", 1)], None);

        drill.tick(DT, Some(ON), &[], None);
        assert_eq!(drill.contact_state(), ContactState::CrossContact);
        step(&mut drill, &[ContactEvent::enter("WoodPlank", 3)]);
        step(&mut drill, &[ContactEvent::enter("Cross", 2)]);
        step(&mut drill, &[ContactEvent::exit("Cross", 2)]);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        step(&mut drill, &[ContactEvent::exit("WoodPlank", 3)]);
        assert_eq!(drill.contact_state(), ContactState::NoContact);
    }

    #[test]
    fn overlaps_follow_churn_across_power_cycles() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };
        let on_events = [
            ContactEvent::enter("WoodPlank", 1),
            ContactEvent::enter("Cross", 2),
            ContactEvent::enter("Cross", 3),
        ];
        in_session(&mut drill, DT, &on_events, &mut session);
        assert_eq!(drill.timers().len(), 2);

        let report = drill.tick(DT, Some(GRIP_ONLY), &[], Some(&mut session));
        assert_eq!(report.timers_cancelled, vec![TargetId(2), TargetId(3)]);

        let off_events = [
            ContactEvent::exit("Cross", 2),
            ContactEvent::enter("WoodPlank", 4),
            ContactEvent::exit("WoodPlank", 1),
            ContactEvent::enter("Cross", 5),
            ContactEvent::exit("Cross", 3),
        ];
        let report = drill.tick(DT, Some(GRIP_ONLY), &off_events, Some(&mut session));
        assert!(report.activations.is_empty());
        assert!(report.timers_started.is_empty());

        let report = in_session(&mut drill, DT, &[], &mut session);
        assert_eq!(report.activations, vec![ContactState::CrossContact]);
        assert!(drill.timers().is_empty());

        let exit_cross = [ContactEvent::exit("Cross", 5)];
        in_session(&mut drill, DT, &exit_cross, &mut session);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        let exit_wood = [ContactEvent::exit("WoodPlank", 4)];
        in_session(&mut drill, DT, &exit_wood, &mut session);
        assert_eq!(drill.contact_state(), ContactState::NoContact);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn every_activation_leaves_one_voice_per_channel() {
        let mut drill = turned_on();
        let events = [
            ContactEvent::enter("WoodPlank", 1),
            ContactEvent::enter("Cross", 2),
            ContactEvent::enter("Cross", 2),
            ContactEvent::exit("Cross", 2),
            ContactEvent::enter("WoodPlank", 3),
        ];
        for event in events {
            step(&mut drill, &[event]);
            assert_eq!(drill.feedback().audio().active_voices(), 1);
            assert_eq!(drill.feedback().haptics().active_voices(), 1);
        }
    }

    #[test]
    fn set_contact_state_requires_power() {
        let mut drill = drill();
        assert!(!drill.set_contact_state(ContactState::WoodContact));
        assert_eq!(drill.contact_state(), ContactState::NoContact);

        drill.tick(DT, Some(ON), &[], None);
        assert!(drill.set_contact_state(ContactState::WoodContact));
        assert_eq!(
            drill.feedback().audio().current_clip(),
            Some(&ClipId::new("drill_wood_contact"))
        );
    }

    #[test]
    fn cross_timer_requires_active_session() {
        let mut drill = turned_on();
        let report = step(&mut drill, &[ContactEvent::enter("Cross", 1)]);
        assert!(report.timers_started.is_empty());

        let mut session = RecordingSession::default();
        let report = in_session(&mut drill, DT, &[ContactEvent::enter("Cross", 1)], &mut session);
        assert!(report.timers_started.is_empty());
        assert!(drill.timers().is_empty());
    }

    #[test]
    fn held_cross_scores_once_after_two_seconds() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };

        let report = in_session(&mut drill, 0.5, &[ContactEvent::enter("Cross", 9)], &mut session);
        assert_eq!(report.timers_started, vec![TargetId(9)]);

        for _ in 0..3 {
            let report = in_session(&mut drill, 0.5, &[], &mut session);
            assert!(report.timers_fired.is_empty());
        }
        let report = in_session(&mut drill, 0.5, &[], &mut session);
        assert_eq!(report.timers_fired, vec![TargetId(9)]);
        assert_eq!(report.removed_targets, vec![TargetId(9)]);
        assert_eq!(session.score, 10);
        assert_eq!(session.spawn_requests, 1);
        assert_eq!(drill.contact_state(), ContactState::NoContact);

        for _ in 0..5 {
            in_session(&mut drill, 0.5, &[], &mut session);
        }
        assert_eq!(session.score, 10);
    }

    #[test]
    fn exit_before_threshold_cancels_without_score() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };

        in_session(&mut drill, 0.5, &[ContactEvent::enter("Cross", 4)], &mut session);
        in_session(&mut drill, 0.5, &[], &mut session);
        let report = in_session(&mut drill, 0.5, &[ContactEvent::exit("Cross", 4)], &mut session);
        assert_eq!(report.timers_cancelled, vec![TargetId(4)]);

        // Re-entry starts from zero
        in_session(&mut drill, 0.5, &[ContactEvent::enter("Cross", 4)], &mut session);
        for _ in 0..3 {
            let report = in_session(&mut drill, 0.5, &[], &mut session);
            assert!(report.timers_fired.is_empty());
        }
        assert_eq!(session.score, 0);
        in_session(&mut drill, 0.5, &[], &mut session);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn turning_off_cancels_timers() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };
        in_session(&mut drill, 0.5, &[ContactEvent::enter("Cross", 3)], &mut session);
        let report = drill.tick(0.5, Some(RELEASED), &[], Some(&mut session));
        assert_eq!(report.timers_cancelled, vec![TargetId(3)]);

        for _ in 0..10 {
            drill.tick(0.5, Some(RELEASED), &[], Some(&mut session));
        }
        assert_eq!(session.score, 0);
    }

    #[test]
    fn expired_timer_without_session_still_removes_target() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };
        in_session(&mut drill, 1.0, &[ContactEvent::enter("Cross", 5)], &mut session);
        drill.tick(1.0, Some(ON), &[], None);
        let report = drill.tick(1.0, Some(ON), &[], None);
        assert_eq!(report.removed_targets, vec![TargetId(5)]);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn documented_scenario() {
        let mut drill = drill();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };

        in_session(&mut drill, DT, &[], &mut session);
        assert_eq!(drill.contact_state(), ContactState::NoContact);

        in_session(&mut drill, DT, &[ContactEvent::enter("WoodPlank", 1)], &mut session);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);
        assert_eq!(
            drill.feedback().audio().current_clip(),
            Some(&ClipId::new("drill_wood_contact"))
        );
        assert_eq!(drill.feedback().rotation().period(), Some(0.5));

        let report = in_session(&mut drill, DT, &[ContactEvent::enter("Cross", 2)], &mut session);
        assert_eq!(drill.contact_state(), ContactState::CrossContact);
        assert_eq!(drill.feedback().rotation().period(), Some(0.75));
        assert_eq!(report.timers_started, vec![TargetId(2)]);

        for _ in 0..5 {
            in_session(&mut drill, DT, &[], &mut session);
        }
        let report = in_session(&mut drill, DT, &[ContactEvent::exit("Cross", 2)], &mut session);
        assert_eq!(report.timers_cancelled, vec![TargetId(2)]);
        assert_eq!(drill.contact_state(), ContactState::WoodContact);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn simple_variant_tracks_wood_while_off() {
        let mut drill = drill_with(DrillVariant::Simple);
        drill.tick(DT, Some(RELEASED), &[ContactEvent::enter("WoodPlank", 1)], None);
        assert_eq!(drill.contact_state(), ContactState::NoContact);

        let report = drill.tick(DT, Some(ON), &[], None);
        assert_eq!(report.activations, vec![ContactState::WoodContact]);

        let report = step(&mut drill, &[ContactEvent::enter("Cross", 2)]);
        assert!(report.activations.is_empty());
        assert_eq!(drill.contact_state(), ContactState::WoodContact);

        step(&mut drill, &[ContactEvent::exit("WoodPlank", 1)]);
        assert_eq!(drill.contact_state(), ContactState::NoContact);
    }

    #[test]
    fn shutdown_resets_everything() {
        let mut drill = turned_on();
        let mut session = RecordingSession {
            active: true,
            ..RecordingSession::default()
        };
        in_session(&mut drill, DT, &[ContactEvent::enter("Cross", 1)], &mut session);

        let report = drill.shutdown();
        assert_eq!(report.toggle, Some(Toggle::TurnedOff));
        assert!(!drill.is_on());
        assert!(drill.timers().is_empty());
        assert!(!drill.feedback().rotation().is_spinning());

        let report = drill.shutdown();
        assert!(report.is_empty());
    }
}
