//! One drill, its controller and an optional game session, ticked together
//!
//! ```text
//! InputSource ──► GameSession.tick ──► DrillStateMachine.tick ──► despawn / spawn
//!   (poll)         (start, countdown)    (input, contacts,          (new target forces
//!                                         timers, feedback)           WoodContact)
//! ```

use crate::drill::{ContactEvent, DrillStateMachine, TickReport};
use crate::feedback::{AudioChannel, ContactState, HapticChannel};
use crate::input::InputSource;
use crate::session::{GameSession, SessionCollaborator};
use tracing::debug;

pub struct Rig<I: InputSource, A: AudioChannel, H: HapticChannel> {
    input: I,
    drill: DrillStateMachine<A, H>,
    session: Option<GameSession>,
    frame: u64,
}

impl<I: InputSource, A: AudioChannel, H: HapticChannel> Rig<I, A, H> {
    pub fn new(input: I, drill: DrillStateMachine<A, H>, session: Option<GameSession>) -> Self {
        Self {
            input,
            drill,
            session,
            frame: 0,
        }
    }

    pub fn tick(&mut self, dt: f32, contacts: &[ContactEvent]) -> TickReport {
        let buttons = self.input.poll();

        if let Some(session) = self.session.as_mut() {
            session.tick(dt, buttons.is_some_and(|b| b.secondary));
        }

        let collaborator = self
            .session
            .as_mut()
            .map(|s| s as &mut dyn SessionCollaborator);
        let report = self.drill.tick(dt, buttons, contacts, collaborator);

        if let Some(session) = self.session.as_mut() {
            for target in &report.removed_targets {
                session.despawn(*target);
            }
            while let Some(target) = session.take_spawned() {
                debug!("Target {} spawned, drill rests on wood", target);
                self.drill.set_contact_state(ContactState::WoodContact);
            }
        }

        self.frame += 1;
        report
    }

    pub fn shutdown(&mut self) -> TickReport {
        self.drill.shutdown()
    }

    pub fn drill(&self) -> &DrillStateMachine<A, H> {
        &self.drill
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::{DrillSettings, TargetId};
    use crate::feedback::{ClipLibrary, FeedbackProfile, SimulatedAudio, SimulatedHaptics};
    use crate::input::{Hand, ReacquiringInput, VirtualController, VirtualProvider};
    use crate::session::SessionSettings;

    type TestRig = Rig<ReacquiringInput<VirtualProvider>, SimulatedAudio, SimulatedHaptics>;

    fn rig(controller: &VirtualController, session: Option<GameSession>) -> TestRig {
        let library = ClipLibrary::new(30.0);
        let drill = DrillStateMachine::new(
            DrillSettings::default(),
            FeedbackProfile::default(),
            SimulatedAudio::new(library.clone()),
            SimulatedHaptics::new(library),
        );
        let input = ReacquiringInput::new(VirtualProvider::new(controller.clone()), Hand::Right);
        Rig::new(input, drill, session)
    }

    fn switch_on(controller: &VirtualController, rig: &mut TestRig) {
        controller.set_grip(true);
        rig.tick(0.5, &[]);
        controller.set_trigger(true);
        rig.tick(0.5, &[]);
        assert!(rig.drill().is_on());
    }

    #[test]
    fn drilling_a_target_scores_and_respawns() {
        let controller = VirtualController::new();
        let session = GameSession::new(SessionSettings::default());
        let mut rig = rig(&controller, Some(session));

        switch_on(&controller, &mut rig);
        controller.set_secondary(true);
        rig.tick(0.5, &[]);
        controller.set_secondary(false);
        assert!(rig.session().is_some_and(|s| s.is_session_active()));
        assert_eq!(rig.drill().contact_state(), ContactState::WoodContact);

        rig.tick(0.5, &[ContactEvent::enter("Cross", 1)]);
        for _ in 0..3 {
            rig.tick(0.5, &[]);
        }
        let report = rig.tick(0.5, &[]);
        assert_eq!(report.removed_targets, vec![TargetId(1)]);

        let session = rig.session().unwrap();
        assert_eq!(session.score(), 10);
        assert_eq!(session.board(), &[TargetId(2)]);
        assert_eq!(rig.drill().contact_state(), ContactState::WoodContact);
    }

    #[test]
    fn disconnect_keeps_drill_running() {
        let controller = VirtualController::new();
        let mut rig = rig(&controller, None);
        switch_on(&controller, &mut rig);

        controller.disconnect();
        let report = rig.tick(0.1, &[]);
        assert!(report.toggle.is_none());
        assert!(rig.drill().is_on());

        controller.reconnect();
        controller.set_trigger(false);
        rig.tick(0.1, &[]);
        assert!(!rig.drill().is_on());
    }

    #[test]
    fn without_session_crosses_are_not_timed() {
        let controller = VirtualController::new();
        let mut rig = rig(&controller, None);
        switch_on(&controller, &mut rig);

        let report = rig.tick(0.5, &[ContactEvent::enter("Cross", 1)]);
        assert!(report.timers_started.is_empty());
        assert_eq!(rig.drill().contact_state(), ContactState::CrossContact);
        assert_eq!(rig.frame(), 3);
    }
}
