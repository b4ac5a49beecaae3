//! gilrs-backed input for running the drill from a regular gamepad
//!
//! The bumper acts as grip, the analog trigger as drill trigger and the east
//! face button as the secondary button. If the active gamepad disappears, the
//! first connected one is selected on the next poll.

use super::{ButtonSnapshot, Hand, InputSource, LinkState};
use gilrs::{Button, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum GamepadError {
    #[error("Failed to initialize gilrs: {0}")]
    InitializationError(String),
}

pub struct GamepadInput {
    gilrs: Gilrs,
    hand: Hand,
    active_gamepad: Option<GamepadId>,
    link: LinkState,
}

impl GamepadInput {
    pub fn new(hand: Hand) -> Result<Self, GamepadError> {
        info!("Initializing gilrs controller interface");
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            GamepadError::InitializationError(e.to_string())
        })?;

        let mut input = Self {
            gilrs,
            hand,
            active_gamepad: None,
            link: LinkState::default(),
        };
        input.select_gamepad();
        Ok(input)
    }

    fn select_gamepad(&mut self) {
        self.active_gamepad = self
            .gilrs
            .gamepads()
            .find(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| {
                info!("Selected gamepad: {} ({})", gamepad.name(), id);
                id
            });

        if self.link.update(self.active_gamepad.is_some()) && self.active_gamepad.is_none() {
            warn!("No gamepad connected, continuing without input");
        }
    }

    fn buttons(&self) -> (Button, Button) {
        match self.hand {
            Hand::Left => (Button::LeftTrigger, Button::LeftTrigger2),
            Hand::Right => (Button::RightTrigger, Button::RightTrigger2),
        }
    }
}

impl InputSource for GamepadInput {
    fn poll(&mut self) -> Option<ButtonSnapshot> {
        // Drain events so gilrs updates its cached button state
        while let Some(event) = self.gilrs.next_event() {
            debug!("Processing gilrs event: {:?}", event.event);
        }

        let connected = self
            .active_gamepad
            .and_then(|id| self.gilrs.connected_gamepad(id))
            .is_some();
        if !connected {
            self.select_gamepad();
        }

        let gamepad = self.gilrs.connected_gamepad(self.active_gamepad?)?;
        let (grip, trigger) = self.buttons();
        Some(ButtonSnapshot {
            grip: gamepad.is_pressed(grip),
            trigger: gamepad.is_pressed(trigger),
            secondary: gamepad.is_pressed(Button::East),
        })
    }
}
