use super::{ButtonSnapshot, DeviceProvider, Hand, InputDevice};
use std::cell::Cell;
use std::rc::Rc;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
struct VirtualState {
    connected: bool,
    // Bumped on every disconnect so older handles go stale
    generation: u64,
    buttons: ButtonSnapshot,
}

/// Scripted controller shared between a scenario and the input it feeds
#[derive(Debug, Clone)]
pub struct VirtualController {
    state: Rc<Cell<VirtualState>>,
}

impl Default for VirtualController {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualController {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(VirtualState {
                connected: true,
                ..VirtualState::default()
            })),
        }
    }

    fn update(&self, f: impl FnOnce(&mut VirtualState)) {
        let mut state = self.state.get();
        f(&mut state);
        self.state.set(state);
    }

    pub fn set_grip(&self, held: bool) {
        self.update(|s| s.buttons.grip = held);
    }

    pub fn set_trigger(&self, held: bool) {
        self.update(|s| s.buttons.trigger = held);
    }

    pub fn set_secondary(&self, held: bool) {
        self.update(|s| s.buttons.secondary = held);
    }

    pub fn disconnect(&self) {
        info!("Virtual controller disconnected");
        self.update(|s| {
            s.connected = false;
            s.generation += 1;
        });
    }

    pub fn reconnect(&self) {
        info!("Virtual controller reconnected");
        self.update(|s| s.connected = true);
    }

    pub fn is_connected(&self) -> bool {
        self.state.get().connected
    }
}

/// Handle to a [`VirtualController`], valid until the next disconnect
#[derive(Debug, Clone)]
pub struct VirtualDevice {
    state: Rc<Cell<VirtualState>>,
    generation: u64,
}

impl InputDevice for VirtualDevice {
    fn is_valid(&self) -> bool {
        let state = self.state.get();
        state.connected && state.generation == self.generation
    }

    fn read(&self) -> Option<ButtonSnapshot> {
        self.is_valid().then(|| self.state.get().buttons)
    }
}

/// Hands out [`VirtualDevice`] handles while the controller is connected
#[derive(Debug, Clone)]
pub struct VirtualProvider {
    controller: VirtualController,
}

impl VirtualProvider {
    pub fn new(controller: VirtualController) -> Self {
        Self { controller }
    }
}

impl DeviceProvider for VirtualProvider {
    type Device = VirtualDevice;

    fn acquire(&mut self, _hand: Hand) -> Option<VirtualDevice> {
        let state = self.controller.state.get();
        state.connected.then(|| VirtualDevice {
            state: self.controller.state.clone(),
            generation: state.generation,
        })
    }
}
