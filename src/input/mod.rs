//! Controller input for the drill
//!
//! The drill reads one [`ButtonSnapshot`] per tick from an [`InputSource`]. A
//! source returns `None` when no device is available this tick; the drill then
//! keeps its current state.
//!
//! ```text
//! DeviceProvider ──acquire──► InputDevice ──read──► ButtonSnapshot
//!        ▲                         │
//!        └──── invalid handle ─────┘ (re-acquired on the next poll)
//! ```

#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod virtual_controller;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "gamepad")]
pub use gamepad::{GamepadError, GamepadInput};
pub use virtual_controller::{VirtualController, VirtualDevice, VirtualProvider};

/// Which hand a controller sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    #[default]
    Right,
}

/// Button levels read once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSnapshot {
    pub grip: bool,
    pub trigger: bool,
    /// Secondary face button, used to start a session
    pub secondary: bool,
}

impl ButtonSnapshot {
    pub fn new(grip: bool, trigger: bool) -> Self {
        Self {
            grip,
            trigger,
            secondary: false,
        }
    }
}

/// Anything that yields at most one snapshot per tick
pub trait InputSource {
    fn poll(&mut self) -> Option<ButtonSnapshot>;
}

/// A handle to a physical or virtual controller
pub trait InputDevice {
    fn is_valid(&self) -> bool;

    /// `None` if the device could not report its buttons
    fn read(&self) -> Option<ButtonSnapshot>;
}

/// Looks up the controller currently bound to a hand
pub trait DeviceProvider {
    type Device: InputDevice;

    fn acquire(&mut self, hand: Hand) -> Option<Self::Device>;
}

/// Last known presence of a device, so connection changes are logged once
/// rather than on every poll.
#[derive(Debug, Default)]
pub struct LinkState {
    connected: Option<bool>,
}

impl LinkState {
    /// Records the current presence. Returns true if it differs from the
    /// previous call (or on the first call).
    pub fn update(&mut self, connected: bool) -> bool {
        let changed = self.connected != Some(connected);
        self.connected = Some(connected);
        changed
    }
}

/// Input source that re-acquires its device whenever the handle goes stale
pub struct ReacquiringInput<P: DeviceProvider> {
    provider: P,
    hand: Hand,
    device: Option<P::Device>,
    link: LinkState,
}

impl<P: DeviceProvider> ReacquiringInput<P> {
    pub fn new(mut provider: P, hand: Hand) -> Self {
        let device = provider.acquire(hand);
        let mut link = LinkState::default();
        link.update(device.is_some());
        if device.is_none() {
            warn!("No {:?} controller found, waiting for device", hand);
        }
        Self {
            provider,
            hand,
            device,
            link,
        }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn has_device(&self) -> bool {
        self.device.as_ref().is_some_and(|d| d.is_valid())
    }
}

impl<P: DeviceProvider> InputSource for ReacquiringInput<P> {
    fn poll(&mut self) -> Option<ButtonSnapshot> {
        let stale = self.device.as_ref().map_or(true, |d| !d.is_valid());
        if stale {
            self.device = self.provider.acquire(self.hand);
            if self.link.update(self.device.is_some()) {
                match self.device {
                    Some(_) => info!("Re-acquired {:?} controller", self.hand),
                    None => warn!("Lost {:?} controller, waiting for device", self.hand),
                }
            } else {
                debug!("Still no {:?} controller", self.hand);
            }
        }

        let device = self.device.as_ref()?;
        if !device.is_valid() {
            return None;
        }
        device.read()
    }
}
