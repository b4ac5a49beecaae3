//! Drill-bit spin driven by the active contact's rotation period

/// Looping spin of the drill bit around its local Z axis.
///
/// Angles run from 0 towards -360 degrees and restart, matching a clockwise
/// spin seen from behind the tool.
#[derive(Debug, Clone, Default)]
pub struct RotationAnimation {
    period: Option<f32>,
    angle_deg: f32,
}

impl RotationAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)starts the loop from identity orientation.
    pub fn start(&mut self, period: f32) {
        self.angle_deg = 0.0;
        self.period = Some(period);
    }

    /// Stops the loop and resets orientation. Safe to call while stopped.
    pub fn stop_and_reset(&mut self) {
        self.period = None;
        self.angle_deg = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(period) = self.period {
            let angle = self.angle_deg - 360.0 * dt / period;
            self.angle_deg = angle % 360.0;
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<f32> {
        self.period
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn is_identity(&self) -> bool {
        self.angle_deg == 0.0
    }
}
