//! Per-target countdown started when the drill bores into a cross
//!
//! Each timer is a statum machine with compile-time state safety:
//!
//! ```text
//! Running ──(elapsed >= threshold)──► Expired
//!    │
//!    └──(cancel)──► Cancelled
//! ```
//!
//! A timer counts from the tick after it was started, so a timer started at
//! tick T with a 2 s threshold expires on the tick where T + 2 s is reached.
//! Cancelled timers are consumed and can never expire; re-entering the same
//! target starts a fresh timer.

use crate::drill::events::TargetId;
use statum::{machine, state};
use std::collections::HashMap;
use tracing::{debug, info};

#[state]
#[derive(Debug, Clone)]
pub enum CountdownState {
    Running,
    Expired,
    Cancelled,
}

#[machine]
#[derive(Debug)]
pub struct CollisionTimer<S: CountdownState> {
    target: TargetId,
    threshold: f32,
    elapsed: f32,
    // Skips accumulation on the tick the timer was started in
    fresh: bool,
}

impl<S: CountdownState> CollisionTimer<S> {
    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Result of advancing a running timer by one tick
#[derive(Debug)]
pub enum TimerStep {
    Running(CollisionTimer<Running>),
    Expired(CollisionTimer<Expired>),
}

impl CollisionTimer<Running> {
    pub fn start(target: TargetId, threshold: f32) -> Self {
        debug!("Starting {:.2}s collision timer for {}", threshold, target);
        Self::new(target, threshold, 0.0, true)
    }

    pub fn advance(mut self, dt: f32) -> TimerStep {
        if self.fresh {
            self.fresh = false;
            return TimerStep::Running(self);
        }

        self.elapsed += dt;
        if self.elapsed >= self.threshold {
            TimerStep::Expired(self.expire())
        } else {
            TimerStep::Running(self)
        }
    }

    fn expire(self) -> CollisionTimer<Expired> {
        info!("Collision timer for {} expired", self.target);
        self.transition()
    }

    pub fn cancel(self) -> CollisionTimer<Cancelled> {
        debug!(
            "Cancelling collision timer for {} after {:.2}s",
            self.target, self.elapsed
        );
        self.transition()
    }
}

/// All running timers of one drill, at most one per target
#[derive(Debug)]
pub struct CollisionTimers {
    threshold: f32,
    running: HashMap<TargetId, CollisionTimer<Running>>,
}

impl CollisionTimers {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            running: HashMap::new(),
        }
    }

    /// Starts a timer for `target`; returns false if one is already running.
    pub fn start(&mut self, target: TargetId) -> bool {
        if self.running.contains_key(&target) {
            debug!("Collision timer for {} already running", target);
            return false;
        }
        self.running
            .insert(target, CollisionTimer::start(target, self.threshold));
        true
    }

    /// Cancels the timer for `target`; returns false if none was running.
    pub fn cancel(&mut self, target: TargetId) -> bool {
        match self.running.remove(&target) {
            Some(timer) => {
                let _cancelled = timer.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every running timer and returns their targets in order.
    pub fn cancel_all(&mut self) -> Vec<TargetId> {
        let mut targets: Vec<TargetId> = self
            .running
            .drain()
            .map(|(target, timer)| {
                let _cancelled = timer.cancel();
                target
            })
            .collect();
        targets.sort();
        targets
    }

    /// Advances all timers and returns the targets whose timer expired.
    pub fn advance(&mut self, dt: f32) -> Vec<TargetId> {
        let mut expired = Vec::new();
        for (target, timer) in std::mem::take(&mut self.running) {
            match timer.advance(dt) {
                TimerStep::Running(timer) => {
                    self.running.insert(target, timer);
                }
                TimerStep::Expired(timer) => expired.push(timer.target()),
            }
        }
        expired.sort();
        expired
    }

    pub fn is_running(&self, target: TargetId) -> bool {
        self.running.contains_key(&target)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
