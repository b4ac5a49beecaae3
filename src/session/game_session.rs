//! Timed drilling round
//!
//! ```text
//! Idle ──(secondary button)──► Running ──(countdown hits 0)──► Idle
//!                                 │
//!                        add_score / request_new_target
//! ```
//!
//! Starting a round resets the score and spawns the first target. Each target
//! request clears the board and spawns exactly one new target, which is queued
//! until the rig collects it with [`GameSession::take_spawned`].

use crate::drill::TargetId;
use crate::session::SessionCollaborator;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Length of a round in seconds
    pub length_seconds: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            length_seconds: 60.0,
        }
    }
}

/// Summary of the last finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub score: i32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct GameSession {
    settings: SessionSettings,
    active: bool,
    score: i32,
    remaining: f32,
    started_at: Option<DateTime<Local>>,
    board: Vec<TargetId>,
    spawned: VecDeque<TargetId>,
    next_target: u64,
    last_result: Option<RoundResult>,
}

impl GameSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            active: false,
            score: 0,
            remaining: 0.0,
            started_at: None,
            board: Vec::new(),
            spawned: VecDeque::new(),
            next_target: 1,
            last_result: None,
        }
    }

    /// Starts a round on the secondary button and counts the running one down.
    pub fn tick(&mut self, dt: f32, secondary_pressed: bool) {
        if !self.active {
            if secondary_pressed {
                self.start();
            }
            return;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.end();
        }
    }

    pub fn start(&mut self) {
        let now = Local::now();
        info!(
            "Starting {:.0}s round at {}",
            self.settings.length_seconds,
            now.format("%H:%M:%S")
        );
        self.score = 0;
        self.remaining = self.settings.length_seconds;
        self.active = true;
        self.started_at = Some(now);
        self.spawn_target();
    }

    fn end(&mut self) {
        let finished_at = Local::now();
        self.active = false;
        self.remaining = 0.0;
        self.clear_board();
        self.spawned.clear();

        info!("Game over! Final score: {}", self.score);
        self.last_result = Some(RoundResult {
            score: self.score,
            started_at: self.started_at.take().unwrap_or(finished_at),
            finished_at,
        });
    }

    fn clear_board(&mut self) {
        if !self.board.is_empty() {
            debug!("Clearing {} targets from board", self.board.len());
        }
        self.board.clear();
    }

    fn spawn_target(&mut self) {
        self.clear_board();
        let target = TargetId(self.next_target);
        self.next_target += 1;
        self.board.push(target);
        self.spawned.push_back(target);
        info!("Spawned target {}", target);
    }

    /// Removes a target that was drilled through.
    pub fn despawn(&mut self, target: TargetId) {
        self.board.retain(|t| *t != target);
    }

    /// Next freshly spawned target, if any
    pub fn take_spawned(&mut self) -> Option<TargetId> {
        self.spawned.pop_front()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Remaining time rounded up to whole seconds, as shown to the player
    pub fn remaining_display(&self) -> u32 {
        self.remaining().ceil() as u32
    }

    pub fn board(&self) -> &[TargetId] {
        &self.board
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }
}

impl SessionCollaborator for GameSession {
    fn is_session_active(&self) -> bool {
        self.active
    }

    fn add_score(&mut self, amount: i32) {
        self.score += amount;
        info!("Score: {}", self.score);
    }

    fn request_new_target(&mut self) {
        if !self.active {
            debug!("Ignoring target request outside of a round");
            return;
        }
        self.spawn_target();
    }
}
