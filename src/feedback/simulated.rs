//! Headless audio and haptic backends
//!
//! Both behave like a mixer: `play` adds a voice without touching voices that
//! are already running, so overlapping output shows up in `active_voices()`.
//! Voices end on their own once their clip length has elapsed.

use crate::feedback::backend::{AudioChannel, HapticChannel, HapticHandle};
use crate::feedback::ClipId;
use crate::input::Hand;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Number of recently started clips kept by [`SimulatedAudio::history`]
const HISTORY_LEN: usize = 16;

/// Clip lengths in seconds, with a fallback for unknown clips
#[derive(Debug, Clone)]
pub struct ClipLibrary {
    lengths: HashMap<ClipId, f32>,
    fallback: f32,
}

impl ClipLibrary {
    pub fn new(fallback: f32) -> Self {
        Self {
            lengths: HashMap::new(),
            fallback,
        }
    }

    pub fn with_clip(mut self, clip: &str, seconds: f32) -> Self {
        self.lengths.insert(ClipId::new(clip), seconds);
        self
    }

    pub fn insert(&mut self, clip: ClipId, seconds: f32) {
        self.lengths.insert(clip, seconds);
    }

    pub fn length(&self, clip: &ClipId) -> f32 {
        self.lengths.get(clip).copied().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone)]
struct Voice {
    clip: ClipId,
    remaining: f32,
}

#[derive(Debug, Clone)]
pub struct SimulatedAudio {
    library: ClipLibrary,
    voices: Vec<Voice>,
    played: VecDeque<ClipId>,
}

impl SimulatedAudio {
    pub fn new(library: ClipLibrary) -> Self {
        Self {
            library,
            voices: Vec::new(),
            played: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Clip of the most recently started voice that is still playing
    pub fn current_clip(&self) -> Option<&ClipId> {
        self.voices.last().map(|v| &v.clip)
    }

    /// The most recently started clips, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ClipId> {
        self.played.iter()
    }
}

impl AudioChannel for SimulatedAudio {
    fn play(&mut self, clip: &ClipId) {
        let remaining = self.library.length(clip);
        debug!("Audio play {} ({:.2}s)", clip, remaining);
        self.voices.push(Voice {
            clip: clip.clone(),
            remaining,
        });
        if self.played.len() == HISTORY_LEN {
            self.played.pop_front();
        }
        self.played.push_back(clip.clone());
    }

    fn stop(&mut self) {
        if !self.voices.is_empty() {
            debug!("Audio stop ({} voices)", self.voices.len());
        }
        self.voices.clear();
    }

    fn is_playing(&self) -> bool {
        !self.voices.is_empty()
    }

    fn advance(&mut self, dt: f32) {
        for voice in &mut self.voices {
            voice.remaining -= dt;
        }
        self.voices.retain(|v| v.remaining > 0.0);
    }
}

#[derive(Debug, Clone)]
struct HapticVoice {
    clip: ClipId,
    hand: Hand,
    remaining: f32,
}

#[derive(Debug, Clone)]
pub struct SimulatedHaptics {
    library: ClipLibrary,
    voices: HashMap<HapticHandle, HapticVoice>,
    next_handle: u64,
}

impl SimulatedHaptics {
    pub fn new(library: ClipLibrary) -> Self {
        Self {
            library,
            voices: HashMap::new(),
            next_handle: 1,
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn is_active(&self, handle: HapticHandle) -> bool {
        self.voices.contains_key(&handle)
    }

    pub fn clip_of(&self, handle: HapticHandle) -> Option<(&ClipId, Hand)> {
        self.voices.get(&handle).map(|v| (&v.clip, v.hand))
    }
}

impl HapticChannel for SimulatedHaptics {
    fn play(&mut self, clip: &ClipId, hand: Hand) -> HapticHandle {
        let handle = HapticHandle(self.next_handle);
        self.next_handle += 1;
        debug!("Haptic play {} on {:?} as {:?}", clip, hand, handle);
        self.voices.insert(
            handle,
            HapticVoice {
                clip: clip.clone(),
                hand,
                remaining: self.library.length(clip),
            },
        );
        handle
    }

    fn stop(&mut self, handle: HapticHandle) {
        if self.voices.remove(&handle).is_some() {
            debug!("Haptic stop {:?}", handle);
        }
    }

    fn advance(&mut self, dt: f32) {
        for voice in self.voices.values_mut() {
            voice.remaining -= dt;
        }
        self.voices.retain(|_, v| v.remaining > 0.0);
    }
}
