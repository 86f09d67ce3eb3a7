// src/core/mod.rs - Shared simulation state, components and data tables
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

pub mod components;
pub mod config;
pub mod city;
pub mod events;
pub mod input;
pub mod snapshot;
pub mod vehicles;
pub mod weapons;

pub use components::*;
pub use config::*;
pub use city::*;
pub use events::*;
pub use input::*;
pub use snapshot::*;
pub use vehicles::*;
pub use weapons::*;

// === RESOURCES ===
#[derive(Resource, Default)]
pub struct GameMode {
    pub paused: bool,
}

/// Simulation time. Advanced once per tick by the step itself, never read from
/// the wall clock, so cooldowns and debounce windows replay identically.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    pub tick: u64,
    pub now_ms: u64,
}

impl SimClock {
    pub fn advance(&mut self, tick_ms: u64) {
        self.tick += 1;
        self.now_ms += tick_ms;
    }

    pub fn since(&self, stamp: Option<u64>) -> Option<u64> {
        stamp.map(|t| self.now_ms.saturating_sub(t))
    }
}

#[derive(Resource)]
pub struct SimRng(pub fastrand::Rng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Uniform in [-half_width, half_width).
    pub fn jitter(&mut self, half_width: f32) -> f32 {
        (self.0.f32() - 0.5) * 2.0 * half_width
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.0.f32() * (max - min)
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.0.f32() < probability
    }
}

// === HEADING MATH ===
// Heading 0 faces -Y; turning left increases the angle.

pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), -heading.cos())
}

/// Heading that points from `from` towards `to`.
pub fn bearing_to(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    (-delta.x).atan2(-delta.y)
}

/// Wraps an angle into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}
