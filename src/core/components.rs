// src/core/components.rs - Actor components
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::core::{heading_vector, CarColor, VehicleKind, WeaponKind};

// === SHARED ACTOR COMPONENTS ===
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub heading: f32,
}

impl Pose {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading }
    }

    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }
}

/// Signed scalar speed along the heading, in units per tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Speed(pub f32);

#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub half_extents: Vec2,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Health(pub f32);

impl Health {
    pub fn damage(&mut self, amount: f32) {
        self.0 = (self.0 - amount).max(0.0);
    }
}

// === PLAYER ===
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    OnFoot,
    InVehicle { kind: VehicleKind, color: CarColor },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AvatarPose {
    Driving,
    #[default]
    Idle,
    Walking,
    Aiming,
}

pub const MAX_WANTED_LEVEL: u8 = 5;

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub mode: PlayerMode,
    pub money: u32,
    pub wanted_level: u8,
    pub hit_count: u32,
    pub avatar_pose: AvatarPose,
}

impl Player {
    pub fn new(mode: PlayerMode, money: u32) -> Self {
        Self {
            mode,
            money,
            wanted_level: 0,
            hit_count: 0,
            avatar_pose: AvatarPose::Idle,
        }
    }

    pub fn in_vehicle(&self) -> bool {
        matches!(self.mode, PlayerMode::InVehicle { .. })
    }

    pub fn vehicle_kind(&self) -> Option<VehicleKind> {
        match self.mode {
            PlayerMode::InVehicle { kind, .. } => Some(kind),
            PlayerMode::OnFoot => None,
        }
    }

    /// Raises the wanted level, saturating at the maximum. Returns the previous level.
    pub fn raise_wanted(&mut self, amount: u8) -> u8 {
        let previous = self.wanted_level;
        self.wanted_level = previous.saturating_add(amount).min(MAX_WANTED_LEVEL);
        previous
    }

    pub fn set_wanted(&mut self, level: u8) -> u8 {
        let previous = self.wanted_level;
        self.wanted_level = level.min(MAX_WANTED_LEVEL);
        if self.wanted_level == 0 {
            self.hit_count = 0;
        }
        previous
    }
}

// === TRAFFIC ===
#[derive(Component, Debug, Clone)]
pub struct TrafficVehicle {
    pub kind: VehicleKind,
    pub color: CarColor,
    pub last_hit_ms: Option<u64>,
}

/// Traffic slot taken out of the pool (hijacked). The entity stays so ids remain stable.
#[derive(Component)]
pub struct Inactive;

// === PEDESTRIANS ===
#[derive(Component)]
pub struct Pedestrian;

#[derive(Component)]
pub struct Dead;

// === PARKED ===
#[derive(Component, Debug, Clone, Copy)]
pub struct ParkedVehicle {
    pub kind: VehicleKind,
    pub color: CarColor,
}

// === POLICE ===
#[derive(Component)]
pub struct PoliceUnit;

// === PROJECTILES ===
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    pub weapon: WeaponKind,
    pub speed: f32,
    /// Remaining ticks.
    pub life: u32,
}
