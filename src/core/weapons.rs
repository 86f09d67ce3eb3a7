// src/core/weapons.rs - Weapon table and shot gating
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// === WEAPON TYPES ===
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Unarmed,
    Pistol,
    Submachine,
    Rifle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TracerStyle {
    None,
    Yellow,
    Orange,
    White,
}

#[derive(Debug, Clone, Copy)]
pub struct WeaponProfile {
    pub cooldown_ms: u64,
    /// Units per tick. Zero for melee.
    pub projectile_speed: f32,
    pub tracer: TracerStyle,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Unarmed,
        WeaponKind::Pistol,
        WeaponKind::Submachine,
        WeaponKind::Rifle,
    ];

    pub fn profile(self) -> WeaponProfile {
        match self {
            Self::Unarmed => WeaponProfile {
                cooldown_ms: 500,
                projectile_speed: 0.0,
                tracer: TracerStyle::None,
            },
            Self::Pistol => WeaponProfile {
                cooldown_ms: 400,
                projectile_speed: 12.0,
                tracer: TracerStyle::Yellow,
            },
            Self::Submachine => WeaponProfile {
                cooldown_ms: 100,
                projectile_speed: 14.0,
                tracer: TracerStyle::Orange,
            },
            Self::Rifle => WeaponProfile {
                cooldown_ms: 1000,
                projectile_speed: 8.0,
                tracer: TracerStyle::White,
            },
        }
    }

    pub fn is_melee(self) -> bool {
        matches!(self, Self::Unarmed)
    }
}

// === WEAPON STATE ===
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Armament {
    pub weapon: WeaponKind,
    pub last_shot_ms: Option<u64>,
}

impl Armament {
    pub fn new(weapon: WeaponKind) -> Self {
        Self { weapon, last_shot_ms: None }
    }

    /// A shot is allowed once the elapsed time strictly exceeds the cooldown.
    pub fn ready(&self, now_ms: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.weapon.profile().cooldown_ms,
        }
    }

    /// Stamps the shot time when the weapon is ready. Returns whether it fired.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if !self.ready(now_ms) {
            return false;
        }
        self.last_shot_ms = Some(now_ms);
        true
    }

    pub fn equip(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
    }
}
