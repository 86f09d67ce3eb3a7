// src/core/snapshot.rs - Outbound world state and inbound one-shot commands
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::core::{AvatarPose, VehicleKind, WeaponKind, UNKNOWN_DISTRICT};

/// Everything the HUD needs, rebuilt every frame. Consumers diff successive
/// snapshots themselves.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub position: [f32; 2],
    pub heading: f32,
    pub speed: f32,
    pub district: String,
    pub money: u32,
    pub health: f32,
    pub wanted_level: u8,
    pub hit_count: u32,
    pub in_vehicle: bool,
    pub vehicle_kind: Option<VehicleKind>,
    pub weapon: WeaponKind,
    pub pose: AvatarPose,
    pub police_units: usize,
    pub navigation: Option<NavigationIndicator>,
    pub wasted: bool,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            position: [0.0, 0.0],
            heading: 0.0,
            speed: 0.0,
            district: UNKNOWN_DISTRICT.to_string(),
            money: 0,
            health: 0.0,
            wanted_level: 0,
            hit_count: 0,
            in_vehicle: false,
            vehicle_kind: None,
            weapon: WeaponKind::Unarmed,
            pose: AvatarPose::Idle,
            police_units: 0,
            navigation: None,
            wasted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationIndicator {
    pub label: String,
    pub target: [f32; 2],
    /// Angle from the player's heading to the target, in (-PI, PI].
    pub relative_bearing: f32,
    pub distance: f32,
}

// === INBOUND COMMANDS ===
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationRequest {
    Position(Vec2),
    Named(String),
    Clear,
}

/// Patches set by layers outside the simulation (map app, assistant tools).
/// Applied at the start of the next tick; a later write before then wins.
#[derive(Resource, Debug, Clone, Default)]
pub struct ExternalCommands {
    pub teleport: Option<Vec2>,
    pub navigation: Option<NavigationRequest>,
    pub wanted_level: Option<u8>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct NavigationTarget {
    pub active: Option<(String, Vec2)>,
}
