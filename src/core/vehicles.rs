// src/core/vehicles.rs - Vehicle kinds and their driving profiles
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    Car,
    AutoRickshaw,
    SportsCar,
}

#[derive(Debug, Clone, Copy)]
pub struct VehicleProfile {
    pub max_speed: f32,
    pub reverse_speed: f32,
    pub acceleration: f32,
    pub half_extents: Vec2,
}

impl VehicleKind {
    pub fn profile(self) -> VehicleProfile {
        match self {
            Self::Car => VehicleProfile {
                max_speed: 3.5,
                reverse_speed: 1.5,
                acceleration: 0.1,
                half_extents: Vec2::splat(12.0),
            },
            Self::AutoRickshaw => VehicleProfile {
                max_speed: 2.2,
                reverse_speed: 1.0,
                acceleration: 0.06,
                half_extents: Vec2::splat(9.0),
            },
            Self::SportsCar => VehicleProfile {
                max_speed: 5.0,
                reverse_speed: 2.0,
                acceleration: 0.15,
                half_extents: Vec2::splat(11.0),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::AutoRickshaw => "auto-rickshaw",
            Self::SportsCar => "sports car",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarColor {
    Red,
    Blue,
    Emerald,
    Amber,
    Indigo,
    White,
}

impl CarColor {
    /// Palette traffic is painted from. White is reserved for the player's car.
    pub const TRAFFIC_PALETTE: [CarColor; 5] = [
        CarColor::Red,
        CarColor::Blue,
        CarColor::Emerald,
        CarColor::Amber,
        CarColor::Indigo,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Blue => "#3b82f6",
            Self::Emerald => "#10b981",
            Self::Amber => "#f59e0b",
            Self::Indigo => "#6366f1",
            Self::White => "#ffffff",
        }
    }
}
