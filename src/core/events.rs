use bevy::prelude::*;
use crate::core::{ProjectileOwner, VehicleKind, WeaponKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    TrafficCollision,
    PoliceRam,
    Gunfire,
}

/// Outbound notifications for audio and UI. The simulation never reads these back.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SimEvent {
    VehicleEntered { kind: VehicleKind, hijacked: bool },
    VehicleExited { kind: VehicleKind },
    ShotFired { owner: ProjectileOwner, weapon: WeaponKind },
    PedestrianKilled { entity: Entity },
    PlayerDamaged { amount: f32, source: DamageSource },
    WantedLevelChanged { from: u8, to: u8 },
    PoliceDispatched { count: usize },
    PoliceStoodDown { count: usize },
}
