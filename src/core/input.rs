// src/core/input.rs - Input definitions
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use crate::core::WeaponKind;

// === INPUT ACTIONS ===
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
#[reflect(Hash, PartialEq)]
pub enum DriveAction {
    Forward,
    Back,
    Left,
    Right,
    Brake,
    Interact,
    Fire,
    ZoomIn,
    ZoomOut,
    Orbit,
    SelectUnarmed,
    SelectPistol,
    SelectSubmachine,
    SelectRifle,
    Pause,
}

impl DriveAction {
    pub fn weapon(self) -> Option<WeaponKind> {
        match self {
            Self::SelectUnarmed => Some(WeaponKind::Unarmed),
            Self::SelectPistol => Some(WeaponKind::Pistol),
            Self::SelectSubmachine => Some(WeaponKind::Submachine),
            Self::SelectRifle => Some(WeaponKind::Rifle),
            _ => None,
        }
    }
}

/// Snapshot of the controls the simulation reads each tick.
///
/// Held controls are overwritten by the input layer every frame. `interact` and
/// `weapon_select` are one-shot requests that the tick consumes.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub fire: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub drag_active: bool,
    pub drag_delta: f32,
    pub interact: bool,
    pub weapon_select: Option<WeaponKind>,
}

impl InputState {
    pub fn throttle(&self) -> f32 {
        match (self.forward, self.back) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Positive turns left.
    pub fn steering(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact)
    }

    pub fn take_weapon_select(&mut self) -> Option<WeaponKind> {
        self.weapon_select.take()
    }
}
