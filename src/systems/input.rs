// src/systems/input.rs - Keyboard and mouse bindings feeding InputState
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use crate::core::*;

pub fn default_input_map() -> InputMap<DriveAction> {
    InputMap::default()
        .with(DriveAction::Forward, KeyCode::KeyW)
        .with(DriveAction::Forward, KeyCode::ArrowUp)
        .with(DriveAction::Back, KeyCode::KeyS)
        .with(DriveAction::Back, KeyCode::ArrowDown)
        .with(DriveAction::Left, KeyCode::KeyA)
        .with(DriveAction::Left, KeyCode::ArrowLeft)
        .with(DriveAction::Right, KeyCode::KeyD)
        .with(DriveAction::Right, KeyCode::ArrowRight)
        .with(DriveAction::Brake, KeyCode::Space)
        .with(DriveAction::Interact, KeyCode::KeyF)
        .with(DriveAction::Interact, KeyCode::KeyE)
        .with(DriveAction::Fire, MouseButton::Left)
        .with(DriveAction::Orbit, MouseButton::Right)
        .with(DriveAction::ZoomIn, KeyCode::KeyQ)
        .with(DriveAction::ZoomOut, KeyCode::KeyZ)
        .with(DriveAction::SelectUnarmed, KeyCode::Digit1)
        .with(DriveAction::SelectPistol, KeyCode::Digit2)
        .with(DriveAction::SelectSubmachine, KeyCode::Digit3)
        .with(DriveAction::SelectRifle, KeyCode::Digit4)
        .with(DriveAction::Pause, KeyCode::KeyP)
}

pub fn setup_input(mut commands: Commands) {
    commands.spawn((default_input_map(), ActionState::<DriveAction>::default()));
    info!("Controls: WASD/arrows drive, Space brakes, F/E enter or exit, LMB fires, 1-4 weapons, Q/Z zoom, RMB orbit, P pause");
}

/// Copies held controls into `InputState` and queues one-shot requests.
/// Returns true when pause was toggled.
pub fn apply_actions(actions: &ActionState<DriveAction>, drag_delta: f32, scroll: f32, input: &mut InputState) -> bool {
    input.forward = actions.pressed(&DriveAction::Forward);
    input.back = actions.pressed(&DriveAction::Back);
    input.left = actions.pressed(&DriveAction::Left);
    input.right = actions.pressed(&DriveAction::Right);
    input.brake = actions.pressed(&DriveAction::Brake);
    input.fire = actions.pressed(&DriveAction::Fire);
    input.zoom_in = actions.pressed(&DriveAction::ZoomIn) || scroll > 0.0;
    input.zoom_out = actions.pressed(&DriveAction::ZoomOut) || scroll < 0.0;
    input.drag_active = actions.pressed(&DriveAction::Orbit);
    input.drag_delta = drag_delta;

    // Requests stay queued until a tick consumes them.
    if actions.just_pressed(&DriveAction::Interact) {
        input.interact = true;
    }
    for action in [
        DriveAction::SelectUnarmed,
        DriveAction::SelectPistol,
        DriveAction::SelectSubmachine,
        DriveAction::SelectRifle,
    ] {
        if actions.just_pressed(&action) {
            input.weapon_select = action.weapon();
        }
    }

    actions.just_pressed(&DriveAction::Pause)
}

pub fn sync_input_system(
    action_query: Query<&ActionState<DriveAction>>,
    motion: Option<Res<AccumulatedMouseMotion>>,
    scroll: Option<Res<AccumulatedMouseScroll>>,
    mut input: ResMut<InputState>,
    mut game_mode: ResMut<GameMode>,
) {
    let Ok(actions) = action_query.single() else { return; };
    let drag_delta = motion.map(|m| m.delta.x).unwrap_or(0.0);
    let scroll = scroll.map(|s| s.delta.y).unwrap_or(0.0);

    if apply_actions(actions, drag_delta, scroll, &mut input) {
        game_mode.paused = !game_mode.paused;
        info!("Simulation {}", if game_mode.paused { "paused" } else { "resumed" });
    }
}
