// src/systems/camera.rs - Third-person follow camera with zoom and orbit
use bevy::prelude::*;
use crate::core::*;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    /// Ground-plane position of the eye.
    pub position: Vec2,
    pub height: f32,
    pub orbit_radius: f32,
    /// Extra yaw around the player, set by right-drag.
    pub orbit_angle: f32,
    /// Point the eye looks at.
    pub focus: Vec2,
}

impl FollowCamera {
    pub fn new(config: &CameraConfig, target: &Pose) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            height: config.default_radius * config.height_ratio,
            orbit_radius: config.default_radius,
            orbit_angle: 0.0,
            focus: target.position,
        };
        camera.position = camera.desired_position(target);
        camera
    }

    /// Behind the player, rotated by the orbit angle.
    pub fn desired_position(&self, target: &Pose) -> Vec2 {
        let yaw = target.heading + self.orbit_angle;
        target.position + Vec2::new(yaw.sin(), yaw.cos()) * self.orbit_radius
    }

    pub fn zoom(&mut self, steps: f32, config: &CameraConfig) {
        self.orbit_radius = (self.orbit_radius + steps * config.zoom_step).clamp(config.min_radius, config.max_radius);
    }

    pub fn update(&mut self, target: &Pose, input: &InputState, config: &CameraConfig) {
        if input.zoom_in {
            self.zoom(-1.0, config);
        }
        if input.zoom_out {
            self.zoom(1.0, config);
        }
        if input.drag_active {
            self.orbit_angle += input.drag_delta * config.orbit_sensitivity;
        }

        let desired = self.desired_position(target);
        self.position = self.position.lerp(desired, config.smoothing);
        self.height += (self.orbit_radius * config.height_ratio - self.height) * config.smoothing;
        self.focus = target.position;
    }

    /// World-space transform for a `Camera3d`. Sim X/Y map onto X/Z.
    pub fn transform(&self) -> Transform {
        let eye = Vec3::new(self.position.x, self.height, self.position.y);
        let focus = Vec3::new(self.focus.x, 0.0, self.focus.y);
        Transform::from_translation(eye).looking_at(focus, Vec3::Y)
    }
}

impl Default for FollowCamera {
    fn default() -> Self {
        let config = SimConfig::default().camera;
        Self::new(&config, &Pose::new(Vec2::ZERO, 0.0))
    }
}

pub fn follow_camera_system(
    input: Res<InputState>,
    config: Res<SimConfig>,
    mut camera: ResMut<FollowCamera>,
    player_query: Query<&Pose, With<Player>>,
) {
    let Ok(target) = player_query.single() else { return; };
    camera.update(target, &input, &config.camera);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_eases_towards_the_spot_behind_the_player() {
        let config = SimConfig::default().camera;
        let start = Pose::new(Vec2::new(100.0, 100.0), 0.0);
        let mut camera = FollowCamera::new(&config, &start);
        // Heading 0 faces -Y, so "behind" is +Y.
        assert!((camera.position - Vec2::new(100.0, 170.0)).length() < 1e-3);

        let moved = Pose::new(Vec2::new(100.0, 0.0), 0.0);
        camera.update(&moved, &InputState::default(), &config);
        // One smoothing step covers 10% of the gap.
        assert!((camera.position.y - 160.0).abs() < 1e-3);
        for _ in 0..200 {
            camera.update(&moved, &InputState::default(), &config);
        }
        assert!((camera.position - Vec2::new(100.0, 70.0)).length() < 0.01);
    }

    #[test]
    fn zoom_is_clamped() {
        let config = SimConfig::default().camera;
        let mut camera = FollowCamera::new(&config, &Pose::new(Vec2::ZERO, 0.0));
        let input = InputState { zoom_in: true, ..Default::default() };
        for _ in 0..100 {
            camera.update(&Pose::new(Vec2::ZERO, 0.0), &input, &config);
        }
        assert_eq!(camera.orbit_radius, config.min_radius);
        assert!((camera.height - config.min_radius * config.height_ratio).abs() < 0.01);

        let input = InputState { zoom_out: true, ..Default::default() };
        for _ in 0..200 {
            camera.update(&Pose::new(Vec2::ZERO, 0.0), &input, &config);
        }
        assert_eq!(camera.orbit_radius, config.max_radius);
    }

    #[test]
    fn height_eases_after_a_zoom() {
        let config = SimConfig::default().camera;
        let mut camera = FollowCamera::new(&config, &Pose::new(Vec2::ZERO, 0.0));
        assert_eq!(camera.height, 35.0);

        let input = InputState { zoom_out: true, ..Default::default() };
        camera.update(&Pose::new(Vec2::ZERO, 0.0), &input, &config);
        // Radius 72 wants height 36; one tick covers a tenth of that.
        assert_eq!(camera.orbit_radius, 72.0);
        assert!((camera.height - 35.1).abs() < 1e-4);
    }

    #[test]
    fn drag_orbits_only_while_held() {
        let config = SimConfig::default().camera;
        let mut camera = FollowCamera::new(&config, &Pose::new(Vec2::ZERO, 0.0));
        let released = InputState { drag_delta: 50.0, ..Default::default() };
        camera.update(&Pose::new(Vec2::ZERO, 0.0), &released, &config);
        assert_eq!(camera.orbit_angle, 0.0);

        let held = InputState { drag_active: true, drag_delta: 50.0, ..Default::default() };
        camera.update(&Pose::new(Vec2::ZERO, 0.0), &held, &config);
        assert!((camera.orbit_angle - 0.5).abs() < 1e-6);
    }
}
