use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use delhi_streets::core::*;
use delhi_streets::systems::camera::FollowCamera;
use delhi_streets::systems::input::{setup_input, sync_input_system};
use delhi_streets::systems::{SimulationPlugin, SimulationSet};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Delhi Streets".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(InputManagerPlugin::<DriveAction>::default())
        .add_plugins(SimulationPlugin::from_files())
        .add_systems(Startup, (setup_input, setup_scene))
        .add_systems(Update, sync_input_system.before(SimulationSet::Intake))
        .add_systems(Update, (
            sync_camera_transform,
            draw_debug_view,
            log_snapshot_changes,
        ).after(SimulationSet::Present))
        .run();
}

fn setup_scene(mut commands: Commands, camera: Res<FollowCamera>) {
    commands.spawn((Camera3d::default(), camera.transform()));
    commands.spawn((
        DirectionalLight { illuminance: 8000.0, shadows_enabled: false, ..default() },
        Transform::from_xyz(1000.0, 2000.0, 1000.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn sync_camera_transform(camera: Res<FollowCamera>, mut camera_query: Query<&mut Transform, With<Camera3d>>) {
    let Ok(mut transform) = camera_query.single_mut() else { return; };
    *transform = camera.transform();
}

// === DEBUG VIEW ===
fn ground(position: Vec2, height: f32) -> Vec3 {
    Vec3::new(position.x, height, position.y)
}

fn box_at(pose: &Pose, half_extents: Vec2, height: f32) -> Transform {
    Transform::from_translation(ground(pose.position, height * 0.5))
        .with_rotation(Quat::from_rotation_y(pose.heading))
        .with_scale(Vec3::new(half_extents.x * 2.0, height, half_extents.y * 2.0))
}

fn hex_color(hex: &str) -> Color {
    Srgba::hex(hex).map(Color::from).unwrap_or(Color::WHITE)
}

fn tracer_color(weapon: WeaponKind) -> Color {
    match weapon.profile().tracer {
        TracerStyle::Yellow => Color::srgb(1.0, 0.9, 0.2),
        TracerStyle::Orange => Color::srgb(1.0, 0.55, 0.1),
        TracerStyle::White | TracerStyle::None => Color::WHITE,
    }
}

fn draw_debug_view(
    mut gizmos: Gizmos,
    geometry: Res<WorldGeometry>,
    player_query: Query<(&Pose, &Hitbox, &Player)>,
    traffic_query: Query<(&Pose, &TrafficVehicle), Without<Inactive>>,
    parked_query: Query<(&Pose, &ParkedVehicle)>,
    pedestrian_query: Query<(&Pose, Has<Dead>), With<Pedestrian>>,
    police_query: Query<&Pose, With<PoliceUnit>>,
    projectile_query: Query<(&Pose, &Projectile)>,
) {
    for obstacle in geometry.obstacles() {
        let size = Vec3::new(obstacle.width, 30.0, obstacle.depth);
        let transform = Transform::from_translation(ground(obstacle.center, 15.0)).with_scale(size);
        gizmos.cuboid(transform, Color::srgb(0.45, 0.45, 0.5));
    }

    for (pose, traffic) in traffic_query.iter() {
        gizmos.cuboid(box_at(pose, traffic.kind.profile().half_extents, 8.0), hex_color(traffic.color.hex()));
    }
    for (pose, parked) in parked_query.iter() {
        gizmos.cuboid(box_at(pose, parked.kind.profile().half_extents, 8.0), hex_color(parked.color.hex()));
    }
    for (pose, dead) in pedestrian_query.iter() {
        let color = if dead { Color::srgb(0.5, 0.1, 0.1) } else { Color::srgb(0.9, 0.8, 0.6) };
        gizmos.sphere(Isometry3d::from_translation(ground(pose.position, 3.0)), 3.0, color);
    }
    for pose in police_query.iter() {
        gizmos.cuboid(box_at(pose, Vec2::splat(11.0), 9.0), Color::srgb(0.1, 0.2, 0.9));
    }
    for (pose, projectile) in projectile_query.iter() {
        let tip = ground(pose.position, 5.0);
        let tail = tip - ground(pose.forward() * projectile.speed, 0.0);
        gizmos.line(tail, tip, tracer_color(projectile.weapon));
    }

    if let Ok((pose, hitbox, player)) = player_query.single() {
        let color = match player.mode {
            PlayerMode::InVehicle { color, .. } => hex_color(color.hex()),
            PlayerMode::OnFoot => Color::srgb(0.2, 1.0, 0.4),
        };
        gizmos.cuboid(box_at(pose, hitbox.half_extents, 10.0), color);
        let nose = ground(pose.position + pose.forward() * 20.0, 5.0);
        gizmos.arrow(ground(pose.position, 5.0), nose, Color::srgb(1.0, 1.0, 0.0));
    }
}

/// Logs the HUD-relevant fields whenever they change.
fn log_snapshot_changes(snapshot: Res<WorldSnapshot>, mut last: Local<Option<WorldSnapshot>>) {
    if !snapshot.is_changed() {
        return;
    }
    let previous = last.replace(snapshot.clone());
    let Some(previous) = previous else { return; };

    if previous.district != snapshot.district {
        info!("Entered {}", snapshot.district);
    }
    if previous.wanted_level != snapshot.wanted_level {
        info!("Wanted level {} ({} police units)", snapshot.wanted_level, snapshot.police_units);
    }
    if previous.in_vehicle != snapshot.in_vehicle {
        match snapshot.vehicle_kind {
            Some(kind) => info!("Driving {}", kind.label()),
            None => info!("On foot"),
        }
    }
    if previous.weapon != snapshot.weapon {
        info!("Weapon: {:?}", snapshot.weapon);
    }
    if previous.money != snapshot.money {
        debug!("Money: {}", snapshot.money);
    }
    if let Some(nav) = snapshot.navigation.as_ref().filter(|_| previous.navigation.is_none()) {
        info!("Navigating to {} ({:.0} away)", nav.label, nav.distance);
    }
    if snapshot.wasted && !previous.wasted {
        warn!("WASTED");
    }
}
