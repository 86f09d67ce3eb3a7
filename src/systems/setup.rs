// src/systems/setup.rs - Initial world population
use bevy::prelude::*;
use crate::core::*;
use crate::systems::camera::FollowCamera;
use crate::systems::pedestrians::spawn_pedestrians;
use crate::systems::traffic::spawn_traffic;

/// The player starts at the configured point, nudged clear of buildings.
pub fn player_bundle(config: &SimConfig, city: &CityMap, geometry: &WorldGeometry) -> (Pose, Speed, Health, Hitbox, Armament, Player) {
    let mode = if config.player.start_in_vehicle {
        PlayerMode::InVehicle { kind: VehicleKind::Car, color: CarColor::White }
    } else {
        PlayerMode::OnFoot
    };
    let half_extents = match mode {
        PlayerMode::InVehicle { kind, .. } => kind.profile().half_extents,
        PlayerMode::OnFoot => Vec2::splat(config.player.pedestrian_half_extent),
    };
    let start = Vec2::from_array(config.player.start_position);
    let position = geometry.nearest_clear_point(city, city.clamp(start), half_extents);

    (
        Pose::new(position, 0.0),
        Speed(0.0),
        Health(config.player.start_health),
        Hitbox { half_extents },
        Armament::new(WeaponKind::Unarmed),
        Player::new(mode, config.player.start_money),
    )
}

pub fn setup_world(
    mut commands: Commands,
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
) {
    let player = player_bundle(&config, &city, &geometry);
    let start = player.0;
    commands.spawn(player);
    commands.insert_resource(FollowCamera::new(&config.camera, &start));

    spawn_traffic(&mut commands, &config, &city, &geometry, &mut rng);
    spawn_pedestrians(&mut commands, &config, &city, &geometry, &mut rng);

    info!(
        "World ready: {} obstacles, player at {:?} in {}",
        geometry.obstacles().len(),
        start.position,
        city.district_at(start.position)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_starts_clear_of_buildings_in_a_white_car() {
        let config = SimConfig::default();
        let city = CityMap::default();
        let block = Obstacle::new(Vec2::new(2000.0, 2000.0), 50.0, 50.0);
        let geometry = WorldGeometry::new(vec![block], config.collision.broad_phase_radius);

        let (pose, speed, health, hitbox, armament, player) = player_bundle(&config, &city, &geometry);
        assert!(!block.overlaps(pose.position, hitbox.half_extents));
        assert_eq!(speed.0, 0.0);
        assert_eq!(health.0, 100.0);
        assert_eq!(armament.weapon, WeaponKind::Unarmed);
        assert_eq!(player.money, 500);
        assert_eq!(player.mode, PlayerMode::InVehicle { kind: VehicleKind::Car, color: CarColor::White });
        assert_eq!(player.wanted_level, 0);
    }
}
