// src/systems/traffic.rs - Ambient traffic: wander, wrap and turn away from buildings
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;
use crate::core::*;
use crate::systems::collision::{resolve_step, BlockResponse, Resolution};

// === SPAWNING ===
pub fn roll_traffic_kind(rng: &mut SimRng, config: &TrafficConfig) -> VehicleKind {
    match rng.0.f32() {
        x if x < config.auto_share => VehicleKind::AutoRickshaw,
        x if x < config.auto_share + config.sports_share => VehicleKind::SportsCar,
        _ => VehicleKind::Car,
    }
}

pub fn spawn_traffic(commands: &mut Commands, config: &SimConfig, city: &CityMap, geometry: &WorldGeometry, rng: &mut SimRng) {
    for _ in 0..config.traffic.population {
        let kind = roll_traffic_kind(rng, &config.traffic);
        let color = CarColor::TRAFFIC_PALETTE[rng.0.usize(..CarColor::TRAFFIC_PALETTE.len())];
        let position = geometry.random_clear_point(city, rng, kind.profile().half_extents);
        let heading = rng.0.f32() * std::f32::consts::TAU;
        let speed = rng.range(config.traffic.min_speed, config.traffic.max_speed);

        commands.spawn((
            Pose::new(position, heading),
            Speed(speed),
            TrafficVehicle { kind, color, last_hit_ms: None },
        ));
    }
    info!("Spawned {} traffic vehicles", config.traffic.population);
}

// === UPDATE ===
pub fn traffic_system(
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
    mut traffic_query: Query<(&mut Pose, &Speed, &TrafficVehicle), Without<Inactive>>,
) {
    for (mut pose, speed, traffic) in traffic_query.iter_mut() {
        let half_extents = traffic.kind.profile().half_extents;
        match resolve_step(&geometry, &pose, speed.0, half_extents, BlockResponse::Rebound, &config.collision) {
            Resolution::Moved(next) => pose.position = city.wrap(next),
            _ => pose.heading += FRAC_PI_2,
        }

        if rng.chance(config.traffic.wander_chance) {
            pose.heading += rng.jitter(0.5);
        }
    }
}
