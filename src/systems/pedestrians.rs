// src/systems/pedestrians.rs - Wandering pedestrians
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};
use crate::core::*;
use crate::systems::collision::{resolve_step, BlockResponse, Resolution};

pub fn spawn_pedestrians(commands: &mut Commands, config: &SimConfig, city: &CityMap, geometry: &WorldGeometry, rng: &mut SimRng) {
    let half_extents = Vec2::splat(config.player.pedestrian_half_extent);
    for _ in 0..config.pedestrians.population {
        let position = geometry.random_clear_point(city, rng, half_extents);
        let heading = rng.0.f32() * TAU;
        let speed = rng.range(config.pedestrians.min_speed, config.pedestrians.max_speed);
        commands.spawn((Pose::new(position, heading), Speed(speed), Pedestrian));
    }
    info!("Spawned {} pedestrians", config.pedestrians.population);
}

pub fn pedestrian_system(
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
    mut pedestrian_query: Query<(&mut Pose, &Speed), (With<Pedestrian>, Without<Dead>)>,
) {
    let half_extents = Vec2::splat(config.player.pedestrian_half_extent);

    for (mut pose, speed) in pedestrian_query.iter_mut() {
        match resolve_step(&geometry, &pose, speed.0, half_extents, BlockResponse::Stop, &config.collision) {
            Resolution::Moved(next) => {
                // Bounce off the map edge rather than wrapping.
                if !city.contains(next) {
                    pose.heading += PI;
                }
                pose.position = city.clamp(next);
            }
            Resolution::Stopped(position) => {
                pose.position = position;
                pose.heading += PI;
            }
            Resolution::Rebounded { .. } => {}
        }

        if rng.chance(config.pedestrians.wander_chance) {
            pose.heading += rng.jitter(0.5);
        }
    }
}
