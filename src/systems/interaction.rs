// src/systems/interaction.rs - Vehicle enter, exit and hijack
use bevy::prelude::*;
use crate::core::*;

#[derive(Debug, Clone, Copy)]
enum Candidate {
    Parked(Entity, Pose, ParkedVehicle),
    Traffic(Entity, Pose, VehicleKind, CarColor),
}

pub fn vehicle_interaction_system(
    mut commands: Commands,
    mut input: ResMut<InputState>,
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut player_query: Query<(&mut Player, &mut Pose, &mut Speed, &mut Hitbox)>,
    parked_query: Query<(Entity, &Pose, &ParkedVehicle), Without<Player>>,
    traffic_query: Query<(Entity, &Pose, &TrafficVehicle), (Without<Inactive>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    if !input.take_interact() {
        return;
    }
    let Ok((mut player, mut pose, mut speed, mut hitbox)) = player_query.single_mut() else {
        return;
    };

    match player.mode {
        PlayerMode::InVehicle { kind, color } => {
            commands.spawn((Pose::new(pose.position, pose.heading), ParkedVehicle { kind, color }));

            let walker = Vec2::splat(config.player.pedestrian_half_extent);
            pose.position = exit_point(&pose, config.player.exit_offset, walker, &city, &geometry);
            player.mode = PlayerMode::OnFoot;
            hitbox.half_extents = walker;
            speed.0 = 0.0;

            info!("Exited {} at {:?}", kind.label(), pose.position);
            events.write(SimEvent::VehicleExited { kind });
        }
        PlayerMode::OnFoot => {
            let Some(candidate) = nearest_vehicle(pose.position, config.player.pickup_radius, &parked_query, &traffic_query)
            else {
                debug!("Interact ignored: no vehicle within {}", config.player.pickup_radius);
                return;
            };

            // The source slot is retired before the player takes over the vehicle.
            let (vehicle_pose, kind, color, hijacked) = match candidate {
                Candidate::Parked(entity, vehicle_pose, parked) => {
                    commands.entity(entity).despawn();
                    (vehicle_pose, parked.kind, parked.color, false)
                }
                Candidate::Traffic(entity, vehicle_pose, kind, color) => {
                    commands.entity(entity).insert(Inactive);
                    (vehicle_pose, kind, color, true)
                }
            };

            *pose = vehicle_pose;
            speed.0 = 0.0;
            player.mode = PlayerMode::InVehicle { kind, color };
            hitbox.half_extents = kind.profile().half_extents;

            if hijacked {
                let from = player.raise_wanted(1);
                info!("Hijacked {}: wanted level {} -> {}", kind.label(), from, player.wanted_level);
                events.write(SimEvent::WantedLevelChanged { from, to: player.wanted_level });
            } else {
                info!("Entered parked {}", kind.label());
            }
            events.write(SimEvent::VehicleEntered { kind, hijacked });
        }
    }
}

/// Parked vehicles win over traffic; within a class the closest one wins.
fn nearest_vehicle(
    position: Vec2,
    radius: f32,
    parked_query: &Query<(Entity, &Pose, &ParkedVehicle), Without<Player>>,
    traffic_query: &Query<(Entity, &Pose, &TrafficVehicle), (Without<Inactive>, Without<Player>)>,
) -> Option<Candidate> {
    let radius_sq = radius * radius;

    let parked = parked_query
        .iter()
        .map(|(entity, pose, parked)| (pose.position.distance_squared(position), entity, *pose, *parked))
        .filter(|(d, ..)| *d <= radius_sq)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, entity, pose, parked)| Candidate::Parked(entity, pose, parked));
    if parked.is_some() {
        return parked;
    }

    traffic_query
        .iter()
        .map(|(entity, pose, traffic)| (pose.position.distance_squared(position), entity, *pose, traffic.kind, traffic.color))
        .filter(|(d, ..)| *d <= radius_sq)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, entity, pose, kind, color)| Candidate::Traffic(entity, pose, kind, color))
}

/// Behind the vehicle first, then either side, so the walker never starts inside a wall.
fn exit_point(vehicle: &Pose, offset: f32, half_extents: Vec2, city: &CityMap, geometry: &WorldGeometry) -> Vec2 {
    let forward = vehicle.forward();
    let side = forward.perp();
    [-forward, side, -side, forward]
        .into_iter()
        .map(|dir| city.clamp(vehicle.position + dir * offset))
        .find(|p| !geometry.blocked(*p, half_extents))
        .unwrap_or(vehicle.position)
}
