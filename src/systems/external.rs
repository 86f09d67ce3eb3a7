// src/systems/external.rs - Simulation clock and commands from outside layers
use bevy::prelude::*;
use crate::core::*;

pub fn advance_clock_system(config: Res<SimConfig>, mut clock: ResMut<SimClock>) {
    clock.advance(config.simulation.tick_ms);
}

/// Applies teleport, wanted-level and navigation patches queued since the last tick.
pub fn apply_external_commands_system(
    mut external: ResMut<ExternalCommands>,
    mut navigation: ResMut<NavigationTarget>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut player_query: Query<(&mut Player, &mut Pose, &mut Speed, &Hitbox)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player, mut pose, mut speed, hitbox)) = player_query.single_mut() else { return; };

    if let Some(target) = external.teleport.take() {
        let landing = geometry.nearest_clear_point(&city, city.clamp(target), hitbox.half_extents);
        pose.position = landing;
        speed.0 = 0.0;
        info!("Teleported to {:?} ({})", landing, city.district_at(landing));
    }

    if let Some(level) = external.wanted_level.take() {
        let from = player.set_wanted(level);
        if from != player.wanted_level {
            info!("Wanted level set externally: {} -> {}", from, player.wanted_level);
            events.write(SimEvent::WantedLevelChanged { from, to: player.wanted_level });
        }
    }

    match external.navigation.take() {
        Some(NavigationRequest::Position(target)) => {
            let target = city.clamp(target);
            let label = city.district_at(target).to_string();
            info!("Navigating to {:?} ({})", target, label);
            navigation.active = Some((label, target));
        }
        Some(NavigationRequest::Named(name)) => match city.locate(&name) {
            Some(target) => {
                info!("Navigating to {} at {:?}", name, target);
                navigation.active = Some((name, target));
            }
            None => warn!("Unknown destination '{}', navigation unchanged", name),
        },
        Some(NavigationRequest::Clear) => navigation.active = None,
        None => {}
    }
}

/// Drops the navigation target once the player is close enough.
pub fn navigation_arrival_system(
    config: Res<SimConfig>,
    mut navigation: ResMut<NavigationTarget>,
    player_query: Query<&Pose, With<Player>>,
) {
    let Ok(pose) = player_query.single() else { return; };
    let Some((label, target)) = &navigation.active else { return; };
    if pose.position.distance(*target) < config.player.arrival_radius {
        info!("Arrived at {}", label);
        navigation.active = None;
    }
}
