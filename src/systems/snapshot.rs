// src/systems/snapshot.rs - Publishes the per-frame world snapshot
use bevy::prelude::*;
use crate::core::*;

pub fn navigation_indicator(pose: &Pose, label: &str, target: Vec2) -> NavigationIndicator {
    NavigationIndicator {
        label: label.to_string(),
        target: target.to_array(),
        relative_bearing: wrap_angle(bearing_to(pose.position, target) - pose.heading),
        distance: pose.position.distance(target),
    }
}

/// Runs every frame, paused or not, so consumers always see the latest state.
pub fn publish_snapshot_system(
    clock: Res<SimClock>,
    city: Res<CityMap>,
    navigation: Res<NavigationTarget>,
    mut snapshot: ResMut<WorldSnapshot>,
    player_query: Query<(&Player, &Pose, &Speed, &Health, &Armament)>,
    police_query: Query<(), With<PoliceUnit>>,
) {
    let Ok((player, pose, speed, health, armament)) = player_query.single() else { return; };

    let next = WorldSnapshot {
        tick: clock.tick,
        position: pose.position.to_array(),
        heading: pose.heading,
        speed: speed.0,
        district: city.district_at(pose.position).to_string(),
        money: player.money,
        health: health.0,
        wanted_level: player.wanted_level,
        hit_count: player.hit_count,
        in_vehicle: player.in_vehicle(),
        vehicle_kind: player.vehicle_kind(),
        weapon: armament.weapon,
        pose: player.avatar_pose,
        police_units: police_query.iter().count(),
        navigation: navigation
            .active
            .as_ref()
            .map(|(label, target)| navigation_indicator(pose, label, *target)),
        wasted: health.0 <= 0.0,
    };

    // Leave change detection quiet when nothing moved.
    if *snapshot != next {
        *snapshot = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn indicator_is_relative_to_heading() {
        // Facing -Y with the target due +X: a quarter turn to the right.
        let pose = Pose::new(Vec2::new(0.0, 0.0), 0.0);
        let indicator = navigation_indicator(&pose, "east", Vec2::new(100.0, 0.0));
        assert!((indicator.relative_bearing + FRAC_PI_2).abs() < 1e-4);
        assert!((indicator.distance - 100.0).abs() < 1e-4);

        let turned = Pose::new(Vec2::new(0.0, 0.0), -FRAC_PI_2);
        let indicator = navigation_indicator(&turned, "east", Vec2::new(100.0, 0.0));
        assert!(indicator.relative_bearing.abs() < 1e-4);
    }

    #[test]
    fn snapshot_reflects_player_state() {
        let mut app = quiet_app();
        app.world_mut().insert_resource(CityMap::default());
        place_player(&mut app, Vec2::new(1900.0, 1900.0), 0.0, PlayerMode::OnFoot);
        set_wanted(&mut app, 2);
        app.update();

        let snapshot = app.world().resource::<WorldSnapshot>().clone();
        assert_eq!(snapshot.district, "Connaught Place");
        assert_eq!(snapshot.wanted_level, 2);
        assert_eq!(snapshot.police_units, 2);
        assert!(!snapshot.in_vehicle);
        assert_eq!(snapshot.vehicle_kind, None);
        assert_eq!(snapshot.pose, AvatarPose::Idle);
        assert!(!snapshot.wasted);
        assert_eq!(snapshot.tick, app.world().resource::<SimClock>().tick);
    }

    #[test]
    fn snapshot_is_published_while_paused() {
        let mut app = quiet_app();
        app.world_mut().resource_mut::<GameMode>().paused = true;
        let tick = app.world().resource::<SimClock>().tick;
        place_player(&mut app, Vec2::new(321.0, 654.0), 0.0, PlayerMode::OnFoot);
        app.update();

        let snapshot = app.world().resource::<WorldSnapshot>().clone();
        assert_eq!(snapshot.position, [321.0, 654.0]);
        assert_eq!(app.world().resource::<SimClock>().tick, tick);
    }
}
