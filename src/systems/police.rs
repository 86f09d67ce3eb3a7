// src/systems/police.rs - Wanted-level driven police: dispatch, pursuit and fire
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};
use crate::core::*;
use crate::systems::collision::{discs_touch, kick_away, resolve_step, BlockResponse, Resolution};
use crate::systems::combat::spawn_projectile;

/// Units that should be on the street for a given wanted level.
pub fn target_police_count(wanted_level: u8) -> usize {
    wanted_level.min(MAX_WANTED_LEVEL) as usize
}

// === DISPATCH ===
/// Keeps the live unit count equal to the wanted level. Runs at both ends of the tick.
pub fn police_dispatch_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
    player_query: Query<(&Player, &Pose)>,
    police_query: Query<(Entity, &Pose), (With<PoliceUnit>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((player, player_pose)) = player_query.single() else { return; };

    let target = target_police_count(player.wanted_level);
    let current = police_query.iter().count();

    if current < target {
        let count = target - current;
        for _ in 0..count {
            let position = police_spawn_point(player_pose.position, &config, &city, &geometry, &mut rng);
            spawn_police_unit(&mut commands, position, bearing_to(position, player_pose.position), &config);
        }
        info!("Police dispatched: {} unit(s), wanted level {}", count, player.wanted_level);
        events.write(SimEvent::PoliceDispatched { count });
    } else if current > target {
        // Farthest units stand down first.
        let mut units: Vec<(Entity, f32)> = police_query
            .iter()
            .map(|(entity, pose)| (entity, pose.position.distance_squared(player_pose.position)))
            .collect();
        units.sort_by(|a, b| b.1.total_cmp(&a.1));

        let count = current - target;
        for (entity, _) in units.into_iter().take(count) {
            commands.entity(entity).despawn();
        }
        info!("Police stood down: {} unit(s), wanted level {}", count, player.wanted_level);
        events.write(SimEvent::PoliceStoodDown { count });
    }
}

fn police_spawn_point(around: Vec2, config: &SimConfig, city: &CityMap, geometry: &WorldGeometry, rng: &mut SimRng) -> Vec2 {
    let angle = rng.0.f32() * TAU;
    let candidate = around + Vec2::new(angle.cos(), angle.sin()) * config.police.spawn_distance;
    geometry.nearest_clear_point(city, candidate, Vec2::splat(config.police.half_extent))
}

pub fn police_bundle(position: Vec2, heading: f32, config: &SimConfig) -> (Pose, Speed, PoliceUnit, Armament, Hitbox) {
    (
        Pose::new(position, heading),
        Speed(0.0),
        PoliceUnit,
        Armament::new(WeaponKind::Pistol),
        Hitbox { half_extents: Vec2::splat(config.police.half_extent) },
    )
}

pub fn spawn_police_unit(commands: &mut Commands, position: Vec2, heading: f32, config: &SimConfig) -> Entity {
    commands.spawn(police_bundle(position, heading, config)).id()
}

// === PURSUIT ===
pub fn police_pursuit_system(
    config: Res<SimConfig>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
    mut player_query: Query<(&mut Pose, &mut Speed, &mut Health, &Hitbox), (With<Player>, Without<PoliceUnit>)>,
    mut police_query: Query<(&mut Pose, &mut Speed, &Hitbox), (With<PoliceUnit>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player_pose, mut player_speed, mut health, player_hitbox)) = player_query.single_mut() else {
        return;
    };
    let tuning = &config.police;

    for (mut pose, mut speed, hitbox) in police_query.iter_mut() {
        // Proportional steering gives pursuit curves instead of snapping onto the target.
        let bearing = bearing_to(pose.position, player_pose.position);
        pose.heading += wrap_angle(bearing - pose.heading) * tuning.turn_rate;

        let distance = pose.position.distance(player_pose.position);
        if distance > tuning.engagement_range {
            speed.0 = (speed.0 + tuning.acceleration).min(tuning.max_speed);
        } else {
            speed.0 *= tuning.brake_factor;
        }

        match resolve_step(&geometry, &pose, speed.0, hitbox.half_extents, BlockResponse::Rebound, &config.collision) {
            Resolution::Moved(next) => pose.position = city.clamp(next),
            _ => {
                pose.heading += PI + rng.jitter(0.8);
                speed.0 = tuning.retreat_speed;
            }
        }

        let moving = speed.0.abs() > tuning.ram_min_speed || player_speed.0.abs() > tuning.ram_min_speed;
        if moving && discs_touch(pose.position, player_pose.position, tuning.ram_radius) {
            health.damage(tuning.ram_damage);
            events.write(SimEvent::PlayerDamaged { amount: tuning.ram_damage, source: DamageSource::PoliceRam });

            let away = (player_pose.position - pose.position).try_normalize().unwrap_or(pose.forward());
            let shoved = player_pose.position + away * tuning.ram_kick;
            if !geometry.blocked(shoved, player_hitbox.half_extents) {
                player_pose.position = city.clamp(shoved);
            }
            player_speed.0 = kick_away(&player_pose, pose.position, tuning.ram_kick);
            speed.0 = kick_away(&pose, player_pose.position, tuning.ram_kick);
        }
    }
}

// === FIRE ===
pub fn police_fire_system(
    mut commands: Commands,
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    player_query: Query<&Pose, (With<Player>, Without<PoliceUnit>)>,
    mut police_query: Query<(&Pose, &mut Armament), (With<PoliceUnit>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok(player_pose) = player_query.single() else { return; };

    for (pose, mut armament) in police_query.iter_mut() {
        if pose.position.distance(player_pose.position) > config.police.fire_range {
            continue;
        }
        if !armament.try_fire(clock.now_ms) {
            continue;
        }
        let aim = bearing_to(pose.position, player_pose.position);
        spawn_projectile(
            &mut commands,
            &mut rng,
            pose.position,
            aim,
            armament.weapon,
            ProjectileOwner::Enemy,
            config.combat.ai_spread,
            &config.combat,
        );
        events.write(SimEvent::ShotFired { owner: ProjectileOwner::Enemy, weapon: armament.weapon });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::*;

    #[test]
    fn dispatch_tracks_wanted_level() {
        let mut app = quiet_app();
        set_wanted(&mut app, 3);
        app.update();
        assert_eq!(count::<PoliceUnit>(&mut app), 3);

        set_wanted(&mut app, 1);
        app.update();
        assert_eq!(count::<PoliceUnit>(&mut app), 1);
    }

    #[test]
    fn stand_down_removes_the_farthest_units() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        let config = SimConfig::default();
        let near = spawn_police_at(&mut app, Vec2::new(1000.0, 1400.0), &config);
        let far = spawn_police_at(&mut app, Vec2::new(1000.0, 1900.0), &config);
        set_wanted(&mut app, 1);
        app.update();

        assert!(app.world().get_entity(near).is_ok());
        assert!(app.world().get_entity(far).is_err());
    }

    #[test]
    fn pursuit_closes_distance_and_curves_toward_player() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        let config = SimConfig::default();
        // Facing away from the player at the start.
        let unit = spawn_police_at(&mut app, Vec2::new(1000.0, 1600.0), &config);
        app.world_mut().get_mut::<Pose>(unit).expect("pose").heading = PI;
        set_wanted(&mut app, 1);

        let start = 600.0;
        app.update();
        let first_heading = app.world().get::<Pose>(unit).expect("pose").heading;
        assert!(first_heading != PI && (first_heading - PI).abs() < 0.5);

        for _ in 0..400 {
            app.update();
        }
        let pose = *app.world().get::<Pose>(unit).expect("pose");
        assert!(pose.position.distance(Vec2::new(1000.0, 1000.0)) < start - 200.0);
    }

    #[test]
    fn police_in_range_fire_on_cooldown() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        let config = SimConfig::default();
        spawn_police_at(&mut app, Vec2::new(1000.0, 1100.0), &config);
        set_wanted(&mut app, 1);

        app.update();
        assert_eq!(count_projectiles(&mut app, ProjectileOwner::Enemy), 1);
        // 16ms later the pistol is still cooling down.
        app.update();
        assert_eq!(count_projectiles(&mut app, ProjectileOwner::Enemy), 1);
    }

    /// A unit at `position` heading -Y, with its gun kept cold.
    fn quiet_unit(app: &mut App, position: Vec2, speed: f32) -> Entity {
        let config = SimConfig::default();
        let unit = spawn_police_at(app, position, &config);
        holster(app, unit);
        set_speed(app, unit, speed);
        set_wanted(app, 1);
        unit
    }

    fn unit_pose(app: &App, unit: Entity) -> Pose {
        *app.world().get::<Pose>(unit).expect("pose")
    }

    fn unit_speed(app: &App, unit: Entity) -> f32 {
        app.world().get::<Speed>(unit).expect("speed").0
    }

    #[test]
    fn driving_into_a_parked_unit_hurts_and_shoves_it() {
        let mut app = quiet_app();
        let mode = PlayerMode::InVehicle { kind: VehicleKind::Car, color: CarColor::White };
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, mode);
        set_player_speed(&mut app, 3.5);
        // Dead ahead, 25 units up the road.
        let unit = quiet_unit(&mut app, Vec2::new(1000.0, 975.0), 0.0);

        for _ in 0..10 {
            app.update();
            let gap = player_pose(&mut app).position.distance(unit_pose(&app, unit).position);
            assert!(gap >= 20.0, "gap {gap}");
        }

        assert_eq!(player_health(&mut app), 95.0);
        assert!(unit_pose(&app, unit).position.y < 975.0);
        assert!(player_pose(&mut app).position.y > 996.64);
        assert!(player_speed(&mut app) < 0.0);
    }

    /// Runs until the first hit lands, at most 15 ticks.
    fn until_hurt(app: &mut App) {
        for _ in 0..15 {
            app.update();
            if player_health(app) < 100.0 {
                return;
            }
        }
    }

    #[test]
    fn moving_unit_rams_a_standing_player() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        let unit = quiet_unit(&mut app, Vec2::new(1000.0, 1030.0), 3.0);
        until_hurt(&mut app);

        assert_eq!(player_health(&mut app), 95.0);
        // Both sides are kicked apart along their headings.
        assert_eq!(player_speed(&mut app), 2.0);
        assert_eq!(unit_speed(&app, unit), -2.0);
        assert!((player_pose(&mut app).position.y - 998.0).abs() < 1e-3);
    }

    #[test]
    fn ram_never_shoves_the_player_into_a_building() {
        let mut app = quiet_app();
        // Spans y 984..996; the walker clears it at 1000 but not at 998.
        set_obstacles(&mut app, vec![Obstacle::new(Vec2::new(1000.0, 990.0), 40.0, 12.0)]);
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        quiet_unit(&mut app, Vec2::new(1000.0, 1030.0), 3.0);
        until_hurt(&mut app);

        assert_eq!(player_health(&mut app), 95.0);
        assert_eq!(player_pose(&mut app).position, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn blocked_unit_turns_around_and_retreats() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        // Wall across the unit's path, y 1275..1285.
        set_obstacles(&mut app, vec![Obstacle::new(Vec2::new(1000.0, 1280.0), 60.0, 10.0)]);
        let unit = quiet_unit(&mut app, Vec2::new(1000.0, 1300.0), 3.0);

        // First tick still fits; the second runs into the wall.
        app.update();
        app.update();
        let pose = unit_pose(&app, unit);
        let tuning = SimConfig::default().police;
        assert_eq!(unit_speed(&app, unit), tuning.retreat_speed);
        assert!((pose.position.y - 1296.92).abs() < 1e-3);
        assert!(wrap_angle(pose.heading).abs() > PI - 0.8 - 1e-3);

        app.update();
        assert!(unit_pose(&app, unit).position.y > pose.position.y);
    }
}

