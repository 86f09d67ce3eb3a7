// src/systems/projectiles.rs - Projectile flight, hits and expiry
use bevy::prelude::*;
use crate::core::*;
use crate::systems::collision::discs_touch;
use crate::systems::combat::reward_kill;

/// What a projectile struck this tick, if anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    Geometry,
    Pedestrian(Entity),
    Police(Entity),
    Player,
}

/// Moves every projectile one step and resolves at most one impact for it.
/// A projectile is despawned in exactly one place: here, on impact or expiry.
pub fn projectile_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    geometry: Res<WorldGeometry>,
    mut rng: ResMut<SimRng>,
    mut projectile_query: Query<(Entity, &mut Pose, &mut Projectile)>,
    mut player_query: Query<(&mut Player, &Pose, &mut Health), Without<Projectile>>,
    pedestrian_query: Query<(Entity, &Pose), (With<Pedestrian>, Without<Dead>, Without<Projectile>, Without<Player>)>,
    police_query: Query<(Entity, &Pose), (With<PoliceUnit>, Without<Projectile>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player, player_pose, mut health)) = player_query.single_mut() else { return; };
    let combat = &config.combat;
    // Kills land through commands, so guard against two rounds claiming the same body.
    let mut killed: Vec<Entity> = Vec::new();

    for (entity, mut pose, mut projectile) in projectile_query.iter_mut() {
        let step = pose.forward() * projectile.speed;
        pose.position += step;
        projectile.life = projectile.life.saturating_sub(1);

        let impact = find_impact(
            pose.position,
            projectile.owner,
            &geometry,
            combat,
            player_pose.position,
            pedestrian_query.iter().filter(|(e, _)| !killed.contains(e)),
            police_query.iter(),
        );

        match impact {
            Some(Impact::Geometry) => {}
            Some(Impact::Pedestrian(target)) => {
                killed.push(target);
                commands.entity(target).insert(Dead);
                let reward = reward_kill(&mut player, &mut rng, combat, &mut events);
                debug!("{:?} kill, +{}", projectile.weapon, reward);
                events.write(SimEvent::PedestrianKilled { entity: target });
            }
            // Police soak up rounds.
            Some(Impact::Police(_)) => {}
            Some(Impact::Player) => {
                health.damage(combat.enemy_shot_damage);
                events.write(SimEvent::PlayerDamaged {
                    amount: combat.enemy_shot_damage,
                    source: DamageSource::Gunfire,
                });
            }
            None if projectile.life == 0 => {}
            None => continue,
        }

        commands.entity(entity).despawn();
    }
}

fn find_impact<'a>(
    position: Vec2,
    owner: ProjectileOwner,
    geometry: &WorldGeometry,
    combat: &CombatConfig,
    player_position: Vec2,
    mut pedestrians: impl Iterator<Item = (Entity, &'a Pose)>,
    mut police: impl Iterator<Item = (Entity, &'a Pose)>,
) -> Option<Impact> {
    if geometry.obstacles().iter().any(|o| o.contains_point(position)) {
        return Some(Impact::Geometry);
    }

    match owner {
        ProjectileOwner::Player => {
            if let Some((entity, _)) =
                pedestrians.find(|(_, p)| discs_touch(position, p.position, combat.pedestrian_hit_radius))
            {
                return Some(Impact::Pedestrian(entity));
            }
            police
                .find(|(_, p)| discs_touch(position, p.position, combat.police_hit_radius))
                .map(|(entity, _)| Impact::Police(entity))
        }
        ProjectileOwner::Enemy => {
            discs_touch(position, player_position, combat.player_hit_radius).then_some(Impact::Player)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::*;

    fn fire_round(app: &mut App, position: Vec2, heading: f32, owner: ProjectileOwner, life: u32) -> Entity {
        app.world_mut()
            .spawn((
                Pose::new(position, heading),
                Projectile { owner, weapon: WeaponKind::Pistol, speed: 12.0, life },
            ))
            .id()
    }

    #[test]
    fn projectile_expires_after_its_life() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(3000.0, 3000.0), 0.0, PlayerMode::OnFoot);
        let round = fire_round(&mut app, Vec2::new(1000.0, 3000.0), 0.0, ProjectileOwner::Player, 3);
        app.update();
        app.update();
        assert!(app.world().get_entity(round).is_ok());
        app.update();
        assert!(app.world().get_entity(round).is_err());
    }

    #[test]
    fn player_round_kills_pedestrian_and_pays_out() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(3000.0, 3000.0), 0.0, PlayerMode::OnFoot);
        let walker = spawn_pedestrian_at(&mut app, Vec2::new(1000.0, 988.0), 0.0, 0.0);
        let round = fire_round(&mut app, Vec2::new(1000.0, 1000.0), 0.0, ProjectileOwner::Player, 90);
        let money = player(&mut app).money;
        app.update();

        assert!(app.world().entity(walker).contains::<Dead>());
        assert!(app.world().get_entity(round).is_err());
        let player = player(&mut app);
        assert!((money + 10..=money + 50).contains(&player.money));
        assert_eq!(player.wanted_level, 1);
    }

    #[test]
    fn two_rounds_cannot_kill_the_same_pedestrian() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(3000.0, 3000.0), 0.0, PlayerMode::OnFoot);
        spawn_pedestrian_at(&mut app, Vec2::new(1000.0, 988.0), 0.0, 0.0);
        fire_round(&mut app, Vec2::new(1000.0, 1000.0), 0.0, ProjectileOwner::Player, 90);
        fire_round(&mut app, Vec2::new(1002.0, 1000.0), 0.0, ProjectileOwner::Player, 90);
        app.update();

        assert_eq!(player(&mut app).wanted_level, 1);
        assert_eq!(count_projectiles(&mut app, ProjectileOwner::Player), 1);
    }

    #[test]
    fn enemy_round_damages_player() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 988.0), 0.0, PlayerMode::OnFoot);
        fire_round(&mut app, Vec2::new(1000.0, 1000.0), 0.0, ProjectileOwner::Enemy, 90);
        let before = player_health(&mut app);
        app.update();
        assert_eq!(before - player_health(&mut app), 10.0);
        assert_eq!(count_projectiles(&mut app, ProjectileOwner::Enemy), 0);
    }

    #[test]
    fn buildings_stop_rounds() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(3000.0, 3000.0), 0.0, PlayerMode::OnFoot);
        set_obstacles(&mut app, vec![Obstacle::new(Vec2::new(1000.0, 980.0), 40.0, 20.0)]);
        let round = fire_round(&mut app, Vec2::new(1000.0, 1000.0), 0.0, ProjectileOwner::Player, 90);
        app.update();
        assert!(app.world().get_entity(round).is_err());
    }

    #[test]
    fn police_absorb_player_rounds() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(3000.0, 3000.0), 0.0, PlayerMode::OnFoot);
        let unit = spawn_police_at(&mut app, Vec2::new(1000.0, 988.0), &SimConfig::default());
        set_wanted(&mut app, 1);
        let round = fire_round(&mut app, Vec2::new(1000.0, 1000.0), 0.0, ProjectileOwner::Player, 90);
        app.update();
        assert!(app.world().get_entity(round).is_err());
        assert!(app.world().get_entity(unit).is_ok());
    }
}
