// src/systems/combat.rs - Player weapons: selection, shooting and melee
use bevy::prelude::*;
use crate::core::*;
use crate::systems::collision::discs_touch;

/// Spawns one projectile a little in front of the shooter, with angular jitter.
pub fn spawn_projectile(
    commands: &mut Commands,
    rng: &mut SimRng,
    origin: Vec2,
    aim: f32,
    weapon: WeaponKind,
    owner: ProjectileOwner,
    spread: f32,
    combat: &CombatConfig,
) -> Entity {
    let heading = aim + rng.jitter(spread);
    let position = origin + heading_vector(aim) * combat.muzzle_offset;
    commands
        .spawn((
            Pose::new(position, heading),
            Projectile {
                owner,
                weapon,
                speed: weapon.profile().projectile_speed,
                life: combat.projectile_life,
            },
        ))
        .id()
}

/// Cash for a kill plus one wanted star. Returns the reward.
pub fn reward_kill(player: &mut Player, rng: &mut SimRng, combat: &CombatConfig, events: &mut EventWriter<SimEvent>) -> u32 {
    let reward = rng.0.u32(combat.kill_reward_min..=combat.kill_reward_max);
    player.money = player.money.saturating_add(reward);

    let from = player.raise_wanted(1);
    if from != player.wanted_level {
        info!("Pedestrian killed: wanted level {} -> {}", from, player.wanted_level);
        events.write(SimEvent::WantedLevelChanged { from, to: player.wanted_level });
    }
    reward
}

pub fn weapon_select_system(mut input: ResMut<InputState>, mut player_query: Query<&mut Armament, With<Player>>) {
    let Some(weapon) = input.take_weapon_select() else { return; };
    let Ok(mut armament) = player_query.single_mut() else { return; };
    if weapon != armament.weapon {
        info!("Equipped {:?}", weapon);
        armament.equip(weapon);
    }
}

pub fn player_combat_system(
    mut commands: Commands,
    input: Res<InputState>,
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut rng: ResMut<SimRng>,
    mut player_query: Query<(&mut Player, &Pose, &mut Armament)>,
    pedestrian_query: Query<(Entity, &Pose), (With<Pedestrian>, Without<Dead>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player, pose, mut armament)) = player_query.single_mut() else { return; };

    // Weapons are an on-foot affair.
    if !input.fire || player.in_vehicle() {
        return;
    }
    if !armament.try_fire(clock.now_ms) {
        return;
    }

    if armament.weapon.is_melee() {
        for (entity, target) in pedestrian_query.iter() {
            if !discs_touch(pose.position, target.position, config.combat.melee_radius) {
                continue;
            }
            commands.entity(entity).insert(Dead);
            let reward = reward_kill(&mut player, &mut rng, &config.combat, &mut events);
            debug!("Melee kill, +{}", reward);
            events.write(SimEvent::PedestrianKilled { entity });
        }
        return;
    }

    spawn_projectile(
        &mut commands,
        &mut rng,
        pose.position,
        pose.heading,
        armament.weapon,
        ProjectileOwner::Player,
        config.combat.player_spread,
        &config.combat,
    );
    events.write(SimEvent::ShotFired { owner: ProjectileOwner::Player, weapon: armament.weapon });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::*;

    #[test]
    fn weapon_select_is_consumed_and_equipped() {
        let mut app = quiet_app();
        app.world_mut().resource_mut::<InputState>().weapon_select = Some(WeaponKind::Submachine);
        app.update();
        assert_eq!(player_weapon(&mut app), WeaponKind::Submachine);
        assert_eq!(app.world().resource::<InputState>().weapon_select, None);
        assert_eq!(player(&mut app).avatar_pose, AvatarPose::Aiming);
    }

    #[test]
    fn no_shooting_from_a_vehicle() {
        let mut app = quiet_app();
        let mode = PlayerMode::InVehicle { kind: VehicleKind::Car, color: CarColor::White };
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, mode);
        equip(&mut app, WeaponKind::Pistol);
        app.world_mut().resource_mut::<InputState>().fire = true;
        app.update();
        assert_eq!(count_projectiles(&mut app, ProjectileOwner::Player), 0);
    }

    #[test]
    fn melee_misses_out_of_reach() {
        let mut app = quiet_app();
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
        let walker = spawn_pedestrian_at(&mut app, Vec2::new(1020.0, 1000.0), 0.0, 0.0);
        app.world_mut().resource_mut::<InputState>().fire = true;
        app.update();
        assert!(!app.world().entity(walker).contains::<Dead>());
        assert_eq!(player(&mut app).wanted_level, 0);
    }

    #[test]
    fn submachine_fires_faster_than_rifle() {
        let mut fired = Vec::new();
        for weapon in [WeaponKind::Submachine, WeaponKind::Rifle] {
            let mut app = quiet_app();
            place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, PlayerMode::OnFoot);
            equip(&mut app, weapon);
            app.world_mut().resource_mut::<InputState>().fire = true;
            let mut shots = 0;
            for _ in 0..60 {
                app.update();
                shots = shots.max(count_projectiles(&mut app, ProjectileOwner::Player));
            }
            fired.push(shots);
        }
        assert!(fired[0] > fired[1], "{fired:?}");
    }
}
