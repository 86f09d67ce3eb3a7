// src/systems/player.rs - Player motion integration and vehicle contacts
use bevy::prelude::*;
use crate::core::*;
use crate::systems::collision::{closing_contact, kick_away, rebound, resolve_step, BlockResponse, Resolution};

/// One tick of throttle, drag and steering for a driven vehicle. Returns (speed, heading).
pub fn integrate_vehicle(
    speed: f32,
    heading: f32,
    input: &InputState,
    profile: &VehicleProfile,
    driving: &DrivingConfig,
) -> (f32, f32) {
    let mut speed = match input.throttle() {
        t if t > 0.0 => (speed + profile.acceleration).min(profile.max_speed),
        t if t < 0.0 => (speed - profile.acceleration).max(-profile.reverse_speed),
        _ => speed * driving.idle_drag,
    };
    if input.brake {
        speed *= driving.brake_drag;
    }

    // Steering authority grows with speed, and flips when reversing.
    let speed_ratio = speed / profile.max_speed;
    let heading = heading + input.steering() * driving.steer_rate * speed_ratio;
    (speed, heading)
}

/// On foot there is no ramp: the walk speed is either on or off.
pub fn integrate_on_foot(heading: f32, input: &InputState, player: &PlayerConfig) -> (f32, f32) {
    let heading = heading + input.steering() * player.walk_turn_rate;
    let speed = input.throttle() * player.walk_speed;
    (speed, heading)
}

pub fn avatar_pose(mode: PlayerMode, weapon: WeaponKind, speed: f32) -> AvatarPose {
    match mode {
        PlayerMode::InVehicle { .. } => AvatarPose::Driving,
        PlayerMode::OnFoot if weapon != WeaponKind::Unarmed => AvatarPose::Aiming,
        PlayerMode::OnFoot if speed != 0.0 => AvatarPose::Walking,
        PlayerMode::OnFoot => AvatarPose::Idle,
    }
}

pub fn player_movement_system(
    input: Res<InputState>,
    config: Res<SimConfig>,
    clock: Res<SimClock>,
    city: Res<CityMap>,
    geometry: Res<WorldGeometry>,
    mut player_query: Query<(&mut Player, &mut Pose, &mut Speed, &mut Health, &Hitbox, &Armament)>,
    mut traffic_query: Query<(&Pose, &mut TrafficVehicle), (Without<Inactive>, Without<Player>)>,
    parked_query: Query<&Pose, (With<ParkedVehicle>, Without<Player>)>,
    mut police_query: Query<(&Pose, &mut Speed), (With<PoliceUnit>, Without<Player>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player, mut pose, mut speed, mut health, hitbox, armament)) = player_query.single_mut() else {
        return;
    };

    let (next_speed, next_heading) = match player.mode {
        PlayerMode::InVehicle { kind, .. } => {
            integrate_vehicle(speed.0, pose.heading, &input, &kind.profile(), &config.driving)
        }
        PlayerMode::OnFoot => integrate_on_foot(pose.heading, &input, &config.player),
    };
    speed.0 = next_speed;
    pose.heading = next_heading;

    let response = if player.in_vehicle() { BlockResponse::Rebound } else { BlockResponse::Stop };
    match resolve_step(&geometry, &pose, speed.0, hitbox.half_extents, response, &config.collision) {
        Resolution::Moved(next) => {
            let contact = player.in_vehicle() && {
                let mut contacts = VehicleContacts {
                    player: &mut player,
                    health: &mut health,
                    current: pose.position,
                    proposed: next,
                    clock: &clock,
                    config: &config,
                    events: &mut events,
                };
                // Evaluate every class so each one applies its own effects.
                let traffic = contacts.traffic(&mut traffic_query);
                let police = contacts.police(&mut police_query);
                let parked = contacts.parked(&parked_query);
                traffic || police || parked
            };
            if contact {
                speed.0 = rebound(speed.0, &config.collision);
            } else {
                pose.position = city.clamp(next);
            }
        }
        Resolution::Stopped(position) => {
            pose.position = city.clamp(position);
            speed.0 = 0.0;
        }
        Resolution::Rebounded { speed: bounced } => speed.0 = bounced,
    }

    player.avatar_pose = avatar_pose(player.mode, armament.weapon, speed.0);
}

/// Disc contacts between the player's vehicle and other vehicles at the proposed position.
/// Only steps that close the gap count, so a car can always back out of an overlap.
struct VehicleContacts<'a, 'w> {
    player: &'a mut Player,
    health: &'a mut Health,
    current: Vec2,
    proposed: Vec2,
    clock: &'a SimClock,
    config: &'a SimConfig,
    events: &'a mut EventWriter<'w, SimEvent>,
}

impl VehicleContacts<'_, '_> {
    /// Traffic blocks on every closing tick; damage and the hit counter share the
    /// per-car debounce window.
    fn traffic(&mut self, traffic_query: &mut Query<(&Pose, &mut TrafficVehicle), (Without<Inactive>, Without<Player>)>) -> bool {
        let tuning = &self.config.traffic;
        let mut contact = false;

        for (traffic_pose, mut traffic) in traffic_query.iter_mut() {
            if !closing_contact(self.current, self.proposed, traffic_pose.position, tuning.contact_radius) {
                continue;
            }
            contact = true;

            let debounced = self
                .clock
                .since(traffic.last_hit_ms)
                .is_some_and(|elapsed| elapsed < tuning.hit_debounce_ms);
            if debounced {
                continue;
            }
            traffic.last_hit_ms = Some(self.clock.now_ms);
            self.health.damage(tuning.contact_damage);
            self.events.write(SimEvent::PlayerDamaged {
                amount: tuning.contact_damage,
                source: DamageSource::TrafficCollision,
            });
            self.player.hit_count += 1;
            debug!("Traffic collision #{}", self.player.hit_count);

            if self.player.hit_count > tuning.hit_threshold && self.player.wanted_level == 0 {
                let from = self.player.raise_wanted(1);
                info!("Reckless driving: wanted level {} -> {}", from, self.player.wanted_level);
                self.events.write(SimEvent::WantedLevelChanged { from, to: self.player.wanted_level });
            }
        }
        contact
    }

    /// Driving into a police unit hurts like a ram and shoves the unit back.
    fn police(&mut self, police_query: &mut Query<(&Pose, &mut Speed), (With<PoliceUnit>, Without<Player>)>) -> bool {
        let tuning = &self.config.police;
        let mut contact = false;

        for (unit_pose, mut unit_speed) in police_query.iter_mut() {
            if !closing_contact(self.current, self.proposed, unit_pose.position, tuning.ram_radius) {
                continue;
            }
            contact = true;
            self.health.damage(tuning.ram_damage);
            self.events.write(SimEvent::PlayerDamaged { amount: tuning.ram_damage, source: DamageSource::PoliceRam });
            unit_speed.0 = kick_away(unit_pose, self.current, tuning.ram_kick);
        }
        contact
    }

    fn parked(&mut self, parked_query: &Query<&Pose, (With<ParkedVehicle>, Without<Player>)>) -> bool {
        let radius = self.config.traffic.contact_radius;
        parked_query
            .iter()
            .any(|p| closing_contact(self.current, self.proposed, p.position, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::*;
    use std::f32::consts::PI;

    fn held(forward: bool, back: bool, left: bool, brake: bool) -> InputState {
        InputState { forward, back, left, brake, ..default() }
    }

    #[test]
    fn throttle_ramps_to_kind_max() {
        let driving = SimConfig::default().driving;
        let profile = VehicleKind::AutoRickshaw.profile();
        let mut speed = 0.0;
        for _ in 0..200 {
            speed = integrate_vehicle(speed, 0.0, &held(true, false, false, false), &profile, &driving).0;
        }
        assert_eq!(speed, profile.max_speed);
    }

    #[test]
    fn idle_drag_and_brake_decay() {
        let driving = SimConfig::default().driving;
        let profile = VehicleKind::Car.profile();
        let (coast, _) = integrate_vehicle(2.0, 0.0, &InputState::default(), &profile, &driving);
        let (braked, _) = integrate_vehicle(2.0, 0.0, &held(false, false, false, true), &profile, &driving);
        assert!((coast - 1.92).abs() < 1e-5);
        assert!(braked < coast);
    }

    #[test]
    fn steering_scales_with_speed() {
        let driving = SimConfig::default().driving;
        let profile = VehicleKind::Car.profile();
        let left = held(false, false, true, false);
        let (_, stopped) = integrate_vehicle(0.0, 0.0, &left, &profile, &driving);
        let (_, slow) = integrate_vehicle(1.0, 0.0, &left, &profile, &driving);
        let (_, fast) = integrate_vehicle(3.0, 0.0, &left, &profile, &driving);
        assert_eq!(stopped, 0.0);
        assert!(fast > slow && slow > 0.0);
    }

    #[test]
    fn walking_has_no_ramp() {
        let player = SimConfig::default().player;
        let (speed, heading) = integrate_on_foot(1.0, &held(true, false, true, false), &player);
        assert_eq!(speed, player.walk_speed);
        assert_eq!(heading, 1.0 + player.walk_turn_rate);
        let (speed, _) = integrate_on_foot(1.0, &InputState::default(), &player);
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn drawn_weapon_forces_aiming() {
        assert_eq!(avatar_pose(PlayerMode::OnFoot, WeaponKind::Rifle, 0.0), AvatarPose::Aiming);
        assert_eq!(avatar_pose(PlayerMode::OnFoot, WeaponKind::Pistol, 0.8), AvatarPose::Aiming);
        assert_eq!(avatar_pose(PlayerMode::OnFoot, WeaponKind::Unarmed, 0.8), AvatarPose::Walking);
        assert_eq!(avatar_pose(PlayerMode::OnFoot, WeaponKind::Unarmed, 0.0), AvatarPose::Idle);
    }

    fn driving_app() -> App {
        let mut app = quiet_app();
        app.world_mut().resource_mut::<SimConfig>().traffic.wander_chance = 0.0;
        let mode = PlayerMode::InVehicle { kind: VehicleKind::Car, color: CarColor::White };
        place_player(&mut app, Vec2::new(1000.0, 1000.0), 0.0, mode);
        app
    }

    #[test]
    fn passing_car_costs_one_hit_not_a_drain() {
        let mut app = driving_app();
        // Heading PI drives towards +Y, straight through the parked player.
        spawn_traffic_at(&mut app, Vec2::new(1000.0, 970.0), PI, 0.5);
        // 120 ticks is 1920 ms, inside one debounce window.
        for _ in 0..120 {
            app.update();
        }

        let state = player(&mut app);
        assert_eq!(state.hit_count, 1);
        assert_eq!(state.wanted_level, 0);
        assert_eq!(player_health(&mut app), 99.0);
    }

    #[test]
    fn reversing_out_of_an_overlap_is_allowed() {
        let mut app = driving_app();
        // Overlapping, directly ahead.
        spawn_traffic_at(&mut app, Vec2::new(1000.0, 985.0), 0.0, 0.0);
        app.world_mut().resource_mut::<InputState>().back = true;
        for _ in 0..10 {
            app.update();
        }

        assert!(player_pose(&mut app).position.y > 1000.0);
        assert_eq!(player(&mut app).hit_count, 0);
        assert_eq!(player_health(&mut app), 100.0);
    }

    #[test]
    fn driving_into_a_car_ahead_rebounds() {
        let mut app = driving_app();
        spawn_traffic_at(&mut app, Vec2::new(1000.0, 975.0), 0.0, 0.0);
        set_player_speed(&mut app, 3.5);
        for _ in 0..10 {
            app.update();
            let gap = player_pose(&mut app).position.distance(Vec2::new(1000.0, 975.0));
            assert!(gap >= 22.0, "gap {gap}");
        }
        assert_eq!(player(&mut app).hit_count, 1);
        assert!(player_speed(&mut app) < 0.0);
    }
}
