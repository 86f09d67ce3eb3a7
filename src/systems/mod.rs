// src/systems/mod.rs - Simulation systems and the plugin that schedules them
use bevy::prelude::*;
use crate::core::*;

pub mod camera;
pub mod collision;
pub mod combat;
pub mod external;
pub mod input;
pub mod interaction;
pub mod pedestrians;
pub mod player;
pub mod police;
pub mod projectiles;
pub mod setup;
pub mod snapshot;
pub mod traffic;

use camera::{follow_camera_system, FollowCamera};
use combat::{player_combat_system, weapon_select_system};
use external::{advance_clock_system, apply_external_commands_system, navigation_arrival_system};
use interaction::vehicle_interaction_system;
use pedestrians::pedestrian_system;
use player::player_movement_system;
use police::{police_dispatch_system, police_fire_system, police_pursuit_system};
use projectiles::projectile_system;
use setup::setup_world;
use snapshot::publish_snapshot_system;
use traffic::traffic_system;

/// One tick runs these in order. Everything but `Present` halts while paused.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Intake,
    Actors,
    Combat,
    Settle,
    Present,
}

pub fn simulation_running(game_mode: Res<GameMode>) -> bool {
    !game_mode.paused
}

pub struct SimulationPlugin {
    pub config: SimConfig,
    pub city: CityMap,
}

impl SimulationPlugin {
    pub fn new(config: SimConfig, city: CityMap) -> Self {
        Self { config, city }
    }

    pub fn from_files() -> Self {
        Self::new(SimConfig::load(), CityMap::load())
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();
        let geometry = WorldGeometry::generate(
            &self.city,
            &config.world,
            config.collision.broad_phase_radius,
            config.simulation.seed,
        );
        info!(
            "Simulation: seed {:#x}, {}x{} map, {} districts",
            config.simulation.seed,
            self.city.width,
            self.city.height,
            self.city.districts.len()
        );

        app.insert_resource(SimRng::seeded(config.simulation.seed))
            .insert_resource(geometry)
            .insert_resource(self.city.clone())
            .insert_resource(config)
            .init_resource::<SimClock>()
            .init_resource::<GameMode>()
            .init_resource::<InputState>()
            .init_resource::<ExternalCommands>()
            .init_resource::<NavigationTarget>()
            .init_resource::<FollowCamera>()
            .init_resource::<WorldSnapshot>()
            .add_event::<SimEvent>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Intake,
                    SimulationSet::Actors,
                    SimulationSet::Combat,
                    SimulationSet::Settle,
                )
                    .chain()
                    .run_if(simulation_running),
            )
            .configure_sets(Update, SimulationSet::Present.after(SimulationSet::Settle))
            .add_systems(Startup, setup_world)
            .add_systems(
                Update,
                (
                    advance_clock_system,
                    apply_external_commands_system,
                    police_dispatch_system,
                    weapon_select_system,
                    vehicle_interaction_system,
                )
                    .chain()
                    .in_set(SimulationSet::Intake),
            )
            .add_systems(
                Update,
                (player_movement_system, traffic_system, pedestrian_system, police_pursuit_system)
                    .chain()
                    .in_set(SimulationSet::Actors),
            )
            .add_systems(
                Update,
                (police_fire_system, player_combat_system, projectile_system)
                    .chain()
                    .in_set(SimulationSet::Combat),
            )
            .add_systems(
                Update,
                (police_dispatch_system, navigation_arrival_system, follow_camera_system)
                    .chain()
                    .in_set(SimulationSet::Settle),
            )
            .add_systems(Update, publish_snapshot_system.in_set(SimulationSet::Present));
    }
}
