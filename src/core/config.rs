// src/core/config.rs - Simulation tuning
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = "data/config/simulation.json";

#[derive(Resource, Serialize, Deserialize, Clone, Debug)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub driving: DrivingConfig,
    pub traffic: TrafficConfig,
    pub pedestrians: PedestriansConfig,
    pub combat: CombatConfig,
    pub police: PoliceConfig,
    pub camera: CameraConfig,
    pub collision: CollisionConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SimulationConfig {
    pub seed: u64,
    pub tick_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldConfig {
    pub road_spacing: f32,
    pub road_width: f32,
    pub building_min_size: f32,
    pub building_max_size: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlayerConfig {
    pub start_position: [f32; 2],
    pub start_money: u32,
    pub start_health: f32,
    pub start_in_vehicle: bool,
    pub walk_speed: f32,
    pub walk_turn_rate: f32,
    pub pedestrian_half_extent: f32,
    pub pickup_radius: f32,
    pub exit_offset: f32,
    pub arrival_radius: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DrivingConfig {
    pub idle_drag: f32,
    pub brake_drag: f32,
    pub steer_rate: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrafficConfig {
    pub population: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub auto_share: f32,
    pub sports_share: f32,
    pub wander_chance: f32,
    pub contact_radius: f32,
    pub contact_damage: f32,
    pub hit_debounce_ms: u64,
    pub hit_threshold: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PedestriansConfig {
    pub population: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub wander_chance: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CombatConfig {
    pub melee_radius: f32,
    pub pedestrian_hit_radius: f32,
    pub police_hit_radius: f32,
    pub player_hit_radius: f32,
    pub enemy_shot_damage: f32,
    pub kill_reward_min: u32,
    pub kill_reward_max: u32,
    pub projectile_life: u32,
    pub muzzle_offset: f32,
    pub player_spread: f32,
    pub ai_spread: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PoliceConfig {
    pub spawn_distance: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub turn_rate: f32,
    pub engagement_range: f32,
    pub brake_factor: f32,
    pub fire_range: f32,
    pub retreat_speed: f32,
    pub ram_radius: f32,
    pub ram_damage: f32,
    pub ram_kick: f32,
    pub ram_min_speed: f32,
    pub half_extent: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CameraConfig {
    pub default_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub height_ratio: f32,
    pub smoothing: f32,
    pub zoom_step: f32,
    pub orbit_sensitivity: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CollisionConfig {
    pub broad_phase_radius: f32,
    pub nudge: f32,
    pub rebound: f32,
}

impl SimConfig {
    pub fn load() -> Self {
        match std::fs::read_to_string(CONFIG_PATH) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| error!("Failed to parse simulation config: {}", e))
                .unwrap_or_else(|_| Self::default()),
            Err(e) => {
                error!("Failed to load simulation config: {}", e);
                Self::default()
            }
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                seed: 0x5eed_de11,
                tick_ms: 16,
            },
            world: WorldConfig {
                road_spacing: 100.0,
                road_width: 12.0,
                building_min_size: 25.0,
                building_max_size: 45.0,
            },
            player: PlayerConfig {
                start_position: [2000.0, 2000.0],
                start_money: 500,
                start_health: 100.0,
                start_in_vehicle: true,
                walk_speed: 0.8,
                walk_turn_rate: 0.05,
                pedestrian_half_extent: 3.0,
                pickup_radius: 30.0,
                exit_offset: 25.0,
                arrival_radius: 50.0,
            },
            driving: DrivingConfig {
                idle_drag: 0.96,
                brake_drag: 0.9,
                steer_rate: 0.04,
            },
            traffic: TrafficConfig {
                population: 60,
                min_speed: 0.5,
                max_speed: 2.0,
                auto_share: 0.4,
                sports_share: 0.1,
                wander_chance: 0.005,
                contact_radius: 22.0,
                contact_damage: 1.0,
                hit_debounce_ms: 2000,
                hit_threshold: 3,
            },
            pedestrians: PedestriansConfig {
                population: 80,
                min_speed: 0.1,
                max_speed: 0.2,
                wander_chance: 0.02,
            },
            combat: CombatConfig {
                melee_radius: 15.0,
                pedestrian_hit_radius: 10.0,
                police_hit_radius: 15.0,
                player_hit_radius: 15.0,
                enemy_shot_damage: 10.0,
                kill_reward_min: 10,
                kill_reward_max: 50,
                projectile_life: 90,
                muzzle_offset: 12.0,
                player_spread: 0.05,
                ai_spread: 0.2,
            },
            police: PoliceConfig {
                spawn_distance: 400.0,
                max_speed: 3.8,
                acceleration: 0.08,
                turn_rate: 0.08,
                engagement_range: 150.0,
                brake_factor: 0.9,
                fire_range: 260.0,
                retreat_speed: 1.5,
                ram_radius: 20.0,
                ram_damage: 5.0,
                ram_kick: 2.0,
                ram_min_speed: 0.5,
                half_extent: 11.0,
            },
            camera: CameraConfig {
                default_radius: 70.0,
                min_radius: 30.0,
                max_radius: 220.0,
                height_ratio: 0.5,
                smoothing: 0.1,
                zoom_step: 2.0,
                orbit_sensitivity: 0.01,
            },
            collision: CollisionConfig {
                broad_phase_radius: 100.0,
                nudge: 1.5,
                rebound: 0.5,
            },
        }
    }
}
