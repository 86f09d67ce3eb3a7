// src/core/city.rs - City layout, named zones and static obstacle geometry
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use crate::core::{SimRng, WorldConfig};

pub const CITY_PATH: &str = "data/world/delhi.ron";
pub const UNKNOWN_DISTRICT: &str = "Unknown Territory";

// === ZONES ===
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistrictStyle {
    Commercial,
    HistoricCore,
    Corporate,
    Residential,
}

impl DistrictStyle {
    /// Square units of district area per building. Lower is denser.
    pub fn area_per_building(self) -> f32 {
        match self {
            Self::Commercial => 10_000.0,
            Self::HistoricCore => 4_000.0,
            Self::Corporate => 15_000.0,
            Self::Residential => 8_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: DistrictStyle,
}

impl District {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkKind {
    Monument,
    Office,
    Shop,
    Park,
}

impl LandmarkKind {
    pub fn footprint(self) -> f32 {
        match self {
            Self::Monument => 120.0,
            Self::Office => 80.0,
            Self::Shop => 120.0,
            Self::Park => 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub kind: LandmarkKind,
}

impl Landmark {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CityMap {
    pub width: f32,
    pub height: f32,
    pub districts: Vec<District>,
    pub landmarks: Vec<Landmark>,
}

impl CityMap {
    pub fn load() -> Self {
        match std::fs::read_to_string(CITY_PATH) {
            Ok(content) => ron::from_str(&content)
                .map_err(|e| error!("Failed to parse city layout: {}", e))
                .unwrap_or_else(|_| Self::default()),
            Err(e) => {
                error!("Failed to load city layout: {}", e);
                Self::default()
            }
        }
    }

    /// Same bounds, no zones and no landmarks.
    pub fn open_ground(width: f32, height: f32) -> Self {
        Self { width, height, districts: Vec::new(), landmarks: Vec::new() }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }

    /// Wraps a point to the opposite edge once it leaves the map.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        let mut p = point;
        if p.x < 0.0 {
            p.x = self.width;
        } else if p.x > self.width {
            p.x = 0.0;
        }
        if p.y < 0.0 {
            p.y = self.height;
        } else if p.y > self.height {
            p.y = 0.0;
        }
        p
    }

    pub fn district_at(&self, point: Vec2) -> &str {
        self.districts
            .iter()
            .find(|d| d.contains(point))
            .map(|d| d.name.as_str())
            .unwrap_or(UNKNOWN_DISTRICT)
    }

    /// Resolves a destination name against districts first, then landmarks.
    pub fn locate(&self, name: &str) -> Option<Vec2> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        let matches = |candidate: &str| {
            let candidate = candidate.to_lowercase();
            candidate == wanted || candidate.contains(&wanted)
        };

        self.districts
            .iter()
            .find(|d| matches(&d.name))
            .map(District::center)
            .or_else(|| self.landmarks.iter().find(|l| matches(&l.name)).map(Landmark::position))
    }
}

impl Default for CityMap {
    fn default() -> Self {
        let district = |name: &str, x: f32, y: f32, width: f32, height: f32, style| District {
            name: name.to_string(),
            x,
            y,
            width,
            height,
            style,
        };
        let landmark = |name: &str, x: f32, y: f32, kind| Landmark { name: name.to_string(), x, y, kind };

        Self {
            width: 4000.0,
            height: 4000.0,
            districts: vec![
                district("Connaught Place", 1800.0, 1800.0, 400.0, 400.0, DistrictStyle::Commercial),
                district("Old Delhi", 1800.0, 1000.0, 500.0, 600.0, DistrictStyle::HistoricCore),
                district("Gurgaon Cyber City", 500.0, 3000.0, 600.0, 600.0, DistrictStyle::Corporate),
                district("South Delhi", 2200.0, 2800.0, 800.0, 600.0, DistrictStyle::Residential),
            ],
            landmarks: vec![
                landmark("Red Fort", 2050.0, 1200.0, LandmarkKind::Monument),
                landmark("India Gate", 2100.0, 2200.0, LandmarkKind::Monument),
                landmark("Qutub Minar", 2000.0, 3500.0, LandmarkKind::Monument),
                landmark("Cyber Hub", 700.0, 3200.0, LandmarkKind::Office),
                landmark("Palika Bazaar", 2000.0, 2000.0, LandmarkKind::Shop),
            ],
        }
    }
}

// === STATIC GEOMETRY ===
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
}

impl Obstacle {
    pub fn new(center: Vec2, width: f32, depth: f32) -> Self {
        Self { center, width, depth }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.depth / 2.0)
    }

    /// Exact AABB overlap against a box centred on `position`.
    pub fn overlaps(&self, position: Vec2, half_extents: Vec2) -> bool {
        let reach = self.half_extents() + half_extents;
        (position.x - self.center.x).abs() < reach.x && (position.y - self.center.y).abs() < reach.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.overlaps(point, Vec2::ZERO)
    }
}

/// Buildings and landmarks. Built once at load and only ever read afterwards.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldGeometry {
    obstacles: Vec<Obstacle>,
    broad_phase_radius: f32,
}

impl WorldGeometry {
    pub fn new(obstacles: Vec<Obstacle>, broad_phase_radius: f32) -> Self {
        Self { obstacles, broad_phase_radius }
    }

    pub fn generate(city: &CityMap, world: &WorldConfig, broad_phase_radius: f32, seed: u64) -> Self {
        let mut rng = SimRng::seeded(seed);
        let mut obstacles = Vec::new();

        for district in &city.districts {
            let count = (district.width * district.height / district.style.area_per_building()).floor() as usize;
            let mut placed = 0;
            for _ in 0..count {
                let bx = district.x + rng.0.f32() * district.width;
                let by = district.y + rng.0.f32() * district.height;
                if on_road(bx, world) || on_road(by, world) {
                    continue;
                }
                let width = rng.range(world.building_min_size, world.building_max_size);
                let depth = rng.range(world.building_min_size, world.building_max_size);
                obstacles.push(Obstacle::new(Vec2::new(bx, by), width, depth));
                placed += 1;
            }
            debug!("{}: {} buildings", district.name, placed);
        }

        for landmark in &city.landmarks {
            let size = landmark.kind.footprint();
            obstacles.push(Obstacle::new(landmark.position(), size, size));
        }

        info!("World geometry generated: {} obstacles", obstacles.len());
        Self::new(obstacles, broad_phase_radius)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn broad_phase_radius(&self) -> f32 {
        self.broad_phase_radius
    }

    /// Broad phase on centre distance, then exact box overlap.
    pub fn blocked(&self, position: Vec2, half_extents: Vec2) -> bool {
        let cutoff_sq = self.broad_phase_radius * self.broad_phase_radius;
        self.obstacles
            .iter()
            .filter(|o| o.center.distance_squared(position) <= cutoff_sq)
            .any(|o| o.overlaps(position, half_extents))
    }

    /// Closest free spot on expanding rings around `target`, inside the map.
    pub fn nearest_clear_point(&self, city: &CityMap, target: Vec2, half_extents: Vec2) -> Vec2 {
        let target = city.clamp(target);
        if !self.blocked(target, half_extents) {
            return target;
        }
        const RING_STEP: f32 = 8.0;
        const RINGS: usize = 60;
        const SAMPLES: usize = 24;
        for ring in 1..=RINGS {
            let radius = ring as f32 * RING_STEP;
            for sample in 0..SAMPLES {
                let angle = sample as f32 / SAMPLES as f32 * TAU;
                let candidate = target + Vec2::new(angle.cos(), angle.sin()) * radius;
                if city.contains(candidate) && !self.blocked(candidate, half_extents) {
                    return candidate;
                }
            }
        }
        warn!("No clear point near {:?}", target);
        target
    }

    pub fn random_clear_point(&self, city: &CityMap, rng: &mut SimRng, half_extents: Vec2) -> Vec2 {
        let candidate = Vec2::new(rng.0.f32() * city.width, rng.0.f32() * city.height);
        self.nearest_clear_point(city, candidate, half_extents)
    }
}

fn on_road(coordinate: f32, world: &WorldConfig) -> bool {
    coordinate.rem_euclid(world.road_spacing) < world.road_width
}
