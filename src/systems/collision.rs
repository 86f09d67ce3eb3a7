// src/systems/collision.rs - Displacement resolution against static geometry and moving discs
use bevy::prelude::*;
use crate::core::*;

/// What a blocked actor does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockResponse {
    /// On-foot actors stop and step back a little so they do not stick to walls.
    Stop,
    /// Vehicles bounce: speed is negated and damped.
    Rebound,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Moved(Vec2),
    Stopped(Vec2),
    Rebounded { speed: f32 },
}

impl Resolution {
    pub fn is_blocked(&self) -> bool {
        !matches!(self, Self::Moved(_))
    }
}

/// Proposes `pose.position + forward * speed` and resolves it against the obstacle set.
pub fn resolve_step(
    geometry: &WorldGeometry,
    pose: &Pose,
    speed: f32,
    half_extents: Vec2,
    response: BlockResponse,
    tuning: &CollisionConfig,
) -> Resolution {
    let proposed = pose.position + pose.forward() * speed;
    if !geometry.blocked(proposed, half_extents) {
        return Resolution::Moved(proposed);
    }

    match response {
        BlockResponse::Stop => {
            let nudged = pose.position - pose.forward() * speed.signum() * tuning.nudge;
            if geometry.blocked(nudged, half_extents) {
                Resolution::Stopped(pose.position)
            } else {
                Resolution::Stopped(nudged)
            }
        }
        BlockResponse::Rebound => Resolution::Rebounded { speed: rebound(speed, tuning) },
    }
}

pub fn rebound(speed: f32, tuning: &CollisionConfig) -> f32 {
    -speed * tuning.rebound
}

/// Moving actors collide as discs: a point-in-circle test per pair.
pub fn discs_touch(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// A step that ends inside `other`'s disc without opening the gap. Steps that
/// separate two overlapping discs are never contacts.
pub fn closing_contact(current: Vec2, proposed: Vec2, other: Vec2, radius: f32) -> bool {
    discs_touch(proposed, other, radius) && proposed.distance_squared(other) <= current.distance_squared(other)
}

/// Scalar speed along `pose`'s heading that carries it away from `from`.
pub fn kick_away(pose: &Pose, from: Vec2, kick: f32) -> f32 {
    if pose.forward().dot(pose.position - from) >= 0.0 {
        kick
    } else {
        -kick
    }
}
