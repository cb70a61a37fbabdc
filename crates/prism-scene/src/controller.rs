//! Orbit camera controller

use glam::{Vec2, Vec3};
use prism_core::Transform;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, UpdateContext};

/// Orbit controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance to the target
    pub max_distance: f32,
    /// Distance change per unit of zoom input
    pub zoom_speed: f32,
    /// Zoom interpolation smoothing (0-1, lower = smoother)
    pub zoom_smoothing: f32,
    /// Radians per unit of rotate input
    pub sensitivity: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.5,
            max_distance: 100.0,
            zoom_speed: 1.0,
            zoom_smoothing: 0.15,
            sensitivity: 0.005,
            pitch_min: -89.0,
            pitch_max: 89.0,
        }
    }
}

/// Keeps its node on a sphere around `target`, looking at it.
///
/// Input wiring lives outside the toolkit; feed it through [`rotate`](Self::rotate)
/// and [`zoom`](Self::zoom).
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub config: OrbitConfig,
    /// Point the node looks at
    pub target: Vec3,
    /// Yaw rotation in radians (horizontal)
    pub yaw: f32,
    /// Pitch rotation in radians (vertical)
    pub pitch: f32,
    /// Target zoom distance (for smooth interpolation)
    target_distance: f32,
    /// Current interpolated zoom distance
    current_distance: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::with_config(OrbitConfig::default())
    }
}

impl OrbitController {
    pub fn new(target: Vec3, distance: f32) -> Self {
        let mut controller = Self {
            target,
            ..Self::default()
        };
        controller.set_distance(distance);
        controller
    }

    pub fn with_config(config: OrbitConfig) -> Self {
        let default_distance = 5.0_f32.clamp(config.min_distance, config.max_distance);
        Self {
            config,
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            target_distance: default_distance,
            current_distance: default_distance,
        }
    }

    pub fn distance(&self) -> f32 {
        self.current_distance
    }

    /// Apply a pointer drag
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.config.sensitivity;
        self.pitch -= delta.y * self.config.sensitivity;
        self.clamp_pitch();
    }

    /// Apply a scroll step; positive values move closer
    pub fn zoom(&mut self, delta: f32) {
        self.target_distance = (self.target_distance - delta * self.config.zoom_speed)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Set the distance immediately, skipping interpolation
    pub fn set_distance(&mut self, distance: f32) {
        let clamped = distance.clamp(self.config.min_distance, self.config.max_distance);
        self.target_distance = clamped;
        self.current_distance = clamped;
    }

    fn clamp_pitch(&mut self) {
        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = self.pitch.clamp(pitch_min, pitch_max);
    }

    /// World-space position of the orbiting node
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            -self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + offset * self.current_distance
    }

    /// Advance zoom smoothing by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let zoom_lerp = 1.0 - (1.0 - self.config.zoom_smoothing).powf(dt * 60.0);
        self.current_distance += (self.target_distance - self.current_distance) * zoom_lerp;
    }

    /// Place `transform` at the eye, facing the target
    pub fn apply(&self, transform: &mut Transform) {
        transform.translation = self.eye();
        transform.look_at(self.target, Vec3::Y);
    }
}

impl Behavior for OrbitController {
    fn name(&self) -> &str {
        "OrbitController"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.step(ctx.dt);
        if let Some(transform) = ctx.transform_mut() {
            self.apply(transform);
        }
    }
}
