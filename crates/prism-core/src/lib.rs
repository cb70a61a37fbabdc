//! Prism Core - Core types and utilities for the Prism toolkit
//!
//! This crate provides the foundational types used throughout the toolkit:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and camera data with their matrix derivations
//! - Frame clock driving per-frame updates
//! - An explicitly owned event bus

pub mod camera;
pub mod events;
pub mod time;
pub mod types;

pub use camera::{Camera, Projection};
pub use events::{EventBus, SubscriptionId};
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{ClockConfig, FrameClock};
pub use types::{Color, Transform};
