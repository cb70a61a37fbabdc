//! Prism scene graph
//!
//! Nodes live in a [`SceneGraph`] arena and are addressed by generational
//! [`NodeId`]s. Each node owns its children and a list of tagged
//! [`Component`]s; animators, controllers and user behaviors run once per
//! frame through [`SceneGraph::update`].

mod animator;
mod behavior;
mod component;
mod controller;
mod graph;
mod material;
mod model;
mod node;

pub use animator::{AnimationTrack, Animator, Playback, WrapMode};
pub use behavior::{Behavior, FnBehavior, UpdateContext};
pub use component::{Component, ComponentId, ComponentKind, ComponentVariant};
pub use controller::{OrbitConfig, OrbitController};
pub use graph::SceneGraph;
pub use material::Material;
pub use model::{Model, ModelPart};
pub use node::{Node, NodeId};
