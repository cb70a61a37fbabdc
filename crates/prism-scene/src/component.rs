use std::fmt;

use prism_core::{Camera, Transform};

use crate::animator::Animator;
use crate::behavior::{Behavior, FnBehavior, UpdateContext};
use crate::controller::OrbitController;
use crate::material::Material;
use crate::model::Model;

/// Identity of a component attached to a node, used for identity-based removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u64);

/// Explicit tag carried by every component value. Lookups filter on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Transform,
    Camera,
    Material,
    Model,
    Animator,
    OrbitController,
    Behavior,
}

/// A typed payload attached to exactly one node.
pub enum Component {
    Transform(Transform),
    Camera(Camera),
    Material(Material),
    Model(Model),
    Animator(Animator),
    OrbitController(OrbitController),
    /// User-defined per-frame behavior
    Behavior(Box<dyn Behavior>),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Camera(_) => ComponentKind::Camera,
            Component::Material(_) => ComponentKind::Material,
            Component::Model(_) => ComponentKind::Model,
            Component::Animator(_) => ComponentKind::Animator,
            Component::OrbitController(_) => ComponentKind::OrbitController,
            Component::Behavior(_) => ComponentKind::Behavior,
        }
    }

    /// The per-frame update hook, for components that have one.
    pub fn as_behavior_mut(&mut self) -> Option<&mut dyn Behavior> {
        match self {
            Component::Animator(a) => Some(a),
            Component::OrbitController(c) => Some(c),
            Component::Behavior(b) => Some(&mut **b),
            _ => None,
        }
    }

    pub fn has_update_hook(&self) -> bool {
        matches!(
            self.kind(),
            ComponentKind::Animator | ComponentKind::OrbitController | ComponentKind::Behavior
        )
    }

    /// Wrap a user-defined behavior.
    pub fn behavior<B: Behavior>(behavior: B) -> Self {
        Component::Behavior(Box::new(behavior))
    }

    /// Wrap a closure run once per frame.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(&mut UpdateContext<'_>) + 'static,
    {
        Component::Behavior(Box::new(FnBehavior(f)))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Transform(t) => f.debug_tuple("Transform").field(t).finish(),
            Component::Camera(c) => f.debug_tuple("Camera").field(c).finish(),
            Component::Material(m) => f.debug_tuple("Material").field(m).finish(),
            Component::Model(m) => f.debug_tuple("Model").field(m).finish(),
            Component::Animator(a) => f.debug_tuple("Animator").field(a).finish(),
            Component::OrbitController(c) => f.debug_tuple("OrbitController").field(c).finish(),
            Component::Behavior(b) => f.debug_tuple("Behavior").field(&b.name()).finish(),
        }
    }
}

/// Concrete component types that can be looked up by type on a node.
pub trait ComponentVariant: Sized + 'static {
    const KIND: ComponentKind;

    fn from_component(component: &Component) -> Option<&Self>;

    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_variant {
    ($ty:ty, $variant:ident) => {
        impl ComponentVariant for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn from_component(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Component {
            fn from(value: $ty) -> Self {
                Component::$variant(value)
            }
        }
    };
}

component_variant!(Transform, Transform);
component_variant!(Camera, Camera);
component_variant!(Material, Material);
component_variant!(Model, Model);
component_variant!(Animator, Animator);
component_variant!(OrbitController, OrbitController);
