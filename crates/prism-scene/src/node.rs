use std::fmt;

use crate::component::{Component, ComponentId};

/// A generational node handle. Uses compact u32 index + generation so a stale
/// handle never aliases a node allocated later in the same slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The slot index of this node.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of this node (incremented on slot reuse).
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// A component together with the identity it was attached under.
#[derive(Debug)]
pub(crate) struct Attached {
    pub(crate) id: ComponentId,
    pub(crate) component: Component,
}

/// A scene node: children and components are owned, the parent link is a plain handle.
#[derive(Debug, Default)]
pub struct Node {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) components: Vec<Attached>,
}

impl Node {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Non-owning link to the parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Components in attachment order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components.iter().map(|a| (a.id, &a.component))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// One arena slot. `node` is `None` while the slot sits on the free list.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}
