use glam::Mat4;
use prism_core::Transform;
use tracing::{debug, warn};

use crate::component::{Component, ComponentId, ComponentKind, ComponentVariant};
use crate::node::{Attached, Node, NodeId, Slot};

/// Arena that owns every node of one or more scene trees.
///
/// Nodes are addressed by generational [`NodeId`]s. A despawned node's slot is
/// recycled with a bumped generation, so operations on a stale id return
/// `None`/`false` instead of touching the new occupant.
pub struct SceneGraph {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
    next_component: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            next_component: 1,
        }
    }

    // ---- Node lifecycle ----

    /// Spawn a detached node with no components.
    pub fn spawn(&mut self) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::default());
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(Node::default()),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Spawn a detached node carrying a name.
    pub fn spawn_named(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.spawn();
        self.set_name(id, name);
        id
    }

    /// Detach `node` from its parent and free it together with its whole subtree.
    /// Returns `false` for a stale id.
    pub fn despawn(&mut self, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
        let doomed = self.linearize(node);
        for &id in &doomed {
            let slot = &mut self.slots[id.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(id.index);
        }
        self.len -= doomed.len();
        debug!("Despawned {} ({} nodes)", node, doomed.len());
        true
    }

    /// Whether `node` refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.slots
            .get(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(node.index as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.name()
    }

    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) -> bool {
        match self.node_mut(node) {
            Some(n) => {
                n.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    // ---- Hierarchy ----

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Children in list order. Empty for a stale id.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Attach `child` under `parent`, first detaching it from any previous
    /// parent. Re-adding an existing child moves it to the end of the list.
    ///
    /// Returns `false` if either id is stale or the link would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if parent == child || self.is_ancestor(child, parent) {
            warn!("Refusing to attach {} under its own descendant {}", child, parent);
            return false;
        }

        if let Some(old_parent) = self.parent(child) {
            if let Some(old) = self.node_mut(old_parent) {
                old.children.retain(|&c| c != child);
            }
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Detach a direct child. No-op (returns `false`) if `child` is not one.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
        true
    }

    /// Whether `ancestor` lies strictly above `node` in its tree.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// The topmost ancestor of `node` (the node itself when detached).
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        self.node(current)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    // ---- Traversal ----

    /// Depth-first walk of the subtree at `root`. `before` sees nodes in
    /// pre-order, `after` in post-order; children are visited in list order.
    pub fn traverse(
        &self,
        root: NodeId,
        mut before: Option<&mut dyn FnMut(NodeId)>,
        mut after: Option<&mut dyn FnMut(NodeId)>,
    ) {
        if !self.contains(root) {
            return;
        }
        if let Some(f) = before.as_deref_mut() {
            f(root);
        }
        let mut stack = vec![(root, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (id, cursor) = *top;
            let next = self.node(id).and_then(|n| n.children.get(cursor)).copied();
            match next {
                Some(child) => {
                    top.1 += 1;
                    if let Some(f) = before.as_deref_mut() {
                        f(child);
                    }
                    stack.push((child, 0));
                }
                None => {
                    stack.pop();
                    if let Some(f) = after.as_deref_mut() {
                        f(id);
                    }
                }
            }
        }
    }

    /// Pre-order list of the subtree at `root`, `root` first.
    pub fn linearize(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.traverse(root, Some(&mut |id: NodeId| out.push(id)), None);
        out
    }

    pub fn filter(
        &self,
        root: NodeId,
        mut predicate: impl FnMut(NodeId, &Node) -> bool,
    ) -> Vec<NodeId> {
        self.linearize(root)
            .into_iter()
            .filter(|&id| self.node(id).map_or(false, |n| predicate(id, n)))
            .collect()
    }

    /// First node in pre-order matching `predicate`.
    pub fn find(
        &self,
        root: NodeId,
        mut predicate: impl FnMut(NodeId, &Node) -> bool,
    ) -> Option<NodeId> {
        self.linearize(root)
            .into_iter()
            .find(|&id| self.node(id).map_or(false, |n| predicate(id, n)))
    }

    pub fn map<T>(&self, root: NodeId, mut f: impl FnMut(NodeId, &Node) -> T) -> Vec<T> {
        self.linearize(root)
            .into_iter()
            .filter_map(|id| self.node(id).map(|n| f(id, n)))
            .collect()
    }

    /// First node in the subtree whose name is `name`.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.find(root, |_, n| n.name() == Some(name))
    }

    // ---- Component management ----

    /// Attach a component. Returns its identity, or `None` for a stale node.
    pub fn add_component(
        &mut self,
        node: NodeId,
        component: impl Into<Component>,
    ) -> Option<ComponentId> {
        let id = ComponentId(self.next_component);
        let n = self.node_mut(node)?;
        n.components.push(Attached {
            id,
            component: component.into(),
        });
        self.next_component += 1;
        Some(id)
    }

    /// Remove exactly the component attached under `id`.
    pub fn remove_component(&mut self, node: NodeId, id: ComponentId) -> Option<Component> {
        let n = self.node_mut(node)?;
        let position = n.components.iter().position(|a| a.id == id)?;
        Some(n.components.remove(position).component)
    }

    /// Remove every component of `kind`, returning how many were removed.
    pub fn remove_components_of_type(&mut self, node: NodeId, kind: ComponentKind) -> usize {
        let Some(n) = self.node_mut(node) else {
            return 0;
        };
        let before = n.components.len();
        n.components.retain(|a| a.component.kind() != kind);
        before - n.components.len()
    }

    pub fn get_component(&self, node: NodeId, id: ComponentId) -> Option<&Component> {
        self.node(node)?
            .components
            .iter()
            .find(|a| a.id == id)
            .map(|a| &a.component)
    }

    /// First component of `kind` in list order.
    pub fn get_component_of_type(&self, node: NodeId, kind: ComponentKind) -> Option<&Component> {
        self.node(node)?
            .components
            .iter()
            .map(|a| &a.component)
            .find(|c| c.kind() == kind)
    }

    /// All components of `kind` in list order.
    pub fn get_components_of_type(&self, node: NodeId, kind: ComponentKind) -> Vec<&Component> {
        self.node(node).map_or_else(Vec::new, |n| {
            n.components
                .iter()
                .map(|a| &a.component)
                .filter(|c| c.kind() == kind)
                .collect()
        })
    }

    pub fn component<T: ComponentVariant>(&self, node: NodeId) -> Option<&T> {
        self.get_component_of_type(node, T::KIND)
            .and_then(T::from_component)
    }

    pub fn component_mut<T: ComponentVariant>(&mut self, node: NodeId) -> Option<&mut T> {
        self.node_mut(node)?
            .components
            .iter_mut()
            .map(|a| &mut a.component)
            .find(|c| c.kind() == T::KIND)
            .and_then(T::from_component_mut)
    }

    pub fn components<T: ComponentVariant>(&self, node: NodeId) -> Vec<&T> {
        self.get_components_of_type(node, T::KIND)
            .into_iter()
            .filter_map(T::from_component)
            .collect()
    }

    pub fn has_component(&self, node: NodeId, kind: ComponentKind) -> bool {
        self.get_component_of_type(node, kind).is_some()
    }

    /// Take a component out of the node, remembering where it sat.
    pub(crate) fn detach(&mut self, node: NodeId, id: ComponentId) -> Option<(usize, Attached)> {
        let n = self.node_mut(node)?;
        let position = n.components.iter().position(|a| a.id == id)?;
        Some((position, n.components.remove(position)))
    }

    /// Put a detached component back. Dropped if the node died meanwhile.
    pub(crate) fn reattach(&mut self, node: NodeId, position: usize, attached: Attached) {
        if let Some(n) = self.node_mut(node) {
            let at = position.min(n.components.len());
            n.components.insert(at, attached);
        }
    }

    // ---- Transforms ----

    /// Local TRS matrix; identity when the node has no Transform.
    pub fn local_matrix(&self, node: NodeId) -> Option<Mat4> {
        self.node(node)?;
        Some(
            self.component::<Transform>(node)
                .map_or(Mat4::IDENTITY, Transform::local_matrix),
        )
    }

    /// `parent.global * local`, computed by walking up to the root.
    pub fn global_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut matrix = self.local_matrix(node)?;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            matrix = self.local_matrix(parent)? * matrix;
            current = self.parent(parent);
        }
        Some(matrix)
    }

    /// Inverse of the camera node's global transform.
    pub fn view_matrix(&self, camera_node: NodeId) -> Option<Mat4> {
        self.global_matrix(camera_node).map(|m| m.inverse())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
