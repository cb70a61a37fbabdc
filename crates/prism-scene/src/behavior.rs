use prism_core::Transform;
use tracing::trace;

use crate::component::ComponentId;
use crate::graph::SceneGraph;
use crate::node::NodeId;

/// Everything a component sees while it is being updated.
///
/// The running component is detached from its node for the duration of the
/// call, so it may freely mutate the graph, including its own node.
pub struct UpdateContext<'a> {
    pub graph: &'a mut SceneGraph,
    /// Node the running component is attached to.
    pub node: NodeId,
    /// Absolute time in seconds.
    pub t: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

impl UpdateContext<'_> {
    /// The Transform of the owning node.
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.graph.component_mut::<Transform>(self.node)
    }
}

/// A per-frame hook attached to a node.
pub trait Behavior: 'static {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>);
}

/// Adapter that lets a closure act as a behavior. See [`Component::from_fn`].
///
/// [`Component::from_fn`]: crate::Component::from_fn
pub struct FnBehavior<F>(pub(crate) F);

impl<F: FnMut(&mut UpdateContext<'_>) + 'static> Behavior for FnBehavior<F> {
    fn name(&self) -> &str {
        "closure"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        (self.0)(ctx);
    }
}

impl SceneGraph {
    /// Run one frame: visit the subtree at `root` in pre-order and call the
    /// update hook of every component that has one, in list order.
    pub fn update(&mut self, root: NodeId, t: f32, dt: f32) {
        for node in self.linearize(root) {
            let hooks: Vec<ComponentId> = match self.node(node) {
                Some(n) => n
                    .components
                    .iter()
                    .filter(|a| a.component.has_update_hook())
                    .map(|a| a.id)
                    .collect(),
                // despawned by an earlier hook this frame
                None => continue,
            };

            for id in hooks {
                let Some((position, mut attached)) = self.detach(node, id) else {
                    continue;
                };
                if let Some(hook) = attached.component.as_behavior_mut() {
                    trace!("Updating {} on {}", hook.name(), node);
                    let mut ctx = UpdateContext {
                        graph: self,
                        node,
                        t,
                        dt,
                    };
                    hook.update(&mut ctx);
                }
                self.reattach(node, position, attached);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::component::Component;

    #[test]
    fn closure_behavior_moves_own_node() {
        let mut graph = SceneGraph::new();
        let n = graph.spawn();
        graph.add_component(n, Transform::IDENTITY);
        graph.add_component(
            n,
            Component::from_fn(|ctx| {
                let dt = ctx.dt;
                if let Some(t) = ctx.transform_mut() {
                    t.translation.x += dt;
                }
            }),
        );

        graph.update(n, 0.0, 0.5);
        graph.update(n, 0.5, 0.5);
        assert_eq!(graph.component::<Transform>(n).unwrap().translation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn update_runs_in_pre_order() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_named("root");
        let a = graph.spawn_named("a");
        let b = graph.spawn_named("b");
        graph.add_child(root, a);
        graph.add_child(a, b);

        let log = Rc::new(RefCell::new(Vec::new()));
        for n in [b, root, a] {
            let log = log.clone();
            graph.add_component(
                n,
                Component::from_fn(move |ctx| {
                    let name = ctx.graph.name(ctx.node).unwrap_or("").to_string();
                    log.borrow_mut().push(name);
                }),
            );
        }

        graph.update(root, 0.0, 0.016);
        assert_eq!(*log.borrow(), vec!["root", "a", "b"]);
    }

    #[test]
    fn component_order_survives_update() {
        let mut graph = SceneGraph::new();
        let n = graph.spawn();
        let first = graph.add_component(n, Component::from_fn(|_| {}));
        let second = graph.add_component(n, Transform::IDENTITY);
        graph.update(n, 0.0, 0.0);

        let ids: Vec<_> = graph.node(n).unwrap().components().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first.unwrap(), second.unwrap()]);
    }

    #[test]
    fn behavior_may_despawn_a_sibling() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn();
        let killer = graph.spawn();
        let victim = graph.spawn();
        graph.add_child(root, killer);
        graph.add_child(root, victim);

        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        graph.add_component(
            victim,
            Component::from_fn(move |_| *counter.borrow_mut() += 1),
        );
        graph.add_component(
            killer,
            Component::from_fn(move |ctx| {
                ctx.graph.despawn(victim);
            }),
        );

        graph.update(root, 0.0, 0.0);
        assert!(!graph.contains(victim));
        assert_eq!(*hits.borrow(), 0);
    }
}
