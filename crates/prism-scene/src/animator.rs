//! Time-driven interpolation of a node's Transform

use glam::{Quat, Vec3};
use prism_core::Transform;

use crate::behavior::{Behavior, UpdateContext};
use crate::node::NodeId;

/// Playback state of an animator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
}

/// How the interpolation factor behaves past the end of the clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Hold at the end value
    #[default]
    Clamp,
    /// Restart from the beginning
    Loop,
}

/// The Transform property an animator drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTrack {
    /// Spherical interpolation between two rotations
    Rotation { from: Quat, to: Quat },
    Translation { from: Vec3, to: Vec3 },
    Scale { from: Vec3, to: Vec3 },
}

impl AnimationTrack {
    /// Write the value at `factor` into `transform`.
    pub fn apply(&self, factor: f32, transform: &mut Transform) {
        match *self {
            AnimationTrack::Rotation { from, to } => {
                transform.rotation = from.slerp(to, factor);
            }
            AnimationTrack::Translation { from, to } => {
                transform.translation = from.lerp(to, factor);
            }
            AnimationTrack::Scale { from, to } => {
                transform.scale = from.lerp(to, factor);
            }
        }
    }
}

/// Animates the Transform of a target node over `duration` seconds.
///
/// Without an explicit target the animator drives the node it is attached to.
#[derive(Debug, Clone)]
pub struct Animator {
    pub target: Option<NodeId>,
    pub track: AnimationTrack,
    pub start_time: f32,
    pub duration: f32,
    pub wrap: WrapMode,
    state: Playback,
}

impl Animator {
    pub fn new(track: AnimationTrack, start_time: f32, duration: f32) -> Self {
        Self {
            target: None,
            track,
            start_time,
            duration,
            wrap: WrapMode::Clamp,
            state: Playback::Playing,
        }
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn state(&self) -> Playback {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == Playback::Playing
    }

    pub fn play(&mut self) {
        self.state = Playback::Playing;
    }

    pub fn pause(&mut self) {
        self.state = Playback::Paused;
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            Playback::Playing => Playback::Paused,
            Playback::Paused => Playback::Playing,
        };
    }

    /// Start over from `t` and resume playback.
    pub fn restart(&mut self, t: f32) {
        self.start_time = t;
        self.state = Playback::Playing;
    }

    /// Interpolation factor at absolute time `t`.
    ///
    /// A non-positive duration snaps straight to the end value.
    pub fn factor(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let linear = (t - self.start_time) / self.duration;
        match self.wrap {
            WrapMode::Clamp => linear.clamp(0.0, 1.0),
            WrapMode::Loop => ((linear % 1.0) + 1.0) % 1.0,
        }
    }
}

impl Behavior for Animator {
    fn name(&self) -> &str {
        "Animator"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if !self.is_playing() {
            return;
        }
        let factor = self.factor(ctx.t);
        let target = self.target.unwrap_or(ctx.node);
        if let Some(transform) = ctx.graph.component_mut::<Transform>(target) {
            self.track.apply(factor, transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneGraph;

    fn slide() -> AnimationTrack {
        AnimationTrack::Translation {
            from: Vec3::ZERO,
            to: Vec3::new(10.0, 0.0, 0.0),
        }
    }

    #[test]
    fn clamp_factor() {
        let anim = Animator::new(slide(), 0.0, 2.0);
        assert_eq!(anim.factor(1.0), 0.5);
        assert_eq!(anim.factor(3.0), 1.0);
        assert_eq!(anim.factor(-1.0), 0.0);
    }

    #[test]
    fn loop_factor() {
        let anim = Animator::new(slide(), 0.0, 2.0).with_wrap(WrapMode::Loop);
        assert_eq!(anim.factor(3.0), 0.5);
        assert_eq!(anim.factor(4.0), 0.0);
        // before the start the factor still wraps into [0, 1)
        assert!((anim.factor(-0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_snaps_to_end() {
        let anim = Animator::new(slide(), 0.0, 0.0);
        assert_eq!(anim.factor(0.0), 1.0);
    }

    #[test]
    fn playback_controls() {
        let mut anim = Animator::new(slide(), 0.0, 1.0);
        assert!(anim.is_playing());
        anim.toggle();
        assert_eq!(anim.state(), Playback::Paused);
        anim.play();
        assert!(anim.is_playing());
        anim.pause();
        anim.restart(5.0);
        assert!(anim.is_playing());
        assert_eq!(anim.factor(5.5), 0.5);
    }

    #[test]
    fn drives_own_transform() {
        let mut graph = SceneGraph::new();
        let n = graph.spawn();
        graph.add_component(n, Transform::IDENTITY);
        graph.add_component(n, Animator::new(slide(), 0.0, 2.0));

        graph.update(n, 1.0, 0.016);
        let t = graph.component::<Transform>(n).unwrap();
        assert!(t.translation.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn drives_explicit_target_and_rotation() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn();
        let spinner = graph.spawn();
        graph.add_child(root, spinner);
        graph.add_component(spinner, Transform::IDENTITY);

        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let track = AnimationTrack::Rotation {
            from: Quat::IDENTITY,
            to: quarter,
        };
        graph.add_component(root, Animator::new(track, 0.0, 1.0).with_target(spinner));

        graph.update(root, 2.0, 0.016);
        let rotation = graph.component::<Transform>(spinner).unwrap().rotation;
        assert!(rotation.abs_diff_eq(quarter, 1e-5));
    }

    #[test]
    fn paused_animator_does_nothing() {
        let mut graph = SceneGraph::new();
        let n = graph.spawn();
        graph.add_component(n, Transform::IDENTITY);
        let mut anim = Animator::new(slide(), 0.0, 1.0);
        anim.pause();
        graph.add_component(n, anim);

        graph.update(n, 0.5, 0.016);
        assert_eq!(graph.component::<Transform>(n).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn missing_transform_is_skipped() {
        let mut graph = SceneGraph::new();
        let n = graph.spawn();
        graph.add_component(n, Animator::new(slide(), 0.0, 1.0));
        graph.update(n, 0.5, 0.016);
        assert!(graph.component::<Transform>(n).is_none());
        assert!(graph.component::<Animator>(n).is_some());
    }
}
