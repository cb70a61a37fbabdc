//! `prism demo`: build a small scene and run it headlessly
//!
//! The frame loop mirrors what a windowed host does: tick the clock, update the
//! scene graph, then hand global transforms and meshes to a renderer. Here the
//! renderer is replaced by [`DemoScene::collect_draws`] plus logging.

use std::cell::Cell;
use std::f32::consts::PI;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use glam::{Mat4, Quat, Vec2, Vec3};
use prism_assets::{parse_obj, AssetServer, MeshAsset};
use prism_core::{Camera, Color, EventBus, FrameClock, Transform};
use prism_scene::{
    AnimationTrack, Animator, Material, Model, NodeId, OrbitController, SceneGraph, WrapMode,
};
use tracing::{debug, info};

use crate::settings::Settings;

/// Built-in unit cube used when no mesh is given
const CUBE_OBJ: &str = "\
o cube
v -0.5 -0.5  0.5
v  0.5 -0.5  0.5
v  0.5  0.5  0.5
v -0.5  0.5  0.5
v -0.5 -0.5 -0.5
v  0.5 -0.5 -0.5
v  0.5  0.5 -0.5
v -0.5  0.5 -0.5
vn 0 0 1
vn 0 0 -1
vn 1 0 0
vn -1 0 0
vn 0 1 0
vn 0 -1 0
f 1//1 2//1 3//1 4//1
f 6//2 5//2 8//2 7//2
f 2//3 6//3 7//3 3//3
f 5//4 1//4 4//4 8//4
f 4//5 3//5 7//5 8//5
f 5//6 6//6 2//6 1//6
";

/// Application-level events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Resized { width: u32, height: u32 },
}

/// What a renderer needs to draw one model
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub node: NodeId,
    pub model_view_projection: Mat4,
    pub triangles: usize,
}

pub struct DemoScene {
    pub graph: SceneGraph,
    pub root: NodeId,
    pub camera: NodeId,
    pub pivot: NodeId,
    pub model: NodeId,
}

impl DemoScene {
    pub fn build(settings: &Settings, asset: &MeshAsset) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_named("scene");

        let camera = graph.spawn_named("camera");
        graph.add_child(root, camera);
        graph.add_component(camera, Transform::IDENTITY);
        graph.add_component(
            camera,
            settings.camera.to_camera(settings.viewport.aspect()),
        );
        let mut orbit = OrbitController::with_config(settings.orbit.clone());
        orbit.set_distance(4.0);
        orbit.pitch = -0.4;
        graph.add_component(camera, orbit);

        let pivot = graph.spawn_named("pivot");
        graph.add_child(root, pivot);
        graph.add_component(pivot, Transform::IDENTITY);
        let spin = AnimationTrack::Rotation {
            from: Quat::IDENTITY,
            to: Quat::from_rotation_y(PI * 0.9),
        };
        graph.add_component(pivot, Animator::new(spin, 0.0, 4.0).with_wrap(WrapMode::Loop));

        let model = graph.spawn_named(asset.name.clone());
        graph.add_child(pivot, model);
        graph.add_component(model, Transform::IDENTITY);
        graph.add_component(
            model,
            Model::from_asset(asset, Material::from_color(Color::from_hex(0x4a90d9))),
        );

        let moon = graph.spawn_named("moon");
        graph.add_child(pivot, moon);
        graph.add_component(moon, Transform::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        if let Some(mesh) = asset.primitives.first() {
            graph.add_component(moon, Model::new(mesh.clone(), Material::default()));
        }
        let grow = AnimationTrack::Scale {
            from: Vec3::splat(0.1),
            to: Vec3::splat(0.4),
        };
        graph.add_component(moon, Animator::new(grow, 0.0, 2.0));

        info!("Built demo scene with {} nodes", graph.len());
        Self {
            graph,
            root,
            camera,
            pivot,
            model,
        }
    }

    pub fn update(&mut self, t: f32, dt: f32) {
        self.graph.update(self.root, t, dt);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(camera) = self.graph.component_mut::<Camera>(self.camera) {
            camera.resize(width, height);
            debug!("Camera aspect now {}", camera.aspect);
        }
    }

    /// Every model in the scene with its final clip-space transform.
    pub fn collect_draws(&self) -> Vec<DrawItem> {
        let Some(camera) = self.graph.component::<Camera>(self.camera) else {
            return Vec::new();
        };
        let Some(view) = self.graph.view_matrix(self.camera) else {
            return Vec::new();
        };
        let view_projection = camera.projection_matrix() * view;

        self.graph
            .filter(self.root, |id, _| self.graph.component::<Model>(id).is_some())
            .into_iter()
            .filter_map(|id| {
                let model = self.graph.component::<Model>(id)?;
                let global = self.graph.global_matrix(id)?;
                Some(DrawItem {
                    node: id,
                    model_view_projection: view_projection * global,
                    triangles: model.triangle_count(),
                })
            })
            .collect()
    }
}

async fn load_asset(settings: &Settings, mesh: Option<&Path>) -> Result<MeshAsset> {
    let Some(path) = mesh else {
        let cube = parse_obj(CUBE_OBJ).context("Built-in cube failed to parse")?;
        return Ok(MeshAsset::single("cube", cube));
    };

    let mut assets = AssetServer::new(&settings.assets.base_path);
    let handle = assets
        .load_mesh(path)
        .await
        .with_context(|| format!("Failed to load mesh {}", path.display()))?;
    let asset = assets
        .get_mesh(handle)
        .cloned()
        .with_context(|| format!("Mesh {} vanished after loading", path.display()))?;
    Ok(asset)
}

pub async fn run(settings: Settings, mesh: Option<&Path>) -> Result<()> {
    let asset = load_asset(&settings, mesh).await?;
    info!(
        "Loaded '{}': {} primitive(s), {} vertices",
        asset.name,
        asset.primitives.len(),
        asset.primitives.iter().map(|m| m.vertex_count()).sum::<usize>()
    );

    let mut scene = DemoScene::build(&settings, &asset);
    let mut clock = FrameClock::new(settings.clock.clone());
    let mut events = EventBus::new();

    let pending_resize = Rc::new(Cell::new(None));
    let sink = pending_resize.clone();
    events.subscribe(move |event: &AppEvent| {
        let AppEvent::Resized { width, height } = *event;
        sink.set(Some((width, height)));
    });
    events.subscribe(|event: &AppEvent| debug!("Event: {:?}", event));

    let frames = settings.demo.frames;
    let frame_rate = settings.demo.frame_rate.max(1.0);
    let mut drawn_triangles = 0usize;

    for frame in 0..frames {
        if frame == frames / 2 {
            events.push(AppEvent::Resized {
                width: settings.viewport.width / 2,
                height: settings.viewport.height,
            });
        }
        events.flush();
        if let Some((width, height)) = pending_resize.take() {
            scene.resize(width, height);
        }

        if let Some(orbit) = scene.graph.component_mut::<OrbitController>(scene.camera) {
            orbit.rotate(Vec2::new(1.0, 0.0));
        }

        clock.tick(1.0 / frame_rate);
        let (t, dt) = clock.now();
        scene.update(t, dt);

        let draws = scene.collect_draws();
        drawn_triangles += draws.iter().map(|d| d.triangles).sum::<usize>();

        if clock.frame_count % frame_rate as u64 == 0 {
            let pivot = scene
                .graph
                .component::<Transform>(scene.pivot)
                .map(|t| t.rotation.to_axis_angle().1)
                .unwrap_or_default();
            let model_clip = draws
                .first()
                .map(|d| d.model_view_projection.project_point3(Vec3::ZERO))
                .unwrap_or_default();
            info!(
                "Frame {} t={:.2}s: {} draws, pivot angle {:.2} rad, model at {:?}",
                clock.frame_count,
                t,
                draws.len(),
                pivot,
                model_clip
            );
        }
    }

    info!(
        "Demo finished: {} frames, {} triangles submitted",
        clock.frame_count, drawn_triangles
    );
    Ok(())
}
