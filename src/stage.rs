use std::f64::consts::FRAC_PI_2;

use crate::assets::model::Primitive;
use crate::assets::resolver::ResolvedModels;
use crate::config::StageConfig;
use crate::foundation::core::{DVec3, SurfaceSize};
use crate::foundation::error::TwinviewResult;
use crate::scene::graph::{
    DirectionalLight, Fog, HemisphereLight, OverrideMaterial, SceneGraph, SceneKind,
};
use crate::scene::node::ModelNode;
use crate::scene::pair::{Entity, ScenePair};
use crate::view::camera::PerspectiveCamera;
use crate::view::viewport::ViewportSet;

/// Everything a frame reads and the timeline writes.
///
/// Passed explicitly to the render loop, the resize handler and the timeline builder.
/// The surface size is only changed through [`crate::ResizeHandler`].
#[derive(Clone, Debug)]
pub struct Stage {
    surface: SurfaceSize,
    pixel_ratio: f64,
    /// Shared point every camera looks at.
    pub look_at: DVec3,
    pub cameras: Vec<PerspectiveCamera>,
    pub viewports: ViewportSet,
    pub scenes: ScenePair,
}

/// Entities registered from a finished asset batch.
///
/// Only [`Stage::populate`] creates one, which is what lets [`crate::Timeline::build`]
/// require resolved assets.
#[derive(Clone, Debug, Default)]
pub struct ResolvedEntities {
    entities: Vec<Entity>,
}

impl ResolvedEntities {
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Stage {
    /// Build the dressed, still empty stage described by `cfg`.
    pub fn from_config(cfg: &StageConfig) -> TwinviewResult<Self> {
        cfg.validate()?;
        let c = &cfg.colors;

        let mut shaded = SceneGraph::new(c.background.to_rgba8_premul());
        shaded.fog = Some(Fog {
            color: c.background.to_rgba8_premul(),
            near: cfg.fog.near,
            far: cfg.fog.far,
        });
        shaded.directional = Some(DirectionalLight {
            color: c.light.to_rgba8_premul(),
            intensity: cfg.lights.directional_intensity,
            position: cfg.lights.directional_position,
            cast_shadow: cfg.lights.directional_shadow,
        });
        shaded.hemisphere = Some(HemisphereLight {
            sky: c.sky.to_rgba8_premul(),
            ground: c.ground.to_rgba8_premul(),
            intensity: cfg.lights.hemisphere_intensity,
        });
        if cfg.floor_size > 0.0 {
            let mesh = Primitive::Plane {
                width: cfg.floor_size,
                height: cfg.floor_size,
                segments: 20,
            }
            .mesh(c.ground)?;
            let mut floor = ModelNode::with_mesh("floor", mesh);
            floor.transform.rotation.x = -FRAC_PI_2;
            floor.receive_shadow = true;
            shaded.add(None, &floor);
        }

        let mut wireframe = SceneGraph::new(c.blue.to_rgba8_premul());
        wireframe.override_material = Some(OverrideMaterial::Wireframe {
            color: c.wireframe.to_rgba8_premul(),
        });

        let surface = cfg.surface;
        let cameras = (0..cfg.viewports.len())
            .map(|_| {
                let mut cam = PerspectiveCamera::new(
                    cfg.camera.fov_deg,
                    surface.aspect(),
                    cfg.camera.near,
                    cfg.camera.far,
                )?;
                cam.position = cfg.camera.position;
                cam.look_at(cfg.look_at);
                Ok(cam)
            })
            .collect::<TwinviewResult<Vec<_>>>()?;

        Ok(Self {
            surface,
            pixel_ratio: cfg.pixel_ratio(),
            look_at: cfg.look_at,
            cameras,
            viewports: ViewportSet::new(cfg.viewports.clone())?,
            scenes: ScenePair::new(shaded, wireframe),
        })
    }

    /// Register every resolved model as an entity in both scenes.
    pub fn populate(&mut self, resolved: ResolvedModels) -> ResolvedEntities {
        let mut entities: Vec<Entity> = Vec::with_capacity(resolved.models.len());
        for (name, model) in resolved.models {
            let e = self.scenes.create_entity(&name, model);
            if !entities.contains(&e) {
                entities.push(e);
            }
        }
        tracing::info!(
            entities = entities.len(),
            failed = resolved.failures.len(),
            "stage populated"
        );
        ResolvedEntities { entities }
    }

    /// Current logical surface size.
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Device pixel ratio in effect (already capped).
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub(crate) fn set_surface(&mut self, size: SurfaceSize, pixel_ratio: f64) {
        self.surface = size;
        self.pixel_ratio = pixel_ratio;
    }

    /// Scene drawn by viewport `kind`.
    pub fn scene(&self, kind: SceneKind) -> &SceneGraph {
        self.scenes.scene(kind)
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
