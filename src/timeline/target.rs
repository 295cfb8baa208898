use std::fmt;

use crate::foundation::core::Axis;
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::pair::{Channel, Entity};
use crate::stage::{ResolvedEntities, Stage};

/// Tween target as written in a timeline descriptor, before resolution.
///
/// Accepted forms:
/// - `"<entity>.position"`, `"<entity>.rotation"`
/// - `"cameras.position"` (every camera), `"camera[i].position"`
/// - `"look_at"`
/// - `"views[i]"` / `"viewport[i]"` (keys `height`, `bottom`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Entity { name: String, channel: Channel },
    Cameras,
    Camera(usize),
    LookAt,
    Viewport(usize),
}

impl TargetPath {
    pub fn parse(path: &str) -> TwinviewResult<Self> {
        let path = path.trim();
        if path == "look_at" {
            return Ok(Self::LookAt);
        }
        if path == "cameras.position" {
            return Ok(Self::Cameras);
        }
        if let Some(i) = indexed(path, "views").or_else(|| indexed(path, "viewport")) {
            return i.map(Self::Viewport);
        }
        if let Some(rest) = path.strip_suffix(".position")
            && let Some(i) = indexed(rest, "camera")
        {
            return i.map(Self::Camera);
        }

        let (name, channel) = path
            .rsplit_once('.')
            .ok_or_else(|| TwinviewError::animation(format!("invalid target path \"{path}\"")))?;
        let channel = match channel {
            "position" => Channel::Position,
            "rotation" => Channel::Rotation,
            other => {
                return Err(TwinviewError::animation(format!(
                    "unknown channel \"{other}\" in target \"{path}\""
                )));
            }
        };
        if name.is_empty() {
            return Err(TwinviewError::animation(format!(
                "target \"{path}\" has no entity name"
            )));
        }
        Ok(Self::Entity {
            name: name.to_owned(),
            channel,
        })
    }

    /// Expand `key` on this target into concrete properties.
    ///
    /// Returns an empty list when the target names an entity that never loaded.
    pub fn resolve(
        &self,
        key: &str,
        stage: &Stage,
        entities: &ResolvedEntities,
    ) -> TwinviewResult<Vec<Property>> {
        let axis = || {
            Axis::from_key(key).ok_or_else(|| {
                TwinviewError::animation(format!("target \"{self}\" has no component \"{key}\""))
            })
        };
        match self {
            Self::Entity { name, channel } => {
                let axis = axis()?;
                Ok(match entities.get(name) {
                    Some(e) => vec![Property::Entity {
                        entity: e.clone(),
                        channel: *channel,
                        axis,
                    }],
                    None => {
                        tracing::warn!(entity = %name, "timeline targets an entity that is not loaded; skipping");
                        Vec::new()
                    }
                })
            }
            Self::Cameras => {
                let axis = axis()?;
                Ok((0..stage.cameras.len())
                    .map(|camera| Property::CameraPosition { camera, axis })
                    .collect())
            }
            Self::Camera(camera) => {
                let axis = axis()?;
                if *camera >= stage.cameras.len() {
                    return Err(TwinviewError::animation(format!(
                        "camera index {camera} out of range"
                    )));
                }
                Ok(vec![Property::CameraPosition {
                    camera: *camera,
                    axis,
                }])
            }
            Self::LookAt => Ok(vec![Property::LookAt(axis()?)]),
            Self::Viewport(i) => {
                if *i >= stage.viewports.len() {
                    return Err(TwinviewError::animation(format!(
                        "viewport index {i} out of range"
                    )));
                }
                match key {
                    "height" => Ok(vec![Property::ViewportHeight(*i)]),
                    "bottom" => Ok(vec![Property::ViewportBottom(*i)]),
                    other => Err(TwinviewError::animation(format!(
                        "viewport has no field \"{other}\" (expected height or bottom)"
                    ))),
                }
            }
        }
    }
}

fn indexed(path: &str, prefix: &str) -> Option<TwinviewResult<usize>> {
    let inner = path.strip_prefix(prefix)?.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .trim()
            .parse::<usize>()
            .map_err(|_| TwinviewError::animation(format!("invalid index in \"{path}\""))),
    )
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity { name, channel } => {
                let ch = match channel {
                    Channel::Position => "position",
                    Channel::Rotation => "rotation",
                };
                write!(f, "{name}.{ch}")
            }
            Self::Cameras => f.write_str("cameras.position"),
            Self::Camera(i) => write!(f, "camera[{i}].position"),
            Self::LookAt => f.write_str("look_at"),
            Self::Viewport(i) => write!(f, "views[{i}]"),
        }
    }
}

/// One scalar the timeline can drive.
///
/// Entity properties address the pair, so a write lands on the shaded node and its mirror.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Entity {
        entity: Entity,
        channel: Channel,
        axis: Axis,
    },
    CameraPosition {
        camera: usize,
        axis: Axis,
    },
    LookAt(Axis),
    ViewportBottom(usize),
    ViewportHeight(usize),
}

impl Property {
    /// Current live value on the stage.
    pub fn read(&self, stage: &Stage) -> f64 {
        match self {
            Self::Entity {
                entity,
                channel,
                axis,
            } => axis.get(stage.scenes.channel(entity, *channel)),
            Self::CameraPosition { camera, axis } => stage
                .cameras
                .get(*camera)
                .map(|c| axis.get(c.position))
                .unwrap_or(0.0),
            Self::LookAt(axis) => axis.get(stage.look_at),
            Self::ViewportBottom(i) => stage.viewports.get(*i).map(|v| v.bottom).unwrap_or(0.0),
            Self::ViewportHeight(i) => stage.viewports.get(*i).map(|v| v.height).unwrap_or(0.0),
        }
    }

    /// Write `value` to the stage.
    pub fn write(&self, stage: &mut Stage, value: f64) {
        match self {
            Self::Entity {
                entity,
                channel,
                axis,
            } => stage.scenes.set_component(entity, *channel, *axis, value),
            Self::CameraPosition { camera, axis } => {
                if let Some(c) = stage.cameras.get_mut(*camera) {
                    axis.set(&mut c.position, value);
                }
            }
            Self::LookAt(axis) => axis.set(&mut stage.look_at, value),
            Self::ViewportBottom(i) => {
                if let Some(v) = stage.viewports.get_mut(*i) {
                    v.bottom = value;
                }
            }
            Self::ViewportHeight(i) => {
                if let Some(v) = stage.viewports.get_mut(*i) {
                    v.height = value;
                }
            }
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ax = |a: &Axis| match a {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        match self {
            Self::Entity {
                entity,
                channel,
                axis,
            } => {
                let ch = match channel {
                    Channel::Position => "position",
                    Channel::Rotation => "rotation",
                };
                write!(f, "{}.{ch}.{}", entity.name(), ax(axis))
            }
            Self::CameraPosition { camera, axis } => {
                write!(f, "camera[{camera}].position.{}", ax(axis))
            }
            Self::LookAt(axis) => write!(f, "look_at.{}", ax(axis)),
            Self::ViewportBottom(i) => write!(f, "views[{i}].bottom"),
            Self::ViewportHeight(i) => write!(f, "views[{i}].height"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/target.rs"]
mod tests;
