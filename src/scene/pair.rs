use std::collections::HashMap;

use crate::foundation::core::{Axis, DVec3};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::graph::{SceneGraph, SceneKind};
use crate::scene::node::{ModelNode, NodeId};

/// Which transform channel of an entity is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Translation.
    Position,
    /// Euler rotation (radians).
    Rotation,
}

/// A named logical object present in both scenes.
///
/// Holds one node handle per scene. All transform writes go through [`ScenePair`] so both
/// handles are updated together.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entity {
    name: String,
    shaded: NodeId,
    wireframe: NodeId,
}

impl Entity {
    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group node in the shaded scene.
    pub fn shaded(&self) -> NodeId {
        self.shaded
    }

    /// Group node in the wireframe scene.
    pub fn wireframe(&self) -> NodeId {
        self.wireframe
    }
}

/// The shaded scene, its wireframe mirror and the entity registry spanning both.
#[derive(Clone, Debug)]
pub struct ScenePair {
    shaded: SceneGraph,
    wireframe: SceneGraph,
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
}

impl ScenePair {
    /// Pair two (possibly pre-dressed) scenes with an empty entity registry.
    pub fn new(shaded: SceneGraph, wireframe: SceneGraph) -> Self {
        Self {
            shaded,
            wireframe,
            entities: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Borrow one of the two scenes.
    pub fn scene(&self, kind: SceneKind) -> &SceneGraph {
        match kind {
            SceneKind::Shaded => &self.shaded,
            SceneKind::Wireframe => &self.wireframe,
        }
    }

    /// Mutably borrow one of the two scenes (for dressing, not entity transforms).
    pub fn scene_mut(&mut self, kind: SceneKind) -> &mut SceneGraph {
        match kind {
            SceneKind::Shaded => &mut self.shaded,
            SceneKind::Wireframe => &mut self.wireframe,
        }
    }

    /// Attach a resolved model to the shaded scene, mirror it into the wireframe scene and
    /// register both under `name`.
    ///
    /// Registering a name twice replaces the entity's model content in both scenes, keeping
    /// its node handles and transform, and returns the existing entity.
    pub fn create_entity(&mut self, name: &str, model: ModelNode) -> Entity {
        if let Some(existing) = self.entity(name).cloned() {
            tracing::warn!(entity = name, "entity registered twice; replacing its model");
            self.shaded.clear_children(existing.shaded);
            let child = self.shaded.add(Some(existing.shaded), &model);
            self.wireframe.clear_children(existing.wireframe);
            if let Some(copy) = self.shaded.export(child) {
                self.wireframe.add(Some(existing.wireframe), &copy);
            }
            return existing;
        }

        let mut group = ModelNode::group(name);
        group.children.push(model);
        let shaded = self.shaded.add(None, &group);
        let copy = self.shaded.export(shaded).unwrap_or(group);
        let wireframe = self.wireframe.add(None, &copy);

        let entity = Entity {
            name: name.to_owned(),
            shaded,
            wireframe,
        };
        self.by_name.insert(name.to_owned(), self.entities.len());
        self.entities.push(entity.clone());
        tracing::debug!(entity = name, nodes = copy.node_count(), "entity created");
        entity
    }

    /// Strict registration: fails with [`TwinviewError::DuplicateEntity`] if `name` exists.
    pub fn try_create_entity(&mut self, name: &str, model: ModelNode) -> TwinviewResult<Entity> {
        if self.by_name.contains_key(name) {
            return Err(TwinviewError::DuplicateEntity(name.to_owned()));
        }
        Ok(self.create_entity(name, model))
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    /// Entities in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Current value of a transform channel (read from the shaded node).
    pub fn channel(&self, entity: &Entity, channel: Channel) -> DVec3 {
        self.shaded
            .node(entity.shaded)
            .map(|n| match channel {
                Channel::Position => n.transform.position,
                Channel::Rotation => n.transform.rotation,
            })
            .unwrap_or(DVec3::ZERO)
    }

    /// Write a whole transform channel to both nodes of the entity.
    pub fn set_channel(&mut self, entity: &Entity, channel: Channel, value: DVec3) {
        for (graph, id) in [
            (&mut self.shaded, entity.shaded),
            (&mut self.wireframe, entity.wireframe),
        ] {
            if let Some(n) = graph.node_mut(id) {
                match channel {
                    Channel::Position => n.transform.position = value,
                    Channel::Rotation => n.transform.rotation = value,
                }
            }
        }
    }

    /// Write one component of a transform channel to both nodes of the entity.
    pub fn set_component(&mut self, entity: &Entity, channel: Channel, axis: Axis, value: f64) {
        let mut v = self.channel(entity, channel);
        axis.set(&mut v, value);
        self.set_channel(entity, channel, v);
    }

    /// Return `true` when the shaded and wireframe nodes carry identical transforms.
    pub fn is_synchronized(&self, entity: &Entity) -> bool {
        match (
            self.shaded.node(entity.shaded),
            self.wireframe.node(entity.wireframe),
        ) {
            (Some(a), Some(b)) => a.transform == b.transform,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/pair.rs"]
mod tests;
