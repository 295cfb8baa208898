use std::sync::Arc;

use crate::assets::color::Color;
use crate::foundation::core::{DMat4, DVec3};
use glam::{DQuat, EulerRot};

/// Index of a node inside one [`crate::SceneGraph`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Local transform: translation, XYZ Euler rotation (radians) and scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Translation.
    #[serde(default)]
    pub position: DVec3,
    /// Euler angles in radians, XYZ order.
    #[serde(default)]
    pub rotation: DVec3,
    /// Non-uniform scale.
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
}

fn unit_scale() -> DVec3 {
    DVec3::ONE
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Local-to-parent matrix `T * R * S`.
    pub fn matrix(&self) -> DMat4 {
        let q = DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        DMat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

/// Indexed triangle mesh with a single base color.
///
/// Meshes are shared between the shaded node and its wireframe clone.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Vertex positions in node-local space.
    pub positions: Vec<DVec3>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[u32; 3]>,
    /// Base (albedo) color used by the shaded material.
    pub color: Color,
}

impl Mesh {
    /// Iterate triangles as position triples, skipping out-of-range indices.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles.iter().filter_map(|[a, b, c]| {
            let get = |i: &u32| self.positions.get(*i as usize).copied();
            Some([get(a)?, get(b)?, get(c)?])
        })
    }
}

/// Detached node tree: what an asset resolver produces and what a structural clone copies.
#[derive(Clone, Debug)]
pub struct ModelNode {
    /// Node name (informational).
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Optional drawable.
    pub mesh: Option<Arc<Mesh>>,
    /// Whether this node's mesh casts shadows.
    pub cast_shadow: bool,
    /// Whether this node's mesh receives shadows.
    pub receive_shadow: bool,
    /// Child nodes.
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Empty transform node (a "group").
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        }
    }

    /// Node holding a mesh.
    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            mesh: Some(Arc::new(mesh)),
            ..Self::group(name)
        }
    }

    /// Set shadow flags on every mesh node of the tree.
    pub fn set_shadows(&mut self, cast: bool, receive: bool) {
        if self.mesh.is_some() {
            self.cast_shadow = cast;
            self.receive_shadow = receive;
        }
        for c in &mut self.children {
            c.set_shadows(cast, receive);
        }
    }

    /// Number of nodes in the tree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ModelNode::node_count).sum::<usize>()
    }
}

/// A node stored in a scene graph arena.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Node name.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Optional drawable.
    pub mesh: Option<Arc<Mesh>>,
    /// Whether this node's mesh casts shadows.
    pub cast_shadow: bool,
    /// Whether this node's mesh receives shadows.
    pub receive_shadow: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// Child node ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, `None` for scene roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
