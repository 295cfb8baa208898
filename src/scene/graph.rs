use crate::foundation::core::{DMat4, DVec3, Rgba8Premul};
use crate::scene::node::{ModelNode, NodeId, SceneNode};

/// Which of the two parallel scenes a viewport draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Lit, fogged, shadowed scene.
    Shaded,
    /// Mirror scene drawn with the wireframe override material.
    Wireframe,
}

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    /// Fog color.
    pub color: Rgba8Premul,
    /// View distance where fog starts.
    pub near: f64,
    /// View distance where fog is fully opaque.
    pub far: f64,
}

impl Fog {
    /// Fog factor in `[0, 1]` for a view-space distance.
    pub fn factor(&self, distance: f64) -> f64 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Directional light shining from `position` toward the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Light color.
    pub color: Rgba8Premul,
    /// Intensity multiplier.
    pub intensity: f64,
    /// Light position; direction is `position -> origin`.
    pub position: DVec3,
    /// Whether shadow casters project onto receivers.
    pub cast_shadow: bool,
}

/// Sky/ground gradient ambient light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    /// Color for normals pointing up.
    pub sky: Rgba8Premul,
    /// Color for normals pointing down.
    pub ground: Rgba8Premul,
    /// Intensity multiplier.
    pub intensity: f64,
}

/// Material that replaces every mesh material in a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverrideMaterial {
    /// Draw triangle edges only.
    Wireframe {
        /// Edge color.
        color: Rgba8Premul,
    },
}

/// Arena-backed node hierarchy plus scene-wide render settings.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    /// Clear color for the scene's viewport.
    pub background: Rgba8Premul,
    /// Optional linear fog.
    pub fog: Option<Fog>,
    /// Optional key light.
    pub directional: Option<DirectionalLight>,
    /// Optional ambient light.
    pub hemisphere: Option<HemisphereLight>,
    /// Optional material override applied to every mesh.
    pub override_material: Option<OverrideMaterial>,

    nodes: Vec<Option<SceneNode>>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Empty scene with the given background.
    pub fn new(background: Rgba8Premul) -> Self {
        Self {
            background,
            fog: None,
            directional: None,
            hemisphere: None,
            override_material: None,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a detached tree under `parent` (or as a root) and return the new tree's root id.
    pub fn add(&mut self, parent: Option<NodeId>, model: &ModelNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(SceneNode {
            name: model.name.clone(),
            transform: model.transform,
            mesh: model.mesh.clone(),
            cast_shadow: model.cast_shadow,
            receive_shadow: model.receive_shadow,
            parent,
            children: Vec::new(),
        }));
        match parent.and_then(|p| self.node_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        for child in &model.children {
            self.add(Some(id), child);
        }
        id
    }

    /// Remove every descendant of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for c in children {
            self.drop_subtree(c);
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get_mut(id.0 as usize) else {
            return;
        };
        if let Some(node) = slot.take() {
            for c in node.children {
                self.drop_subtree(c);
            }
        }
    }

    /// Borrow a live node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Mutably borrow a live node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Root node ids in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Return `true` when the scene holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live nodes called `name`.
    pub fn count_named(&self, name: &str) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.name == name)
            .count()
    }

    /// Copy the subtree rooted at `id` into a detached tree (meshes are shared, not duplicated).
    pub fn export(&self, id: NodeId) -> Option<ModelNode> {
        let node = self.node(id)?;
        Some(ModelNode {
            name: node.name.clone(),
            transform: node.transform,
            mesh: node.mesh.clone(),
            cast_shadow: node.cast_shadow,
            receive_shadow: node.receive_shadow,
            children: node
                .children
                .iter()
                .filter_map(|c| self.export(*c))
                .collect(),
        })
    }

    /// Local-to-world matrix of a node.
    pub fn world_matrix(&self, id: NodeId) -> DMat4 {
        let mut m = DMat4::IDENTITY;
        let mut cur = self.node(id);
        while let Some(n) = cur {
            m = n.transform.matrix() * m;
            cur = n.parent.and_then(|p| self.node(p));
        }
        m
    }

    /// Visit every node that carries a mesh, depth first, with its world matrix.
    pub fn visit_meshes(&self, mut f: impl FnMut(&SceneNode, DMat4)) {
        for &root in &self.roots {
            self.visit_rec(root, DMat4::IDENTITY, &mut f);
        }
    }

    fn visit_rec(&self, id: NodeId, parent: DMat4, f: &mut impl FnMut(&SceneNode, DMat4)) {
        let Some(node) = self.node(id) else {
            return;
        };
        let world = parent * node.transform.matrix();
        if node.mesh.is_some() {
            f(node, world);
        }
        for &c in &node.children {
            self.visit_rec(c, world, f);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
