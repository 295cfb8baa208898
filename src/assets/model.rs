use std::f64::consts::{PI, TAU};

use crate::assets::color::Color;
use crate::foundation::core::DVec3;
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::node::{Mesh, ModelNode, Transform};

/// JSON model descriptor: a node tree whose nodes optionally carry a mesh.
///
/// ```json
/// { "name": "witch",
///   "children": [ { "name": "hat", "mesh": { "primitive": "cone", "color": "#6a3d9a" } } ] }
/// ```
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub mesh: Option<MeshDef>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

/// Mesh payload of a [`NodeDef`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MeshDef {
    /// Explicit vertex and index lists.
    Inline {
        positions: Vec<[f64; 3]>,
        indices: Vec<[u32; 3]>,
        #[serde(default = "default_mesh_color")]
        color: Color,
    },
    /// Generated shape.
    Primitive {
        #[serde(flatten)]
        primitive: Primitive,
        #[serde(default = "default_mesh_color")]
        color: Color,
    },
}

fn default_mesh_color() -> Color {
    Color::from_rgb8(204, 204, 204)
}

/// Procedural shapes. All except the plane rest on `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "primitive", rename_all = "lowercase")]
pub enum Primitive {
    Box {
        #[serde(default = "one3")]
        size: [f64; 3],
    },
    Cone {
        #[serde(default = "half")]
        radius: f64,
        #[serde(default = "two")]
        height: f64,
        #[serde(default = "sixteen")]
        segments: u32,
    },
    Sphere {
        #[serde(default = "one")]
        radius: f64,
        #[serde(default = "sixteen")]
        segments: u32,
        #[serde(default = "twelve")]
        rings: u32,
    },
    /// XY plane facing `+Z`, centered on the origin.
    Plane {
        #[serde(default = "one")]
        width: f64,
        #[serde(default = "one")]
        height: f64,
        #[serde(default = "one_u")]
        segments: u32,
    },
}

fn one() -> f64 {
    1.0
}
fn half() -> f64 {
    0.5
}
fn two() -> f64 {
    2.0
}
fn one3() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}
fn one_u() -> u32 {
    1
}
fn twelve() -> u32 {
    12
}
fn sixteen() -> u32 {
    16
}

impl Primitive {
    /// Generate the mesh with `color`.
    pub fn mesh(self, color: Color) -> TwinviewResult<Mesh> {
        let (positions, triangles) = match self {
            Self::Box { size } => box_geometry(size)?,
            Self::Cone {
                radius,
                height,
                segments,
            } => cone_geometry(radius, height, segments)?,
            Self::Sphere {
                radius,
                segments,
                rings,
            } => sphere_geometry(radius, segments, rings)?,
            Self::Plane {
                width,
                height,
                segments,
            } => plane_geometry(width, height, segments)?,
        };
        Ok(Mesh {
            positions,
            triangles,
            color,
        })
    }
}

type Geometry = (Vec<DVec3>, Vec<[u32; 3]>);

fn positive(v: f64, what: &str) -> TwinviewResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(TwinviewError::validation(format!(
            "{what} must be finite and > 0"
        )))
    }
}

fn box_geometry(size: [f64; 3]) -> TwinviewResult<Geometry> {
    for s in size {
        positive(s, "box size")?;
    }
    let [w, h, d] = size;
    let (x, z) = (w / 2.0, d / 2.0);
    let positions = vec![
        DVec3::new(-x, 0.0, -z),
        DVec3::new(x, 0.0, -z),
        DVec3::new(x, 0.0, z),
        DVec3::new(-x, 0.0, z),
        DVec3::new(-x, h, -z),
        DVec3::new(x, h, -z),
        DVec3::new(x, h, z),
        DVec3::new(-x, h, z),
    ];
    let triangles = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    Ok((positions, triangles))
}

fn cone_geometry(radius: f64, height: f64, segments: u32) -> TwinviewResult<Geometry> {
    positive(radius, "cone radius")?;
    positive(height, "cone height")?;
    if segments < 3 {
        return Err(TwinviewError::validation("cone needs >= 3 segments"));
    }
    let mut positions = Vec::with_capacity(segments as usize + 2);
    for i in 0..segments {
        let a = TAU * f64::from(i) / f64::from(segments);
        positions.push(DVec3::new(radius * a.cos(), 0.0, radius * a.sin()));
    }
    let apex = segments;
    let base = segments + 1;
    positions.push(DVec3::new(0.0, height, 0.0));
    positions.push(DVec3::ZERO);

    let mut triangles = Vec::with_capacity(2 * segments as usize);
    for i in 0..segments {
        let j = (i + 1) % segments;
        triangles.push([i, apex, j]);
        triangles.push([i, j, base]);
    }
    Ok((positions, triangles))
}

fn sphere_geometry(radius: f64, segments: u32, rings: u32) -> TwinviewResult<Geometry> {
    positive(radius, "sphere radius")?;
    if segments < 3 || rings < 2 {
        return Err(TwinviewError::validation(
            "sphere needs >= 3 segments and >= 2 rings",
        ));
    }
    let cols = segments + 1;
    let mut positions = Vec::with_capacity(((rings + 1) * cols) as usize);
    for r in 0..=rings {
        let phi = PI * f64::from(r) / f64::from(rings);
        for s in 0..=segments {
            let theta = TAU * f64::from(s) / f64::from(segments);
            positions.push(DVec3::new(
                radius * phi.sin() * theta.cos(),
                radius + radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }
    let mut triangles = Vec::new();
    for r in 0..rings {
        for s in 0..segments {
            let a = r * cols + s;
            let b = a + cols;
            if r != 0 {
                triangles.push([a, a + 1, b]);
            }
            if r != rings - 1 {
                triangles.push([a + 1, b + 1, b]);
            }
        }
    }
    Ok((positions, triangles))
}

fn plane_geometry(width: f64, height: f64, segments: u32) -> TwinviewResult<Geometry> {
    positive(width, "plane width")?;
    positive(height, "plane height")?;
    let n = segments.max(1);
    let mut positions = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for iy in 0..=n {
        let y = height / 2.0 - height * f64::from(iy) / f64::from(n);
        for ix in 0..=n {
            let x = -width / 2.0 + width * f64::from(ix) / f64::from(n);
            positions.push(DVec3::new(x, y, 0.0));
        }
    }
    let mut triangles = Vec::with_capacity((2 * n * n) as usize);
    for iy in 0..n {
        for ix in 0..n {
            let a = iy * (n + 1) + ix;
            let b = a + n + 1;
            triangles.push([a, b, a + 1]);
            triangles.push([b, b + 1, a + 1]);
        }
    }
    Ok((positions, triangles))
}

impl NodeDef {
    /// Convert the descriptor into a detached node tree, validating indices.
    pub fn into_model(self) -> TwinviewResult<ModelNode> {
        let mut node = ModelNode::group(self.name);
        node.transform = self.transform;
        if let Some(mesh) = self.mesh {
            let mesh = mesh.build()?;
            node.mesh = Some(std::sync::Arc::new(mesh));
        }
        node.children = self
            .children
            .into_iter()
            .map(NodeDef::into_model)
            .collect::<TwinviewResult<Vec<_>>>()?;
        Ok(node)
    }
}

impl MeshDef {
    fn build(self) -> TwinviewResult<Mesh> {
        match self {
            Self::Inline {
                positions,
                indices,
                color,
            } => {
                let n = positions.len();
                if let Some(bad) = indices.iter().flatten().find(|&&i| i as usize >= n) {
                    return Err(TwinviewError::validation(format!(
                        "mesh index {bad} out of range for {n} vertices"
                    )));
                }
                if positions.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(TwinviewError::validation(
                        "mesh positions must be finite",
                    ));
                }
                Ok(Mesh {
                    positions: positions.into_iter().map(DVec3::from_array).collect(),
                    triangles: indices,
                    color,
                })
            }
            Self::Primitive { primitive, color } => primitive.mesh(color),
        }
    }
}

/// Parse a JSON model descriptor.
pub fn parse_model_json(bytes: &[u8]) -> TwinviewResult<ModelNode> {
    let def: NodeDef = serde_json::from_slice(bytes)
        .map_err(|e| TwinviewError::serde(format!("model json parse failed: {e}")))?;
    def.into_model()
}

/// Built-in stand-in models, addressed as `builtin:<name>`.
///
/// `cone` and `sphere` are the default figures; `box` and `plane` are general shapes.
pub fn builtin_model(name: &str) -> TwinviewResult<ModelNode> {
    let (primitive, color) = match name {
        "box" => (Primitive::Box { size: one3() }, default_mesh_color()),
        "cone" => (
            Primitive::Cone {
                radius: 0.6,
                height: 2.0,
                segments: 24,
            },
            Color::from_rgb8(106, 61, 154),
        ),
        "sphere" => (
            Primitive::Sphere {
                radius: 0.8,
                segments: 20,
                rings: 14,
            },
            Color::from_rgb8(139, 90, 43),
        ),
        "plane" => (
            Primitive::Plane {
                width: 1.0,
                height: 1.0,
                segments: 1,
            },
            default_mesh_color(),
        ),
        other => {
            return Err(TwinviewError::validation(format!(
                "unknown builtin model \"{other}\""
            )));
        }
    };
    Ok(ModelNode::with_mesh(name, primitive.mesh(color)?))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/model.rs"]
mod tests;
