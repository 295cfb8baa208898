//! Twinview renders a shaded scene and its wireframe mirror as two stacked viewports of one
//! surface, with the split, camera framing and object placement driven by scroll position.
//!
//! - Describe the page with a [`StageConfig`] and build a [`Stage`]
//! - Resolve models with [`resolve_all`] or [`PendingModels`], then [`Stage::populate`]
//! - Compile a [`Timeline`] and sample it at any scroll progress
//! - Draw frames with [`RenderLoop`] into a [`Renderer`] such as [`CpuRenderer`]
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod foundation;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod stage;
pub(crate) mod timeline;
pub(crate) mod view;

pub use crate::animation::anim::{Lerp, Tween};
pub use crate::animation::ease::{Ease, EaseDir};
pub use crate::assets::color::Color;
pub use crate::assets::model::{MeshDef, NodeDef, Primitive, builtin_model, parse_model_json};
pub use crate::assets::resolver::{
    AssetResolver, FsResolver, ModelRequest, PendingModels, ResolvedModels, resolve_all,
};
pub use crate::config::{CameraConfig, FogConfig, LightsConfig, Palette, StageConfig};
pub use crate::foundation::core::{
    Axis, DMat4, DVec3, DVec4, Rect, Region, Rgba8Premul, SurfaceSize, WindowSize,
};
pub use crate::foundation::error::{TwinviewError, TwinviewResult};
pub use crate::render::backend::{FrameRGBA, Renderer};
pub use crate::render::cpu::{CpuRenderer, DrawStats};
pub use crate::scene::graph::{
    DirectionalLight, Fog, HemisphereLight, OverrideMaterial, SceneGraph, SceneKind,
};
pub use crate::scene::node::{Mesh, ModelNode, NodeId, SceneNode, Transform};
pub use crate::scene::pair::{Channel, Entity, ScenePair};
pub use crate::session::app::{App, AppEvent, EventSource};
pub use crate::session::render_loop::{
    FixedFrames, FrameReport, FrameScheduler, IntervalScheduler, RenderLoop, StopToken,
};
pub use crate::session::resize::ResizeHandler;
pub use crate::stage::{ResolvedEntities, Stage};
pub use crate::timeline::section::{SectionDef, SetDef, TimelineDef, TweenDef, TweenDefaults};
pub use crate::timeline::target::{Property, TargetPath};
pub use crate::timeline::timeline::{Snapshot, Timeline};
pub use crate::timeline::trigger::{MOTION_ENV, MotionPreference, ScrollBinding, ScrollTrigger};
pub use crate::view::camera::PerspectiveCamera;
pub use crate::view::viewport::{Viewport, ViewportSet};
