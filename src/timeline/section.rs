use std::collections::BTreeMap;

use crate::animation::ease::{Ease, EaseDir};

/// Declarative scroll timeline: defaults, instantaneous initial sets and ordered sections.
///
/// Section `i` starts at timeline time `i`; the whole timeline is stretched over the scroll
/// trigger's range.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineDef {
    #[serde(default)]
    pub defaults: TweenDefaults,
    /// Applied once at build time, before any section is registered.
    #[serde(default)]
    pub initial: Vec<SetDef>,
    #[serde(default)]
    pub sections: Vec<SectionDef>,
}

/// Values every tween inherits unless it overrides them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TweenDefaults {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_ease")]
    pub ease: Ease,
}

fn default_duration() -> f64 {
    1.0
}

fn default_ease() -> Ease {
    Ease::Power(2, EaseDir::InOut)
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            ease: default_ease(),
        }
    }
}

/// Instantaneous assignment, e.g. `{ "target": "witch.position", "set": { "x": 6 } }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetDef {
    pub target: String,
    pub set: BTreeMap<String, f64>,
}

/// One section: tweens that start together.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDef {
    #[serde(default)]
    pub tweens: Vec<TweenDef>,
}

/// `{ "target": "bear.position", "to": { "x": -1, "z": 1 }, "ease": "power4.in" }`
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TweenDef {
    pub target: String,
    pub to: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    /// Multiplier on the default duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TweenDef {
    pub fn new(target: impl Into<String>, to: &[(&str, f64)]) -> Self {
        Self {
            target: target.into(),
            to: to.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            ease: None,
            duration: None,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }
}

impl SetDef {
    pub fn new(target: impl Into<String>, set: &[(&str, f64)]) -> Self {
        Self {
            target: target.into(),
            set: set.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        }
    }
}

impl TimelineDef {
    /// The four-section scroll story: figures converge, the wireframe band grows over the
    /// screen, figures swap sides, then the band slides off the top.
    pub fn scroll_story() -> Self {
        Self {
            defaults: TweenDefaults::default(),
            initial: vec![
                SetDef::new("witch.position", &[("x", 6.0)]),
                SetDef::new("bear.position", &[("x", -6.0)]),
            ],
            sections: vec![
                SectionDef {
                    tweens: vec![
                        TweenDef::new("witch.position", &[("x", 1.0)]),
                        TweenDef::new("bear.position", &[("x", -1.0)]),
                        TweenDef::new("look_at", &[("y", 1.0)]),
                        TweenDef::new("cameras.position", &[("z", 4.0)])
                            .with_ease(Ease::Power(2, EaseDir::Out)),
                    ],
                },
                SectionDef {
                    tweens: vec![
                        TweenDef::new("witch.position", &[("x", 6.0)])
                            .with_ease(Ease::Power(4, EaseDir::In)),
                        TweenDef::new("bear.position", &[("x", -1.0), ("z", 1.0)]),
                        TweenDef::new("views[1]", &[("height", 1.0)]).with_ease(Ease::Linear),
                    ],
                },
                SectionDef {
                    tweens: vec![
                        TweenDef::new("witch.position", &[("x", 0.0), ("z", 1.0)])
                            .with_ease(Ease::Power(4, EaseDir::Out)),
                        TweenDef::new("bear.position", &[("x", -6.0), ("z", 0.0)])
                            .with_ease(Ease::Power(4, EaseDir::In)),
                    ],
                },
                SectionDef {
                    tweens: vec![
                        TweenDef::new("witch.position", &[("x", 1.0), ("z", 0.0)]),
                        TweenDef::new("bear.position", &[("x", -1.0), ("z", 0.0)]),
                        TweenDef::new("views[1]", &[("height", 0.0), ("bottom", 1.0)])
                            .with_ease(Ease::Linear),
                    ],
                },
            ],
        }
    }
}
