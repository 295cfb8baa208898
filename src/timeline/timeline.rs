use std::collections::HashMap;

use crate::animation::anim::Tween;
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::stage::{ResolvedEntities, Stage};
use crate::timeline::section::TimelineDef;
use crate::timeline::target::{Property, TargetPath};

/// All tweens driving one property, in start order, plus the value it had before any of them.
#[derive(Clone, Debug)]
struct Track {
    property: Property,
    base: f64,
    tweens: Vec<Tween<f64>>,
}

impl Track {
    /// Value at timeline time `t`: the most recently started tween wins.
    fn value_at(&self, t: f64) -> f64 {
        let mut v = self.base;
        for tw in &self.tweens {
            if tw.has_started(t) {
                v = tw.sample(t);
            }
        }
        v
    }

    fn insert(&mut self, tween: Tween<f64>) {
        let at = self.tweens.partition_point(|tw| tw.start <= tween.start);
        self.tweens.insert(at, tween);
    }
}

/// Compiled scroll timeline.
///
/// Evaluation is a pure function of progress: [`Timeline::sample`] never touches the stage, and
/// the returned [`Snapshot`] covers every driven property so scrubbing backward restores
/// earlier values exactly.
#[derive(Clone, Debug)]
pub struct Timeline {
    tracks: Vec<Track>,
    sections: Vec<(f64, f64)>,
    total: f64,
}

impl Timeline {
    /// Apply the initial sets to `stage`, then compile every section.
    ///
    /// `entities` can only come from [`Stage::populate`], so a timeline is never built before
    /// assets have resolved. Tweens on entities that failed to load are skipped.
    #[tracing::instrument(skip_all, fields(sections = def.sections.len()))]
    pub fn build(
        stage: &mut Stage,
        entities: &ResolvedEntities,
        def: &TimelineDef,
    ) -> TwinviewResult<Self> {
        if !def.defaults.duration.is_finite() || def.defaults.duration < 0.0 {
            return Err(TwinviewError::animation(
                "default duration must be finite and >= 0",
            ));
        }

        for set in &def.initial {
            let path = TargetPath::parse(&set.target)?;
            for (key, value) in &set.set {
                for prop in path.resolve(key, stage, entities)? {
                    prop.write(stage, *value);
                }
            }
        }

        let mut tracks = Vec::<Track>::new();
        let mut index = HashMap::<Property, usize>::new();
        let mut sections = Vec::with_capacity(def.sections.len());

        for (i, section) in def.sections.iter().enumerate() {
            let start = i as f64;
            let mut end = start;
            for tw in &section.tweens {
                let path = TargetPath::parse(&tw.target)?;
                let duration = def.defaults.duration * tw.duration.unwrap_or(1.0);
                let ease = tw.ease.unwrap_or(def.defaults.ease);
                for (key, to) in &tw.to {
                    if !to.is_finite() {
                        return Err(TwinviewError::animation(format!(
                            "section {i}: {}.{key} target value must be finite",
                            tw.target
                        )));
                    }
                    for prop in path.resolve(key, stage, entities)? {
                        let slot = *index.entry(prop.clone()).or_insert_with(|| {
                            tracks.push(Track {
                                base: prop.read(stage),
                                property: prop.clone(),
                                tweens: Vec::new(),
                            });
                            tracks.len() - 1
                        });
                        let track = &mut tracks[slot];
                        let tween = Tween {
                            start,
                            duration,
                            from: track.value_at(start),
                            to: *to,
                            ease,
                        };
                        tween.validate()?;
                        end = end.max(tween.end());
                        track.insert(tween);
                    }
                }
            }
            sections.push((start, end));
        }

        let total = sections.iter().map(|(_, e)| *e).fold(0.0, f64::max);
        tracing::info!(
            tracks = tracks.len(),
            total,
            "scroll timeline built"
        );
        Ok(Self {
            tracks,
            sections,
            total,
        })
    }

    /// Timeline length in section units.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// `[start, end]` of section `i` in scroll progress.
    pub fn section_range(&self, i: usize) -> Option<(f64, f64)> {
        let (s, e) = *self.sections.get(i)?;
        if self.total <= 0.0 {
            return Some((0.0, 0.0));
        }
        Some((s / self.total, e / self.total))
    }

    /// Properties driven by at least one tween.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.tracks.iter().map(|t| &t.property)
    }

    /// Evaluate every driven property at `progress`, clamped to `[0, 1]`.
    pub fn sample(&self, progress: f64) -> Snapshot {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let t = p * self.total;
        Snapshot {
            progress: p,
            values: self
                .tracks
                .iter()
                .map(|tr| (tr.property.clone(), tr.value_at(t)))
                .collect(),
        }
    }
}

/// Values of every driven property at one progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    progress: f64,
    values: Vec<(Property, f64)>,
}

impl Snapshot {
    /// Clamped progress this snapshot was taken at.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn get(&self, property: &Property) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Property, f64)> {
        self.values.iter().map(|(p, v)| (p, *v))
    }

    /// Write every value to the stage.
    pub fn apply(&self, stage: &mut Stage) {
        for (prop, v) in &self.values {
            prop.write(stage, *v);
        }
    }

    /// `{ "witch.position.x": 1.0, ... }` for dumps.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .map(|(p, v)| (p.to_string(), serde_json::Value::from(*v)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::json!({ "progress": self.progress, "values": map })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timeline.rs"]
mod tests;
