use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use rayon::prelude::*;

use crate::assets::model::{builtin_model, parse_model_json};
use crate::foundation::error::{TwinviewError, TwinviewResult};
use crate::scene::node::ModelNode;

/// Loads a model descriptor by source identifier.
///
/// Implementations must be callable from worker threads.
pub trait AssetResolver: Send + Sync {
    fn load(&self, source: &str) -> TwinviewResult<ModelNode>;
}

/// Resolves `builtin:<name>` sources and `.json` descriptors relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetResolver for FsResolver {
    fn load(&self, source: &str) -> TwinviewResult<ModelNode> {
        if let Some(name) = source.strip_prefix("builtin:") {
            return builtin_model(name);
        }
        let rel = normalize_rel_path(source)?;
        if !rel.ends_with(".json") {
            return Err(TwinviewError::validation(format!(
                "unsupported model format \"{rel}\" (expected .json or builtin:)"
            )));
        }
        let path = self.root.join(&rel);
        let bytes = std::fs::read(&path)
            .map_err(|e| TwinviewError::validation(format!("read {}: {e}", path.display())))?;
        parse_model_json(&bytes)
    }
}

/// Normalize a resolver-relative path: `/` separators, no `.` segments, no absolute paths or `..`.
pub(crate) fn normalize_rel_path(source: &str) -> TwinviewResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(TwinviewError::validation("model source must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(TwinviewError::validation("model paths must be relative"));
    }
    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(TwinviewError::validation(
                    "model paths must not contain '..'",
                ));
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(TwinviewError::validation(
            "model path must contain a file name",
        ));
    }
    Ok(parts.join("/"))
}

/// One named model to resolve.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelRequest {
    /// Entity name the model will be registered under.
    pub name: String,
    /// Resolver source identifier.
    pub source: String,
    /// Mark every mesh as shadow caster and receiver on load.
    #[serde(default = "default_true")]
    pub shadows: bool,
}

fn default_true() -> bool {
    true
}

/// Outcome of resolving a whole batch.
///
/// Models keep request order. Failures are collected, not propagated: a missing model just
/// means the corresponding entity never exists.
#[derive(Debug, Default)]
pub struct ResolvedModels {
    pub models: Vec<(String, ModelNode)>,
    pub failures: Vec<TwinviewError>,
}

/// Resolve every request in parallel and wait for all of them.
#[tracing::instrument(skip_all, fields(requests = requests.len()))]
pub fn resolve_all(resolver: &dyn AssetResolver, requests: &[ModelRequest]) -> ResolvedModels {
    let results: Vec<(String, TwinviewResult<ModelNode>)> = requests
        .par_iter()
        .map(|req| {
            let res = resolver.load(&req.source).map(|mut model| {
                if req.shadows {
                    model.set_shadows(true, true);
                }
                model
            });
            (req.name.clone(), res)
        })
        .collect();

    let mut out = ResolvedModels::default();
    for (name, res) in results {
        match res {
            Ok(model) => out.models.push((name, model)),
            Err(e) => {
                tracing::warn!(model = %name, error = %e, "model failed to load; continuing without it");
                out.failures.push(TwinviewError::asset(name, e.to_string()));
            }
        }
    }
    tracing::info!(
        loaded = out.models.len(),
        failed = out.failures.len(),
        "asset resolution finished"
    );
    out
}

/// Background batch resolution that the event loop can poll without blocking.
pub struct PendingModels {
    rx: mpsc::Receiver<ResolvedModels>,
    done: bool,
}

impl PendingModels {
    /// Start resolving `requests` on a worker thread.
    pub fn spawn(resolver: Arc<dyn AssetResolver>, requests: Vec<ModelRequest>) -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let resolved = resolve_all(resolver.as_ref(), &requests);
            // Receiver gone means nobody is waiting any more.
            let _ = tx.send(resolved);
        });
        Self { rx, done: false }
    }

    /// Already-resolved batch, delivered on the first poll.
    pub fn ready(resolved: ResolvedModels) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(resolved);
        Self { rx, done: false }
    }

    /// Non-blocking poll. Yields the batch exactly once.
    ///
    /// If the worker dies without reporting, the batch never completes and this keeps
    /// returning `None`.
    pub fn try_take(&mut self) -> Option<ResolvedModels> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(r) => {
                self.done = true;
                Some(r)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("asset worker exited without a result; scene stays static");
                self.done = true;
                None
            }
        }
    }

    /// Block until the batch is available.
    pub fn wait(mut self) -> TwinviewResult<ResolvedModels> {
        if self.done {
            return Err(TwinviewError::validation("pending models already taken"));
        }
        self.done = true;
        self.rx
            .recv()
            .map_err(|_| TwinviewError::validation("asset worker exited without a result"))
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
