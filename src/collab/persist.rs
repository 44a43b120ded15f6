use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::mindmap::Node;

/// Where mind maps are stored between sessions.
pub trait GraphPersistence {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<Node>>>;
    fn save(&self, nodes: &[Node]) -> Result<()>;
}

#[derive(Serialize)]
struct SavedMap<'a> {
    nodes: &'a [Node],
}

/// A single JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphPersistence for JsonFile {
    fn load(&self) -> Result<Option<Vec<Node>>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved map");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let nodes = parse_saved_map(&raw)
            .with_context(|| format!("failed to load mind map from {}", self.path.display()))?;
        info!(path = %self.path.display(), nodes = nodes.len(), "loaded mind map");
        Ok(Some(nodes))
    }

    fn save(&self, nodes: &[Node]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&SavedMap { nodes })
            .context("failed to serialize mind map")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), nodes = nodes.len(), "saved mind map");
        Ok(())
    }
}

/// Accepts either a bare node array or an object with a `nodes` array.
/// Tree shape is checked by the graph store, not here.
pub fn parse_saved_map(raw: &str) -> Result<Vec<Node>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON")?;
    let nodes = match parsed {
        Value::Array(_) => parsed,
        Value::Object(mut object) => object
            .remove("nodes")
            .ok_or_else(|| anyhow!("missing `nodes` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for a mind map")),
    };

    let nodes = Vec::<Node>::deserialize(nodes).context("invalid node list")?;
    if nodes.is_empty() {
        return Err(anyhow!("mind map has no nodes"));
    }
    Ok(nodes)
}
