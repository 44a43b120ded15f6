use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::mindmap::{MindGraph, Node, NodeId};

/// Read-only view handed to exporters: every node plus the focused one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot<'a> {
    pub nodes: &'a [Node],
    pub center_id: Option<&'a NodeId>,
}

impl<'a> ExportSnapshot<'a> {
    pub fn of(graph: &'a MindGraph) -> Self {
        Self {
            nodes: graph.nodes(),
            center_id: graph.center().map(|node| &node.id),
        }
    }
}

pub trait SnapshotExporter {
    /// Writes the snapshot and returns where it went.
    fn export(&self, snapshot: &ExportSnapshot<'_>) -> Result<PathBuf>;
}

/// Writes `<stem>-<n>.json` files into a directory, never overwriting.
#[derive(Clone, Debug)]
pub struct JsonExporter {
    dir: PathBuf,
    stem: String,
}

impl JsonExporter {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    fn next_free_path(&self) -> PathBuf {
        (1..)
            .map(|n| self.dir.join(format!("{}-{n}.json", self.stem)))
            .find(|path| !path.exists())
            .unwrap_or_else(|| self.dir.join(format!("{}.json", self.stem)))
    }
}

impl SnapshotExporter for JsonExporter {
    fn export(&self, snapshot: &ExportSnapshot<'_>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.next_free_path();
        write_snapshot(&path, snapshot)?;
        info!(path = %path.display(), nodes = snapshot.nodes.len(), "exported snapshot");
        Ok(path)
    }
}

fn write_snapshot(path: &Path, snapshot: &ExportSnapshot<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::mindmap::IdSeq;

    #[test]
    fn snapshot_names_the_center() {
        let graph = MindGraph::seeded("tide", &mut IdSeq::default());
        let json = serde_json::to_value(ExportSnapshot::of(&graph)).unwrap();
        assert_eq!(json["centerId"], Value::from("node-0"));
        assert_eq!(json["nodes"][0]["word"], Value::from("tide"));
    }

    #[test]
    fn exports_never_overwrite() {
        let dir = std::env::temp_dir().join(format!("word-orbit-export-{}", std::process::id()));
        let exporter = JsonExporter::new(&dir, "map");
        let graph = MindGraph::seeded("tide", &mut IdSeq::default());
        let snapshot = ExportSnapshot::of(&graph);

        let first = exporter.export(&snapshot).unwrap();
        let second = exporter.export(&snapshot).unwrap();
        assert_ne!(first, second);
        assert!(first.ends_with("map-1.json"));
        assert!(second.ends_with("map-2.json"));

        let _ = fs::remove_dir_all(&dir);
    }
}
