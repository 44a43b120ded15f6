use std::collections::HashSet;

use super::graph::MindGraph;
use super::node::NodeId;

/// Which nodes render at full opacity.
#[derive(Clone, Debug, PartialEq)]
pub enum Highlight {
    /// Nothing hovered: no dimming.
    Everything,
    /// Hovered node, its ancestors and its whole subtree.
    Lineage(HashSet<NodeId>),
}

impl Highlight {
    pub fn contains(&self, id: &NodeId) -> bool {
        match self {
            Self::Everything => true,
            Self::Lineage(ids) => ids.contains(id),
        }
    }

    pub fn is_dimming(&self) -> bool {
        matches!(self, Self::Lineage(_))
    }
}

/// Recomputed from scratch on every call; callers hold no cache, so a
/// changed hover or node list can never leave stale results behind.
pub fn resolve(graph: &MindGraph, hover: Option<&NodeId>) -> Highlight {
    let Some(hovered) = hover.filter(|id| graph.contains(id)) else {
        return Highlight::Everything;
    };

    let mut lineage = HashSet::from([hovered.clone()]);
    lineage.extend(graph.ancestors(hovered));
    lineage.extend(graph.descendants(hovered));
    Highlight::Lineage(lineage)
}

#[cfg(test)]
mod tests {
    use eframe::egui::Pos2;

    use super::*;
    use crate::mindmap::node::{Category, Node};

    fn child(id: &str, parent: &str) -> Node {
        Node::child(
            NodeId::new(id),
            id,
            &NodeId::new(parent),
            Category::Synonyms,
            Pos2::ZERO,
        )
    }

    // root -> {A, S}, A -> {B, C}, B -> D, S -> T
    fn sample() -> MindGraph {
        MindGraph::from_nodes(vec![
            Node::seed(NodeId::new("root"), "root"),
            child("A", "root"),
            child("S", "root"),
            child("B", "A"),
            child("C", "A"),
            child("D", "B"),
            child("T", "S"),
        ])
        .unwrap()
    }

    fn ids(list: &[&str]) -> HashSet<NodeId> {
        list.iter().map(|id| NodeId::new(*id)).collect()
    }

    #[test]
    fn hovering_a_node_lights_ancestors_self_and_descendants() {
        let graph = sample();
        let highlight = resolve(&graph, Some(&NodeId::new("A")));
        assert_eq!(highlight, Highlight::Lineage(ids(&["root", "A", "B", "C", "D"])));
        assert!(!highlight.contains(&NodeId::new("S")));
        assert!(!highlight.contains(&NodeId::new("T")));
    }

    #[test]
    fn leaf_hover_excludes_siblings() {
        let graph = sample();
        let highlight = resolve(&graph, Some(&NodeId::new("D")));
        assert_eq!(highlight, Highlight::Lineage(ids(&["root", "A", "B", "D"])));
        assert!(!highlight.contains(&NodeId::new("C")));
    }

    #[test]
    fn no_hover_or_stale_hover_dims_nothing() {
        let graph = sample();
        assert_eq!(resolve(&graph, None), Highlight::Everything);
        let stale = resolve(&graph, Some(&NodeId::new("gone")));
        assert!(!stale.is_dimming());
        assert!(stale.contains(&NodeId::new("T")));
    }
}
