use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use eframe::egui::{Pos2, pos2};

use crate::config::EngineConfig;

use super::error::GraphError;
use super::layout::{SpokeStart, estimate_width, place_on_spoke};
use super::node::{Category, IdSeq, Node, NodeId};

/// Immutable node arena. Cloning is cheap; every mutation produces a new
/// value and leaves the old one intact for history.
#[derive(Clone, Debug, Default)]
pub struct MindGraph {
    nodes: Arc<Vec<Node>>,
    index_by_id: Arc<HashMap<NodeId, usize>>,
}

impl PartialEq for MindGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    ReplaceAll(Vec<Node>),
    AddBatch {
        parent: NodeId,
        category: Category,
        words: Vec<String>,
    },
    AddSingle {
        parent: NodeId,
        category: Category,
        word: String,
    },
    Delete(NodeId),
    Move {
        node: NodeId,
        x: f32,
        y: f32,
    },
    Rename {
        node: NodeId,
        word: String,
    },
    Recenter(NodeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub category: Option<Category>,
}

/// Farthest member of one (parent, category) group; anchors "add more".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontierEdge {
    pub parent: NodeId,
    pub frontier: NodeId,
    pub category: Category,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub depth: usize,
    pub per_category: BTreeMap<Category, usize>,
}

impl MindGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded(word: &str, ids: &mut IdSeq) -> Self {
        let id = ids.issue(|_| false);
        Self::from_trusted(vec![Node::seed(id, word.trim())])
    }

    /// Validates an externally supplied node list. A list with no center
    /// flag gets its root promoted to center. An empty list is refused.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Result<Self, GraphError> {
        if nodes.is_empty() {
            return Err(GraphError::Empty);
        }
        if !nodes.iter().any(|node| node.is_center) {
            for node in nodes.iter_mut().filter(|node| node.is_root()) {
                node.is_center = true;
            }
        }

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if index_by_id.insert(node.id.clone(), index).is_some() {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
        }

        let graph = Self {
            nodes: Arc::new(nodes),
            index_by_id: Arc::new(index_by_id),
        };
        graph.check_invariants()?;
        Ok(graph)
    }

    fn from_trusted(nodes: Vec<Node>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        Self {
            nodes: Arc::new(nodes),
            index_by_id: Arc::new(index_by_id),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.nodes.get(index))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn center(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_center)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    /// True when both values are the same snapshot, i.e. a mutation was a
    /// no-op.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    pub fn children_of(&self) -> HashMap<&NodeId, Vec<&NodeId>> {
        let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for node in self.nodes.iter() {
            if let Some(parent) = &node.parent_id {
                children.entry(parent).or_default().push(&node.id);
            }
        }
        children
    }

    /// Every node below `id`, breadth first. Excludes `id` itself.
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let children = self.children_of();
        let mut found = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            let Some(next) = children.get(current) else {
                continue;
            };
            for &child in next {
                if visited.insert(child) {
                    found.push(child.clone());
                    queue.push_back(child);
                }
            }
        }

        found
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut cursor = self.get(id).and_then(|node| node.parent_id.as_ref());

        while let Some(parent_id) = cursor {
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            chain.push(parent.id.clone());
            cursor = parent.parent_id.as_ref();
        }

        chain
    }

    pub fn group<'a, 'b>(
        &'a self,
        parent: &'b NodeId,
        category: Category,
    ) -> impl Iterator<Item = &'a Node> + use<'a, 'b> {
        self.nodes.iter().filter(move |node| {
            node.category == Some(category) && node.parent_id.as_ref() == Some(parent)
        })
    }

    pub fn frontier(&self, parent: &NodeId, category: Category) -> Option<&Node> {
        let origin = self.get(parent)?.pos();
        self.group(parent, category)
            .max_by(|a, b| origin.distance(a.pos()).total_cmp(&origin.distance(b.pos())))
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .filter_map(|node| {
                let parent = node.parent_id.as_ref()?;
                self.contains(parent).then(|| Edge {
                    from: parent.clone(),
                    to: node.id.clone(),
                    category: node.category,
                })
            })
            .collect()
    }

    pub fn frontier_edges(&self) -> Vec<FrontierEdge> {
        let mut farthest: BTreeMap<(&NodeId, Category), (&Node, f32)> = BTreeMap::new();
        for node in self.nodes.iter() {
            let (Some(parent_id), Some(category)) = (&node.parent_id, node.category) else {
                continue;
            };
            let Some(parent) = self.get(parent_id) else {
                continue;
            };

            let distance = parent.pos().distance(node.pos());
            let entry = farthest
                .entry((parent_id, category))
                .or_insert((node, distance));
            if distance >= entry.1 {
                *entry = (node, distance);
            }
        }

        farthest
            .into_iter()
            .map(|((parent, category), (node, _))| FrontierEdge {
                parent: parent.clone(),
                frontier: node.id.clone(),
                category,
            })
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let mut per_category = BTreeMap::new();
        for category in self.nodes.iter().filter_map(|node| node.category) {
            *per_category.entry(category).or_insert(0) += 1;
        }

        let depth = self
            .nodes
            .iter()
            .map(|node| self.ancestors(&node.id).len())
            .max()
            .unwrap_or(0);

        GraphStats {
            node_count: self.nodes.len(),
            depth,
            per_category,
        }
    }

    pub fn check_invariants(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        if self.index_by_id.len() != self.nodes.len() {
            let mut seen = HashSet::new();
            if let Some(duplicate) = self.nodes.iter().find(|node| !seen.insert(&node.id)) {
                return Err(GraphError::DuplicateId(duplicate.id.clone()));
            }
        }

        let roots = self
            .nodes
            .iter()
            .filter(|node| node.is_root())
            .collect::<Vec<_>>();
        let [root] = roots.as_slice() else {
            return Err(GraphError::RootCount(roots.len()));
        };

        let centers = self.nodes.iter().filter(|node| node.is_center).count();
        if centers != 1 {
            return Err(GraphError::CenterCount(centers));
        }

        for node in self.nodes.iter() {
            match (node.is_root(), node.category) {
                (true, Some(_)) => return Err(GraphError::CategorizedRoot(node.id.clone())),
                (false, None) => return Err(GraphError::MissingCategory(node.id.clone())),
                _ => {}
            }
        }

        let reachable = self.descendants(&root.id).len() + 1;
        if reachable != self.nodes.len() {
            let mut visited = self.descendants(&root.id).into_iter().collect::<HashSet<_>>();
            visited.insert(root.id.clone());
            if let Some(stray) = self.nodes.iter().find(|node| !visited.contains(&node.id)) {
                return Err(GraphError::Unreachable(stray.id.clone()));
            }
        }

        Ok(())
    }

    /// Applies one mutation atomically: either a complete new graph or an
    /// error with `self` untouched. A no-op returns a clone that
    /// [`shares_storage`](Self::shares_storage) with `self`.
    pub fn apply(
        &self,
        mutation: Mutation,
        config: &EngineConfig,
        ids: &mut IdSeq,
    ) -> Result<Self, GraphError> {
        match mutation {
            Mutation::ReplaceAll(nodes) => {
                let graph = Self::from_nodes(nodes)?;
                ids.observe(graph.nodes());
                Ok(graph)
            }
            Mutation::AddBatch {
                parent,
                category,
                words,
            } => self.add_words(&parent, category, words, config, ids),
            Mutation::AddSingle {
                parent,
                category,
                word,
            } => self.add_words(&parent, category, vec![word], config, ids),
            Mutation::Delete(id) => self.delete(&id),
            Mutation::Move { node, x, y } => self.move_node(&node, pos2(x, y)),
            Mutation::Rename { node, word } => self.rename(&node, &word),
            Mutation::Recenter(id) => self.recenter(&id),
        }
    }

    fn add_words(
        &self,
        parent_id: &NodeId,
        category: Category,
        words: Vec<String>,
        config: &EngineConfig,
        ids: &mut IdSeq,
    ) -> Result<Self, GraphError> {
        let parent = self
            .get(parent_id)
            .ok_or_else(|| GraphError::UnknownNode(parent_id.clone()))?;

        let existing = self.group(parent_id, category).map(|node| node.word.as_str());
        let words = normalize_words(&parent.word, existing, words);
        if words.is_empty() {
            return Err(GraphError::Empty);
        }

        let limit = config.max_total_nodes;
        if self.nodes.len() + words.len() > limit {
            return Err(GraphError::Capacity {
                limit,
                current: self.nodes.len(),
                requested: words.len(),
            });
        }

        let start = match self.frontier(parent_id, category) {
            Some(frontier) => SpokeStart::After {
                radius: parent.pos().distance(frontier.pos()),
                width: estimate_width(&frontier.word, &config.layout),
            },
            None => SpokeStart::Fresh,
        };
        let positions = place_on_spoke(parent.pos(), category, &words, start, &config.layout);

        let mut nodes = Vec::with_capacity(self.nodes.len() + words.len());
        nodes.extend(self.nodes.iter().cloned());
        for (word, position) in words.into_iter().zip(positions) {
            let id = ids.issue(|candidate| self.contains(candidate));
            nodes.push(Node::child(id, word, parent_id, category, position));
        }

        Ok(Self::from_trusted(nodes))
    }

    fn delete(&self, id: &NodeId) -> Result<Self, GraphError> {
        let Some(target) = self.get(id) else {
            return Ok(self.clone());
        };
        let Some(parent_id) = target.parent_id.clone() else {
            return Err(GraphError::RootDeletion);
        };

        let mut removed = self.descendants(id).into_iter().collect::<HashSet<_>>();
        removed.insert(id.clone());
        let center_removed = self
            .nodes
            .iter()
            .any(|node| node.is_center && removed.contains(&node.id));

        let nodes = self
            .nodes
            .iter()
            .filter(|node| !removed.contains(&node.id))
            .cloned()
            .map(|mut node| {
                if center_removed && node.id == parent_id {
                    node.is_center = true;
                }
                node
            })
            .collect();

        Ok(Self::from_trusted(nodes))
    }

    fn move_node(&self, id: &NodeId, to: Pos2) -> Result<Self, GraphError> {
        let index = self.index_of(id)?;
        let mut nodes = self.nodes.as_ref().clone();
        nodes[index].x = to.x;
        nodes[index].y = to.y;
        Ok(Self::from_trusted(nodes))
    }

    fn rename(&self, id: &NodeId, word: &str) -> Result<Self, GraphError> {
        let index = self.index_of(id)?;
        let word = word.trim();
        if word.is_empty() {
            return Err(GraphError::BlankWord);
        }
        if self.nodes[index].word == word {
            return Ok(self.clone());
        }

        let mut nodes = self.nodes.as_ref().clone();
        nodes[index].word = word.to_owned();
        Ok(Self::from_trusted(nodes))
    }

    fn recenter(&self, id: &NodeId) -> Result<Self, GraphError> {
        let index = self.index_of(id)?;
        if self.nodes[index].is_center {
            return Ok(self.clone());
        }

        let nodes = self
            .nodes
            .iter()
            .cloned()
            .map(|mut node| {
                node.is_center = &node.id == id;
                node
            })
            .collect();
        Ok(Self::from_trusted(nodes))
    }

    fn index_of(&self, id: &NodeId) -> Result<usize, GraphError> {
        self.index_by_id
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))
    }
}

/// Trims, drops blanks and removes case-insensitive repeats, keeping first
/// occurrence order. The parent's own word and `existing` (words already on
/// the spoke) count as seen.
pub fn normalize_words<'a>(
    parent_word: &str,
    existing: impl IntoIterator<Item = &'a str>,
    words: Vec<String>,
) -> Vec<String> {
    let mut seen = existing
        .into_iter()
        .map(|word| word.trim().to_lowercase())
        .collect::<HashSet<_>>();
    seen.insert(parent_word.trim().to_lowercase());
    words
        .into_iter()
        .filter_map(|word| {
            let word = word.trim();
            if word.is_empty() || !seen.insert(word.to_lowercase()) {
                return None;
            }
            Some(word.to_owned())
        })
        .collect()
}
