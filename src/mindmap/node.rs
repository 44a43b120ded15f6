use std::f32::consts::TAU;
use std::fmt;

use eframe::egui::{Pos2, pos2};
use serde::{Deserialize, Serialize};

/// Word relation a child node was generated for. The declaration order is
/// the spoke order and must stay stable across releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Derivatives,
    Synonyms,
    Antonyms,
    Collocations,
    Idioms,
    Root,
    Prefix,
    Suffix,
    TopicRelated,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Derivatives,
        Self::Synonyms,
        Self::Antonyms,
        Self::Collocations,
        Self::Idioms,
        Self::Root,
        Self::Prefix,
        Self::Suffix,
        Self::TopicRelated,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or_default()
    }

    /// Direction of this category's spoke, in radians.
    pub fn spoke_angle(self) -> f32 {
        self.index() as f32 * TAU / Self::ALL.len() as f32
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Derivatives => "derivatives",
            Self::Synonyms => "synonyms",
            Self::Antonyms => "antonyms",
            Self::Collocations => "collocations",
            Self::Idioms => "idioms",
            Self::Root => "root",
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
            Self::TopicRelated => "topic-related",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub word: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_center: bool,
}

impl Node {
    pub fn seed(id: NodeId, word: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            x: 0.0,
            y: 0.0,
            parent_id: None,
            category: None,
            is_center: true,
        }
    }

    pub fn child(
        id: NodeId,
        word: impl Into<String>,
        parent: &NodeId,
        category: Category,
        at: Pos2,
    ) -> Self {
        Self {
            id,
            word: word.into(),
            x: at.x,
            y: at.y,
            parent_id: Some(parent.clone()),
            category: Some(category),
            is_center: false,
        }
    }

    pub fn pos(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Issues `node-<n>` ids. Lives outside history snapshots so undo never
/// rewinds it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSeq {
    next: u64,
}

impl IdSeq {
    const PREFIX: &'static str = "node-";

    /// Sequence positioned past every `node-<n>` id already in `nodes`.
    pub fn after(nodes: &[Node]) -> Self {
        let mut seq = Self::default();
        seq.observe(nodes);
        seq
    }

    pub fn observe(&mut self, nodes: &[Node]) {
        let highest = nodes
            .iter()
            .filter_map(|node| node.id.as_str().strip_prefix(Self::PREFIX))
            .filter_map(|serial| serial.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.next = self.next.max(highest.saturating_add(1));
        }
    }

    pub fn issue(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            let id = NodeId::new(format!("{}{}", Self::PREFIX, self.next));
            self.next = self.next.saturating_add(1);
            if !taken(&id) {
                return id;
            }
        }
    }
}
