use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::mindmap::{Category, EngineEvent, GenerationRequest, NodeId};

/// Produces related words for one (word, category) pair. Implementations
/// may be slow; callers run them off the UI thread via
/// [`spawn_generation`].
pub trait WordGenerator: Send + Sync {
    fn generate(&self, word: &str, category: Category) -> Result<Vec<String>>;
}

/// Word list keyed by lowercase headword, loaded from JSON shaped like
/// `{"light": {"synonyms": ["glow"], "antonyms": ["dark"]}}`.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    entries: HashMap<String, BTreeMap<Category, Vec<String>>>,
}

impl Lexicon {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon {}", path.display()))?;
        let lexicon = Self::from_json(&raw)
            .with_context(|| format!("invalid lexicon JSON in {}", path.display()))?;
        info!(path = %path.display(), words = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, BTreeMap<Category, Vec<String>>> = serde_json::from_str(raw)?;
        let entries = parsed
            .into_iter()
            .map(|(word, relations)| (word.trim().to_lowercase(), relations))
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WordGenerator for Lexicon {
    fn generate(&self, word: &str, category: Category) -> Result<Vec<String>> {
        let words = self
            .entries
            .get(&word.trim().to_lowercase())
            .and_then(|relations| relations.get(&category))
            .cloned()
            .unwrap_or_default();
        debug!(word, %category, found = words.len(), "lexicon lookup");
        Ok(words)
    }
}

/// Result of one generation run, ready to hand back to the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReply {
    pub parent: NodeId,
    pub category: Category,
    pub outcome: Result<Vec<String>, String>,
}

impl GenerationReply {
    pub fn into_event(self) -> EngineEvent {
        EngineEvent::GenerationCompleted {
            parent: self.parent,
            category: self.category,
            outcome: self.outcome,
        }
    }
}

/// Runs the generator on a worker thread; poll the receiver each frame.
pub fn spawn_generation(
    generator: Arc<dyn WordGenerator>,
    request: GenerationRequest,
) -> Receiver<GenerationReply> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let outcome = generator
            .generate(&request.parent_word, request.category)
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(GenerationReply {
            parent: request.parent,
            category: request.category,
            outcome,
        });
    });

    rx
}
