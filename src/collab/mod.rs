//! Collaborators the engine core hands work to: persistence, word
//! generation and snapshot export.

mod export;
mod generate;
mod persist;

pub use export::{ExportSnapshot, JsonExporter, SnapshotExporter};
pub use generate::{GenerationReply, Lexicon, WordGenerator, spawn_generation};
pub use persist::{GraphPersistence, JsonFile, parse_saved_map};
