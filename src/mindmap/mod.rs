//! Layout and interaction core of the mind map.
//!
//! Nothing in here touches the UI toolkit beyond its geometry types; the
//! binary feeds [`EngineEvent`]s in and renders whatever [`EngineState`]
//! comes back.

mod drag;
mod engine;
mod error;
mod graph;
mod highlight;
mod history;
mod layout;
mod node;
mod viewport;

pub use drag::{DragOutcome, NodeDrag};
pub use engine::{
    Effect, EngineEvent, EngineState, GenerationRequest, HitTarget, Interaction, Step,
};
pub use error::{AddNodesError, AddNodesReason, GraphError};
pub use graph::{Edge, FrontierEdge, GraphStats, MindGraph, Mutation, normalize_words};
pub use highlight::{Highlight, resolve as resolve_highlight};
pub use history::History;
pub use layout::{SpokeStart, estimate_width, place_on_spoke, spoke_direction, spoke_radii};
pub use node::{Category, IdSeq, Node, NodeId};
pub use viewport::{Gesture, Pinch, TouchPhase, Viewport};
