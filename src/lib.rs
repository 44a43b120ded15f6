//! Radial vocabulary mind map engine.
//!
//! The [`mindmap`] module holds the layout and interaction core: the graph
//! store, spoke layout, camera, node dragging, hover highlighting and
//! undo history, all driven through the pure [`mindmap::EngineState::reduce`]
//! transition. [`collab`] holds the collaborators the core talks to
//! (persistence, word generation, export) and [`config`] the tunables.

pub mod collab;
pub mod config;
pub mod mindmap;
