use std::sync::Arc;

use eframe::egui::{Pos2, Vec2};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;

use super::drag::{DragOutcome, NodeDrag};
use super::error::{AddNodesError, GraphError};
use super::graph::{MindGraph, Mutation};
use super::highlight::{self, Highlight};
use super::history::History;
use super::node::{Category, IdSeq, Node, NodeId};
use super::viewport::{Gesture, TouchPhase, Viewport};

/// What a pointer or the first touch landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Canvas,
    NodeBody(NodeId),
    /// Delete/add buttons drawn on a node. Never starts a gesture.
    NodeControl(NodeId),
}

/// Camera gestures and node drags share one slot, so at most one of them
/// is ever live.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Camera(Gesture),
    Dragging(NodeDrag),
}

impl Default for Interaction {
    fn default() -> Self {
        Self::Camera(Gesture::Idle)
    }
}

/// Inputs to [`EngineState::reduce`]. Positions are canvas-local screen
/// pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Resize {
        size: Vec2,
    },
    PointerDown {
        pos: Pos2,
        target: HitTarget,
    },
    PointerMove {
        pos: Pos2,
    },
    PointerUp,
    PointerLeave,
    /// Positive `delta` zooms in.
    Wheel {
        pos: Pos2,
        delta: f32,
    },
    /// `touches` holds every point still down after the change.
    TouchStart {
        touches: Vec<Pos2>,
        target: HitTarget,
    },
    TouchMove {
        touches: Vec<Pos2>,
    },
    TouchEnd {
        touches: Vec<Pos2>,
    },
    Hover(Option<NodeId>),
    RequestExpansion {
        parent: NodeId,
        category: Category,
    },
    GenerationCompleted {
        parent: NodeId,
        category: Category,
        outcome: Result<Vec<String>, String>,
    },
    AddWord {
        parent: NodeId,
        category: Category,
        word: String,
    },
    DeleteNode(NodeId),
    RenameNode {
        node: NodeId,
        word: String,
    },
    Recenter(NodeId),
    Undo,
    Redo,
    ResetView,
    /// Replaces the whole map and starts a fresh history.
    Loaded(Vec<Node>),
    Saved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub parent: NodeId,
    pub parent_word: String,
    pub category: Category,
}

/// Work the caller must carry out after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Generate(GenerationRequest),
    NodeClicked(NodeId),
    AddRejected(AddNodesError),
}

#[derive(Clone, Debug)]
pub struct Step {
    pub state: EngineState,
    pub effect: Option<Effect>,
}

/// Everything the renderer needs for one frame. Transitions never mutate
/// a state in place; [`reduce`](Self::reduce) returns the successor.
#[derive(Clone, Debug)]
pub struct EngineState {
    config: Arc<EngineConfig>,
    graph: MindGraph,
    history: History,
    viewport: Viewport,
    interaction: Interaction,
    hover: Option<NodeId>,
    canvas: Vec2,
    ids: IdSeq,
}

impl EngineState {
    pub fn new(config: EngineConfig, graph: MindGraph) -> Self {
        warn_if_over_capacity(&graph, &config);
        let history = History::new(graph.clone(), config.history.depth);
        Self {
            ids: IdSeq::after(graph.nodes()),
            config: Arc::new(config),
            graph,
            history,
            viewport: Viewport::default(),
            interaction: Interaction::default(),
            hover: None,
            canvas: Vec2::ZERO,
        }
    }

    pub fn seeded(config: EngineConfig, word: &str) -> Self {
        let graph = MindGraph::seeded(word, &mut IdSeq::default());
        Self::new(config, graph)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &MindGraph {
        &self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn hover(&self) -> Option<&NodeId> {
        self.hover.as_ref()
    }

    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn highlight(&self) -> Highlight {
        highlight::resolve(&self.graph, self.hover.as_ref())
    }

    /// Committed position, or the live preview for the node being dragged.
    pub fn display_position(&self, node: &Node) -> Pos2 {
        match &self.interaction {
            Interaction::Dragging(drag) if drag.node == node.id => drag.preview(),
            _ => node.pos(),
        }
    }

    pub fn reduce(&self, event: EngineEvent) -> Step {
        let mut next = self.clone();
        let effect = next.handle(event);
        Step {
            state: next,
            effect,
        }
    }

    fn handle(&mut self, event: EngineEvent) -> Option<Effect> {
        match event {
            EngineEvent::Resize { size } => {
                let first_layout = self.canvas == Vec2::ZERO;
                self.canvas = size;
                if first_layout {
                    self.reset_view();
                }
                None
            }
            EngineEvent::PointerDown { pos, target } => {
                self.interaction = self.begin_interaction(pos, &target);
                None
            }
            EngineEvent::PointerMove { pos } => {
                match &self.interaction {
                    Interaction::Dragging(drag) => {
                        self.interaction =
                            Interaction::Dragging(drag.update(pos, self.viewport.zoom));
                    }
                    Interaction::Camera(gesture) => {
                        self.viewport = gesture.pan_to(&self.viewport, pos);
                    }
                }
                None
            }
            EngineEvent::PointerUp => self.release(),
            EngineEvent::PointerLeave => {
                self.hover = None;
                self.release()
            }
            EngineEvent::Wheel { pos, delta } => {
                self.wheel(pos, delta);
                None
            }
            EngineEvent::TouchStart { touches, target } => self.touch_start(touches, target),
            EngineEvent::TouchMove { touches } => {
                match &self.interaction {
                    Interaction::Dragging(drag) => {
                        if let [point] = touches.as_slice() {
                            self.interaction =
                                Interaction::Dragging(drag.update(*point, self.viewport.zoom));
                        } else {
                            self.interaction = Interaction::default();
                        }
                    }
                    Interaction::Camera(gesture) => {
                        self.apply_touch(*gesture, TouchPhase::Move, &touches);
                    }
                }
                None
            }
            EngineEvent::TouchEnd { touches } => match &self.interaction {
                Interaction::Dragging(_) if touches.is_empty() => self.release(),
                Interaction::Dragging(_) => {
                    self.interaction = Interaction::default();
                    None
                }
                Interaction::Camera(gesture) => {
                    self.apply_touch(*gesture, TouchPhase::End, &touches);
                    None
                }
            },
            EngineEvent::Hover(hover) => {
                self.hover = hover;
                None
            }
            EngineEvent::RequestExpansion { parent, category } => {
                self.request_expansion(parent, category)
            }
            EngineEvent::GenerationCompleted {
                parent,
                category,
                outcome,
            } => match outcome {
                Ok(words) => self.add(Mutation::AddBatch {
                    parent,
                    category,
                    words,
                }),
                Err(error) => {
                    warn!(%parent, %category, %error, "word generation failed");
                    Some(Effect::AddRejected(AddNodesError::Empty))
                }
            },
            EngineEvent::AddWord {
                parent,
                category,
                word,
            } => self.add(Mutation::AddSingle {
                parent,
                category,
                word,
            }),
            EngineEvent::DeleteNode(id) => {
                self.edit(Mutation::Delete(id));
                None
            }
            EngineEvent::RenameNode { node, word } => {
                self.edit(Mutation::Rename { node, word });
                None
            }
            EngineEvent::Recenter(id) => {
                self.edit(Mutation::Recenter(id.clone()));
                if let Some(node) = self.graph.get(&id) {
                    self.viewport = self.viewport.centered_on(node.pos(), self.canvas);
                }
                None
            }
            EngineEvent::Undo => {
                if let Some(snapshot) = self.history.undo() {
                    self.graph = snapshot.clone();
                    self.after_time_travel("undo");
                }
                None
            }
            EngineEvent::Redo => {
                if let Some(snapshot) = self.history.redo() {
                    self.graph = snapshot.clone();
                    self.after_time_travel("redo");
                }
                None
            }
            EngineEvent::ResetView => {
                self.reset_view();
                None
            }
            EngineEvent::Loaded(nodes) => {
                match self
                    .graph
                    .apply(Mutation::ReplaceAll(nodes), &self.config, &mut self.ids)
                {
                    Ok(graph) => {
                        info!(nodes = graph.len(), "graph loaded");
                        warn_if_over_capacity(&graph, &self.config);
                        self.history.reset(graph.clone());
                        self.graph = graph;
                        self.hover = None;
                        self.interaction = Interaction::default();
                        self.reset_view();
                    }
                    Err(error) => warn!(%error, "loaded map rejected"),
                }
                None
            }
            EngineEvent::Saved => {
                if self.config.history.clear_on_save {
                    debug!("collapsing history at save checkpoint");
                    self.history.clear();
                }
                None
            }
        }
    }

    fn begin_interaction(&self, pos: Pos2, target: &HitTarget) -> Interaction {
        match target {
            HitTarget::NodeBody(id) => match self.graph.get(id) {
                Some(node) => Interaction::Dragging(NodeDrag::begin(node, pos)),
                None => Interaction::Camera(Gesture::begin_pan(&self.viewport, pos)),
            },
            HitTarget::Canvas => Interaction::Camera(Gesture::begin_pan(&self.viewport, pos)),
            HitTarget::NodeControl(_) => Interaction::default(),
        }
    }

    /// Zooms around `pos` and re-anchors whatever gesture is live so the
    /// next move continues from the new camera. Ignored mid-pinch.
    fn wheel(&mut self, pos: Pos2, delta: f32) {
        if matches!(self.interaction, Interaction::Camera(Gesture::Pinching(_))) {
            return;
        }

        self.viewport = self.viewport.wheel(pos, delta, &self.config.camera);
        self.interaction = match &self.interaction {
            Interaction::Camera(Gesture::Panning { .. }) => {
                Interaction::Camera(Gesture::begin_pan(&self.viewport, pos))
            }
            Interaction::Dragging(drag) => {
                Interaction::Dragging(drag.rezoomed(pos, self.viewport.zoom))
            }
            Interaction::Camera(gesture) => Interaction::Camera(*gesture),
        };
    }

    fn touch_start(&mut self, touches: Vec<Pos2>, target: HitTarget) -> Option<Effect> {
        match (&self.interaction, touches.as_slice()) {
            (Interaction::Dragging(_), _) => {
                debug!(touches = touches.len(), "extra touch during node drag, cancelling");
                self.interaction = Interaction::default();
            }
            (Interaction::Camera(Gesture::Idle), [point]) => {
                self.interaction = self.begin_interaction(*point, &target);
            }
            (Interaction::Camera(gesture), _) => {
                self.apply_touch(*gesture, TouchPhase::Start, &touches);
            }
        }
        None
    }

    fn apply_touch(&mut self, gesture: Gesture, phase: TouchPhase, touches: &[Pos2]) {
        let (gesture, viewport) =
            gesture.on_touch(&self.viewport, phase, touches, &self.config.camera);
        self.interaction = Interaction::Camera(gesture);
        self.viewport = viewport;
    }

    fn release(&mut self) -> Option<Effect> {
        let interaction = std::mem::take(&mut self.interaction);
        let Interaction::Dragging(drag) = interaction else {
            return None;
        };

        match drag.finish() {
            DragOutcome::Click(id) => Some(Effect::NodeClicked(id)),
            DragOutcome::Commit { node, to } => {
                self.edit(Mutation::Move {
                    node,
                    x: to.x,
                    y: to.y,
                });
                None
            }
        }
    }

    fn request_expansion(&mut self, parent: NodeId, category: Category) -> Option<Effect> {
        let Some(node) = self.graph.get(&parent) else {
            return Some(Effect::AddRejected(AddNodesError::Invalid(
                GraphError::UnknownNode(parent),
            )));
        };

        let limit = self.config.max_total_nodes;
        if self.graph.len() >= limit {
            info!(limit, "expansion refused, node limit reached");
            return Some(Effect::AddRejected(AddNodesError::Capacity { limit }));
        }

        info!(parent = %node.word, %category, "requesting words");
        Some(Effect::Generate(GenerationRequest {
            parent_word: node.word.clone(),
            parent,
            category,
        }))
    }

    /// Applies a mutation and records it. Returns false when nothing changed.
    fn commit(&mut self, mutation: Mutation) -> Result<bool, GraphError> {
        let next = self.graph.apply(mutation, &self.config, &mut self.ids)?;
        if next.shares_storage(&self.graph) {
            return Ok(false);
        }

        self.graph = next;
        self.history.push(self.graph.clone());
        self.drop_stale_references();
        Ok(true)
    }

    fn add(&mut self, mutation: Mutation) -> Option<Effect> {
        let before = self.graph.len();
        match self.commit(mutation) {
            Ok(_) => {
                info!(added = self.graph.len() - before, total = self.graph.len(), "nodes added");
                None
            }
            Err(error) => {
                warn!(%error, "nodes not added");
                Some(Effect::AddRejected(error.into()))
            }
        }
    }

    fn edit(&mut self, mutation: Mutation) -> bool {
        match self.commit(mutation) {
            Ok(changed) => changed,
            Err(error) => {
                debug!(%error, "mutation rejected");
                false
            }
        }
    }

    fn after_time_travel(&mut self, direction: &str) {
        debug!(
            direction,
            cursor = self.history.cursor(),
            len = self.history.len(),
            "history moved"
        );
        self.drop_stale_references();
    }

    fn drop_stale_references(&mut self) {
        if self.hover.as_ref().is_some_and(|id| !self.graph.contains(id)) {
            self.hover = None;
        }
        if let Interaction::Dragging(drag) = &self.interaction
            && !self.graph.contains(&drag.node)
        {
            self.interaction = Interaction::default();
        }
    }

    fn reset_view(&mut self) {
        let focus = self.graph.center().map(Node::pos).unwrap_or(Pos2::ZERO);
        self.viewport = Viewport::reset(focus, self.canvas, &self.config.camera);
    }
}

/// Oversized maps still load; expansion stays refused until nodes are
/// deleted.
fn warn_if_over_capacity(graph: &MindGraph, config: &EngineConfig) -> bool {
    let over = graph.len() > config.max_total_nodes;
    if over {
        warn!(
            nodes = graph.len(),
            limit = config.max_total_nodes,
            "loaded map exceeds the node limit"
        );
    }
    over
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::mindmap::error::AddNodesReason;

    fn engine() -> EngineState {
        EngineState::seeded(EngineConfig::default(), "light")
            .reduce(EngineEvent::Resize {
                size: vec2(800.0, 600.0),
            })
            .state
    }

    fn root(state: &EngineState) -> NodeId {
        state.graph().root().map(|node| node.id.clone()).unwrap()
    }

    fn grow(state: &EngineState, parent: &NodeId, category: Category, words: &[&str]) -> EngineState {
        state
            .reduce(EngineEvent::GenerationCompleted {
                parent: parent.clone(),
                category,
                outcome: Ok(words.iter().map(|word| (*word).to_owned()).collect()),
            })
            .state
    }

    fn id_of(state: &EngineState, word: &str) -> NodeId {
        state
            .graph()
            .nodes()
            .iter()
            .find(|node| node.word == word)
            .map(|node| node.id.clone())
            .unwrap()
    }

    #[test]
    fn first_resize_centers_the_seed() {
        let state = engine();
        let screen = state.viewport().world_to_screen(Pos2::ZERO);
        assert_eq!(screen, pos2(400.0, 300.0));
    }

    #[test]
    fn expansion_request_asks_for_generation() {
        let state = engine();
        let step = state.reduce(EngineEvent::RequestExpansion {
            parent: root(&state),
            category: Category::Synonyms,
        });
        assert_eq!(
            step.effect,
            Some(Effect::Generate(GenerationRequest {
                parent: root(&state),
                parent_word: "light".to_owned(),
                category: Category::Synonyms,
            }))
        );
        assert_eq!(step.state.graph().len(), 1);
    }

    #[test]
    fn completed_generation_adds_one_history_entry() {
        let state = engine();
        let grown = grow(&state, &root(&state), Category::Antonyms, &["dark", "heavy"]);
        assert_eq!(grown.graph().len(), 3);
        assert_eq!(grown.history().len(), 2);
        assert_eq!(state.graph().len(), 1);
    }

    #[test]
    fn empty_generation_changes_nothing() {
        let state = engine();
        let step = state.reduce(EngineEvent::GenerationCompleted {
            parent: root(&state),
            category: Category::Idioms,
            outcome: Ok(Vec::new()),
        });
        assert_eq!(step.effect, Some(Effect::AddRejected(AddNodesError::Empty)));
        assert_eq!(step.state.graph().len(), state.graph().len());
        assert_eq!(step.state.history().len(), state.history().len());

        let failed = state.reduce(EngineEvent::GenerationCompleted {
            parent: root(&state),
            category: Category::Idioms,
            outcome: Err("timeout".to_owned()),
        });
        assert_eq!(failed.effect, Some(Effect::AddRejected(AddNodesError::Empty)));
        assert_eq!(failed.state.history().len(), 1);
    }

    #[test]
    fn capacity_rejects_requests_and_oversized_batches() {
        let config = EngineConfig {
            max_total_nodes: 3,
            ..EngineConfig::default()
        };
        let state = EngineState::seeded(config, "light");
        let parent = root(&state);

        let oversized = state.reduce(EngineEvent::GenerationCompleted {
            parent: parent.clone(),
            category: Category::Root,
            outcome: Ok(vec!["a".into(), "b".into(), "c".into()]),
        });
        let Some(Effect::AddRejected(error)) = oversized.effect else {
            panic!("expected rejection");
        };
        assert_eq!(error.reason(), AddNodesReason::Capacity);
        assert_eq!(oversized.state.graph().len(), 1);

        let full = grow(&state, &parent, Category::Root, &["a", "b"]);
        let step = full.reduce(EngineEvent::RequestExpansion {
            parent,
            category: Category::Prefix,
        });
        assert_eq!(
            step.effect,
            Some(Effect::AddRejected(AddNodesError::Capacity { limit: 3 }))
        );
    }

    #[test]
    fn unknown_parent_is_reported_as_invalid() {
        let state = engine();
        let step = state.reduce(EngineEvent::AddWord {
            parent: NodeId::new("ghost"),
            category: Category::Suffix,
            word: "ness".to_owned(),
        });
        let Some(Effect::AddRejected(error)) = step.effect else {
            panic!("expected rejection");
        };
        assert_eq!(error.reason(), AddNodesReason::Invalid);
        assert_eq!(step.state.history().len(), 1);
    }

    #[test]
    fn dragging_a_node_previews_then_commits() {
        let state = engine();
        let state = grow(&state, &root(&state), Category::Derivatives, &["lighten"]);
        let child = id_of(&state, "lighten");
        let start = state.viewport().world_to_screen(state.graph().get(&child).unwrap().pos());
        let pan = state.viewport().pan;

        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: start,
                target: HitTarget::NodeBody(child.clone()),
            })
            .state;
        let state = state
            .reduce(EngineEvent::PointerMove {
                pos: start + vec2(30.0, -20.0),
            })
            .state;

        let node = state.graph().get(&child).unwrap().clone();
        assert_eq!(node.pos(), pos2(250.0, 0.0));
        assert_eq!(state.display_position(&node), pos2(280.0, -20.0));
        assert_eq!(state.viewport().pan, pan, "canvas must not pan during a drag");

        let step = state.reduce(EngineEvent::PointerUp);
        assert_eq!(step.effect, None);
        let moved = step.state.graph().get(&child).unwrap();
        assert_eq!(moved.pos(), pos2(280.0, -20.0));
        assert_eq!(step.state.history().len(), 3);
        assert_eq!(step.state.interaction(), &Interaction::default());
    }

    #[test]
    fn pressing_and_releasing_in_place_is_a_click() {
        let state = engine();
        let center = root(&state);
        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: pos2(400.0, 300.0),
                target: HitTarget::NodeBody(center.clone()),
            })
            .state;
        let step = state.reduce(EngineEvent::PointerUp);
        assert_eq!(step.effect, Some(Effect::NodeClicked(center)));
        assert_eq!(step.state.history().len(), 1);
    }

    #[test]
    fn node_controls_never_start_a_gesture() {
        let state = engine();
        let pan = state.viewport().pan;
        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: pos2(10.0, 10.0),
                target: HitTarget::NodeControl(root(&state)),
            })
            .state;
        let state = state
            .reduce(EngineEvent::PointerMove {
                pos: pos2(90.0, 90.0),
            })
            .state;
        assert_eq!(state.viewport().pan, pan);
    }

    #[test]
    fn canvas_drag_pans_until_release() {
        let state = engine();
        let pan = state.viewport().pan;
        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: pos2(100.0, 100.0),
                target: HitTarget::Canvas,
            })
            .state;
        let state = state
            .reduce(EngineEvent::PointerMove {
                pos: pos2(150.0, 80.0),
            })
            .state;
        assert_eq!(state.viewport().pan, pan + vec2(50.0, -20.0));

        let state = state.reduce(EngineEvent::PointerLeave).state;
        let state = state
            .reduce(EngineEvent::PointerMove {
                pos: pos2(500.0, 500.0),
            })
            .state;
        assert_eq!(state.viewport().pan, pan + vec2(50.0, -20.0));
    }

    #[test]
    fn wheel_during_a_pan_keeps_the_focal_point_on_the_next_move() {
        let state = engine();
        let pointer = pos2(100.0, 100.0);
        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: pointer,
                target: HitTarget::Canvas,
            })
            .state;
        let before = state.viewport().screen_to_world(pointer);

        let state = state
            .reduce(EngineEvent::Wheel {
                pos: pointer,
                delta: 1.0,
            })
            .state;
        assert!(state.viewport().screen_to_world(pointer).distance(before) < 1e-3);

        let state = state.reduce(EngineEvent::PointerMove { pos: pointer }).state;
        assert!(state.viewport().screen_to_world(pointer).distance(before) < 1e-3);
        assert!((state.viewport().zoom - 1.1).abs() < 1e-5);

        let state = state
            .reduce(EngineEvent::PointerMove {
                pos: pointer + vec2(20.0, 0.0),
            })
            .state;
        let shifted = state.viewport().screen_to_world(pointer + vec2(20.0, 0.0));
        assert!(shifted.distance(before) < 1e-3);
    }

    #[test]
    fn wheel_during_a_node_drag_keeps_the_preview() {
        let state = engine();
        let center = root(&state);
        let start = pos2(400.0, 300.0);
        let state = state
            .reduce(EngineEvent::PointerDown {
                pos: start,
                target: HitTarget::NodeBody(center.clone()),
            })
            .state;
        let held = start + vec2(40.0, 0.0);
        let state = state.reduce(EngineEvent::PointerMove { pos: held }).state;
        let node = state.graph().get(&center).unwrap().clone();
        assert_eq!(state.display_position(&node), pos2(40.0, 0.0));

        let state = state
            .reduce(EngineEvent::Wheel {
                pos: held,
                delta: 1.0,
            })
            .state;
        let state = state.reduce(EngineEvent::PointerMove { pos: held }).state;
        assert!(state.display_position(&node).distance(pos2(40.0, 0.0)) < 1e-4);

        let step = state.reduce(EngineEvent::PointerUp);
        let moved = step.state.graph().get(&center).unwrap().pos();
        assert!(moved.distance(pos2(40.0, 0.0)) < 1e-4);
    }

    #[test]
    fn single_touch_on_a_node_drags_and_second_finger_cancels() {
        let state = engine();
        let center = root(&state);
        let state = state
            .reduce(EngineEvent::TouchStart {
                touches: vec![pos2(400.0, 300.0)],
                target: HitTarget::NodeBody(center.clone()),
            })
            .state;
        assert!(matches!(state.interaction(), Interaction::Dragging(_)));

        let state = state
            .reduce(EngineEvent::TouchStart {
                touches: vec![pos2(400.0, 300.0), pos2(500.0, 300.0)],
                target: HitTarget::Canvas,
            })
            .state;
        assert_eq!(state.interaction(), &Interaction::default());
        assert_eq!(state.graph().get(&center).unwrap().pos(), Pos2::ZERO);
    }

    #[test]
    fn pinch_zooms_around_the_touch_midpoint() {
        let state = engine();
        let touches = vec![pos2(350.0, 300.0), pos2(450.0, 300.0)];
        let state = state
            .reduce(EngineEvent::TouchStart {
                touches,
                target: HitTarget::Canvas,
            })
            .state;
        let state = state
            .reduce(EngineEvent::TouchMove {
                touches: vec![pos2(325.0, 300.0), pos2(475.0, 300.0)],
            })
            .state;
        assert!((state.viewport().zoom - 1.5).abs() < 1e-5);
        let world = state.viewport().screen_to_world(pos2(400.0, 300.0));
        assert!(world.distance(Pos2::ZERO) < 1e-3);

        let state = state
            .reduce(EngineEvent::TouchEnd {
                touches: vec![pos2(325.0, 300.0)],
            })
            .state;
        assert_eq!(state.interaction(), &Interaction::default());
    }

    #[test]
    fn undo_and_redo_restore_snapshots() {
        let state = engine();
        let grown = grow(&state, &root(&state), Category::Synonyms, &["glow"]);
        let undone = grown.reduce(EngineEvent::Undo).state;
        assert_eq!(undone.graph(), state.graph());
        let redone = undone.reduce(EngineEvent::Redo).state;
        assert_eq!(redone.graph(), grown.graph());
    }

    #[test]
    fn new_ids_survive_undo() {
        let state = engine();
        let grown = grow(&state, &root(&state), Category::Synonyms, &["glow"]);
        let first = id_of(&grown, "glow");
        let undone = grown.reduce(EngineEvent::Undo).state;
        let regrown = grow(&undone, &root(&undone), Category::Synonyms, &["glow"]);
        assert_ne!(id_of(&regrown, "glow"), first);
    }

    #[test]
    fn save_clears_history_only_when_configured() {
        let state = engine();
        let grown = grow(&state, &root(&state), Category::Synonyms, &["glow"]);
        let saved = grown.reduce(EngineEvent::Saved).state;
        assert_eq!(saved.history().len(), 1);
        assert_eq!(saved.graph(), grown.graph());

        let mut config = EngineConfig::default();
        config.history.clear_on_save = false;
        let keeping = EngineState::seeded(config, "light");
        let keeping = grow(&keeping, &root(&keeping), Category::Synonyms, &["glow"]);
        let saved = keeping.reduce(EngineEvent::Saved).state;
        assert_eq!(saved.history().len(), 2);
    }

    #[test]
    fn recenter_moves_focus_and_camera() {
        let state = engine();
        let state = grow(&state, &root(&state), Category::Derivatives, &["lighten"]);
        let child = id_of(&state, "lighten");
        let state = state.reduce(EngineEvent::Recenter(child.clone())).state;

        assert_eq!(state.graph().center().map(|node| &node.id), Some(&child));
        let screen = state.viewport().world_to_screen(pos2(250.0, 0.0));
        assert!(screen.distance(pos2(400.0, 300.0)) < 1e-3);
    }

    #[test]
    fn deleting_the_hovered_subtree_clears_hover() {
        let state = engine();
        let state = grow(&state, &root(&state), Category::Idioms, &["see the light"]);
        let child = id_of(&state, "see the light");
        let state = state.reduce(EngineEvent::Hover(Some(child.clone()))).state;
        assert!(state.highlight().is_dimming());

        let state = state.reduce(EngineEvent::DeleteNode(child)).state;
        assert_eq!(state.hover(), None);
        assert_eq!(state.highlight(), Highlight::Everything);
        assert_eq!(state.graph().len(), 1);
    }

    #[test]
    fn loading_resets_history_and_view() {
        let state = engine();
        let grown = grow(&state, &root(&state), Category::Synonyms, &["glow"]);
        let river = vec![Node::seed(NodeId::new("node-40"), "river")];
        let loaded = grown.reduce(EngineEvent::Loaded(river.clone())).state;

        assert_eq!(loaded.graph().nodes(), river.as_slice());
        assert_eq!(loaded.history().len(), 1);
        assert!(!loaded.history().can_undo());

        let regrown = grow(&loaded, &NodeId::new("node-40"), Category::Root, &["stream"]);
        assert_eq!(id_of(&regrown, "stream").as_str(), "node-41");
    }

    #[test]
    fn oversized_maps_load_but_refuse_expansion() {
        let config = EngineConfig {
            max_total_nodes: 1,
            ..EngineConfig::default()
        };
        let state = EngineState::seeded(config.clone(), "light");
        let grown = grow(&engine(), &root(&state), Category::Synonyms, &["glow"]);
        assert!(warn_if_over_capacity(grown.graph(), &config));
        assert!(!warn_if_over_capacity(state.graph(), &config));

        let loaded = state
            .reduce(EngineEvent::Loaded(grown.graph().nodes().to_vec()))
            .state;
        assert_eq!(loaded.graph().len(), 2);
        let step = loaded.reduce(EngineEvent::RequestExpansion {
            parent: root(&loaded),
            category: Category::Idioms,
        });
        assert_eq!(
            step.effect,
            Some(Effect::AddRejected(AddNodesError::Capacity { limit: 1 }))
        );
    }

    #[test]
    fn empty_node_lists_are_not_loaded() {
        let state = engine();
        let step = state.reduce(EngineEvent::Loaded(Vec::new()));
        assert_eq!(step.state.graph(), state.graph());
        assert!(step.state.graph().center().is_some());
    }

    #[test]
    fn broken_maps_are_not_loaded() {
        let state = engine();
        let orphan = vec![
            Node::seed(NodeId::new("a"), "sun"),
            Node::child(
                NodeId::new("b"),
                "moon",
                &NodeId::new("missing"),
                Category::Antonyms,
                Pos2::ZERO,
            ),
        ];
        let step = state.reduce(EngineEvent::Loaded(orphan));
        assert_eq!(step.state.graph(), state.graph());
        assert_eq!(step.effect, None);
    }
}
