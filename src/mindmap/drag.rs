use eframe::egui::{Pos2, Vec2};

use super::node::{Node, NodeId};

/// An in-progress manual reposition. The committed node keeps its position
/// until [`NodeDrag::finish`]; renderers draw [`NodeDrag::preview`] instead.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDrag {
    pub node: NodeId,
    pub original: Pos2,
    pub pointer_origin: Pos2,
    pub live_offset: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Pointer never moved; treat as a click on the node.
    Click(NodeId),
    Commit { node: NodeId, to: Pos2 },
}

impl NodeDrag {
    pub fn begin(node: &Node, pointer: Pos2) -> Self {
        Self {
            node: node.id.clone(),
            original: node.pos(),
            pointer_origin: pointer,
            live_offset: Vec2::ZERO,
        }
    }

    /// Screen-space pointer delta divided by zoom, so the node tracks the
    /// pointer at any zoom level.
    pub fn update(&self, pointer: Pos2, zoom: f32) -> Self {
        Self {
            live_offset: (pointer - self.pointer_origin) / zoom,
            ..self.clone()
        }
    }

    /// Keeps the current offset when the zoom changes mid-drag, so the
    /// preview stays put until the pointer moves again.
    pub fn rezoomed(&self, pointer: Pos2, zoom: f32) -> Self {
        Self {
            pointer_origin: pointer - self.live_offset * zoom,
            ..self.clone()
        }
    }

    pub fn preview(&self) -> Pos2 {
        self.original + self.live_offset
    }

    pub fn finish(self) -> DragOutcome {
        if self.live_offset == Vec2::ZERO {
            DragOutcome::Click(self.node)
        } else {
            DragOutcome::Commit {
                to: self.preview(),
                node: self.node,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn node_at(x: f32, y: f32) -> Node {
        let mut node = Node::seed(NodeId::new("n"), "word");
        node.x = x;
        node.y = y;
        node
    }

    #[test]
    fn offset_is_scaled_by_zoom() {
        let drag = NodeDrag::begin(&node_at(10.0, 10.0), pos2(200.0, 200.0));
        let moved = drag.update(pos2(240.0, 180.0), 2.0);
        assert_eq!(moved.live_offset, vec2(20.0, -10.0));
        assert_eq!(moved.preview(), pos2(30.0, 0.0));
        assert_eq!(moved.original, pos2(10.0, 10.0));
    }

    #[test]
    fn rezooming_keeps_the_preview_until_the_pointer_moves() {
        let drag = NodeDrag::begin(&node_at(0.0, 0.0), pos2(100.0, 100.0))
            .update(pos2(140.0, 100.0), 1.0)
            .rezoomed(pos2(140.0, 100.0), 2.0);
        assert_eq!(drag.preview(), pos2(40.0, 0.0));

        let still = drag.update(pos2(140.0, 100.0), 2.0);
        assert_eq!(still.preview(), pos2(40.0, 0.0));
        let further = drag.update(pos2(160.0, 100.0), 2.0);
        assert_eq!(further.preview(), pos2(50.0, 0.0));
    }

    #[test]
    fn release_without_motion_is_a_click() {
        let drag = NodeDrag::begin(&node_at(0.0, 0.0), pos2(5.0, 5.0));
        let still = drag.update(pos2(5.0, 5.0), 0.7);
        assert_eq!(still.finish(), DragOutcome::Click(NodeId::new("n")));
    }

    #[test]
    fn release_after_motion_commits_original_plus_offset() {
        let drag = NodeDrag::begin(&node_at(-5.0, 3.0), pos2(0.0, 0.0));
        let outcome = drag.update(pos2(8.0, 4.0), 0.5).finish();
        assert_eq!(
            outcome,
            DragOutcome::Commit {
                node: NodeId::new("n"),
                to: pos2(11.0, 11.0),
            }
        );
    }
}
