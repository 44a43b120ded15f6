use eframe::egui::{self, Pos2, Rect, Response, Ui};
use word_orbit::mindmap::{EngineEvent, HitTarget, Interaction, Node, spoke_direction};

use super::super::render_utils::{CONTROL_RADIUS, NodeShape, more_button, within};
use super::super::{Control, ViewModel};

impl ViewModel {
    /// Topmost thing under a canvas-local point. Controls win over bodies,
    /// later nodes over earlier ones, matching draw order.
    pub(in crate::app) fn hit_test(&self, local: Pos2) -> (HitTarget, Option<Control>) {
        let engine = &self.engine;
        let graph = engine.graph();
        let viewport = engine.viewport();
        let layout = &engine.config().layout;
        let shape_of =
            |node: &Node| NodeShape::new(node, engine.display_position(node), viewport, layout);

        for edge in graph.frontier_edges() {
            let Some(frontier) = graph.get(&edge.frontier) else {
                continue;
            };
            let button = more_button(&shape_of(frontier), spoke_direction(edge.category));
            if within(local, button, CONTROL_RADIUS) {
                return (
                    HitTarget::NodeControl(edge.frontier.clone()),
                    Some(Control::MoreWords {
                        parent: edge.parent,
                        category: edge.category,
                    }),
                );
            }
        }

        for node in graph.nodes().iter().rev() {
            let shape = shape_of(node);
            let shows_delete =
                engine.hover() == Some(&node.id) || self.selected.as_ref() == Some(&node.id);
            if let Some(delete) = shape.delete
                && shows_delete
                && within(local, delete, CONTROL_RADIUS)
            {
                return (
                    HitTarget::NodeControl(node.id.clone()),
                    Some(Control::Delete(node.id.clone())),
                );
            }
            if shape.body.contains(local) {
                return (HitTarget::NodeBody(node.id.clone()), None);
            }
        }

        (HitTarget::Canvas, None)
    }

    /// Translates this frame's raw input into engine events. Positions are
    /// made canvas-local before they reach the engine.
    pub(in crate::app) fn handle_canvas_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if rect.size() != self.engine.canvas() {
            self.dispatch(EngineEvent::Resize { size: rect.size() });
        }

        let origin = rect.min.to_vec2();
        let local = |pos: Pos2| pos - origin;
        let events = ui.input(|input| input.events.clone());
        let hovered = response.contains_pointer();
        // Integrations mirror the first touch as mouse events; touch wins.
        let touch_frame = events
            .iter()
            .any(|event| matches!(event, egui::Event::Touch { .. }));

        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    self.handle_touch(id.0, phase, local(pos), rect.contains(pos));
                }
                _ if touch_frame || !self.touches.is_empty() => {}
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } if hovered && rect.contains(pos) => self.pointer_down(local(pos)),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: false,
                    ..
                } => self.pointer_up(local(pos)),
                egui::Event::PointerMoved(pos) => {
                    self.dispatch(EngineEvent::PointerMove { pos: local(pos) });
                }
                egui::Event::PointerGone => {
                    self.pressed_control = None;
                    self.dispatch(EngineEvent::PointerLeave);
                }
                egui::Event::MouseWheel { delta, .. } if hovered => {
                    self.wheel(ui, rect, delta.y);
                }
                egui::Event::Zoom(factor) if hovered => self.wheel(ui, rect, factor - 1.0),
                _ => {}
            }
        }

        self.update_hover(ui, rect);

        let busy = !matches!(
            self.engine.interaction(),
            Interaction::Camera(gesture) if !gesture.is_active()
        );
        if busy {
            ui.ctx().request_repaint();
        }
    }

    fn wheel(&mut self, ui: &Ui, rect: Rect, delta: f32) {
        if delta.abs() <= f32::EPSILON {
            return;
        }
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.dispatch(EngineEvent::Wheel {
            pos: pointer - rect.min.to_vec2(),
            delta,
        });
    }

    fn pointer_down(&mut self, pos: Pos2) {
        let (target, control) = self.hit_test(pos);
        self.pressed_control = control;
        self.dispatch(EngineEvent::PointerDown { pos, target });
    }

    fn pointer_up(&mut self, pos: Pos2) {
        self.dispatch(EngineEvent::PointerUp);
        self.release_control(pos);
    }

    fn handle_touch(&mut self, id: u64, phase: egui::TouchPhase, pos: Pos2, inside: bool) {
        match phase {
            egui::TouchPhase::Start => {
                if !inside && self.touches.is_empty() {
                    return;
                }
                self.touches.insert(id, pos);
                let touches = self.touch_points();
                let target = if touches.len() == 1 {
                    let (target, control) = self.hit_test(pos);
                    self.pressed_control = control;
                    target
                } else {
                    self.pressed_control = None;
                    HitTarget::Canvas
                };
                self.dispatch(EngineEvent::TouchStart { touches, target });
            }
            egui::TouchPhase::Move => {
                let Some(point) = self.touches.get_mut(&id) else {
                    return;
                };
                *point = pos;
                let touches = self.touch_points();
                self.dispatch(EngineEvent::TouchMove { touches });
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                if self.touches.remove(&id).is_none() {
                    return;
                }
                let touches = self.touch_points();
                let last_finger = touches.is_empty();
                self.dispatch(EngineEvent::TouchEnd { touches });
                if last_finger && phase == egui::TouchPhase::End {
                    self.release_control(pos);
                } else {
                    self.pressed_control = None;
                }
            }
        }
    }

    fn touch_points(&self) -> Vec<Pos2> {
        self.touches.values().copied().collect()
    }

    /// A control fires only when press and release land on the same one.
    fn release_control(&mut self, pos: Pos2) {
        let Some(pressed) = self.pressed_control.take() else {
            return;
        };
        if self.hit_test(pos).1.as_ref() != Some(&pressed) {
            return;
        }

        match pressed {
            Control::Delete(id) => self.dispatch(EngineEvent::DeleteNode(id)),
            Control::MoreWords { parent, category } => {
                self.dispatch(EngineEvent::RequestExpansion { parent, category });
            }
        }
    }

    fn update_hover(&mut self, ui: &Ui, rect: Rect) {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos) && self.touches.is_empty());

        let hovered = pointer.and_then(|pos| match self.hit_test(pos - rect.min.to_vec2()) {
            (HitTarget::NodeBody(id), _) => Some(id),
            (_, Some(Control::Delete(id))) => Some(id),
            _ => None,
        });

        if hovered.as_ref() != self.engine.hover() {
            self.dispatch(EngineEvent::Hover(hovered.clone()));
        }

        let cursor = match (self.engine.interaction(), pointer.map(|_| &hovered)) {
            (Interaction::Dragging(_), _) => Some(egui::CursorIcon::Grabbing),
            (Interaction::Camera(gesture), _) if gesture.is_active() => {
                Some(egui::CursorIcon::Grabbing)
            }
            (_, Some(Some(_))) => Some(egui::CursorIcon::PointingHand),
            _ => None,
        };
        if let Some(cursor) = cursor {
            ui.output_mut(|output| output.cursor_icon = cursor);
        }
    }
}
