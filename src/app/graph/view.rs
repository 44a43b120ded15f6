use std::collections::HashMap;

use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, StrokeKind, Ui, vec2};
use word_orbit::mindmap::{EngineEvent, Interaction, NodeId, spoke_direction};

use super::super::render_utils::{
    CONTROL_RADIUS, NodeShape, blend_color, category_color, dim_color, draw_background,
    edge_visible, more_button, rect_visible, thin_stroke,
};
use super::super::ViewModel;

const CARD: Color32 = Color32::from_rgb(33, 38, 46);
const SELECTED: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.handle_canvas_input(ui, rect, &response);

        let painter = ui.painter_at(rect);
        let engine = &self.engine;
        let viewport = engine.viewport();
        let config = engine.config();
        let graph = engine.graph();
        let highlight = engine.highlight();
        let offset = rect.min.to_vec2();

        draw_background(&painter, rect, viewport);

        let shapes: HashMap<&NodeId, NodeShape> = graph
            .nodes()
            .iter()
            .map(|node| {
                let shape =
                    NodeShape::new(node, engine.display_position(node), viewport, &config.layout);
                (&node.id, shape)
            })
            .collect();

        let zoom_sqrt = viewport.zoom.sqrt();
        for edge in graph.edges() {
            let (Some(from), Some(to)) = (shapes.get(&edge.from), shapes.get(&edge.to)) else {
                continue;
            };
            let start = from.body.center() + offset;
            let end = to.body.center() + offset;
            if !edge_visible(rect, start, end, 4.0) {
                continue;
            }

            let color = category_color(config, edge.category);
            let lit = highlight.contains(&edge.from) && highlight.contains(&edge.to);
            let (width, color) = if lit && highlight.is_dimming() {
                ((2.4 * zoom_sqrt).clamp(1.2, 4.4), color)
            } else if lit {
                ((1.6 * zoom_sqrt).clamp(0.8, 3.2), color.gamma_multiply(0.75))
            } else {
                ((1.0 * zoom_sqrt).clamp(0.5, 2.0), dim_color(color, 0.3))
            };
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let font_size = 14.0 * viewport.zoom;
        for node in graph.nodes() {
            let Some(shape) = shapes.get(&node.id) else {
                continue;
            };
            let body = shape.body.translate(offset);
            if !rect_visible(rect, body.expand(CONTROL_RADIUS)) {
                continue;
            }

            let accent = category_color(config, node.category);
            let lit = highlight.contains(&node.id);
            let fill = blend_color(CARD, accent, if node.is_center { 0.55 } else { 0.25 });
            let (fill, text_color) = if lit {
                (fill, Color32::from_gray(238))
            } else {
                (dim_color(fill, 0.45), Color32::from_gray(110))
            };

            let is_selected = self.selected.as_ref() == Some(&node.id);
            let is_hovered = engine.hover() == Some(&node.id);
            let is_dragged = matches!(
                engine.interaction(),
                Interaction::Dragging(drag) if drag.node == node.id
            );
            let stroke = if is_selected {
                Stroke::new(2.5, SELECTED)
            } else if is_hovered || is_dragged {
                Stroke::new(1.8, accent)
            } else {
                Stroke::new(1.0, dim_color(accent, if lit { 0.8 } else { 0.35 }))
            };

            painter.rect_filled(body, shape.rounding(), fill);
            painter.rect_stroke(body, shape.rounding(), stroke, StrokeKind::Inside);

            if font_size >= 5.0 {
                painter.text(
                    body.center(),
                    Align2::CENTER_CENTER,
                    node.word.as_str(),
                    FontId::proportional(if node.is_center { font_size * 1.15 } else { font_size }),
                    text_color,
                );
            }

            if let Some(delete) = shape.delete
                && (is_hovered || is_selected)
            {
                let center = delete + offset;
                painter.circle_filled(center, CONTROL_RADIUS, Color32::from_rgb(120, 44, 44));
                painter.circle_stroke(center, CONTROL_RADIUS, thin_stroke(Color32::from_gray(20)));
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    "×",
                    FontId::proportional(12.0),
                    Color32::from_gray(240),
                );
            }
        }

        for edge in graph.frontier_edges() {
            let Some(shape) = shapes.get(&edge.frontier) else {
                continue;
            };
            let center = more_button(shape, spoke_direction(edge.category)) + offset;
            if !rect.contains(center) {
                continue;
            }
            let accent = category_color(config, Some(edge.category));
            let accent = if highlight.contains(&edge.frontier) {
                accent
            } else {
                dim_color(accent, 0.4)
            };
            painter.circle_filled(center, CONTROL_RADIUS, blend_color(CARD, accent, 0.4));
            painter.circle_stroke(center, CONTROL_RADIUS, thin_stroke(accent));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "+",
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(node) = engine.hover().and_then(|id| graph.get(id)) {
            let category = node
                .category
                .map(|category| config.category_style(category).label)
                .unwrap_or_else(|| "center".to_owned());
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {category}", node.word),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(pending) = &self.pending {
            let label = config.category_style(pending.category).label;
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format!("Finding {label} for \"{}\"...", pending.parent_word),
                FontId::proportional(13.0),
                Color32::from_gray(200),
            );
        }

        painter.text(
            rect.right_bottom() + vec2(-10.0, -10.0),
            Align2::RIGHT_BOTTOM,
            format!("{:.0}%", viewport.zoom * 100.0),
            FontId::monospace(12.0),
            Color32::from_gray(150),
        );

        if response.double_clicked()
            && let Some(id) = engine.hover().cloned()
        {
            self.dispatch(EngineEvent::Recenter(id));
        } else if response.clicked() && engine.hover().is_none() {
            self.select(None);
        }
    }
}
