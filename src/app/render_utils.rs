use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use word_orbit::config::{EngineConfig, LayoutConfig};
use word_orbit::mindmap::{Category, Node, Viewport, estimate_width};

/// World-space label height; widths come from the layout estimate so what
/// is drawn matches what the spacing rule reserved.
const NODE_HEIGHT: f32 = 36.0;
const CENTER_SCALE: f32 = 1.2;
pub(super) const CONTROL_RADIUS: f32 = 9.0;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.25 + (factor * 0.55))) as u8,
    )
}

pub(super) fn category_color(config: &EngineConfig, category: Option<Category>) -> Color32 {
    match category {
        Some(category) => {
            let [r, g, b] = config.category_style(category).color;
            Color32::from_rgb(r, g, b)
        }
        None => Color32::from_rgb(245, 206, 93),
    }
}

/// Dot grid that moves with the camera.
pub(super) fn draw_background(painter: &Painter, rect: Rect, viewport: Viewport) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * viewport.zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + viewport.pan;
    let dot = Color32::from_rgba_unmultiplied(70, 80, 92, 110);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
        while y < rect.bottom() {
            painter.circle_filled(Pos2::new(x, y), 1.2, dot);
            y += step;
        }
        x += step;
    }
}

/// Screen geometry of one node, in canvas-local coordinates.
#[derive(Clone, Copy, Debug)]
pub(super) struct NodeShape {
    pub(super) body: Rect,
    pub(super) delete: Option<Pos2>,
}

impl NodeShape {
    pub(super) fn new(node: &Node, world: Pos2, viewport: Viewport, layout: &LayoutConfig) -> Self {
        let scale = if node.is_center { CENTER_SCALE } else { 1.0 } * viewport.zoom;
        let size = vec2(estimate_width(&node.word, layout), NODE_HEIGHT) * scale;
        let body = Rect::from_center_size(viewport.world_to_screen(world), size);
        let delete = (!node.is_root()).then(|| body.right_top() + vec2(-2.0, 2.0));

        Self { body, delete }
    }

    pub(super) fn rounding(&self) -> f32 {
        self.body.height() / 2.0
    }
}

/// Position of the "more words" button just past a frontier node along its
/// spoke.
pub(super) fn more_button(frontier: &NodeShape, direction: Vec2) -> Pos2 {
    let reach = (frontier.body.width() / 2.0) * direction.x.abs()
        + (frontier.body.height() / 2.0) * direction.y.abs();
    frontier.body.center() + direction * (reach + CONTROL_RADIUS * 2.0)
}

pub(super) fn within(point: Pos2, center: Pos2, radius: f32) -> bool {
    point.distance(center) <= radius
}

pub(super) fn rect_visible(rect: Rect, shape: Rect) -> bool {
    rect.intersects(shape)
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(padding);
    rect.intersects(bounds)
}

pub(super) fn thin_stroke(color: Color32) -> Stroke {
    Stroke::new(1.0, color)
}
