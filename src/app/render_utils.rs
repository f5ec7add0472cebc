use eframe::egui::{Color32, CornerRadius, Painter, Pos2, Rect, Shape, Stroke};

use crate::graph::Tint;
use crate::similarity::WeightBand;
use crate::viewport::interaction::EdgeEmphasis;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(65, 55, 48);
pub(super) const BACKGROUND_EDGE: Color32 = Color32::from_rgb(40, 34, 30);
pub(super) const LABEL: Color32 = Color32::from_rgba_premultiplied(154, 143, 133, 179);
pub(super) const MUTED_TEXT: Color32 = Color32::from_rgb(190, 176, 160);
pub(super) const TOOLTIP_FILL: Color32 = Color32::from_rgba_premultiplied(35, 29, 26, 235);
pub(super) const SEARCH_RING: Color32 = Color32::from_rgb(232, 196, 120);

const PARTICLE_RGB: (u8, u8, u8) = (224, 208, 184);
const DASH_LENGTH: f32 = 5.0;
const GAP_LENGTH: f32 = 8.0;

pub(super) fn tint_fill(tint: Tint) -> Color32 {
    match tint {
        Tint::Rose => Color32::from_rgb(186, 110, 94),
        Tint::Sky => Color32::from_rgb(100, 147, 180),
        Tint::Sage => Color32::from_rgb(98, 147, 114),
        Tint::Amber => Color32::from_rgb(204, 148, 51),
        Tint::Plum => Color32::from_rgb(153, 92, 122),
    }
}

pub(super) fn tint_glow(tint: Tint) -> Color32 {
    match tint {
        Tint::Rose => Color32::from_rgb(201, 142, 130),
        Tint::Sky => Color32::from_rgb(145, 178, 202),
        Tint::Sage => Color32::from_rgb(126, 169, 141),
        Tint::Amber => Color32::from_rgb(224, 172, 82),
        Tint::Plum => Color32::from_rgb(175, 121, 148),
    }
}

pub(super) fn edge_color(band: WeightBand, emphasis: EdgeEmphasis) -> Color32 {
    match emphasis {
        EdgeEmphasis::Highlighted => Color32::from_rgba_unmultiplied(203, 122, 77, 153),
        EdgeEmphasis::Dimmed => Color32::from_rgba_unmultiplied(188, 168, 143, 20),
        EdgeEmphasis::Normal => match band {
            WeightBand::Strong | WeightBand::Medium => {
                Color32::from_rgba_unmultiplied(171, 150, 124, 89)
            }
            WeightBand::Weak => Color32::from_rgba_unmultiplied(153, 133, 102, 26),
        },
    }
}

pub(super) fn particle_color(alpha: f32) -> Color32 {
    let (r, g, b) = PARTICLE_RGB;
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

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
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Fixed backdrop; it never follows the camera.
pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    let rounding = CornerRadius::same(16);
    painter.rect_filled(rect, rounding, BACKGROUND_EDGE);
    painter.rect_filled(rect.shrink(rect.size().min_elem() * 0.08), rounding, BACKGROUND);
}

pub(super) fn draw_edge(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    stroke: Stroke,
    dashed: bool,
    scale: f32,
) {
    if dashed {
        let scale = scale.max(0.1);
        painter.extend(Shape::dashed_line(
            &[start, end],
            stroke,
            DASH_LENGTH * scale,
            GAP_LENGTH * scale,
        ));
    } else {
        painter.line_segment([start, end], stroke);
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    segments_intersect(start, end, rect.left_top(), rect.right_top())
        || segments_intersect(start, end, rect.right_top(), rect.right_bottom())
        || segments_intersect(start, end, rect.right_bottom(), rect.left_bottom())
        || segments_intersect(start, end, rect.left_bottom(), rect.left_top())
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}
