use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::KnowledgeGraph;
use crate::similarity::SimilarityScorer;
use crate::view::{EmptyState, GraphViewHandle, RenderOutcome, Surface, render};
use crate::viewport::interaction::place_tooltip;

use super::super::render_utils::{
    LABEL, MUTED_TEXT, SEARCH_RING, TOOLTIP_FILL, blend_color, circle_visible, dim_color,
    draw_background, draw_edge, edge_color, edge_visible, particle_color, tint_fill, tint_glow,
    with_alpha,
};
use super::super::{SearchMatchCache, ToolbarAction, ViewModel};

const TOOLTIP_WIDTH: f32 = 240.0;
const TOOLTIP_MARGIN: f32 = 8.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Nodes whose content, category or tags fuzzily match `query`.
pub(in crate::app) fn search_matches(graph: &KnowledgeGraph, query: &str) -> HashSet<usize> {
    let matcher = SkimMatcherV2::default();
    graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            std::iter::once(node.display_content.as_str())
                .chain(std::iter::once(node.note.parent_category.as_str()))
                .chain(node.note.tags.iter().map(String::as_str))
                .any(|text| fuzzy_match_score(&matcher, text, query).is_some())
        })
        .map(|(index, _)| index)
        .collect()
}

impl ViewModel {
    fn ensure_rendered(&mut self, rect: Rect) {
        if self.view.is_some() {
            return;
        }

        let surface = canvas_surface(rect);
        let scorer = SimilarityScorer::new(&self.taxonomy);
        self.view = Some(render(Some(surface), &self.notes, &scorer, &self.config));
        self.search_match_cache = None;
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let handle = self.view.as_ref()?.handle()?;
        let matches = Arc::new(search_matches(handle.graph(), query));
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });
        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.ensure_rendered(rect);
        let search = self.cached_search_matches();
        let fullscreen = self.fullscreen;
        let desired_surface = canvas_surface(rect);

        let painter = ui.painter_at(rect);
        let handle = match self.view.as_mut() {
            Some(RenderOutcome::Active(handle)) => handle,
            Some(RenderOutcome::Empty(empty)) => {
                draw_empty_state(&painter, rect, empty);
                return;
            }
            Some(RenderOutcome::Unavailable) | None => {
                ui.label("The constellation cannot be drawn here.");
                return;
            }
        };

        if fullscreen && !handle.is_fullscreen() {
            handle.enter_fullscreen(desired_surface.size());
        } else if !fullscreen && handle.is_fullscreen() {
            handle.exit_fullscreen(Some(desired_surface));
        } else {
            handle.resize(desired_surface);
        }

        let input = Self::handle_canvas_input(handle, ui, rect, &response);

        let frame_delta_seconds = ui.ctx().input(|input| input.stable_dt).clamp(0.0, 0.25);
        let report = handle.advance(frame_delta_seconds);

        draw_background(&painter, rect);
        draw_scene(&painter, rect, handle, search.as_deref());
        draw_tooltip(&painter, rect, handle);

        if report.needs_repaint() || handle.dragged().is_some() {
            ui.ctx().request_repaint();
        }

        let toolbar = draw_toolbar(ui, rect, handle.is_fullscreen());
        match toolbar {
            Some(ToolbarAction::ZoomIn) => handle.zoom_in(),
            Some(ToolbarAction::ZoomOut) => handle.zoom_out(),
            Some(ToolbarAction::Fit) => handle.fit_now(true),
            Some(ToolbarAction::ToggleFullscreen) | None => {}
        }

        if input.toggle_fullscreen || toolbar == Some(ToolbarAction::ToggleFullscreen) {
            self.set_fullscreen(ui.ctx(), !self.fullscreen);
        }
        if let Some(request) = input.navigate {
            self.navigate(request);
        }
    }
}

/// The painter is clipped to the canvas, so the layout works on exactly the
/// visible area rather than a container that could scroll.
fn canvas_surface(rect: Rect) -> Surface {
    Surface::exact(rect.size())
}

fn to_screen(rect: Rect, local: Pos2) -> Pos2 {
    rect.min + local.to_vec2()
}

fn draw_empty_state(painter: &egui::Painter, rect: Rect, empty: &EmptyState) {
    draw_background(painter, rect);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        empty.message,
        FontId::proportional(15.0),
        MUTED_TEXT,
    );
}

fn draw_scene(
    painter: &egui::Painter,
    rect: Rect,
    handle: &GraphViewHandle,
    search: Option<&HashSet<usize>>,
) {
    let scale = handle.transform().scale;
    let search_active = search.is_some_and(|matches| !matches.is_empty());

    for particle in handle.particles() {
        let center = to_screen(rect, particle.position.to_pos2());
        if circle_visible(rect, center, particle.radius) {
            painter.circle_filled(center, particle.radius, particle_color(particle.alpha));
        }
    }

    for index in 0..handle.graph().edge_count() {
        let Some(style) = handle.edge_style(index) else {
            continue;
        };
        let start = to_screen(rect, style.from);
        let end = to_screen(rect, style.to);
        if !edge_visible(rect, start, end, style.width) {
            continue;
        }
        let stroke = Stroke::new(style.width, edge_color(style.band, style.emphasis));
        draw_edge(painter, start, end, stroke, style.dashed, scale);
    }

    let label_font = FontId::proportional((10.0 * scale).clamp(6.0, 22.0));
    for (index, node) in handle.graph().nodes.iter().enumerate() {
        let Some(style) = handle.node_style(index) else {
            continue;
        };
        let center = to_screen(rect, style.center);
        let glow_radius = style.radius + 6.0 * scale;
        if !circle_visible(rect, center, glow_radius) {
            continue;
        }

        let is_match = search.is_some_and(|matches| matches.contains(&index));
        let mut fill = tint_fill(node.tint());
        let mut glow = tint_glow(node.tint());
        if !style.related {
            fill = dim_color(fill, 0.6);
            glow = dim_color(glow, 0.6);
        }
        if search_active && !is_match {
            fill = dim_color(fill, 0.45);
            glow = dim_color(glow, 0.45);
        } else if is_match {
            fill = blend_color(fill, SEARCH_RING, 0.25);
        }

        painter.circle_filled(center, glow_radius, with_alpha(glow, 0.12));
        painter.circle_filled(center, style.radius, fill);
        painter.circle_stroke(center, style.radius, Stroke::new(style.stroke_width, glow));
        painter.circle_filled(
            center - vec2(style.radius, style.radius) * 0.25,
            style.radius * 0.35,
            with_alpha(egui::Color32::WHITE, 0.18),
        );
        if is_match {
            painter.circle_stroke(
                center,
                glow_radius + 2.0,
                Stroke::new(1.5, SEARCH_RING),
            );
        }

        if let Some(label) = handle.node_label(index) {
            painter.text(
                center + vec2(0.0, style.radius + 4.0 * scale),
                Align2::CENTER_TOP,
                label,
                label_font.clone(),
                LABEL,
            );
        }
    }
}

fn draw_tooltip(painter: &egui::Painter, rect: Rect, handle: &GraphViewHandle) {
    let Some(tooltip) = handle.tooltip() else {
        return;
    };

    let mut text = tooltip.content.preview.clone();
    if !tooltip.content.tags.is_empty() {
        text.push_str("\n\n");
        text.push_str(
            &tooltip
                .content
                .tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    if !tooltip.content.date.is_empty() {
        text.push_str("\n\n");
        text.push_str(&tooltip.content.date);
    }

    let galley = painter.layout(
        text,
        FontId::proportional(12.5),
        LABEL,
        TOOLTIP_WIDTH - 2.0 * TOOLTIP_MARGIN,
    );
    let size = galley.size() + Vec2::splat(2.0 * TOOLTIP_MARGIN);
    let corner = place_tooltip(tooltip.anchor, size, handle.surface().size());
    let frame = Rect::from_min_size(to_screen(rect, corner), size);

    painter.rect_filled(frame, 8.0, TOOLTIP_FILL);
    painter.galley(frame.min + Vec2::splat(TOOLTIP_MARGIN), galley, LABEL);
}

fn draw_toolbar(ui: &Ui, rect: Rect, fullscreen: bool) -> Option<ToolbarAction> {
    let mut action = None;
    egui::Area::new(ui.id().with("constellation_toolbar"))
        .order(egui::Order::Foreground)
        .pivot(Align2::RIGHT_BOTTOM)
        .fixed_pos(rect.right_bottom() - vec2(12.0, 12.0))
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    action = Some(ToolbarAction::ZoomIn);
                }
                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    action = Some(ToolbarAction::ZoomOut);
                }
                if ui.button("Fit").on_hover_text("Fit every note in view").clicked() {
                    action = Some(ToolbarAction::Fit);
                }
                let (label, hint) = if fullscreen {
                    ("Exit fullscreen", "Leave fullscreen")
                } else {
                    ("Fullscreen", "Enter fullscreen")
                };
                if ui.button(label).on_hover_text(hint).clicked() {
                    action = Some(ToolbarAction::ToggleFullscreen);
                }
            });
        });
    action
}

#[cfg(test)]
mod tests {
    use crate::graph::build_graph;
    use crate::notes::{CategoryTaxonomy, Note};

    use super::*;

    #[test]
    fn search_matches_content_category_and_tags() {
        let notes = vec![
            Note::new("a").with_core("Meditations on first philosophy"),
            Note::new("b").with_category("Cooking"),
            Note::new("c").with_tags(["stoicism"]),
        ];
        let taxonomy = CategoryTaxonomy::default();
        let graph = build_graph(&notes, &SimilarityScorer::new(&taxonomy));

        assert_eq!(search_matches(&graph, "medit"), HashSet::from([0]));
        assert_eq!(search_matches(&graph, "cook"), HashSet::from([1]));
        assert_eq!(search_matches(&graph, "stoic"), HashSet::from([2]));
        assert!(search_matches(&graph, "zzzz").is_empty());
    }

    #[test]
    fn canvas_surface_is_the_visible_rect() {
        let rect = Rect::from_min_size(egui::pos2(0.0, 32.0), vec2(640.0, 380.0));
        assert_eq!(canvas_surface(rect).size(), vec2(640.0, 380.0));
        assert_eq!(canvas_surface(rect).center(), vec2(320.0, 190.0));
    }
}
