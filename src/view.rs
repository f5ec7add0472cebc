//! Entry point for drawing a note set as a constellation, and the handle that
//! owns one live view: graph, layout, camera and pointer state.

use eframe::egui::{Pos2, Vec2, vec2};
use tracing::{debug, warn};

use crate::graph::{KnowledgeGraph, build_graph};
use crate::notes::Note;
use crate::physics::{ForceConfig, ForceSimulation};
use crate::similarity::{SimilarityScorer, WeightBand};
use crate::util::{stable_pair, stable_unit};
use crate::viewport::interaction::{
    DragState, EdgeEmphasis, HOVER_GROWTH, Hover, NavigationRequest, TooltipContent,
    edge_emphasis, pick_node,
};
use crate::viewport::{Camera, CameraTransform, ViewConfig, sanitize_position, zoom_to_fit};

pub const EMPTY_MESSAGE: &str =
    "No notes yet, nothing to map. Capture something to start your constellation.";
pub const PARTICLE_COUNT: usize = 60;

const DEFAULT_WIDTH: f32 = 800.0;
const MIN_HEIGHT: f32 = 560.0;
const PARTICLE_SEED: u64 = 0x5eed_0f_57a7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    size: Vec2,
}

impl Surface {
    /// Drawing area for a host container. A collapsed or unmeasured width
    /// falls back to the default and the height never drops below the floor.
    pub fn resolve(width: f32, height: f32) -> Self {
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            DEFAULT_WIDTH
        };
        let height = if height.is_finite() {
            height.max(MIN_HEIGHT)
        } else {
            MIN_HEIGHT
        };
        Self {
            size: vec2(width, height),
        }
    }

    /// Exact size, used for fullscreen where the window dictates the area.
    pub fn exact(size: Vec2) -> Self {
        Self {
            size: vec2(
                if size.x.is_finite() && size.x > 0.0 { size.x } else { DEFAULT_WIDTH },
                if size.y.is_finite() && size.y > 0.0 { size.y } else { MIN_HEIGHT },
            ),
        }
    }

    pub fn size(self) -> Vec2 {
        self.size
    }

    pub fn center(self) -> Vec2 {
        self.size * 0.5
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderConfig {
    pub forces: ForceConfig,
    pub view: ViewConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmptyState {
    pub message: &'static str,
    pub surface: Surface,
}

pub enum RenderOutcome {
    /// No drawing surface could be obtained; nothing was built.
    Unavailable,
    Empty(EmptyState),
    Active(Box<GraphViewHandle>),
}

impl RenderOutcome {
    pub fn handle(&self) -> Option<&GraphViewHandle> {
        match self {
            Self::Active(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn handle_mut(&mut self) -> Option<&mut GraphViewHandle> {
        match self {
            Self::Active(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Builds the graph for `notes` and starts a laid-out view on `surface`.
/// Calling it again with the same notes yields an equivalent, independent
/// view; the caller drops the previous handle.
pub fn render(
    surface: Option<Surface>,
    notes: &[Note],
    scorer: &SimilarityScorer<'_>,
    config: &RenderConfig,
) -> RenderOutcome {
    let Some(surface) = surface else {
        warn!("no drawing surface available, skipping constellation");
        return RenderOutcome::Unavailable;
    };

    let graph = build_graph(notes, scorer);
    if graph.is_empty() {
        debug!(notes = notes.len(), "nothing to draw");
        return RenderOutcome::Empty(EmptyState {
            message: EMPTY_MESSAGE,
            surface,
        });
    }

    RenderOutcome::Active(Box::new(GraphViewHandle::new(graph, surface, config.clone())))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub ticks: usize,
    pub moving: bool,
    pub settled: bool,
    pub camera_animating: bool,
    pub fit_pending: bool,
}

impl FrameReport {
    pub fn needs_repaint(self) -> bool {
        self.moving || self.camera_animating || self.fit_pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub from: Pos2,
    pub to: Pos2,
    pub width: f32,
    pub dashed: bool,
    pub band: WeightBand,
    pub emphasis: EdgeEmphasis,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub center: Pos2,
    pub radius: f32,
    pub stroke_width: f32,
    pub hovered: bool,
    /// False while the hovered node is neither this node nor a neighbour.
    pub related: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipView {
    pub anchor: Pos2,
    pub content: TooltipContent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

fn scatter_particles(size: Vec2) -> Vec<Particle> {
    (0..PARTICLE_COUNT as u64)
        .map(|index| {
            let seed = PARTICLE_SEED ^ index.wrapping_mul(0x9e37_79b9);
            let (x, y) = stable_pair(seed);
            Particle {
                position: vec2((x + 1.0) * 0.5 * size.x, (y + 1.0) * 0.5 * size.y),
                radius: stable_unit(seed ^ 1) * 1.2 + 0.3,
                alpha: stable_unit(seed ^ 2) * 0.3 + 0.05,
            }
        })
        .collect()
}

pub struct GraphViewHandle {
    graph: KnowledgeGraph,
    simulation: ForceSimulation,
    camera: Camera,
    config: RenderConfig,
    surface: Surface,
    /// Surface to return to when leaving fullscreen.
    windowed: Surface,
    fullscreen: bool,
    clock: f64,
    fit_at: Option<f64>,
    hover: Option<Hover>,
    pointer: Option<Pos2>,
    tooltip_hidden: bool,
    drag: DragState,
    particles: Vec<Particle>,
}

impl GraphViewHandle {
    fn new(graph: KnowledgeGraph, surface: Surface, config: RenderConfig) -> Self {
        let simulation =
            ForceSimulation::new(&graph, surface.center(), surface.size(), config.forces);
        let mut handle = Self {
            particles: scatter_particles(surface.size()),
            graph,
            simulation,
            camera: Camera::default(),
            config,
            surface,
            windowed: surface,
            fullscreen: false,
            clock: 0.0,
            fit_at: None,
            hover: None,
            pointer: None,
            tooltip_hidden: false,
            drag: DragState::default(),
        };
        handle.fit_now(false);
        debug!(
            nodes = handle.graph.node_count(),
            edges = handle.graph.edge_count(),
            scale = handle.camera.transform().scale,
            "constellation view ready"
        );
        handle
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn transform(&self) -> CameraTransform {
        self.camera.transform()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_fit_pending(&self) -> bool {
        self.fit_at.is_some()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.as_ref().map(Hover::node)
    }

    pub fn dragged(&self) -> Option<usize> {
        self.drag.node()
    }

    /// Moves the view clock forward: layout ticks, the deferred fit once the
    /// layout has settled, and any camera transition.
    pub fn advance(&mut self, dt_seconds: f32) -> FrameReport {
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.clock += f64::from(dt_seconds);
        }

        let step = self.simulation.advance(dt_seconds);
        if step.settled {
            debug!(alpha = self.simulation.alpha(), "layout settled, scheduling fit");
            self.fit_at = Some(self.clock + self.config.view.fit_delay_seconds);
        }

        if let Some(deadline) = self.fit_at
            && self.clock >= deadline
        {
            self.fit_at = None;
            self.fit_now(true);
        }

        let camera_animating = self.camera.update(self.clock);
        FrameReport {
            ticks: step.ticks,
            moving: self.simulation.is_running(),
            settled: step.settled,
            camera_animating,
            fit_pending: self.fit_at.is_some(),
        }
    }

    fn fit_target(&self) -> CameraTransform {
        let center = self.surface.center();
        let nodes = self
            .simulation
            .nodes()
            .iter()
            .map(|node| (node.position, node.radius))
            .collect::<Vec<_>>();
        zoom_to_fit(&nodes, self.surface.size(), center, &self.config.view)
    }

    pub fn fit_now(&mut self, animated: bool) {
        let target = self.fit_target();
        if animated {
            self.camera
                .animate_to(target, self.config.view.fit_seconds, self.clock);
        } else {
            self.camera.set(target);
        }
        debug!(scale = target.scale, animated, "zoom to fit");
    }

    fn world_position(&self, index: usize) -> Option<Vec2> {
        self.simulation
            .position(index)
            .map(|position| sanitize_position(position, self.surface.center()))
    }

    fn world_radius(&self, index: usize) -> Option<f32> {
        let radius = self.graph.nodes.get(index)?.radius;
        if self.hovered() == Some(index) {
            Some(radius * HOVER_GROWTH)
        } else {
            Some(radius)
        }
    }

    /// Surface-local center and radius of node `index`.
    pub fn screen_node(&self, index: usize) -> Option<(Pos2, f32)> {
        let transform = self.camera.transform();
        let position = self.world_position(index)?;
        let radius = self.world_radius(index)?;
        Some((transform.apply(position), radius * transform.scale))
    }

    pub fn node_style(&self, index: usize) -> Option<NodeStyle> {
        let (center, radius) = self.screen_node(index)?;
        let hovered = self.hovered() == Some(index);
        let stroke_width = if hovered { 2.5 } else { 1.5 };
        let related = self
            .hover
            .as_ref()
            .is_none_or(|hover| hover.node() == index || hover.is_neighbor(index));
        Some(NodeStyle {
            center,
            radius,
            stroke_width: stroke_width * self.camera.transform().scale,
            hovered,
            related,
        })
    }

    pub fn node_label(&self, index: usize) -> Option<String> {
        self.graph.nodes.get(index).map(|node| node.label())
    }

    pub fn edge_style(&self, index: usize) -> Option<EdgeStyle> {
        let edge = self.graph.edges.get(index)?;
        let transform = self.camera.transform();
        let band = edge.band();
        let emphasis = edge_emphasis(self.hover.as_ref(), index);
        let dashed = band == WeightBand::Weak;
        let width = match emphasis {
            EdgeEmphasis::Highlighted => 1.5 + edge.visual_strength,
            EdgeEmphasis::Dimmed => 0.5,
            EdgeEmphasis::Normal if dashed => 0.6,
            EdgeEmphasis::Normal => 1.0 + edge.visual_strength * 0.4,
        };

        Some(EdgeStyle {
            from: transform.apply(self.world_position(edge.source)?),
            to: transform.apply(self.world_position(edge.target)?),
            width: width * transform.scale,
            dashed,
            band,
            emphasis,
        })
    }

    pub fn tooltip(&self) -> Option<TooltipView> {
        if self.tooltip_hidden || self.drag.node().is_some() {
            return None;
        }
        let node = self.graph.nodes.get(self.hovered()?)?;
        Some(TooltipView {
            anchor: self.pointer?,
            content: TooltipContent::for_node(node),
        })
    }

    /// Ambient particles, already mapped to the surface.
    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        let transform = self.camera.transform();
        self.particles.iter().map(move |particle| Particle {
            position: transform.apply(particle.position).to_vec2(),
            radius: particle.radius * transform.scale,
            alpha: particle.alpha,
        })
    }

    pub fn node_at(&self, pointer: Pos2) -> Option<usize> {
        pick_node(
            (0..self.graph.node_count()).filter_map(|index| self.screen_node(index)),
            pointer,
        )
    }

    /// Updates the hovered node; `None` means the pointer left the surface.
    pub fn hover(&mut self, pointer: Option<Pos2>) -> Option<usize> {
        self.pointer = pointer;
        let target = match self.drag.node() {
            Some(node) => Some(node),
            None => pointer.and_then(|pointer| self.node_at(pointer)),
        };

        if target != self.hovered() {
            self.hover = target.map(|node| Hover::new(&self.graph, node));
            self.tooltip_hidden = false;
        }
        target
    }

    /// Starts a press; returns whether it landed on a node.
    pub fn press(&mut self, pointer: Pos2) -> bool {
        let Some(node) = self.node_at(pointer) else {
            return false;
        };
        let Some(position) = self.world_position(node) else {
            return false;
        };

        self.drag.press(node, pointer);
        self.simulation.pin(node, position);
        self.simulation
            .set_alpha_target(self.config.forces.drag_alpha_target);
        self.simulation.restart();
        self.fit_at = None;
        true
    }

    pub fn drag_to(&mut self, pointer: Pos2) {
        self.pointer = Some(pointer);
        if let Some(node) = self.drag.move_to(pointer) {
            let world = self.camera.transform().invert(pointer);
            self.simulation.pin(node, world);
        }
    }

    /// Ends a press. A press that never turned into a drag asks the host to
    /// open the note.
    pub fn release(&mut self) -> Option<NavigationRequest> {
        let release = self.drag.release()?;
        self.simulation.unpin(release.node);
        self.simulation.set_alpha_target(0.0);
        release
            .clicked
            .then(|| self.navigation_for(release.node))
            .flatten()
    }

    /// Discrete click, for hosts that report clicks separately from presses.
    pub fn click(&self, pointer: Pos2) -> Option<NavigationRequest> {
        self.navigation_for(self.node_at(pointer)?)
    }

    fn navigation_for(&self, node: usize) -> Option<NavigationRequest> {
        self.graph.nodes.get(node).map(|node| NavigationRequest {
            note_id: node.id.clone(),
        })
    }

    pub fn wheel(&mut self, pointer: Pos2, scroll: f32) {
        self.camera.zoom_wheel(pointer, scroll, &self.config.view);
        self.tooltip_hidden = true;
    }

    pub fn pinch(&mut self, pointer: Pos2, factor: f32) {
        self.camera.zoom_pinch(pointer, factor, &self.config.view);
        self.tooltip_hidden = true;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan_by(delta);
        self.tooltip_hidden = true;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_about_center(self.config.view.zoom_in_factor);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_about_center(self.config.view.zoom_out_factor);
    }

    fn zoom_about_center(&mut self, factor: f32) {
        let anchor = self.surface.center().to_pos2();
        self.camera
            .zoom_by(anchor, factor, self.clock, &self.config.view);
        self.tooltip_hidden = true;
    }

    pub fn enter_fullscreen(&mut self, size: Vec2) {
        if !self.fullscreen {
            self.windowed = self.surface;
        }
        self.fullscreen = true;
        self.resize(Surface::exact(size));
    }

    /// Leaves fullscreen for the host's freshly measured surface, or the
    /// last windowed one when the host cannot measure.
    pub fn exit_fullscreen(&mut self, natural: Option<Surface>) {
        self.fullscreen = false;
        self.resize(natural.unwrap_or(self.windowed));
    }

    /// Adopts a new surface size: forces re-center on it, the layout warms
    /// up, and a fit is scheduled.
    pub fn resize(&mut self, surface: Surface) {
        if surface == self.surface {
            return;
        }
        self.surface = surface;
        self.simulation.recenter(surface.center());
        let target = if self.drag.node().is_some() {
            self.config.forces.drag_alpha_target
        } else {
            0.0
        };
        self.simulation.set_alpha_target(target);
        self.simulation.reheat(self.config.forces.resize_alpha);
        self.fit_at = Some(self.clock + self.config.view.fit_delay_seconds);
        debug!(
            width = surface.size().x,
            height = surface.size().y,
            fullscreen = self.fullscreen,
            "surface resized"
        );
    }

    /// Stops the view. Nothing ticks or listens after this.
    pub fn teardown(self) {
        debug!(nodes = self.graph.node_count(), "constellation view torn down");
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use crate::notes::CategoryTaxonomy;

    use super::*;

    fn notes() -> Vec<Note> {
        vec![
            Note::new("a").with_category("Philosophy"),
            Note::new("b").with_category("Philosophy"),
            Note::new("c").with_category("Cooking").with_tags(["stoicism"]),
        ]
    }

    fn active(notes: &[Note]) -> Box<GraphViewHandle> {
        let taxonomy = CategoryTaxonomy::default();
        let scorer = SimilarityScorer::new(&taxonomy);
        match render(
            Some(Surface::resolve(800.0, 560.0)),
            notes,
            &scorer,
            &RenderConfig::default(),
        ) {
            RenderOutcome::Active(handle) => handle,
            _ => panic!("expected an active view"),
        }
    }

    fn settle(handle: &mut GraphViewHandle) {
        for _ in 0..2000 {
            let report = handle.advance(1.0 / 60.0);
            if !report.needs_repaint() {
                return;
            }
        }
        panic!("view never came to rest");
    }

    #[test]
    fn surface_defaults() {
        assert_eq!(Surface::resolve(0.0, 100.0).size(), vec2(800.0, 560.0));
        assert_eq!(Surface::resolve(-5.0, 900.0).size(), vec2(800.0, 900.0));
        assert_eq!(Surface::resolve(1024.0, 600.0).center(), vec2(512.0, 300.0));
    }

    #[test]
    fn missing_surface_is_unavailable() {
        let taxonomy = CategoryTaxonomy::default();
        let outcome = render(
            None,
            &notes(),
            &SimilarityScorer::new(&taxonomy),
            &RenderConfig::default(),
        );
        assert!(matches!(outcome, RenderOutcome::Unavailable));
    }

    #[test]
    fn no_notes_shows_empty_state() {
        let taxonomy = CategoryTaxonomy::default();
        let outcome = render(
            Some(Surface::resolve(800.0, 560.0)),
            &[Note::default()],
            &SimilarityScorer::new(&taxonomy),
            &RenderConfig::default(),
        );
        match outcome {
            RenderOutcome::Empty(state) => assert_eq!(state.message, EMPTY_MESSAGE),
            _ => panic!("expected the empty state"),
        }
    }

    #[test]
    fn initial_fit_frames_the_circle() {
        let handle = active(&notes());
        let size = handle.surface().size();
        for index in 0..3 {
            let (center, radius) = handle.screen_node(index).unwrap();
            assert!(center.x - radius >= 0.0 && center.x + radius <= size.x);
            assert!(center.y - radius >= 0.0 && center.y + radius <= size.y);
        }
    }

    #[test]
    fn settling_schedules_an_animated_fit() {
        let mut handle = active(&notes());
        let mut settled_at = None;
        for frame in 0..1000 {
            let report = handle.advance(1.0 / 60.0);
            if report.settled {
                settled_at = Some(frame);
                assert!(report.fit_pending);
                break;
            }
        }
        assert!(settled_at.is_some());

        let mut animated = false;
        for _ in 0..60 {
            animated |= handle.advance(1.0 / 60.0).camera_animating;
        }
        assert!(animated);
        assert!(!handle.advance(1.0 / 60.0).needs_repaint());
        assert_eq!(handle.transform(), handle.fit_target());
    }

    #[test]
    fn click_without_drag_navigates() {
        let mut handle = active(&notes());
        settle(&mut handle);
        let (center, _) = handle.screen_node(1).unwrap();

        assert!(handle.press(center));
        assert!(handle.simulation().nodes()[1].pinned.is_some());
        let request = handle.release();
        assert_eq!(
            request,
            Some(NavigationRequest {
                note_id: "b".to_owned()
            })
        );
        assert!(handle.simulation().nodes()[1].pinned.is_none());
        assert_eq!(handle.simulation().alpha_target(), 0.0);
    }

    #[test]
    fn dragging_moves_the_pinned_node_without_navigating() {
        let mut handle = active(&notes());
        settle(&mut handle);
        let (center, _) = handle.screen_node(0).unwrap();

        assert!(handle.press(center));
        assert_eq!(handle.simulation().alpha_target(), 0.3);
        let target = center + vec2(40.0, 25.0);
        handle.drag_to(target);
        handle.advance(1.0 / 60.0);
        let (moved, _) = handle.screen_node(0).unwrap();
        assert!((moved - target).length() < 1.0);
        assert_eq!(handle.release(), None);
    }

    #[test]
    fn press_on_background_is_ignored() {
        let mut handle = active(&notes());
        assert!(!handle.press(pos2(1.0, 1.0)));
        assert_eq!(handle.release(), None);
    }

    #[test]
    fn hover_enlarges_node_and_exposes_tooltip() {
        let mut handle = active(&notes());
        settle(&mut handle);
        let (center, radius) = handle.screen_node(2).unwrap();

        assert_eq!(handle.hover(Some(center)), Some(2));
        let (_, hovered_radius) = handle.screen_node(2).unwrap();
        assert!((hovered_radius - radius * 1.4).abs() < 1e-3);

        let tooltip = handle.tooltip().unwrap();
        assert_eq!(tooltip.anchor, center);
        assert_eq!(tooltip.content.tags, vec!["stoicism".to_owned()]);

        handle.wheel(center, 10.0);
        assert!(handle.tooltip().is_none());

        handle.hover(None);
        assert_eq!(handle.hovered(), None);
    }

    #[test]
    fn hovered_edges_are_highlighted() {
        let mut handle = active(&notes());
        settle(&mut handle);
        let edge = handle.graph().edges[0].clone();
        let normal = handle.edge_style(0).unwrap();
        assert_eq!(normal.emphasis, EdgeEmphasis::Normal);
        assert!(!normal.dashed);

        let (center, _) = handle.screen_node(edge.source).unwrap();
        handle.hover(Some(center));
        let highlighted = handle.edge_style(0).unwrap();
        assert_eq!(highlighted.emphasis, EdgeEmphasis::Highlighted);
        assert!(highlighted.width > normal.width);

        let other = edge.other_end(edge.source).unwrap();
        assert!(handle.node_style(edge.source).unwrap().related);
        assert!(handle.node_style(other).unwrap().related);
        assert!(!handle.node_style(2).unwrap().related);

        handle.hover(None);
        assert!(handle.node_style(2).unwrap().related);
    }

    #[test]
    fn fullscreen_round_trip_refits() {
        let mut handle = active(&notes());
        settle(&mut handle);

        handle.enter_fullscreen(vec2(1920.0, 1080.0));
        assert!(handle.is_fullscreen());
        assert_eq!(handle.simulation().center(), vec2(960.0, 540.0));
        assert!(handle.simulation().is_running());
        settle(&mut handle);
        for index in 0..3 {
            let (center, _) = handle.screen_node(index).unwrap();
            assert!(center.x > 0.0 && center.x < 1920.0);
            assert!(center.y > 0.0 && center.y < 1080.0);
        }

        handle.exit_fullscreen(None);
        assert!(!handle.is_fullscreen());
        assert_eq!(handle.surface().size(), vec2(800.0, 560.0));
        settle(&mut handle);
    }

    #[test]
    fn leaving_fullscreen_adopts_the_measured_surface() {
        let mut handle = active(&notes());
        settle(&mut handle);

        handle.enter_fullscreen(vec2(1920.0, 1080.0));
        settle(&mut handle);

        handle.exit_fullscreen(Some(Surface::exact(vec2(1000.0, 700.0))));
        assert!(!handle.is_fullscreen());
        assert_eq!(handle.surface().size(), vec2(1000.0, 700.0));
        assert_eq!(handle.simulation().center(), vec2(500.0, 350.0));
        assert!(handle.is_fit_pending());
        assert!(handle.simulation().is_running());
    }

    #[test]
    fn short_surface_keeps_every_node_visible() {
        let notes = (0..12)
            .map(|index| {
                let category = if index % 2 == 0 { "Philosophy" } else { "Cooking" };
                Note::new(format!("n{index}")).with_category(category)
            })
            .collect::<Vec<_>>();
        let taxonomy = CategoryTaxonomy::default();
        let mut outcome = render(
            Some(Surface::exact(vec2(800.0, 440.0))),
            &notes,
            &SimilarityScorer::new(&taxonomy),
            &RenderConfig::default(),
        );
        let handle = outcome.handle_mut().unwrap();
        assert_eq!(handle.surface().size(), vec2(800.0, 440.0));
        settle(handle);

        for index in 0..notes.len() {
            let (center, radius) = handle.screen_node(index).unwrap();
            assert!(center.x - radius >= -0.01 && center.x + radius <= 800.01);
            assert!(center.y - radius >= -0.01 && center.y + radius <= 440.01);
        }
    }

    #[test]
    fn resizing_mid_drag_keeps_the_layout_warm() {
        let mut handle = active(&notes());
        settle(&mut handle);
        let (center, _) = handle.screen_node(0).unwrap();
        assert!(handle.press(center));

        handle.enter_fullscreen(vec2(1280.0, 720.0));
        assert_eq!(handle.simulation().alpha_target(), 0.3);
        assert!(handle.simulation().nodes()[0].pinned.is_some());

        handle.release();
        assert_eq!(handle.simulation().alpha_target(), 0.0);
    }

    #[test]
    fn particles_are_deterministic_and_in_range() {
        let first = active(&notes());
        let second = active(&notes());
        let a = first.particles.clone();
        assert_eq!(a, second.particles);
        assert_eq!(a.len(), PARTICLE_COUNT);
        for particle in a {
            assert!((0.0..=800.0).contains(&particle.position.x));
            assert!((0.0..=560.0).contains(&particle.position.y));
            assert!((0.3..=1.5).contains(&particle.radius));
            assert!((0.05..=0.35).contains(&particle.alpha));
        }
    }
}
