use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::graph::{GraphNode, KnowledgeGraph};
use crate::util::truncate_chars;

pub const PREVIEW_CHARS: usize = 60;
pub const TOOLTIP_TAGS: usize = 8;
pub const HOVER_GROWTH: f32 = 1.4;

const TOOLTIP_OFFSET: Vec2 = vec2(16.0, -12.0);
/// Flipped tooltips sit this many of their own widths left of the anchor.
const TOOLTIP_FLIP: f32 = 1.1;
/// Pointer travel, in screen points, before a press becomes a drag.
const DRAG_SLOP: f32 = 3.0;

/// The node under the pointer and the edges that touch it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hover {
    node: usize,
    edges: HashSet<usize>,
    neighbors: HashSet<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
    Normal,
    Highlighted,
    Dimmed,
}

impl Hover {
    pub fn new(graph: &KnowledgeGraph, node: usize) -> Self {
        Self {
            node,
            edges: graph.edges_of(node).iter().copied().collect(),
            neighbors: graph.neighbors(node).collect(),
        }
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn touches_edge(&self, edge: usize) -> bool {
        self.edges.contains(&edge)
    }

    pub fn is_neighbor(&self, node: usize) -> bool {
        self.neighbors.contains(&node)
    }
}

pub fn edge_emphasis(hover: Option<&Hover>, edge: usize) -> EdgeEmphasis {
    match hover {
        None => EdgeEmphasis::Normal,
        Some(hover) if hover.touches_edge(edge) => EdgeEmphasis::Highlighted,
        Some(_) => EdgeEmphasis::Dimmed,
    }
}

/// Closest node whose disc contains `pointer`.
pub fn pick_node(nodes: impl IntoIterator<Item = (Pos2, f32)>, pointer: Pos2) -> Option<usize> {
    nodes
        .into_iter()
        .enumerate()
        .filter_map(|(index, (center, radius))| {
            let distance = center.distance(pointer);
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipContent {
    pub preview: String,
    pub tags: Vec<String>,
    pub date: String,
}

impl TooltipContent {
    pub fn for_node(node: &GraphNode) -> Self {
        Self {
            preview: truncate_chars(&node.display_content, PREVIEW_CHARS),
            tags: node.note.tags.iter().take(TOOLTIP_TAGS).cloned().collect(),
            date: node.note.date.trim().to_owned(),
        }
    }
}

/// Top-left corner for a tooltip of `size` anchored at `pointer`. The box
/// opens to the right of the pointer unless that would overflow the view, in
/// which case it opens to the left.
pub fn place_tooltip(pointer: Pos2, size: Vec2, view: Vec2) -> Pos2 {
    let mut corner = pointer + TOOLTIP_OFFSET;
    if corner.x + size.x > view.x {
        corner.x -= size.x * TOOLTIP_FLIP;
    }
    pos2(corner.x.max(0.0), corner.y.max(0.0))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        node: usize,
        origin: Pos2,
    },
    Dragging {
        node: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Release {
    pub node: usize,
    /// The pointer never left the slop radius.
    pub clicked: bool,
}

impl DragState {
    pub fn press(&mut self, node: usize, pointer: Pos2) {
        *self = Self::Pressed {
            node,
            origin: pointer,
        };
    }

    /// Returns the node to move once the gesture counts as a drag.
    pub fn move_to(&mut self, pointer: Pos2) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Pressed { node, origin } => {
                if origin.distance(pointer) > DRAG_SLOP {
                    *self = Self::Dragging { node };
                    Some(node)
                } else {
                    None
                }
            }
            Self::Dragging { node } => Some(node),
        }
    }

    pub fn release(&mut self) -> Option<Release> {
        let released = match *self {
            Self::Idle => None,
            Self::Pressed { node, .. } => Some(Release {
                node,
                clicked: true,
            }),
            Self::Dragging { node } => Some(Release {
                node,
                clicked: false,
            }),
        };
        *self = Self::Idle;
        released
    }

    pub fn node(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Pressed { node, .. } | Self::Dragging { node } => Some(node),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Asks the host to open a note, emitted when a node is clicked without
/// being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    pub note_id: String,
}

#[cfg(test)]
mod tests {
    use crate::graph::build_graph;
    use crate::notes::{CategoryTaxonomy, Note};
    use crate::similarity::SimilarityScorer;

    use super::*;

    #[test]
    fn tooltip_flips_near_right_edge() {
        let view = vec2(800.0, 560.0);
        let size = vec2(200.0, 80.0);

        let left = place_tooltip(pos2(100.0, 100.0), size, view);
        assert_eq!(left, pos2(116.0, 88.0));

        let right = place_tooltip(pos2(700.0, 100.0), size, view);
        assert_eq!(right, pos2(716.0 - 220.0, 88.0));
        assert!(right.x + size.x <= view.x);
    }

    #[test]
    fn tooltip_preview_and_tags_are_capped() {
        let note = Note::new("a")
            .with_core("x".repeat(100))
            .with_tags((0..12).map(|index| format!("t{index}")));
        let content = TooltipContent::for_node(&GraphNode::from_note("a", &note));
        assert_eq!(content.preview.chars().count(), 61);
        assert!(content.preview.ends_with('…'));
        assert_eq!(content.tags.len(), 8);
        assert_eq!(content.date, "");
    }

    #[test]
    fn press_without_movement_is_a_click() {
        let mut drag = DragState::default();
        drag.press(3, pos2(10.0, 10.0));
        assert_eq!(drag.move_to(pos2(11.0, 11.0)), None);
        assert_eq!(
            drag.release(),
            Some(Release {
                node: 3,
                clicked: true
            })
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn moving_past_slop_starts_a_drag() {
        let mut drag = DragState::default();
        drag.press(1, pos2(0.0, 0.0));
        assert_eq!(drag.move_to(pos2(10.0, 0.0)), Some(1));
        assert_eq!(drag.move_to(pos2(0.0, 0.0)), Some(1));
        assert!(drag.is_dragging());
        assert_eq!(drag.release().map(|release| release.clicked), Some(false));
        assert_eq!(drag.release(), None);
    }

    #[test]
    fn hover_splits_edges_into_highlighted_and_dimmed() {
        let notes = vec![
            Note::new("a").with_category("Philosophy"),
            Note::new("b").with_category("Philosophy"),
            Note::new("c").with_category("Cooking"),
            Note::new("d").with_category("Cooking"),
        ];
        let taxonomy = CategoryTaxonomy::default();
        let graph = build_graph(&notes, &SimilarityScorer::new(&taxonomy));
        assert_eq!(graph.edge_count(), 2);

        let hover = Hover::new(&graph, 0);
        assert!(hover.is_neighbor(1));
        assert!(!hover.is_neighbor(2));
        assert_eq!(edge_emphasis(Some(&hover), 0), EdgeEmphasis::Highlighted);
        assert_eq!(edge_emphasis(Some(&hover), 1), EdgeEmphasis::Dimmed);
        assert_eq!(edge_emphasis(None, 1), EdgeEmphasis::Normal);
    }

    #[test]
    fn pick_prefers_the_closest_disc() {
        let nodes = [(pos2(0.0, 0.0), 10.0), (pos2(6.0, 0.0), 10.0)];
        assert_eq!(pick_node(nodes, pos2(5.0, 0.0)), Some(1));
        assert_eq!(pick_node(nodes, pos2(50.0, 0.0)), None);
    }
}
