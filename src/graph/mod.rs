mod build;

use std::collections::HashMap;

use crate::notes::Note;
use crate::similarity::WeightBand;
use crate::util::{stable_hash, truncate_chars};

pub use build::build_graph;

pub const COLOR_GROUPS: usize = 5;
pub const MIN_NODE_RADIUS: f32 = 8.0;
pub const MAX_NODE_RADIUS: f32 = 18.0;

const LABEL_CHARS: usize = 8;

/// Rendering tint for a node; carries no meaning beyond telling nodes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tint {
    Rose,
    Sky,
    Sage,
    Amber,
    Plum,
}

impl Tint {
    pub const ALL: [Tint; COLOR_GROUPS] =
        [Self::Rose, Self::Sky, Self::Sage, Self::Amber, Self::Plum];

    pub fn from_group(group: usize) -> Self {
        Self::ALL[group % COLOR_GROUPS]
    }
}

pub fn color_group(id: &str) -> usize {
    (stable_hash(id).unsigned_abs() % COLOR_GROUPS as u32) as usize
}

pub fn node_radius(content: &str) -> f32 {
    let length = content.chars().count() as f32;
    (MIN_NODE_RADIUS + length / 20.0).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub display_content: String,
    pub radius: f32,
    pub color_group: usize,
    pub note: Note,
}

impl GraphNode {
    pub fn from_note(id: &str, note: &Note) -> Self {
        let display_content = note.display_content();
        Self {
            id: id.to_owned(),
            radius: node_radius(&display_content),
            color_group: color_group(id),
            display_content,
            note: note.clone(),
        }
    }

    pub fn tint(&self) -> Tint {
        Tint::from_group(self.color_group)
    }

    /// Short caption drawn under the node.
    pub fn label(&self) -> String {
        truncate_chars(&self.display_content, LABEL_CHARS)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub source_id: String,
    pub target_id: String,
    pub weight: f64,
    pub shared_labels: Vec<String>,
    pub visual_strength: f32,
}

impl GraphEdge {
    pub fn band(&self) -> WeightBand {
        WeightBand::classify(self.weight).unwrap_or(WeightBand::Weak)
    }

    pub fn other_end(&self, index: usize) -> Option<usize> {
        if self.source == index {
            Some(self.target)
        } else if self.target == index {
            Some(self.source)
        } else {
            None
        }
    }
}

pub fn visual_strength(weight: f64) -> f32 {
    ((weight * 2.5).min(4.0) as f32).max(0.5)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    edges_by_node: Vec<Vec<usize>>,
}

impl KnowledgeGraph {
    pub(crate) fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut edges_by_node = vec![Vec::new(); nodes.len()];
        for (edge_index, edge) in edges.iter().enumerate() {
            if edge.source < nodes.len() && edge.target < nodes.len() {
                edges_by_node[edge.source].push(edge_index);
                edges_by_node[edge.target].push(edge_index);
            }
        }

        Self {
            nodes,
            edges,
            index_by_id,
            edges_by_node,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    /// Indices into `edges` of every edge touching `index`.
    pub fn edges_of(&self, index: usize) -> &[usize] {
        self.edges_by_node
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.edges_of(index).len()
    }

    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges_of(index)
            .iter()
            .filter_map(move |&edge| self.edges[edge].other_end(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_with_content_and_is_clamped() {
        assert_eq!(node_radius(""), 8.0);
        assert_eq!(node_radius(&"x".repeat(40)), 10.0);
        assert_eq!(node_radius(&"x".repeat(1000)), 18.0);
    }

    #[test]
    fn color_group_is_stable_and_in_range() {
        for id in ["", "a", "n_1700000000000_abc1234", "笔记", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            let group = color_group(id);
            assert!(group < COLOR_GROUPS);
            assert_eq!(group, color_group(id));
        }
        // 97 % 5
        assert_eq!(color_group("a"), 2);
        assert_eq!(Tint::from_group(color_group("a")), Tint::Sage);
    }

    #[test]
    fn visual_strength_is_clamped_and_monotonic() {
        assert_eq!(visual_strength(0.15), 0.5);
        assert!((visual_strength(0.4) - 1.0).abs() < 1e-6);
        assert_eq!(visual_strength(1.0), 2.5);
        let mut previous = 0.0;
        for step in 15..=100 {
            let strength = visual_strength(step as f64 / 100.0);
            assert!((0.5..=4.0).contains(&strength));
            assert!(strength >= previous);
            previous = strength;
        }
    }

    #[test]
    fn labels_are_truncated_to_eight_chars() {
        let note = Note::new("a").with_core("A rather long thought");
        let node = GraphNode::from_note("a", &note);
        assert_eq!(node.label(), "A rather…");
    }
}
