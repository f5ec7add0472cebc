use std::collections::HashSet;

use tracing::debug;

use crate::notes::Note;
use crate::similarity::{EDGE_THRESHOLD, SimilarityScorer};

use super::{GraphEdge, GraphNode, KnowledgeGraph, visual_strength};

fn eligible_notes(notes: &[Note]) -> Vec<(&str, &Note)> {
    let mut seen = HashSet::with_capacity(notes.len());
    notes
        .iter()
        .filter_map(|note| note.usable_id().map(|id| (id, note)))
        .filter(|(id, _)| seen.insert(*id))
        .collect()
}

/// Builds the similarity graph. Every unordered pair is scored, which keeps
/// this quadratic in the number of notes.
pub fn build_graph(notes: &[Note], scorer: &SimilarityScorer<'_>) -> KnowledgeGraph {
    let eligible = eligible_notes(notes);
    let nodes = eligible
        .iter()
        .map(|(id, note)| GraphNode::from_note(id, note))
        .collect::<Vec<_>>();

    let mut edges = Vec::new();
    for (source, (source_id, source_note)) in eligible.iter().enumerate() {
        for (offset, (target_id, target_note)) in eligible[source + 1..].iter().enumerate() {
            let score = scorer.score(source_note, target_note);
            if score.weight < EDGE_THRESHOLD {
                continue;
            }

            edges.push(GraphEdge {
                source,
                target: source + 1 + offset,
                source_id: (*source_id).to_owned(),
                target_id: (*target_id).to_owned(),
                weight: score.weight,
                shared_labels: score.shared_labels(),
                visual_strength: visual_strength(score.weight),
            });
        }
    }

    debug!(
        notes = notes.len(),
        nodes = nodes.len(),
        dropped = notes.len() - nodes.len(),
        edges = edges.len(),
        "built knowledge graph"
    );

    KnowledgeGraph::from_parts(nodes, edges)
}

#[cfg(test)]
mod tests {
    use crate::notes::CategoryTaxonomy;

    use super::*;

    fn build(notes: &[Note]) -> KnowledgeGraph {
        let taxonomy = CategoryTaxonomy::default().with_group("Physics", "Science");
        build_graph(notes, &SimilarityScorer::new(&taxonomy))
    }

    #[test]
    fn notes_without_ids_are_excluded() {
        let mut anonymous = Note::default().with_category("Philosophy");
        anonymous.id = Some(String::new());
        let notes = vec![
            Note::new("a").with_category("Philosophy"),
            anonymous,
            Note::default().with_category("Philosophy"),
        ];

        let graph = build(&notes);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_ids_keep_the_first_note() {
        let notes = vec![
            Note::new("a").with_core("first"),
            Note::new("a").with_core("second"),
        ];
        let graph = build(&notes);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].display_content, "first");
    }

    #[test]
    fn same_category_links_strongly() {
        let notes = vec![
            Note::new("a").with_category("Philosophy"),
            Note::new("b").with_category("Philosophy"),
            Note::new("c").with_category("Cooking"),
        ];
        let graph = build(&notes);
        assert_eq!(graph.edge_count(), 1);

        let edge = &graph.edges[0];
        assert_eq!((edge.source, edge.target), (0, 1));
        assert_eq!((edge.source_id.as_str(), edge.target_id.as_str()), ("a", "b"));
        assert_eq!(edge.weight, 0.8);
        assert_eq!(edge.shared_labels, vec!["[Philosophy]".to_owned()]);
        assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn identical_tag_is_labelled_once() {
        let notes = vec![
            Note::new("a").with_tags(["stoicism"]),
            Note::new("b").with_tags(["stoicism"]),
        ];
        let graph = build(&notes);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges[0].shared_labels, vec!["stoicism".to_owned()]);
        assert!((graph.edges[0].weight - 0.2).abs() < 1e-12);
    }
}
