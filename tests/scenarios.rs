use constellation::graph::build_graph;
use constellation::notes::{CategoryTaxonomy, Note};
use constellation::similarity::{SimilarityScorer, WeightBand, tag_similarity};
use constellation::view::{EMPTY_MESSAGE, RenderConfig, RenderOutcome, Surface, render};
use eframe::egui::vec2;

fn science() -> CategoryTaxonomy {
    CategoryTaxonomy::default()
        .with_group("Physics", "Science")
        .with_group("Chemistry", "Science")
}

#[test]
fn same_category_makes_a_strong_edge() {
    let taxonomy = CategoryTaxonomy::default();
    let scorer = SimilarityScorer::new(&taxonomy);
    let notes = vec![
        Note::new("a").with_category("Philosophy"),
        Note::new("b").with_category("Philosophy"),
    ];

    let graph = build_graph(&notes, &scorer);
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges[0];
    assert!((edge.weight - 0.8).abs() < 1e-12);
    assert_eq!(edge.band(), WeightBand::Strong);
    assert_eq!(edge.band().link_distance(), 150.0);
}

#[test]
fn sibling_categories_meet_at_the_medium_boundary() {
    let taxonomy = science();
    let scorer = SimilarityScorer::new(&taxonomy);
    let notes = vec![
        Note::new("a").with_category("Physics"),
        Note::new("b").with_category("Chemistry"),
    ];

    let graph = build_graph(&notes, &scorer);
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges[0];
    assert!((edge.weight - 0.4).abs() < 1e-12);
    assert_eq!(edge.band(), WeightBand::Medium);
    assert_eq!(edge.shared_labels, vec!["[Science]".to_owned()]);
}

#[test]
fn overlapping_tags_alone_reach_a_weak_edge() {
    // bigrams: 7 shared of 20 distinct; characters: 10 shared of 14 distinct
    let expected_tag = (7.0 / 20.0) * 1.2 + (10.0 / 14.0) * 0.5;
    let tag = tag_similarity("medical system", "medical tourism");
    assert!((tag - expected_tag).abs() < 1e-12);

    let taxonomy = CategoryTaxonomy::default();
    let scorer = SimilarityScorer::new(&taxonomy);
    let notes = vec![
        Note::new("a")
            .with_category("Medicine")
            .with_tags(["medical system"]),
        Note::new("b")
            .with_category("Travel")
            .with_tags(["medical tourism"]),
    ];

    let score = scorer.score(&notes[0], &notes[1]);
    assert_eq!(score.category, 0.0);
    assert!((score.weight - expected_tag * 0.2).abs() < 1e-12);
    assert!((score.weight - 0.155_43).abs() < 1e-4);

    let graph = build_graph(&notes, &scorer);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges[0].band(), WeightBand::Weak);
}

#[test]
fn no_notes_renders_the_empty_state() {
    let taxonomy = CategoryTaxonomy::default();
    let scorer = SimilarityScorer::new(&taxonomy);

    let outcome = render(
        Some(Surface::resolve(900.0, 600.0)),
        &[],
        &scorer,
        &RenderConfig::default(),
    );
    match outcome {
        RenderOutcome::Empty(empty) => {
            assert_eq!(empty.message, EMPTY_MESSAGE);
            assert_eq!(empty.surface.size(), vec2(900.0, 600.0));
        }
        _ => panic!("expected the empty state"),
    }
}

#[test]
fn single_note_settles_and_fits_without_dividing_by_zero() {
    let taxonomy = CategoryTaxonomy::default();
    let scorer = SimilarityScorer::new(&taxonomy);
    let notes = vec![Note::new("solo").with_core("a lone thought")];

    let mut outcome = render(
        Some(Surface::resolve(800.0, 600.0)),
        &notes,
        &scorer,
        &RenderConfig::default(),
    );
    let handle = outcome.handle_mut().expect("one note draws a view");
    assert_eq!(handle.graph().node_count(), 1);
    assert_eq!(handle.graph().edge_count(), 0);
    let (before, _) = handle.screen_node(0).expect("node on screen");

    let report = handle.advance(1.0 / 60.0);
    assert!(report.settled);
    assert!(handle.simulation().is_settled());

    let size = handle.surface().size();
    for _ in 0..60 {
        handle.advance(1.0 / 60.0);
        assert!(handle.transform().is_finite());
        let (center, radius) = handle.screen_node(0).expect("node on screen");
        assert!(radius > 0.0);
        assert!(center.x >= 0.0 && center.x <= size.x);
        assert!(center.y >= 0.0 && center.y <= size.y);
        // the framed node never jumps while the camera refits
        assert!((center - before).length() < 0.5);
    }
}

#[test]
fn notes_without_ids_stay_off_the_map() {
    let taxonomy = CategoryTaxonomy::default();
    let scorer = SimilarityScorer::new(&taxonomy);
    let mut anonymous = Note::new("x").with_category("Philosophy");
    anonymous.id = None;
    let notes = vec![anonymous, Note::new("kept").with_category("Philosophy")];

    let graph = build_graph(&notes, &scorer);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes[0].id, "kept");
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn rendering_twice_gives_independent_equivalent_views() {
    let taxonomy = science();
    let scorer = SimilarityScorer::new(&taxonomy);
    let notes = vec![
        Note::new("a").with_category("Physics"),
        Note::new("b").with_category("Chemistry"),
        Note::new("c").with_category("Physics"),
    ];
    let surface = Some(Surface::resolve(800.0, 600.0));
    let config = RenderConfig::default();

    let mut first = render(surface, &notes, &scorer, &config);
    let second = render(surface, &notes, &scorer, &config);
    let first = first.handle_mut().expect("first view");
    let second = second.handle().expect("second view");

    assert_eq!(first.graph(), second.graph());
    assert_eq!(first.transform(), second.transform());

    for _ in 0..30 {
        first.advance(1.0 / 60.0);
    }
    assert_ne!(first.simulation().alpha(), second.simulation().alpha());
}
