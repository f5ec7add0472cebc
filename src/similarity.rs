//! Pairwise note similarity: category proximity plus fuzzy tag overlap.

use std::collections::HashSet;

use crate::notes::{CategoryTaxonomy, Note};

pub const CATEGORY_WEIGHT: f64 = 0.8;
pub const TAG_WEIGHT: f64 = 0.2;
pub const EDGE_THRESHOLD: f64 = 0.15;

const CONTAINMENT_SCORE: f64 = 0.9;
const BIGRAM_FACTOR: f64 = 1.2;
const CHAR_FACTOR: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeightBand {
    Strong,
    Medium,
    Weak,
}

impl WeightBand {
    /// `None` when the weight is below the edge threshold.
    pub fn classify(weight: f64) -> Option<Self> {
        if weight >= 0.8 {
            Some(Self::Strong)
        } else if weight >= 0.4 {
            Some(Self::Medium)
        } else if weight >= EDGE_THRESHOLD {
            Some(Self::Weak)
        } else {
            None
        }
    }

    pub fn link_distance(self) -> f32 {
        match self {
            Self::Strong => 150.0,
            Self::Medium => 330.0,
            Self::Weak => 675.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Medium => "medium",
            Self::Weak => "weak",
        }
    }
}

pub fn category_score(a: &str, b: &str, taxonomy: &CategoryTaxonomy) -> f64 {
    let (a, b) = (a.trim(), b.trim());
    if taxonomy.is_other(a) || taxonomy.is_other(b) {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    match (taxonomy.group_of(a), taxonomy.group_of(b)) {
        (Some(group_a), Some(group_b)) if group_a == group_b => 0.5,
        _ => 0.0,
    }
}

fn bigrams(text: &str) -> HashSet<(char, char)> {
    let chars = text.chars().collect::<Vec<_>>();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

pub fn tag_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(b) || b.contains(a) {
        return CONTAINMENT_SCORE;
    }

    let bigram_score = jaccard(&bigrams(a), &bigrams(b));
    let char_score = jaccard(
        &a.chars().collect::<HashSet<_>>(),
        &b.chars().collect::<HashSet<_>>(),
    );
    (bigram_score * BIGRAM_FACTOR + char_score * CHAR_FACTOR).min(1.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagMatch {
    pub left: String,
    pub right: String,
    pub score: f64,
}

impl TagMatch {
    pub fn label(&self) -> String {
        if self.left == self.right {
            self.left.clone()
        } else {
            format!("{} ≈ {}", self.left, self.right)
        }
    }
}

/// Highest scoring pair across both tag lists; the first pair reaching the
/// maximum wins. `None` when nothing overlaps at all.
pub fn best_tag_match(tags_a: &[&str], tags_b: &[&str]) -> Option<TagMatch> {
    let mut best: Option<TagMatch> = None;
    for left in tags_a {
        for right in tags_b {
            let score = tag_similarity(left, right);
            let current = best.as_ref().map_or(0.0, |found| found.score);
            if score > current {
                best = Some(TagMatch {
                    left: (*left).to_owned(),
                    right: (*right).to_owned(),
                    score,
                });
            }
        }
    }
    best
}

pub fn edge_weight(category: f64, tags: f64) -> f64 {
    category * CATEGORY_WEIGHT + tags * TAG_WEIGHT
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairScore {
    pub category: f64,
    /// Shared category (exact match) or shared parent group.
    pub category_label: Option<String>,
    pub tags: Option<TagMatch>,
    pub weight: f64,
}

impl PairScore {
    pub fn tag_score(&self) -> f64 {
        self.tags.as_ref().map_or(0.0, |found| found.score)
    }

    pub fn band(&self) -> Option<WeightBand> {
        WeightBand::classify(self.weight)
    }

    /// Human-readable reasons for the connection, at most two.
    pub fn shared_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(2);
        if self.category >= 0.5
            && let Some(category) = &self.category_label
        {
            labels.push(format!("[{category}]"));
        }
        if let Some(tags) = &self.tags {
            labels.push(tags.label());
        }
        labels
    }
}

pub struct SimilarityScorer<'a> {
    taxonomy: &'a CategoryTaxonomy,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(taxonomy: &'a CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        self.taxonomy
    }

    pub fn score(&self, a: &Note, b: &Note) -> PairScore {
        let category_a = self.taxonomy.normalize(&a.parent_category);
        let category_b = self.taxonomy.normalize(&b.parent_category);
        let category = category_score(&category_a, &category_b, self.taxonomy);
        let category_label = if category >= 1.0 {
            Some(category_a)
        } else if category > 0.0 {
            self.taxonomy.group_of(&category_a).map(str::to_owned)
        } else {
            None
        };

        let tags_a = a.real_tags(|tag| self.taxonomy.is_placeholder_tag(tag));
        let tags_b = b.real_tags(|tag| self.taxonomy.is_placeholder_tag(tag));
        let tags = best_tag_match(&tags_a, &tags_b);
        let weight = edge_weight(category, tags.as_ref().map_or(0.0, |found| found.score));

        PairScore {
            category,
            category_label,
            tags,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn science() -> CategoryTaxonomy {
        CategoryTaxonomy::default()
            .with_group("Physics", "Science")
            .with_group("Chemistry", "Science")
            .with_group("Poetry", "Literature")
    }

    #[test]
    fn category_score_has_three_levels() {
        let taxonomy = science();
        assert_eq!(category_score("Physics", "Physics", &taxonomy), 1.0);
        assert_eq!(category_score("Physics", "Chemistry", &taxonomy), 0.5);
        assert_eq!(category_score("Physics", "Poetry", &taxonomy), 0.0);
        assert_eq!(category_score("Cooking", "Gardening", &taxonomy), 0.0);
    }

    #[test]
    fn other_never_matches_even_itself() {
        let taxonomy = science();
        assert_eq!(category_score("Other", "Other", &taxonomy), 0.0);
        assert_eq!(category_score("", "", &taxonomy), 0.0);
        assert_eq!(category_score("Physics", "Other", &taxonomy), 0.0);
    }

    #[test]
    fn tag_similarity_levels() {
        assert_eq!(tag_similarity("rust", "rust"), 1.0);
        assert_eq!(tag_similarity(" rust ", "rust"), 1.0);
        assert_eq!(tag_similarity("rust", "rust async"), 0.9);
        assert_eq!(tag_similarity("", "rust"), 0.0);
        assert_eq!(tag_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn tag_similarity_uses_bigram_and_char_jaccard() {
        // bigrams {ab, bc} vs {ab, bd}: 1/3; chars {a,b,c} vs {a,b,d}: 2/4
        let expected = (1.0 / 3.0) * 1.2 + 0.5 * 0.5;
        assert!((tag_similarity("abc", "abd") - expected).abs() < 1e-12);
    }

    #[test]
    fn tag_similarity_saturates_at_one() {
        // anagram-like overlap pushes the raw sum past one
        let score = tag_similarity("abab", "baba");
        assert!(score <= 1.0);
    }

    #[test]
    fn cjk_tags_share_partial_credit() {
        let score = tag_similarity("医疗系统能力", "医疗旅游");
        assert!(score > 0.0 && score < 0.9);
    }

    #[test]
    fn best_match_keeps_first_maximum() {
        let found = best_tag_match(&["alpha", "beta"], &["beta", "alpha"]).unwrap();
        assert_eq!(found.left, "alpha");
        assert_eq!(found.right, "alpha");
        assert_eq!(found.score, 1.0);

        assert!(best_tag_match(&["abc"], &["xyz"]).is_none());
        assert!(best_tag_match(&[], &["xyz"]).is_none());
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(WeightBand::classify(0.8), Some(WeightBand::Strong));
        assert_eq!(WeightBand::classify(0.79), Some(WeightBand::Medium));
        assert_eq!(WeightBand::classify(0.4), Some(WeightBand::Medium));
        assert_eq!(WeightBand::classify(0.39), Some(WeightBand::Weak));
        assert_eq!(WeightBand::classify(0.15), Some(WeightBand::Weak));
        assert_eq!(WeightBand::classify(0.149), None);
        assert_eq!(WeightBand::Strong.link_distance(), 150.0);
        assert_eq!(WeightBand::Medium.link_distance(), 330.0);
        assert_eq!(WeightBand::Weak.link_distance(), 675.0);
    }

    #[test]
    fn scorer_labels_group_matches_with_the_group() {
        let taxonomy = science();
        let scorer = SimilarityScorer::new(&taxonomy);
        let a = Note::new("a").with_category("Physics").with_tags(["optics"]);
        let b = Note::new("b").with_category("Chemistry").with_tags(["optics lab"]);

        let score = scorer.score(&a, &b);
        assert_eq!(score.category, 0.5);
        assert_eq!(
            score.shared_labels(),
            vec!["[Science]".to_owned(), "optics ≈ optics lab".to_owned()]
        );
        assert!((score.weight - (0.4 + 0.9 * 0.2)).abs() < 1e-12);
    }

    #[test]
    fn placeholder_tags_are_ignored() {
        let taxonomy = CategoryTaxonomy::default();
        let scorer = SimilarityScorer::new(&taxonomy);
        let a = Note::new("a").with_tags(["unclassified"]);
        let b = Note::new("b").with_tags(["unclassified"]);
        let score = scorer.score(&a, &b);
        assert!(score.tags.is_none());
        assert_eq!(score.weight, 0.0);
    }
}
