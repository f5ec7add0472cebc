use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::Note;

/// Fine-grained category to coarse group lookup, raw-name aliases, and the
/// labels that mean "no category".
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryTaxonomy {
    pub groups: HashMap<String, String>,
    pub aliases: HashMap<String, String>,
    pub other_labels: Vec<String>,
    pub placeholder_tags: Vec<String>,
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
            aliases: HashMap::new(),
            other_labels: vec!["Other".to_owned()],
            placeholder_tags: vec!["unclassified".to_owned()],
        }
    }
}

impl CategoryTaxonomy {
    pub fn with_group(mut self, category: &str, group: &str) -> Self {
        self.groups.insert(category.to_owned(), group.to_owned());
        self
    }

    pub fn other_label(&self) -> &str {
        self.other_labels
            .first()
            .map(String::as_str)
            .unwrap_or("Other")
    }

    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.other_label().to_owned();
        }

        match self.aliases.get(trimmed) {
            Some(canonical) if !canonical.trim().is_empty() => canonical.trim().to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    pub fn is_other(&self, category: &str) -> bool {
        let category = category.trim();
        category.is_empty() || self.other_labels.iter().any(|label| label == category)
    }

    pub fn group_of(&self, category: &str) -> Option<&str> {
        self.groups
            .get(category.trim())
            .map(String::as_str)
            .filter(|group| !group.is_empty())
    }

    pub fn is_placeholder_tag(&self, tag: &str) -> bool {
        self.placeholder_tags.iter().any(|placeholder| placeholder == tag)
    }

    /// Notes bucketed by normalized category, alphabetical, with the "no
    /// category" bucket last. Notes keep their input order within a bucket.
    pub fn bucket_notes<'a>(&self, notes: &'a [Note]) -> Vec<(String, Vec<&'a Note>)> {
        let mut named = BTreeMap::<String, Vec<&'a Note>>::new();
        let mut other = Vec::new();
        for note in notes {
            let category = self.normalize(&note.parent_category);
            if self.is_other(&category) {
                other.push(note);
            } else {
                named.entry(category).or_default().push(note);
            }
        }

        let mut buckets = named.into_iter().collect::<Vec<_>>();
        if !other.is_empty() {
            buckets.push((self.other_label().to_owned(), other));
        }
        buckets
    }
}
