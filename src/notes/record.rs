use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const UNTITLED: &str = "Untitled";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Note {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub body: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub parent_category: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub core: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,
}

impl Note {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.parent_category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_core(mut self, core: impl Into<String>) -> Self {
        self.core = core.into();
        self
    }

    /// The id, unless it is missing or empty.
    pub fn usable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Summary text shown on the graph: the first non-empty of core, body
    /// and title, trimmed.
    pub fn display_content(&self) -> String {
        let raw = [&self.core, &self.body, &self.title]
            .into_iter()
            .find(|text| !text.is_empty())
            .map(String::as_str)
            .unwrap_or_default()
            .trim();

        if raw.is_empty() {
            UNTITLED.to_owned()
        } else {
            raw.to_owned()
        }
    }

    pub fn real_tags<'a>(&'a self, is_placeholder: impl Fn(&str) -> bool) -> Vec<&'a str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|&tag| !tag.trim().is_empty() && !is_placeholder(tag))
            .collect()
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => Some(id),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(tag) => vec![tag],
        _ => Vec::new(),
    })
}
