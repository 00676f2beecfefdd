//! Entry model as decoded from the tips data file.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of an entry. The data file carries ids either as JSON strings or
/// integers; both normalize to the same text so `5` and `"5"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => EntryId(n.to_string()),
            RawId::Float(n) => EntryId(n.to_string()),
            RawId::Text(s) => EntryId(s),
        })
    }
}

/// Key under which an entry is recorded in the hidden set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Topic label. Entries without topics fall under `Uncategorized`, which
/// orders after every named topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    Named(String),
    Uncategorized,
}

impl Topic {
    pub fn named(name: impl Into<String>) -> Self {
        Topic::Named(name.into())
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Topic::Uncategorized)
    }

    /// Display label, with the sentinel resolved through `uncategorized_label`.
    pub fn label<'a>(&'a self, uncategorized_label: &'a str) -> &'a str {
        match self {
            Topic::Named(name) => name,
            Topic::Uncategorized => uncategorized_label,
        }
    }
}

/// One tip. Every field is optional in the source data; accessors substitute
/// empty defaults so callers never branch on absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<EntryId>,
}

impl Entry {
    pub fn date(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn topics(&self) -> &[String] {
        self.topics.as_deref().unwrap_or(&[])
    }

    /// Topics used for filtering: the explicit list, or the sentinel alone.
    pub fn effective_topics(&self) -> Vec<Topic> {
        let topics = self.topics();
        if topics.is_empty() {
            vec![Topic::Uncategorized]
        } else {
            topics.iter().cloned().map(Topic::Named).collect()
        }
    }

    pub fn has_topic(&self, topic: &Topic) -> bool {
        match topic {
            Topic::Named(name) => self.topics().iter().any(|t| t == name),
            Topic::Uncategorized => self.topics().is_empty(),
        }
    }

    /// Explicit id when present, otherwise `date|text`.
    pub fn key(&self) -> EntryKey {
        match &self.id {
            Some(id) => EntryKey(id.to_string()),
            // stored `hiddenTips` keys spell a missing text as "undefined"
            None => EntryKey(format!("{}|{}", self.date(), self.text.as_deref().unwrap_or("undefined"))),
        }
    }

    pub fn text_len(&self) -> usize {
        self.text().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_and_string_ids_alike() {
        let a: Entry = serde_json::from_str(r#"{"id": 5, "text": "a"}"#).unwrap();
        let b: Entry = serde_json::from_str(r#"{"id": "5", "reply_to": 5}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.reply_to, Some(EntryId::new("5")));
    }

    #[test]
    fn nulls_and_missing_fields_become_empty() {
        let e: Entry = serde_json::from_str(r#"{"author": null, "topics": null, "extra": 1}"#).unwrap();
        assert_eq!(e.author(), "");
        assert_eq!(e.text(), "");
        assert_eq!(e.date(), "");
        assert!(e.topics().is_empty());
        assert_eq!(e.effective_topics(), vec![Topic::Uncategorized]);
    }

    #[test]
    fn key_prefers_id_over_composite() {
        let with_id: Entry = serde_json::from_str(r#"{"id": 7, "date": "2024-01-01", "text": "x"}"#).unwrap();
        let without: Entry = serde_json::from_str(r#"{"date": "2024-01-01", "text": "x"}"#).unwrap();
        let bare: Entry = serde_json::from_str(r#"{"text": "x"}"#).unwrap();
        assert_eq!(with_id.key().as_str(), "7");
        assert_eq!(without.key().as_str(), "2024-01-01|x");
        assert_eq!(bare.key().as_str(), "|x");
    }

    #[test]
    fn composite_key_spells_out_missing_text() {
        let no_text: Entry = serde_json::from_str(r#"{"date": "2024-01-01"}"#).unwrap();
        let null_text: Entry = serde_json::from_str(r#"{"date": "2024-01-01", "text": null}"#).unwrap();
        let empty_text: Entry = serde_json::from_str(r#"{"date": "2024-01-01", "text": ""}"#).unwrap();
        assert_eq!(no_text.key().as_str(), "2024-01-01|undefined");
        assert_eq!(null_text.key().as_str(), "2024-01-01|undefined");
        assert_eq!(empty_text.key().as_str(), "2024-01-01|");
    }

    #[test]
    fn uncategorized_sorts_after_named_topics() {
        let mut topics = vec![Topic::Uncategorized, Topic::named("zeta"), Topic::named("alpha")];
        topics.sort();
        assert_eq!(topics, vec![Topic::named("alpha"), Topic::named("zeta"), Topic::Uncategorized]);
    }

    #[test]
    fn has_topic_respects_sentinel() {
        let plain = Entry::default();
        let tagged = Entry { topics: Some(vec!["rust".into()]), ..Default::default() };
        assert!(plain.has_topic(&Topic::Uncategorized));
        assert!(!tagged.has_topic(&Topic::Uncategorized));
        assert!(tagged.has_topic(&Topic::named("rust")));
    }
}
