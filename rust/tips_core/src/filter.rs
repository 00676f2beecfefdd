//! Filter/sort pipeline over the tip store.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, Topic};
use crate::hidden::HiddenSet;
use crate::locale::Locale;
use crate::store::{Thread, TipStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Source order.
    #[default]
    Original,
    Date,
    Length,
    Author,
}

impl SortKey {
    /// Selector value to sort key; anything unrecognized keeps source order.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "date" => SortKey::Date,
            "length" => SortKey::Length,
            "author" => SortKey::Author,
            _ => SortKey::Original,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Original => "",
            SortKey::Date => "date",
            SortKey::Length => "length",
            SortKey::Author => "author",
        }
    }
}

/// How multiple active topics combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicPolicy {
    /// Entry must carry every active topic.
    #[default]
    All,
    /// Entry must carry at least one active topic.
    Any,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub active_topics: BTreeSet<Topic>,
    pub sort: SortKey,
}

impl FilterState {
    /// Flip a topic's active state. Returns whether it is now active.
    pub fn toggle_topic(&mut self, topic: Topic) -> bool {
        if self.active_topics.remove(&topic) {
            false
        } else {
            self.active_topics.insert(topic);
            true
        }
    }

    pub fn is_active(&self, topic: &Topic) -> bool {
        self.active_topics.contains(topic)
    }
}

/// Visible threads for the current filter state, hidden entries excluded.
pub fn compute_visible<'a>(
    store: &'a TipStore,
    filter: &FilterState,
    hidden: &HiddenSet,
    policy: TopicPolicy,
    locale: &dyn Locale,
) -> Vec<&'a Thread> {
    let needle = filter.search.trim().to_lowercase();
    let mut visible: Vec<&Thread> = store
        .threads()
        .iter()
        .filter(|t| !hidden.contains(&t.entry.key()))
        .filter(|t| matches_search(&t.entry, &needle))
        .filter(|t| matches_topics(&t.entry, &filter.active_topics, policy))
        .collect();
    sort_threads(&mut visible, filter.sort, locale);
    tracing::debug!(
        total = store.threads().len(),
        visible = visible.len(),
        sort = filter.sort.as_str(),
        "pipeline pass"
    );
    visible
}

/// `needle` must already be trimmed and lowercased. It is matched against
/// `text author topics...` as one string, so a query may span fields.
pub fn matches_search(entry: &Entry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    search_haystack(entry).contains(needle)
}

fn search_haystack(entry: &Entry) -> String {
    format!("{} {} {}", entry.text(), entry.author(), entry.topics().join(" ")).to_lowercase()
}

pub fn matches_topics(entry: &Entry, active: &BTreeSet<Topic>, policy: TopicPolicy) -> bool {
    if active.is_empty() {
        return true;
    }
    match policy {
        TopicPolicy::All => active.iter().all(|t| entry.has_topic(t)),
        TopicPolicy::Any => active.iter().any(|t| entry.has_topic(t)),
    }
}

pub fn sort_threads(threads: &mut [&Thread], key: SortKey, locale: &dyn Locale) {
    match key {
        SortKey::Original => {}
        SortKey::Date => {
            // Option orders None first, so reversing puts invalid dates last.
            threads.sort_by_cached_key(|t| std::cmp::Reverse(parse_timestamp(t.entry.date())));
        }
        SortKey::Length => threads.sort_by_key(|t| std::cmp::Reverse(t.entry.text_len())),
        SortKey::Author => threads.sort_by(|a, b| locale.compare(a.entry.author(), b.entry.author())),
    }
}

enum Stamp {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// Sort key for a timestamp. Offsets are normalized to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_stamp(raw).map(|s| match s {
        Stamp::Offset(dt) => dt.naive_utc(),
        Stamp::Naive(dt) => dt,
    })
}

/// Wall-clock time as written, keeping the stated offset.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    parse_stamp(raw).map(|s| match s {
        Stamp::Offset(dt) => dt.naive_local(),
        Stamp::Naive(dt) => dt,
    })
}

fn parse_stamp(raw: &str) -> Option<Stamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Stamp::Offset(dt));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Stamp::Naive(dt));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Stamp::Naive)
}
