//! Tip store: decoded entries, the thread index and the topic index.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::entry::{Entry, EntryId, Topic};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub entry: Entry,
    pub replies: Vec<Entry>,
}

impl Thread {
    fn new(entry: Entry) -> Self {
        Self { entry, replies: Vec::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TipStore {
    threads: Vec<Thread>,
    topics: Vec<Topic>,
    entry_count: usize,
}

impl TipStore {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let entry_count = entries.len();
        let topics = build_topics(&entries);
        let threads = build_threads(entries);
        tracing::info!(entries = entry_count, threads = threads.len(), topics = topics.len(), "tip store built");
        Self { threads, topics, entry_count }
    }

    /// Top-level threads in source order.
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Deduplicated topics; named ones lexicographic, sentinel last.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

fn build_topics(entries: &[Entry]) -> Vec<Topic> {
    let mut set = BTreeSet::new();
    for e in entries {
        set.extend(e.effective_topics());
    }
    set.into_iter().collect()
}

fn build_threads(entries: Vec<Entry>) -> Vec<Thread> {
    let parents: Vec<Option<usize>> = {
        let mut by_id: HashMap<&EntryId, usize> = HashMap::new();
        for (i, e) in entries.iter().enumerate() {
            if let Some(id) = &e.id {
                // first occurrence wins for duplicate ids
                by_id.entry(id).or_insert(i);
            }
        }
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                e.reply_to
                    .as_ref()
                    .and_then(|pid| by_id.get(pid).copied())
                    .filter(|&p| p != i)
            })
            .collect()
    };

    let roots: Vec<Option<usize>> = (0..entries.len()).map(|i| resolve_root(i, &parents)).collect();

    for (i, e) in entries.iter().enumerate() {
        if let Some(pid) = &e.reply_to {
            if roots[i].is_none() {
                tracing::warn!(entry = i, reply_to = %pid, "reply parent unresolved, shown as top-level");
            }
        }
    }

    let mut threads: Vec<Thread> = Vec::new();
    let mut slot_of: HashMap<usize, usize> = HashMap::new();
    let mut pending: Vec<(usize, Entry)> = Vec::new();
    for (i, e) in entries.into_iter().enumerate() {
        match roots[i] {
            None => {
                slot_of.insert(i, threads.len());
                threads.push(Thread::new(e));
            }
            Some(root) => pending.push((root, e)),
        }
    }
    for (root, reply) in pending {
        if let Some(&slot) = slot_of.get(&root) {
            threads[slot].replies.push(reply);
        }
    }
    threads
}

/// Index of the top-level entry that `i` ultimately replies to, or `None`
/// when `i` is itself top-level (no parent, unknown parent, or a cycle).
fn resolve_root(i: usize, parents: &[Option<usize>]) -> Option<usize> {
    let mut current = parents[i]?;
    let mut seen = HashSet::from([i]);
    while let Some(next) = parents[current] {
        if !seen.insert(current) || seen.contains(&next) {
            return None;
        }
        current = next;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(json: &str) -> TipStore {
        TipStore::from_json(json).unwrap()
    }

    #[test]
    fn nests_replies_under_parent() {
        let s = store(r#"[
            {"id": 1, "text": "root"},
            {"id": 2, "text": "reply", "reply_to": 1},
            {"id": 3, "text": "other"}
        ]"#);
        assert_eq!(s.threads().len(), 2);
        assert_eq!(s.threads()[0].replies.len(), 1);
        assert_eq!(s.threads()[0].replies[0].text(), "reply");
        assert_eq!(s.entry_count(), 3);
    }

    #[test]
    fn unknown_parent_is_demoted_to_top_level() {
        let s = store(r#"[{"id": 1, "text": "a"}, {"id": 2, "text": "orphan", "reply_to": 99}]"#);
        let texts: Vec<_> = s.threads().iter().map(|t| t.entry.text()).collect();
        assert_eq!(texts, vec!["a", "orphan"]);
    }

    #[test]
    fn self_reference_and_cycles_stay_top_level() {
        let s = store(r#"[
            {"id": "a", "reply_to": "a"},
            {"id": "b", "reply_to": "c"},
            {"id": "c", "reply_to": "b"}
        ]"#);
        assert_eq!(s.threads().len(), 3);
        assert!(s.threads().iter().all(|t| t.replies.is_empty()));
    }

    #[test]
    fn reply_to_reply_flattens_into_root_thread() {
        let s = store(r#"[
            {"id": 1, "text": "root"},
            {"id": 2, "text": "first", "reply_to": 1},
            {"id": 3, "text": "second", "reply_to": 2}
        ]"#);
        assert_eq!(s.threads().len(), 1);
        let replies: Vec<_> = s.threads()[0].replies.iter().map(|r| r.text()).collect();
        assert_eq!(replies, vec!["first", "second"]);
    }

    #[test]
    fn reply_listed_before_parent_still_attaches() {
        let s = store(r#"[{"id": 2, "text": "early", "reply_to": 1}, {"id": 1, "text": "root"}]"#);
        assert_eq!(s.threads().len(), 1);
        assert_eq!(s.threads()[0].replies[0].text(), "early");
    }

    #[test]
    fn topic_index_is_sorted_and_has_sentinel() {
        let s = store(r#"[
            {"text": "a", "topics": ["web", "rust"]},
            {"text": "b", "topics": []},
            {"text": "c", "topics": ["rust"]}
        ]"#);
        assert_eq!(
            s.topics(),
            &[Topic::named("rust"), Topic::named("web"), Topic::Uncategorized]
        );
    }

    #[test]
    fn rejects_non_array_data() {
        assert!(TipStore::from_json(r#"{"text": "x"}"#).is_err());
    }
}
