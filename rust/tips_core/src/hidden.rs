//! Grow-only hidden set and its persistence seam.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::entry::EntryKey;
use crate::error::{Result, ViewerError};

/// Keys the user removed from view. There is no removal operation.
#[derive(Debug, Default, Clone)]
pub struct HiddenSet {
    order: Vec<EntryKey>,
    index: HashSet<EntryKey>,
}

impl HiddenSet {
    pub fn from_keys(keys: impl IntoIterator<Item = EntryKey>) -> Self {
        let mut set = Self::default();
        for k in keys {
            set.insert(k);
        }
        set
    }

    /// Record a key. Returns true if it was not hidden before.
    pub fn insert(&mut self, key: EntryKey) -> bool {
        if self.index.contains(&key) {
            return false;
        }
        self.index.insert(key.clone());
        self.order.push(key);
        true
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.index.contains(key)
    }

    /// Keys in insertion order, as persisted.
    pub fn keys(&self) -> &[EntryKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.order).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let keys: Vec<EntryKey> = serde_json::from_str(json)
            .map_err(|e| ViewerError::Storage(format!("corrupt hidden set: {e}")))?;
        Ok(Self::from_keys(keys))
    }
}

/// Where the hidden set lives between sessions.
pub trait HiddenStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<HiddenSet>>;
    fn save(&mut self, hidden: &HiddenSet) -> Result<()>;
}

/// In-process store. Clones share the same slot, which lets tests observe
/// what a viewer persisted and hand it to the next viewer.
#[derive(Debug, Default, Clone)]
pub struct MemoryHiddenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryHiddenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: Rc::new(RefCell::new(Some(raw.into()))) }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl HiddenStore for MemoryHiddenStore {
    fn load(&self) -> Result<Option<HiddenSet>> {
        match self.slot.borrow().as_deref() {
            Some(raw) => HiddenSet::from_json(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, hidden: &HiddenSet) -> Result<()> {
        *self.slot.borrow_mut() = Some(hidden.to_json());
        Ok(())
    }
}

/// Read the persisted set, degrading to empty on corrupt data.
pub fn load_or_empty<S: HiddenStore>(store: &S) -> HiddenSet {
    match store.load() {
        Ok(Some(set)) => set,
        Ok(None) => HiddenSet::default(),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable hidden set");
            HiddenSet::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_and_ordered() {
        let mut set = HiddenSet::default();
        assert!(set.insert(EntryKey::new("b")));
        assert!(set.insert(EntryKey::new("a")));
        assert!(!set.insert(EntryKey::new("b")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_json(), r#"["b","a"]"#);
    }

    #[test]
    fn reads_legacy_composite_keys() {
        let set = HiddenSet::from_json(r#"["2024-01-01|hello","2024-01-01|hello"]"#).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&EntryKey::new("2024-01-01|hello")));
    }

    #[test]
    fn memory_store_round_trips_through_clones() {
        let store = MemoryHiddenStore::new();
        assert!(store.load().unwrap().is_none());
        let mut writer = store.clone();
        writer.save(&HiddenSet::from_keys([EntryKey::new("x")])).unwrap();
        let loaded = load_or_empty(&store);
        assert!(loaded.contains(&EntryKey::new("x")));
    }

    #[test]
    fn corrupt_storage_degrades_to_empty() {
        let store = MemoryHiddenStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(ViewerError::Storage(_))));
        assert!(load_or_empty(&store).is_empty());
    }
}
