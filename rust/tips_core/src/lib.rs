pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod hidden;
pub mod intent;
pub mod locale;
pub mod render;
pub mod store;
pub mod theme;

pub use config::ViewerConfig;
pub use entry::{Entry, EntryId, EntryKey, Topic};
pub use error::{Result, ViewerError};
pub use filter::{compute_visible, FilterState, SortKey, TopicPolicy};
pub use hidden::{HiddenSet, HiddenStore, MemoryHiddenStore};
pub use intent::{Intent, Outcome};
pub use locale::{ChronoLocale, Locale};
pub use store::{Thread, TipStore};
pub use theme::ThemeMode;

/// Viewer state: the loaded store plus everything the UI can change, with
/// hidden-set persistence delegated to `S` and collation/date display to a
/// [`Locale`].
#[derive(Debug)]
pub struct TipViewer<S: HiddenStore> {
    store: TipStore,
    filter: FilterState,
    hidden: HiddenSet,
    theme: ThemeMode,
    config: ViewerConfig,
    persistence: S,
    locale: Box<dyn Locale>,
}

impl<S: HiddenStore> TipViewer<S> {
    pub fn new(store: TipStore, config: ViewerConfig, persistence: S) -> Self {
        let hidden = hidden::load_or_empty(&persistence);
        tracing::info!(
            entries = store.entry_count(),
            hidden = hidden.len(),
            policy = ?config.topic_policy,
            "viewer ready"
        );
        let locale = Box::new(ChronoLocale::new(config.date_format.as_str()));
        Self {
            store,
            filter: FilterState::default(),
            hidden,
            theme: ThemeMode::default(),
            config,
            persistence,
            locale,
        }
    }

    /// Replace the default chrono-backed locale.
    pub fn with_locale(mut self, locale: impl Locale + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    pub fn from_json(json: &str, config: ViewerConfig, persistence: S) -> Result<Self> {
        config.validate()?;
        let store = TipStore::from_json(json)?;
        Ok(Self::new(store, config, persistence))
    }

    pub fn dispatch(&mut self, intent: Intent) -> Outcome {
        tracing::debug!(intent = intent.name(), "dispatch");
        match intent {
            Intent::Search(query) => {
                if self.filter.search == query {
                    return Outcome::NONE;
                }
                self.filter.search = query;
                Outcome::results()
            }
            Intent::ToggleTopic(topic) => {
                self.filter.toggle_topic(topic);
                Outcome::topics()
            }
            Intent::SetSort(key) => {
                if self.filter.sort == key {
                    return Outcome::NONE;
                }
                self.filter.sort = key;
                Outcome::results()
            }
            Intent::Hide(key) => {
                if !self.hidden.insert(key) {
                    return Outcome::NONE;
                }
                if let Err(err) = self.persistence.save(&self.hidden) {
                    tracing::warn!(error = %err, "hidden set not persisted");
                }
                Outcome::results()
            }
            Intent::ToggleTheme => {
                self.theme = self.theme.toggled();
                Outcome::theme()
            }
        }
    }

    pub fn visible(&self) -> Vec<&Thread> {
        compute_visible(&self.store, &self.filter, &self.hidden, self.config.topic_policy, self.locale.as_ref())
    }

    pub fn results_html(&self) -> String {
        render::render_results(&self.visible(), &self.filter, &self.config, self.locale.as_ref())
    }

    pub fn sidebar_html(&self) -> String {
        render::render_sidebar(self.store.topics(), &self.filter, &self.config)
    }

    pub fn store(&self) -> &TipStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(json: &str) -> TipViewer<MemoryHiddenStore> {
        TipViewer::from_json(json, ViewerConfig::default(), MemoryHiddenStore::new()).unwrap()
    }

    #[test]
    fn repeated_search_and_sort_are_noops() {
        let mut v = viewer(r#"[{"text": "a"}]"#);
        assert_eq!(v.dispatch(Intent::Search("a".into())), Outcome::results());
        assert!(v.dispatch(Intent::Search("a".into())).is_noop());
        assert!(v.dispatch(Intent::SetSort(SortKey::Original)).is_noop());
        assert_eq!(v.dispatch(Intent::SetSort(SortKey::Date)), Outcome::results());
    }

    #[test]
    fn topic_toggle_redraws_sidebar() {
        let mut v = viewer(r#"[{"text": "a", "topics": ["x"]}]"#);
        let out = v.dispatch(Intent::ToggleTopic(Topic::named("x")));
        assert!(out.sidebar && out.results);
        assert!(v.sidebar_html().contains("topic active"));
    }

    #[derive(Debug)]
    struct FixedLocale;

    impl Locale for FixedLocale {
        fn compare(&self, a: &str, b: &str) -> std::cmp::Ordering {
            a.len().cmp(&b.len())
        }

        fn format_date(&self, _raw: &str) -> String {
            "when".to_string()
        }
    }

    #[test]
    fn injected_locale_drives_sort_and_dates() {
        let mut v = viewer(r#"[
            {"id": 1, "author": "Bartholomew", "date": "2024-01-01"},
            {"id": 2, "author": "Al", "date": "2024-01-02"}
        ]"#)
        .with_locale(FixedLocale);
        v.dispatch(Intent::SetSort(SortKey::Author));
        let keys: Vec<String> = v.visible().iter().map(|t| t.entry.key().to_string()).collect();
        assert_eq!(keys, vec!["2", "1"]);
        assert!(v.results_html().contains(r#"<div class="meta">when</div>"#));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = ViewerConfig::default();
        cfg.storage_key.clear();
        assert!(matches!(
            TipViewer::from_json("[]", cfg, MemoryHiddenStore::new()),
            Err(ViewerError::Config(_))
        ));
    }

    #[test]
    fn rejects_malformed_data() {
        assert!(matches!(
            TipViewer::from_json("[{", ViewerConfig::default(), MemoryHiddenStore::new()),
            Err(ViewerError::Decode(_))
        ));
    }
}
