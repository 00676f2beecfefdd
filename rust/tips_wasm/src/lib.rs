use wasm_bindgen::prelude::*;
use tips_core::{
    EntryKey, HiddenSet, HiddenStore, Intent, MemoryHiddenStore, SortKey, TipViewer, Topic,
    ViewerConfig, ViewerError,
};

pub mod dom;
pub mod locale;
pub mod storage;

use locale::JsLocale;
use storage::LocalStorageHiddenStore;

fn to_js(err: ViewerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Boot the viewer against the host page: inline config, fetch, render, wire events.
#[wasm_bindgen]
pub async fn boot() -> Result<(), JsValue> {
    let result = match dom::page_config() {
        Ok(config) => dom::mount(config).await,
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        tracing::error!(error = %err, "tip viewer failed to start");
    }
    result.map_err(to_js)
}

/// Viewer driven from JS: feed intents, read HTML back.
#[wasm_bindgen]
pub struct Viewer {
    core: TipViewer<Backend>,
}

enum Backend {
    Local(LocalStorageHiddenStore),
    Memory(MemoryHiddenStore),
}

impl HiddenStore for Backend {
    fn load(&self) -> tips_core::Result<Option<HiddenSet>> {
        match self {
            Backend::Local(s) => s.load(),
            Backend::Memory(s) => s.load(),
        }
    }

    fn save(&mut self, hidden: &HiddenSet) -> tips_core::Result<()> {
        match self {
            Backend::Local(s) => s.save(hidden),
            Backend::Memory(s) => s.save(hidden),
        }
    }
}

impl Viewer {
    fn build(tips_json: &str, config: ViewerConfig, backend: Backend) -> Result<Viewer, JsValue> {
        let core = TipViewer::from_json(tips_json, config, backend).map_err(to_js)?.with_locale(JsLocale);
        Ok(Viewer { core })
    }
}

#[wasm_bindgen]
impl Viewer {
    /// `config_json` may be empty for defaults. Hidden entries persist in
    /// `localStorage` under the configured key.
    #[wasm_bindgen(constructor)]
    pub fn new(tips_json: String, config_json: String) -> Result<Viewer, JsValue> {
        let config = ViewerConfig::from_json(&config_json).map_err(to_js)?;
        let backend = Backend::Local(LocalStorageHiddenStore::new(config.storage_key.clone()));
        Self::build(&tips_json, config, backend)
    }

    /// Same as the constructor, but the hidden set lives only as long as this object.
    pub fn ephemeral(tips_json: String, config_json: String) -> Result<Viewer, JsValue> {
        let config = ViewerConfig::from_json(&config_json).map_err(to_js)?;
        Self::build(&tips_json, config, Backend::Memory(MemoryHiddenStore::new()))
    }

    // Intents; each returns whether anything needs redrawing
    pub fn search(&mut self, query: String) -> bool { !self.core.dispatch(Intent::Search(query)).is_noop() }
    pub fn toggle_topic(&mut self, name: String) -> bool { !self.core.dispatch(Intent::ToggleTopic(Topic::Named(name))).is_noop() }
    pub fn toggle_uncategorized(&mut self) -> bool { !self.core.dispatch(Intent::ToggleTopic(Topic::Uncategorized)).is_noop() }
    pub fn set_sort(&mut self, key: String) -> bool { !self.core.dispatch(Intent::SetSort(SortKey::parse(&key))).is_noop() }
    pub fn hide(&mut self, key: String) -> bool { !self.core.dispatch(Intent::Hide(EntryKey::new(key))).is_noop() }
    pub fn toggle_theme(&mut self) -> bool {
        self.core.dispatch(Intent::ToggleTheme);
        self.core.theme().is_dark()
    }

    // Output
    pub fn results_html(&self) -> String { self.core.results_html() }
    pub fn sidebar_html(&self) -> String { self.core.sidebar_html() }
    pub fn is_dark(&self) -> bool { self.core.theme().is_dark() }
    pub fn visible_count(&self) -> u32 { self.core.visible().len() as u32 }

    pub fn visible_keys(&self) -> String {
        let keys: Vec<String> = self.core.visible().iter().map(|t| t.entry.key().to_string()).collect();
        serde_json::to_string(&keys).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn hidden_keys(&self) -> String { self.core.hidden().to_json() }
}
