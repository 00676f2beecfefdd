//! Page wiring: fetch the data, render, and route DOM events to intents.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::net::http::Request;
use gloo::utils::{body, document};
use tips_core::render::{HIDE_ATTR, TOPIC_ATTR, UNCATEGORIZED_ATTR};
use tips_core::{EntryKey, Intent, Result, SortKey, ThemeMode, TipViewer, Topic, ViewerConfig, ViewerError};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement};

use crate::locale::JsLocale;
use crate::storage::LocalStorageHiddenStore;

/// Inline config block read at boot, if the page has one.
pub const CONFIG_ELEMENT_ID: &str = "tips-config";

struct Elements {
    search: HtmlInputElement,
    sort: HtmlSelectElement,
    theme: Element,
    topics: Element,
    results: Element,
}

impl Elements {
    fn lookup(config: &ViewerConfig) -> Result<Self> {
        let ids = &config.elements;
        Ok(Self {
            search: by_id::<HtmlInputElement>(&ids.search_input)?,
            sort: by_id::<HtmlSelectElement>(&ids.sort_select)?,
            theme: by_id::<Element>(&ids.theme_toggle)?,
            topics: by_id::<Element>(&ids.topics_container)?,
            results: by_id::<Element>(&ids.results)?,
        })
    }
}

struct Page {
    viewer: TipViewer<LocalStorageHiddenStore>,
    elements: Elements,
}

impl Page {
    fn apply(&mut self, intent: Intent) {
        let outcome = self.viewer.dispatch(intent);
        if outcome.sidebar {
            self.elements.topics.set_inner_html(&self.viewer.sidebar_html());
        }
        if outcome.results {
            self.elements.results.set_inner_html(&self.viewer.results_html());
        }
        if outcome.theme {
            apply_theme(self.viewer.theme());
        }
    }

    fn render_all(&self) {
        self.elements.topics.set_inner_html(&self.viewer.sidebar_html());
        self.elements.results.set_inner_html(&self.viewer.results_html());
        apply_theme(self.viewer.theme());
    }
}

/// Config from the inline `<script id="tips-config">` block, else defaults.
pub fn page_config() -> Result<ViewerConfig> {
    match document().get_element_by_id(CONFIG_ELEMENT_ID) {
        Some(el) => ViewerConfig::from_json(&el.text_content().unwrap_or_default()),
        None => Ok(ViewerConfig::default()),
    }
}

pub async fn fetch_tips(url: &str) -> Result<String> {
    let load_err = |reason: String| ViewerError::Load { url: url.to_string(), reason };
    let resp = Request::get(url).send().await.map_err(|e| load_err(e.to_string()))?;
    if !resp.ok() {
        return Err(load_err(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| load_err(e.to_string()))
}

/// Load the data file and take over the page's controls.
pub async fn mount(config: ViewerConfig) -> Result<()> {
    config.validate()?;
    let elements = Elements::lookup(&config)?;
    let json = fetch_tips(&config.data_url).await?;
    let persistence = LocalStorageHiddenStore::new(config.storage_key.clone());
    let viewer = TipViewer::from_json(&json, config, persistence)?.with_locale(JsLocale);

    let page = Rc::new(RefCell::new(Page { viewer, elements }));
    page.borrow().render_all();
    attach_listeners(&page);
    Ok(())
}

fn attach_listeners(page: &Rc<RefCell<Page>>) {
    let p = page.borrow();
    let els = &p.elements;

    let search = els.search.clone();
    listen(page, &els.search, "input", move |_| Some(Intent::Search(search.value())));

    let sort = els.sort.clone();
    listen(page, &els.sort, "change", move |_| Some(Intent::SetSort(SortKey::parse(&sort.value()))));

    listen(page, &els.theme, "click", |_| Some(Intent::ToggleTheme));

    listen(page, &els.topics, "click", |event| topic_intent(event_element(event)?));

    listen(page, &els.results, "click", |event| {
        let target = event_element(event)?;
        if let Some(hide) = closest(&target, &format!("[{HIDE_ATTR}]")) {
            let key = hide.get_attribute(HIDE_ATTR)?;
            return Some(Intent::Hide(EntryKey::new(key)));
        }
        topic_intent(target)
    });
}

/// Register a handler for the page lifetime. Borrows the page only while the
/// intent is applied.
fn listen<F>(page: &Rc<RefCell<Page>>, target: &Element, event: &'static str, to_intent: F)
where
    F: Fn(&Event) -> Option<Intent> + 'static,
{
    let page = Rc::clone(page);
    EventListener::new(target, event, move |e| {
        if let Some(intent) = to_intent(e) {
            page.borrow_mut().apply(intent);
        }
    })
    .forget();
}

fn topic_intent(target: Element) -> Option<Intent> {
    let chip = closest(&target, &format!("[{TOPIC_ATTR}], [{UNCATEGORIZED_ATTR}]"))?;
    if chip.has_attribute(UNCATEGORIZED_ATTR) {
        return Some(Intent::ToggleTopic(Topic::Uncategorized));
    }
    chip.get_attribute(TOPIC_ATTR).map(|name| Intent::ToggleTopic(Topic::Named(name)))
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

fn by_id<T: JsCast>(id: &str) -> Result<T> {
    document()
        .get_element_by_id(id)
        .ok_or_else(|| ViewerError::Dom(format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| ViewerError::Dom(format!("element #{id} has an unexpected type")))
}

fn apply_theme(theme: ThemeMode) {
    if let Err(err) = body().class_list().toggle_with_force(ThemeMode::DARK_CLASS, theme.is_dark()) {
        tracing::warn!(error = ?err, "theme class not applied");
    }
}
