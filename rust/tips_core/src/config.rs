//! Viewer configuration with serde defaults for every field.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::filter::TopicPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    #[serde(default = "default_data_url")]
    pub data_url: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub topic_policy: TopicPolicy,
    /// chrono strftime pattern for card dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub elements: ElementIds,
    #[serde(default = "default_short_text_len")]
    pub short_text_len: usize,
    #[serde(default = "default_long_text_len")]
    pub long_text_len: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_url: default_data_url(),
            storage_key: default_storage_key(),
            topic_policy: TopicPolicy::default(),
            date_format: default_date_format(),
            labels: Labels::default(),
            elements: ElementIds::default(),
            short_text_len: default_short_text_len(),
            long_text_len: default_long_text_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Labels {
    #[serde(default = "default_anonymous")]
    pub anonymous: String,
    #[serde(default = "default_uncategorized")]
    pub uncategorized: String,
    #[serde(default = "default_hide")]
    pub hide: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            anonymous: default_anonymous(),
            uncategorized: default_uncategorized(),
            hide: default_hide(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementIds {
    #[serde(default = "default_search_input")]
    pub search_input: String,
    #[serde(default = "default_sort_select")]
    pub sort_select: String,
    #[serde(default = "default_theme_toggle")]
    pub theme_toggle: String,
    #[serde(default = "default_topics_container")]
    pub topics_container: String,
    #[serde(default = "default_results")]
    pub results: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            search_input: default_search_input(),
            sort_select: default_sort_select(),
            theme_toggle: default_theme_toggle(),
            topics_container: default_topics_container(),
            results: default_results(),
        }
    }
}

impl ElementIds {
    fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("search_input", self.search_input.as_str()),
            ("sort_select", self.sort_select.as_str()),
            ("theme_toggle", self.theme_toggle.as_str()),
            ("topics_container", self.topics_container.as_str()),
            ("results", self.results.as_str()),
        ]
    }
}

impl ViewerConfig {
    /// Parse a config document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_json::from_str(json).map_err(|e| ViewerError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_url.trim().is_empty() {
            return Err(ViewerError::Config("data_url must not be empty".into()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ViewerError::Config("storage_key must not be empty".into()));
        }
        for (name, id) in self.elements.all() {
            if id.trim().is_empty() {
                return Err(ViewerError::Config(format!("elements.{name} must not be empty")));
            }
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ViewerError::Config(format!("date_format {:?} is not a valid pattern", self.date_format)));
        }
        if self.short_text_len > self.long_text_len {
            return Err(ViewerError::Config(format!(
                "short_text_len ({}) exceeds long_text_len ({})",
                self.short_text_len, self.long_text_len
            )));
        }
        Ok(())
    }
}

fn default_data_url() -> String {
    "tips.json".to_string()
}

fn default_storage_key() -> String {
    "hiddenTips".to_string()
}

fn default_date_format() -> String {
    "%d.%m.%Y, %H:%M:%S".to_string()
}

fn default_anonymous() -> String {
    "Anonymous".to_string()
}

fn default_uncategorized() -> String {
    "Uncategorized".to_string()
}

fn default_hide() -> String {
    "Hide".to_string()
}

fn default_search_input() -> String {
    "searchInput".to_string()
}

fn default_sort_select() -> String {
    "sortSelect".to_string()
}

fn default_theme_toggle() -> String {
    "themeToggle".to_string()
}

fn default_topics_container() -> String {
    "topicsContainer".to_string()
}

fn default_results() -> String {
    "results".to_string()
}

fn default_short_text_len() -> usize {
    50
}

fn default_long_text_len() -> usize {
    200
}
