//! HTML rendering of the sidebar and the card list.
//!
//! Output is plain markup with `data-*` hooks; the browser layer installs it
//! and maps clicks on `data-hide` / `data-topic` back to intents.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ViewerConfig;
use crate::entry::{Entry, Topic};
use crate::filter::FilterState;
use crate::locale::Locale;
use crate::store::Thread;

pub const HIDE_ATTR: &str = "data-hide";
pub const TOPIC_ATTR: &str = "data-topic";
pub const UNCATEGORIZED_ATTR: &str = "data-topic-uncategorized";

static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("valid bare url regex"));

pub fn render_sidebar(topics: &[Topic], filter: &FilterState, config: &ViewerConfig) -> String {
    let mut out = String::new();
    for topic in topics {
        out.push_str(&topic_chip(topic, filter.is_active(topic), &config.labels.uncategorized));
    }
    out
}

pub fn render_results(
    threads: &[&Thread],
    filter: &FilterState,
    config: &ViewerConfig,
    locale: &dyn Locale,
) -> String {
    let mut out = String::new();
    for thread in threads {
        out.push_str(&render_card(thread, filter, config, locale));
    }
    out
}

pub fn render_card(thread: &Thread, filter: &FilterState, config: &ViewerConfig, locale: &dyn Locale) -> String {
    let entry = &thread.entry;
    let len = entry.text_len();
    let mut class = String::from("card");
    if !entry.text().is_empty() && len < config.short_text_len {
        class.push_str(" short");
    }
    if len > config.long_text_len {
        class.push_str(" long");
    }

    let key = entry.key();
    let mut out = String::new();
    out.push_str(&format!("<div class=\"{}\" data-key=\"{}\">\n", class, attr(key.as_str())));
    out.push_str(&format!(
        "  <button class=\"delete-btn\" title=\"{}\" {}=\"{}\">🗑️</button>\n",
        attr(&config.labels.hide),
        HIDE_ATTR,
        attr(key.as_str())
    ));
    out.push_str(&format!("  <h3>{}</h3>\n", text(author_label(entry, config))));
    out.push_str(&format!("  <div class=\"meta\">{}</div>\n", text(&locale.format_date(entry.date()))));
    out.push_str(&format!("  <p>{}</p>\n", linkify(entry.text())));

    out.push_str("  <div class=\"topics\">");
    for name in entry.topics() {
        let topic = Topic::Named(name.clone());
        let active = filter.is_active(&topic);
        out.push_str(&topic_chip(&topic, active, &config.labels.uncategorized));
    }
    out.push_str("</div>\n");

    if !thread.replies.is_empty() {
        out.push_str("  <div class=\"replies\">\n");
        for reply in &thread.replies {
            out.push_str("    <div class=\"reply\">");
            out.push_str(&format!("<h4>{}</h4>", text(author_label(reply, config))));
            out.push_str(&format!("<div class=\"meta\">{}</div>", text(&locale.format_date(reply.date()))));
            out.push_str(&format!("<p>{}</p>", linkify(reply.text())));
            out.push_str("</div>\n");
        }
        out.push_str("  </div>\n");
    }
    out.push_str("</div>\n");
    out
}

fn author_label<'a>(entry: &'a Entry, config: &'a ViewerConfig) -> &'a str {
    match entry.author() {
        "" => config.labels.anonymous.as_str(),
        a => a,
    }
}

fn topic_chip(topic: &Topic, active: bool, uncategorized_label: &str) -> String {
    let class = if active { "topic active" } else { "topic" };
    match topic {
        Topic::Named(name) => format!(
            "<span class=\"{}\" {}=\"{}\">{}</span>",
            class,
            TOPIC_ATTR,
            attr(name),
            text(name)
        ),
        Topic::Uncategorized => format!(
            "<span class=\"{}\" {}>{}</span>",
            class,
            UNCATEGORIZED_ATTR,
            text(topic.label(uncategorized_label))
        ),
    }
}

/// Escape `input` and wrap bare http(s) URLs in anchors.
pub fn linkify(input: &str) -> String {
    let mut out = String::new();
    let mut last = 0usize;
    for m in BARE_URL_RE.find_iter(input) {
        out.push_str(&text(&input[last..m.start()]));
        let url = m.as_str();
        out.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            attr(url),
            text(url)
        ));
        last = m.end();
    }
    out.push_str(&text(&input[last..]));
    out
}
