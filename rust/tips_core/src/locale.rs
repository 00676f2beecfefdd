//! Locale-sensitive collation and date display, injected into the viewer.

use std::cmp::Ordering;
use std::fmt::{self, Write};

use crate::filter::parse_wall_clock;

/// Host collation and date formatting.
pub trait Locale: fmt::Debug {
    /// Order two author names.
    fn compare(&self, a: &str, b: &str) -> Ordering;
    /// Display form of a raw entry date; the raw string when it cannot be read.
    fn format_date(&self, raw: &str) -> String;
}

/// Fallback used outside a browser: case-folded ordering and a chrono pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronoLocale {
    pattern: String,
}

impl ChronoLocale {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into() }
    }
}

impl Locale for ChronoLocale {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
    }

    fn format_date(&self, raw: &str) -> String {
        let Some(dt) = parse_wall_clock(raw) else {
            return raw.to_string();
        };
        // chrono reports bad patterns as a fmt error instead of panicking when
        // written through `write!`
        let mut out = String::new();
        match write!(out, "{}", dt.format(&self.pattern)) {
            Ok(()) => out,
            Err(_) => raw.to_string(),
        }
    }
}
