//! UI intents and what each one changed.

use crate::entry::{EntryKey, Topic};
use crate::filter::SortKey;

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Search(String),
    ToggleTopic(Topic),
    SetSort(SortKey),
    Hide(EntryKey),
    ToggleTheme,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Search(_) => "search",
            Intent::ToggleTopic(_) => "toggleTopic",
            Intent::SetSort(_) => "setSort",
            Intent::Hide(_) => "hide",
            Intent::ToggleTheme => "toggleTheme",
        }
    }
}

/// Which surfaces must be redrawn after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub results: bool,
    pub sidebar: bool,
    pub theme: bool,
}

impl Outcome {
    pub const NONE: Outcome = Outcome { results: false, sidebar: false, theme: false };

    pub fn results() -> Self {
        Outcome { results: true, ..Self::NONE }
    }

    pub fn topics() -> Self {
        Outcome { results: true, sidebar: true, ..Self::NONE }
    }

    pub fn theme() -> Self {
        Outcome { theme: true, ..Self::NONE }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}
