use chrono::{DateTime, Utc};

use crate::DisplayWeather;

/// City looked up when the controller mounts.
pub const DEFAULT_CITY: &str = "London";

/// Where the search state machine currently is.
///
/// `Idle` only exists before the first lookup; afterwards the machine moves
/// `Loading -> Success | Failed` and back to `Loading` on each new search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Everything the presentation layer needs to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Current input text, possibly unsubmitted.
    pub query: String,

    /// Last successful lookup. Cleared by any failure.
    pub result: Option<DisplayWeather>,

    /// True strictly while a request is outstanding.
    pub is_loading: bool,

    /// Message of the last failed lookup. Cleared when a new request starts.
    pub error_message: Option<String>,

    pub phase: Phase,

    /// When `result` was fetched.
    pub last_updated: Option<DateTime<Utc>>,
}
