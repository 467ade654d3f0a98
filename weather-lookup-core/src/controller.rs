//! Search controller: owns [`SearchState`] and sequences lookups.
//!
//! A lookup is split in two halves so callers that drive their own event
//! loop can render the loading state in between:
//! - [`SearchController::begin_search`] validates input and enters `Loading`
//! - [`SearchController::finish_search`] applies the outcome
//!
//! [`SearchController::submit_search`] runs both around the provider call.

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    DisplayWeather, WeatherError,
    provider::WeatherProvider,
    state::{DEFAULT_CITY, Phase, SearchState},
};

/// Handle for a started lookup. Only the most recent ticket may finish.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchTicket {
    id: u64,
    city: String,
}

impl SearchTicket {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct SearchController<P> {
    provider: P,
    state: SearchState,
    default_city: String,
    next_id: u64,
    in_flight: Option<u64>,
    mounted: bool,
}

impl<P: WeatherProvider> SearchController<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: SearchState::default(),
            default_city: DEFAULT_CITY.to_string(),
            next_id: 0,
            in_flight: None,
            mounted: false,
        }
    }

    /// Replace the city looked up by [`Self::mount`].
    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn update_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    /// Startup lookup of the default city. Runs once; later calls return `false`.
    pub async fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;

        let city = self.default_city.clone();
        self.submit_search(Some(&city)).await
    }

    /// Look up `explicit_city`, or the current query when it is absent or
    /// blank. Returns `false` without touching state if there is nothing to
    /// search for.
    pub async fn submit_search(&mut self, explicit_city: Option<&str>) -> bool {
        let Some(ticket) = self.begin_search(explicit_city) else {
            return false;
        };

        let outcome = self.provider.fetch_weather(ticket.city()).await;
        self.finish_search(ticket, outcome);
        true
    }

    /// Enter `Loading` and hand out the ticket for the request to issue.
    /// A newer ticket supersedes any still outstanding.
    pub fn begin_search(&mut self, explicit_city: Option<&str>) -> Option<SearchTicket> {
        let city = resolve_city(explicit_city, &self.state.query)?;

        self.next_id += 1;
        if let Some(previous) = self.in_flight.replace(self.next_id) {
            debug!(previous, "superseding outstanding search");
        }

        self.state.is_loading = true;
        self.state.error_message = None;
        self.state.phase = Phase::Loading;

        info!(city = %city, id = self.next_id, "search started");

        Some(SearchTicket {
            id: self.next_id,
            city,
        })
    }

    /// Apply the outcome of `ticket`'s request. Returns `false` and leaves the
    /// state alone if a newer search has started since.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<DisplayWeather, WeatherError>,
    ) -> bool {
        if self.in_flight != Some(ticket.id) {
            debug!(city = %ticket.city, id = ticket.id, "discarding stale search result");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(weather) => {
                info!(city = %ticket.city, "search succeeded");
                self.state.result = Some(weather);
                self.state.error_message = None;
                self.state.last_updated = Some(Utc::now());
                self.state.phase = Phase::Success;
            }
            Err(err) => {
                info!(city = %ticket.city, error = %err, "search failed");
                self.state.error_message = Some(err.user_message().to_string());
                self.state.result = None;
                self.state.phase = Phase::Failed;
            }
        }

        self.state.is_loading = false;
        true
    }
}

/// Explicit city if non-blank, else the query; trimmed. `None` when both are blank.
fn resolve_city(explicit_city: Option<&str>, query: &str) -> Option<String> {
    explicit_city
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .or_else(|| Some(query.trim()).filter(|city| !city.is_empty()))
        .map(str::to_string)
}
