//! Core library for the `weather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and its error taxonomy
//! - The display model
//! - The search controller that drives a lookup and owns UI state
//!
//! It is used by `weather-lookup`, but can also back other front-ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;

pub use config::{Config, ProviderConfig};
pub use controller::{SearchController, SearchTicket};
pub use error::{ErrorKind, WeatherError};
pub use model::{ConditionKind, DisplayWeather};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use state::{DEFAULT_CITY, Phase, SearchState};
