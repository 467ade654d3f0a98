use crate::{Config, DisplayWeather, WeatherError, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One best-effort lookup. `city` must be non-blank; callers validate it.
    async fn fetch_weather(&self, city: &str) -> Result<DisplayWeather, WeatherError>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn fetch_weather(&self, city: &str) -> Result<DisplayWeather, WeatherError> {
        (**self).fetch_weather(city).await
    }
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match config.base_url() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}
