use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{DisplayWeather, mps_to_kmh, round_to_int},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a proxy or a local test server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Current-weather URL for `city`. Query values are percent-encoded,
    /// so a space goes out as `%20`.
    pub fn request_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&units=metric&appid={}",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key),
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<DisplayWeather, WeatherError> {
        debug!(city, "requesting current weather from OpenWeather");

        // The URL carries the API key, keep it out of error messages.
        let res = self
            .http
            .get(self.request_url(city))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!(city, error = %e, "OpenWeather request failed");
                WeatherError::Transport(e)
            })?;

        let status = res.status();
        if let Some(err) = WeatherError::from_status(status) {
            warn!(city, %status, "OpenWeather rejected the request");
            return Err(err);
        }

        let body = res.text().await.map_err(|e| {
            warn!(city, error = %e, "failed to read OpenWeather response body");
            WeatherError::Transport(e.without_url())
        })?;

        parse_current(&body).inspect_err(|e| {
            warn!(city, error = %e, "unusable OpenWeather response");
        })
    }
}

/// Map a current-weather JSON body onto the display model.
pub fn parse_current(body: &str) -> Result<DisplayWeather, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    DisplayWeather::try_from(parsed)
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl TryFrom<OwCurrentResponse> for DisplayWeather {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let OwCurrentResponse {
            name,
            sys,
            main,
            weather,
            wind,
        } = parsed;

        let first = weather.into_iter().next().ok_or_else(|| {
            WeatherError::MalformedResponse("`weather` list is empty".to_string())
        })?;

        Ok(DisplayWeather {
            city: name,
            country: sys.country,
            temperature: whole_degrees("temp", main.temp)?,
            feels_like: whole_degrees("feels_like", main.feels_like)?,
            condition: first.main,
            description: first.description,
            humidity: main.humidity,
            wind_speed: mps_to_kmh(wind.speed),
            icon: first.icon,
        })
    }
}

fn whole_degrees(field: &str, celsius: f64) -> Result<i32, WeatherError> {
    i32::try_from(round_to_int(celsius)).map_err(|_| {
        WeatherError::MalformedResponse(format!("`main.{field}` out of range: {celsius}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LONDON: &str = r#"{
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [
            { "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }
        ],
        "base": "stations",
        "main": { "temp": 15.2, "feels_like": 13.4, "temp_min": 14.1, "temp_max": 16.3,
                  "pressure": 1012, "humidity": 72 },
        "visibility": 10000,
        "wind": { "speed": 5.0, "deg": 240 },
        "dt": 1700000000,
        "sys": { "country": "GB", "sunrise": 1699986000, "sunset": 1700018000 },
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn maps_current_weather_body() {
        let weather = parse_current(LONDON).expect("valid body");

        assert_eq!(
            weather,
            DisplayWeather {
                city: "London".into(),
                country: "GB".into(),
                temperature: 15,
                feels_like: 13,
                condition: "Clouds".into(),
                description: "scattered clouds".into(),
                humidity: 72,
                wind_speed: 18,
                icon: "03d".into(),
            }
        );
    }

    #[test]
    fn uses_first_weather_entry() {
        let body = LONDON.replace(
            r#"{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }"#,
            r#"{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" },
               { "id": 701, "main": "Mist", "description": "mist", "icon": "50d" }"#,
        );

        let weather = parse_current(&body).expect("valid body");
        assert_eq!(weather.condition, "Rain");
        assert_eq!(weather.description, "light rain");
        assert_eq!(weather.icon, "10d");
    }

    #[test]
    fn converts_wind_speed_to_kmh() {
        let body = LONDON.replace(r#""speed": 5.0"#, r#""speed": 10"#);
        let weather = parse_current(&body).expect("valid body");

        assert_eq!(weather.wind_speed, 36);
    }

    #[test]
    fn negative_temperatures_round_to_nearest() {
        let body = LONDON
            .replace(r#""temp": 15.2"#, r#""temp": -3.6"#)
            .replace(r#""feels_like": 13.4"#, r#""feels_like": -8.5"#);
        let weather = parse_current(&body).expect("valid body");

        assert_eq!(weather.temperature, -4);
        assert_eq!(weather.feels_like, -8);
    }

    #[test]
    fn out_of_range_temperature_is_malformed() {
        let body = LONDON.replace(r#""temp": 15.2"#, r#""temp": 3000000000.0"#);
        let err = parse_current(&body).unwrap_err();

        assert!(matches!(err, WeatherError::MalformedResponse(_)));
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let body = LONDON.replace(r#""feels_like": 13.4"#, r#""feels_like": -3000000000.0"#);
        let err = parse_current(&body).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let body = LONDON.replace(
            r#"{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }"#,
            "",
        );

        let err = parse_current(&body).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_current(r#"{ "name": "London" }"#).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));

        let err = parse_current("not json").unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn request_url_encodes_city_with_spaces() {
        let provider = OpenWeatherProvider::new("KEY".into());
        let url = provider.request_url("New York");

        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?q=New%20York&units=metric&appid=KEY"
        );
    }

    #[test]
    fn request_url_encodes_special_characters() {
        let provider = OpenWeatherProvider::new("KEY".into());

        assert!(provider.request_url("São Paulo").contains("q=S%C3%A3o%20Paulo&"));
        assert!(provider.request_url("Rome&units=imperial").contains("q=Rome%26units%3Dimperial&"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:9000/");

        assert_eq!(
            provider.request_url("Paris"),
            "http://localhost:9000/weather?q=Paris&units=metric&appid=KEY"
        );
    }
}
