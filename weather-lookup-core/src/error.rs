use reqwest::StatusCode;
use thiserror::Error;

pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Please check the spelling and try again.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid API key. Please check your configuration.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again later.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Failure of a single weather lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city not found (HTTP 404)")]
    CityNotFound,

    #[error("API key rejected (HTTP 401)")]
    InvalidCredentials,

    #[error("weather provider answered with status {status}")]
    Upstream { status: StatusCode },

    #[error("request to weather provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather provider returned an unexpected body: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

/// User-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; the user can fix it by entering another city.
    CityNotFound,
    /// Configuration problem.
    InvalidCredentials,
    /// Provider or network failure, worth retrying.
    Upstream,
    Unclassified,
}

impl WeatherError {
    /// Classify a response status. Returns `None` for success statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        Some(match status {
            StatusCode::NOT_FOUND => WeatherError::CityNotFound,
            StatusCode::UNAUTHORIZED => WeatherError::InvalidCredentials,
            status => WeatherError::Upstream { status },
        })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::CityNotFound => ErrorKind::CityNotFound,
            WeatherError::InvalidCredentials => ErrorKind::InvalidCredentials,
            WeatherError::Upstream { .. }
            | WeatherError::Transport(_)
            | WeatherError::MalformedResponse(_) => ErrorKind::Upstream,
            WeatherError::Unclassified(_) => ErrorKind::Unclassified,
        }
    }

    /// The message shown in the error banner.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::CityNotFound => CITY_NOT_FOUND_MESSAGE,
            ErrorKind::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            ErrorKind::Upstream => UPSTREAM_ERROR_MESSAGE,
            ErrorKind::Unclassified => UNEXPECTED_ERROR_MESSAGE,
        }
    }
}
