use weather_lookup_core::{DisplayWeather, SearchState};

pub const LOADING: &str = "Fetching weather data...";

/// Text for the current search state: loading line, error banner or card.
pub fn state(state: &SearchState) -> String {
    if state.is_loading {
        return LOADING.to_string();
    }

    if let Some(message) = &state.error_message {
        return format!("Error: {message}");
    }

    match &state.result {
        Some(weather) => {
            let mut out = card(weather);
            if let Some(updated) = state.last_updated {
                out.push_str(&format!("\n   Updated {}", updated.format("%H:%M UTC")));
            }
            out
        }
        None => String::new(),
    }
}

pub fn card(weather: &DisplayWeather) -> String {
    format!(
        "{glyph}  {city}, {country}\n   \
         {temp}°C (feels like {feels}°C)\n   \
         {description}\n   \
         Humidity {humidity}%   Wind {wind} km/h",
        glyph = weather.condition_kind().glyph(),
        city = weather.city,
        country = weather.country,
        temp = weather.temperature,
        feels = weather.feels_like,
        description = capitalize_words(&weather.description),
        humidity = weather.humidity,
        wind = weather.wind_speed,
    )
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
