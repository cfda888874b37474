//! Current conditions and a short forecast from Open-Meteo

use super::{finish, parse_args, Command, CommandContext, CommandError, CommandOutput, Embed};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write;

const FORECAST_DAYS: usize = 3;

pub struct WeatherCommand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
enum Units {
    #[default]
    #[serde(rename = "c")]
    Celsius,
    #[serde(rename = "f")]
    Fahrenheit,
}

impl Units {
    fn temperature_param(self) -> &'static str {
        match self {
            Units::Celsius => "celsius",
            Units::Fahrenheit => "fahrenheit",
        }
    }

    fn windspeed_param(self) -> &'static str {
        match self {
            Units::Celsius => "kmh",
            Units::Fahrenheit => "mph",
        }
    }

    fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Celsius => "°C",
            Units::Fahrenheit => "°F",
        }
    }

    fn wind_suffix(self) -> &'static str {
        match self {
            Units::Celsius => "km/h",
            Units::Fahrenheit => "mph",
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherInput {
    city: String,
    #[serde(default)]
    units: Units,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
}

impl Location {
    fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(self.admin1.as_deref());
        parts.extend(self.country.as_deref());
        parts.join(", ")
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
    daily: Option<Daily>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: u16,
}

#[derive(Debug, Deserialize)]
struct Daily {
    time: Vec<String>,
    temperature_2m_min: Vec<f64>,
    temperature_2m_max: Vec<f64>,
}

fn condition(code: u16) -> &'static str {
    match code {
        0 => "Clear ☀️",
        1 => "Mostly Clear 🌤️",
        2 => "Partly Cloudy ⛅",
        3 => "Overcast ☁️",
        45 => "Fog 🌫️",
        51 => "Drizzle 🌦️",
        61 => "Rain 🌧️",
        71 => "Snow ❄️",
        95 => "Thunderstorm ⛈️",
        _ => "Unknown 🌡️",
    }
}

fn format_weather(location: &Location, forecast: ForecastResponse, units: Units) -> CommandOutput {
    let (Some(current), Some(daily)) = (forecast.current_weather, forecast.daily) else {
        return CommandOutput::success("Weather data unavailable.");
    };

    let temp = units.temperature_suffix();
    let mut days = String::new();
    let rows = daily
        .time
        .iter()
        .zip(&daily.temperature_2m_min)
        .zip(&daily.temperature_2m_max)
        .take(FORECAST_DAYS);
    for ((date, min), max) in rows {
        let _ = writeln!(days, "**{date}** — {min} / {max}{temp}");
    }

    CommandOutput::embed(
        Embed::new(location.display_name(), condition(current.weathercode))
            .field("Current", format!("{}{temp}", current.temperature), true)
            .field(
                "Wind",
                format!("{} {}", current.windspeed, units.wind_suffix()),
                true,
            )
            .field("3-Day Forecast", days, false)
            .footer("Data provided by Open-Meteo"),
    )
}

impl WeatherCommand {
    async fn fetch(input: Value, ctx: &CommandContext) -> Result<CommandOutput, CommandError> {
        let WeatherInput { city, units } = parse_args(input)?;
        let endpoints = &ctx.settings.endpoints;

        let geo: GeocodingResponse = ctx
            .http
            .get(&endpoints.geocoding)
            .query(&[("name", city.as_str()), ("count", "1")])
            .send()
            .await?
            .json()
            .await?;
        let Some(location) = geo.results.into_iter().next() else {
            return Ok(CommandOutput::success("City not found."));
        };

        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();
        let forecast: ForecastResponse = ctx
            .http
            .get(&endpoints.forecast)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("daily", "temperature_2m_max,temperature_2m_min,weathercode"),
                ("temperature_unit", units.temperature_param()),
                ("windspeed_unit", units.windspeed_param()),
                ("timezone", "auto"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(format_weather(&location, forecast, units))
    }
}

#[async_trait]
impl Command for WeatherCommand {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn description(&self) -> String {
        "Get current weather and forecast for a city".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["city"],
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name (supports country/state)"
                },
                "units": {
                    "type": "string",
                    "enum": ["c", "f"],
                    "description": "Temperature units, Celsius by default"
                }
            }
        })
    }

    async fn run(&self, input: Value, ctx: CommandContext) -> CommandOutput {
        finish(self.name(), Self::fetch(input, &ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Location {
        serde_json::from_value(json!({
            "name": "Paris",
            "latitude": 48.85,
            "longitude": 2.35,
            "country": "France",
            "admin1": "Île-de-France"
        }))
        .unwrap()
    }

    fn forecast() -> ForecastResponse {
        serde_json::from_value(json!({
            "current_weather": {"temperature": 12.5, "windspeed": 9.1, "weathercode": 2},
            "daily": {
                "time": ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04"],
                "temperature_2m_min": [8.1, 9.0, 7.5, 6.0],
                "temperature_2m_max": [15.2, 16.4, 14.0, 13.0],
                "weathercode": [2, 3, 61, 0]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_units_parse() {
        let input: WeatherInput = serde_json::from_value(json!({"city": "Oslo"})).unwrap();
        assert_eq!(input.units, Units::Celsius);
        let input: WeatherInput =
            serde_json::from_value(json!({"city": "Oslo", "units": "f"})).unwrap();
        assert_eq!(input.units, Units::Fahrenheit);
        assert!(serde_json::from_value::<WeatherInput>(json!({"city": "Oslo", "units": "k"})).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(paris().display_name(), "Paris, Île-de-France, France");
        let bare: Location =
            serde_json::from_value(json!({"name": "X", "latitude": 0.0, "longitude": 0.0})).unwrap();
        assert_eq!(bare.display_name(), "X");
    }

    #[test]
    fn test_condition_codes() {
        assert_eq!(condition(0), "Clear ☀️");
        assert_eq!(condition(95), "Thunderstorm ⛈️");
        assert_eq!(condition(80), "Unknown 🌡️");
    }

    #[test]
    fn test_format_weather() {
        let out = format_weather(&paris(), forecast(), Units::Celsius);
        let embed = out.embed.unwrap();
        assert_eq!(embed.title, "Paris, Île-de-France, France");
        assert_eq!(embed.description, "Partly Cloudy ⛅");
        assert_eq!(embed.fields[0].value, "12.5°C");
        assert_eq!(embed.fields[1].value, "9.1 km/h");
        let days = &embed.fields[2].value;
        assert_eq!(days.lines().count(), 3);
        assert!(days.starts_with("**2024-05-01** — 8.1 / 15.2°C\n"));
        assert!(!days.contains("2024-05-04"));
        assert_eq!(embed.footer.as_deref(), Some("Data provided by Open-Meteo"));
    }

    #[test]
    fn test_fahrenheit_suffixes() {
        let out = format_weather(&paris(), forecast(), Units::Fahrenheit);
        let embed = out.embed.unwrap();
        assert!(embed.fields[0].value.ends_with("°F"));
        assert!(embed.fields[1].value.ends_with("mph"));
    }

    #[test]
    fn test_missing_data() {
        let empty: ForecastResponse = serde_json::from_value(json!({})).unwrap();
        let out = format_weather(&paris(), empty, Units::Celsius);
        assert_eq!(out.content, "Weather data unavailable.");
        assert!(out.embed.is_none());
    }
}
