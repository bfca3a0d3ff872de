use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One geocoding match, projected down to the keys the search flow consumes.
/// The first match is conventionally the best one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    /// Administrative region; absent for most cities outside a few countries.
    #[serde(default)]
    pub state: Option<String>,
}

/// Measurement block shared by current conditions and forecast entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Measurements {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    /// Provider icon code, e.g. `10d`.
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// A single weather observation: one instance for "current", many per
/// forecast, at fixed 3-hour steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherSnapshot {
    /// Observation time as a unix timestamp.
    pub dt: i64,
    pub main: Measurements,
    pub weather: Vec<Condition>,
    pub wind: Wind,
}

impl WeatherSnapshot {
    /// Observation time as UTC; `None` for out-of-range provider timestamps.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    /// The leading condition entry, which the provider treats as primary.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

/// Response body of the current-weather resource.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    /// Display name of the resolved location.
    pub name: String,
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
}

/// Location metadata attached to a forecast response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityMeta {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// Forecast bundle: location metadata plus chronologically ordered
/// snapshots. Sampling preserves the provider's order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    pub city: CityMeta,
    pub list: Vec<WeatherSnapshot>,
}

/// Display units, selectable per lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Query option understood by the provider.
    pub fn query_option(&self) -> String {
        format!("units={}", self.as_str())
    }

    /// Temperature scale shown to the user, matching the unit-toggle labels.
    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Metric => "Celsius",
            Units::Imperial => "Fahrenheit",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Units {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" | "celsius" => Ok(Units::Metric),
            "imperial" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}
