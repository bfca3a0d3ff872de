//! OpenWeatherMap client: the three provider resources (geocoding by name,
//! current weather, 5-day forecast) on top of the generic [`RestClient`].

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ProjectionError};
use crate::model::{CurrentWeather, Forecast, GeoLocation, Units};
use crate::rest::{JsonObject, ProjectionPolicy, RestClient, project_keys};

/// Production endpoint; tests point the client elsewhere.
pub const BASE_URL: &str = "https://api.openweathermap.org/";

const API_KEY_PARAM: &str = "appid";

// Keep -, _, . unescaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// The two weather resources under `data/2.5/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherResource {
    Weather,
    Forecast,
}

impl WeatherResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherResource::Weather => "weather",
            WeatherResource::Forecast => "forecast",
        }
    }
}

/// Sampling applied to forecast lists: keep every `stride`-th entry starting
/// at index `offset`.
///
/// The provider returns 3-hour intervals, so the default of every eighth
/// entry starting at index 3 yields roughly one midday sample per calendar
/// day over the 5-day horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSampling {
    pub offset: usize,
    pub stride: usize,
}

impl Default for ForecastSampling {
    fn default() -> Self {
        Self { offset: 3, stride: 8 }
    }
}

/// Client for the OpenWeatherMap REST API.
///
/// Holds a configured [`RestClient`] and delegates URL construction and
/// request dispatch to it. The only mutable piece is the forecast sampling
/// setting, which applies to all subsequent forecast calls.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    rest: RestClient,
    sampling: ForecastSampling,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    /// Client against a non-default endpoint. Integration tests use this to
    /// target a local stub server.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            rest: RestClient::with_api_key(base_url, API_KEY_PARAM, api_key),
            sampling: ForecastSampling::default(),
        }
    }

    pub fn sampling(&self) -> ForecastSampling {
        self.sampling
    }

    /// Adjusts forecast sampling for all subsequent [`fetch_forecast`] calls.
    /// A stride of zero is clamped to one.
    ///
    /// [`fetch_forecast`]: OpenWeatherClient::fetch_forecast
    pub fn set_forecast_sampling(&mut self, offset: usize, stride: usize) {
        self.sampling = ForecastSampling {
            offset,
            stride: stride.max(1),
        };
    }

    /// URL of the geocoding resource for a city name. The name is
    /// percent-encoded here; extra options must be pre-encoded by the caller.
    pub fn geocode_url(&self, city: &str, limit: u32, options: &[String]) -> String {
        let mut params = vec![
            format!("q={}", utf8_percent_encode(city, QUERY_VALUE)),
            format!("limit={limit}"),
        ];
        params.extend_from_slice(options);
        self.rest.build_url("geo/1.0/direct", &params)
    }

    /// URL of a weather resource for a coordinate pair.
    pub fn weather_url(
        &self,
        resource: WeatherResource,
        lat: f64,
        lon: f64,
        options: &[String],
    ) -> String {
        let mut params = vec![format!("lat={lat}"), format!("lon={lon}")];
        params.extend_from_slice(options);
        self.rest
            .build_url(&format!("data/2.5/{}", resource.as_str()), &params)
    }

    /// Resolves a city name to coordinates, best match first.
    ///
    /// `city` may also be a pre-built absolute geocoding URL, which is used
    /// as-is. Zero matches fail with [`ApiError::InvalidCity`].
    pub async fn fetch_coordinates(&self, city: &str) -> Result<Vec<GeoLocation>, ApiError> {
        let url = self.rest.resolve_url(city, |c| self.geocode_url(c, 1, &[]));
        let matches: Vec<JsonObject> = self.rest.request(&url).await?;

        // Non-strict: `state` is routinely absent and must not fail the lookup.
        let policy = ProjectionPolicy {
            strict: false,
            ..ProjectionPolicy::default()
        };
        let projected =
            project_keys(matches, &["lat", "lon", "state"], &policy).map_err(|err| match err {
                ProjectionError::EmptyInput { .. }
                | ProjectionError::NoKeysRetained { .. }
                | ProjectionError::NoResults { .. } => ApiError::InvalidCity(city.to_string()),
                other => ApiError::Projection(other),
            })?;

        projected
            .into_iter()
            .map(|obj| serde_json::from_value(Value::Object(obj)).map_err(ApiError::from))
            .collect()
    }

    /// Fetches a weather resource and parses the body without reshaping it.
    pub async fn fetch_weather<T: DeserializeOwned>(
        &self,
        resource: WeatherResource,
        lat: f64,
        lon: f64,
        options: &[String],
    ) -> Result<T, ApiError> {
        let url = self.weather_url(resource, lat, lon, options);
        self.rest.request(&url).await
    }

    /// Current conditions at the given coordinates.
    pub async fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<CurrentWeather, ApiError> {
        self.fetch_weather(WeatherResource::Weather, lat, lon, &[units.query_option()])
            .await
    }

    /// Five-day forecast at the given coordinates, down-sampled per the
    /// configured [`ForecastSampling`].
    pub async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<Forecast, ApiError> {
        let raw: Forecast = self
            .fetch_weather(WeatherResource::Forecast, lat, lon, &[units.query_option()])
            .await?;

        debug!(
            city = %raw.city.name,
            entries = raw.list.len(),
            offset = self.sampling.offset,
            stride = self.sampling.stride,
            "sampling forecast"
        );

        Ok(Forecast {
            city: raw.city,
            list: sample(raw.list, self.sampling),
        })
    }
}

/// Keeps every `stride`-th element starting at `offset`, preserving order.
fn sample<T>(list: Vec<T>, sampling: ForecastSampling) -> Vec<T> {
    list.into_iter()
        .skip(sampling.offset)
        .step_by(sampling.stride.max(1))
        .collect()
}
