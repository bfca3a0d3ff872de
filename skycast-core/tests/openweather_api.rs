//! Integration tests for the OpenWeatherMap client against a stub server.

use serde_json::{Value, json};
use skycast_core::error::ApiError;
use skycast_core::model::{CurrentWeather, Units};
use skycast_core::openweather::OpenWeatherClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url(format!("{}/", server.uri()), "test-key")
}

fn forecast_entry(i: i64) -> Value {
    json!({
        "dt": 1_700_000_000 + i * 10_800,
        "main": {"temp": 10.0 + i as f64 * 0.1, "humidity": 60},
        "weather": [{"icon": "10d", "description": "light rain"}],
        "wind": {"speed": 4.1}
    })
}

#[tokio::test]
async fn fetch_coordinates_sends_city_limit_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Paris", "lat": 48.85, "lon": 2.35, "state": null, "country": "FR"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let locations = client_for(&server)
        .fetch_coordinates("Paris")
        .await
        .expect("geocoding must succeed");

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].lat, 48.85);
    assert_eq!(locations[0].lon, 2.35);
    assert_eq!(locations[0].state, None);
}

#[tokio::test]
async fn fetch_coordinates_accepts_a_prebuilt_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/custom/geocode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": 51.51, "lon": -0.13, "state": "England"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/custom/geocode", server.uri());
    let locations = client_for(&server)
        .fetch_coordinates(&url)
        .await
        .expect("prebuilt URL must be used as-is");

    assert_eq!(locations[0].state.as_deref(), Some("England"));
}

#[tokio::test]
async fn fetch_coordinates_fails_with_invalid_city_on_zero_matches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_coordinates("Nonexistentville")
        .await
        .unwrap_err();

    match err {
        ApiError::InvalidCity(city) => assert_eq!(city, "Nonexistentville"),
        other => panic!("expected InvalidCity, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_maps_to_http_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_coordinates("Paris").await.unwrap_err();

    match err {
        ApiError::HttpStatus { status, .. } => assert_eq!(status, 404),
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_is_sampled_to_one_entry_per_day() {
    let server = MockServer::start().await;

    let entries: Vec<Value> = (0..40).map(forecast_entry).collect();
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": {"name": "Paris", "country": "FR"},
            "list": entries
        })))
        .mount(&server)
        .await;

    let forecast = client_for(&server)
        .fetch_forecast(48.85, 2.35, Units::Metric)
        .await
        .expect("forecast must succeed");

    assert_eq!(forecast.city.name, "Paris");

    // Default sampling over 40 three-hour entries keeps source indices
    // 3, 11, 19, 27, 35.
    let kept: Vec<i64> = forecast.list.iter().map(|s| s.dt).collect();
    let expected: Vec<i64> = [3, 11, 19, 27, 35]
        .iter()
        .map(|i| 1_700_000_000 + i * 10_800)
        .collect();
    assert_eq!(kept, expected);
}

#[tokio::test]
async fn fetch_weather_returns_the_body_unshaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Tokyo",
            "dt": 1_700_000_000,
            "main": {"temp": 64.4, "humidity": 55},
            "weather": [{"icon": "01d", "description": "clear sky"}],
            "wind": {"speed": 7.2}
        })))
        .mount(&server)
        .await;

    let current: CurrentWeather = client_for(&server)
        .fetch_current(35.68, 139.69, Units::Imperial)
        .await
        .expect("current weather must succeed");

    assert_eq!(current.name, "Tokyo");
    assert_eq!(current.snapshot.main.temp, 64.4);
    assert_eq!(current.snapshot.condition().unwrap().description, "clear sky");
}

// The full search flow: geocode once, then fetch current conditions and the
// forecast concurrently from the resolved coordinate pair.
#[tokio::test]
async fn end_to_end_search_flow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": 48.85, "lon": 2.35, "state": null}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Paris",
            "dt": 1_700_000_000,
            "main": {"temp": 18.3, "humidity": 62},
            "weather": [{"icon": "10d", "description": "light rain"}],
            "wind": {"speed": 4.1}
        })))
        .mount(&server)
        .await;

    let entries: Vec<Value> = (0..40).map(forecast_entry).collect();
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": {"name": "Paris", "country": "FR"},
            "list": entries
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let locations = client.fetch_coordinates("Paris").await.expect("geocode");
    let best = locations.first().expect("one match");
    assert_eq!((best.lat, best.lon), (48.85, 2.35));

    let (current, forecast) = tokio::try_join!(
        client.fetch_current(best.lat, best.lon, Units::Metric),
        client.fetch_forecast(best.lat, best.lon, Units::Metric),
    )
    .expect("both downstream requests must succeed");

    assert_eq!(current.name, "Paris");
    assert_eq!(forecast.list.len(), 5);
}
