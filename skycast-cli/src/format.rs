//! Human-friendly rendering of weather data.

use skycast_core::model::{CurrentWeather, Forecast, GeoLocation, Units, WeatherSnapshot};

/// Renders the current-conditions block for a resolved location.
pub fn current_weather(current: &CurrentWeather, location: &GeoLocation, units: Units) -> String {
    let place = match &location.state {
        Some(state) => format!("{} ({state})", current.name),
        None => current.name.clone(),
    };

    format!(
        "Current conditions in {place} [{}]:\n  {}",
        units.temperature_label(),
        snapshot_line(&current.snapshot, units)
    )
}

/// Renders the sampled forecast, one line per kept entry.
pub fn forecast(forecast: &Forecast, units: Units) -> String {
    let mut lines = Vec::with_capacity(forecast.list.len() + 1);
    lines.push(format!(
        "Forecast for {} ({} entries):",
        forecast.city.name,
        forecast.list.len()
    ));
    for snapshot in &forecast.list {
        lines.push(format!("  {}", snapshot_line(snapshot, units)));
    }
    lines.join("\n")
}

fn snapshot_line(snapshot: &WeatherSnapshot, units: Units) -> String {
    let when = snapshot
        .observed_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| format!("t+{}", snapshot.dt));

    let condition = snapshot
        .condition()
        .map(|c| format!("{} [{}]", c.description, c.icon))
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{when}  {condition}  {:.1}{}  humidity {}%  wind {:.1} {}",
        snapshot.main.temp,
        units.temperature_symbol(),
        snapshot.main.humidity,
        snapshot.wind.speed,
        units.wind_speed_label(),
    )
}
