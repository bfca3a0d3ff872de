//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - A generic JSON REST client (URL construction, response handling, key projection)
//! - The OpenWeatherMap client built on top of it
//! - Shared domain models, configuration, and the recent-cities store
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod openweather;
pub mod recent;
pub mod rest;

pub use config::Config;
pub use error::{ApiError, ProjectionError};
pub use model::{CityMeta, CurrentWeather, Forecast, GeoLocation, Units, WeatherSnapshot};
pub use openweather::{ForecastSampling, OpenWeatherClient, WeatherResource};
pub use recent::RecentCities;
pub use rest::{ProjectionPolicy, RestClient};
