use thiserror::Error;

/// Failures raised while projecting response objects down to selected keys.
///
/// Messages are supplied by the caller through
/// [`ProjectionPolicy`](crate::rest::ProjectionPolicy).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The input sequence was empty.
    #[error("{message}")]
    EmptyInput { message: String },

    /// An item lacked a requested key (strict mode only).
    #[error("{message}: item {index} has no key `{key}`")]
    MissingKey {
        index: usize,
        key: String,
        message: String,
    },

    /// No item retained any of the requested keys.
    #[error("{message}")]
    NoKeysRetained { message: String },

    /// Projection produced an empty output sequence.
    #[error("{message}")]
    NoResults { message: String },
}

/// Errors surfaced by the REST client and the OpenWeatherMap client on top
/// of it. Every failure is scoped to a single lookup; nothing here is fatal
/// to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream API answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Geocoding produced zero usable matches for the given city.
    #[error("no location found for city `{0}`")]
    InvalidCity(String),
}
