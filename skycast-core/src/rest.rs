//! Generic JSON-over-HTTP client: query-string URL construction, uniform
//! response handling, and key projection over response arrays.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::{ApiError, ProjectionError};

/// A JSON object as returned inside API response arrays.
pub type JsonObject = Map<String, Value>;

/// Immutable client configuration plus the underlying HTTP transport.
///
/// The API key is write-only: it is appended to constructed URLs but never
/// readable back through the public surface.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    api_key_param: Option<(String, String)>,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key_param: None,
            http: reqwest::Client::new(),
        }
    }

    /// Same as [`RestClient::new`], but every constructed URL carries the
    /// API key as its final `name=value` query parameter.
    pub fn with_api_key(
        base_url: impl Into<String>,
        param_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key_param: Some((param_name.into(), api_key.into())),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Concatenates the base URL and resource path, then appends the given
    /// pre-formatted `key=value` option strings and, last, the API-key
    /// parameter when one is configured.
    ///
    /// Values are not encoded here; callers pre-encode each option string.
    pub fn build_url(&self, resource: &str, options: &[String]) -> String {
        let mut url = format!("{}{}", self.base_url, resource);

        let mut params = options.to_vec();
        if let Some((name, key)) = &self.api_key_param {
            params.push(format!("{name}={key}"));
        }

        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        debug!(%url, "constructed request url");
        url
    }

    /// True only for strings parseable as an absolute `http` or `https` URL.
    pub fn is_absolute_url(candidate: &str) -> bool {
        Url::parse(candidate)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Returns `candidate` unchanged when it already is an absolute URL,
    /// otherwise invokes `build` to construct one from it.
    ///
    /// Lets a single call site accept either a bare identifier (a city name)
    /// or a fully-formed URL.
    pub fn resolve_url<F>(&self, candidate: &str, build: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if Self::is_absolute_url(candidate) {
            candidate.to_string()
        } else {
            build(candidate)
        }
    }

    /// Performs a GET against `url` and parses the JSON body.
    ///
    /// A non-2xx status fails with [`ApiError::HttpStatus`]. No retries, no
    /// timeout beyond the transport default.
    pub async fn request<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Policy knobs for [`project_keys`], with caller-supplied error messages.
#[derive(Debug, Clone)]
pub struct ProjectionPolicy {
    /// Fail when any item lacks one of the requested keys.
    pub strict: bool,
    /// Fail when no item retains any requested key; when off, an all-dropped
    /// projection fails with [`ProjectionError::NoResults`] instead.
    pub has_a_key: bool,
    pub empty_input_msg: String,
    pub missing_key_msg: String,
    pub no_keys_msg: String,
    pub no_results_msg: String,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        Self {
            strict: true,
            has_a_key: true,
            empty_input_msg: "data is empty".into(),
            missing_key_msg: "object is missing key".into(),
            no_keys_msg: "no object has any of the requested keys".into(),
            no_results_msg: "no objects with keys exist".into(),
        }
    }
}

/// Projects every object in `items` down to the requested `keys`, preserving
/// item order.
///
/// An empty `keys` slice disables projection and returns `items` unchanged.
/// An item retaining none of the keys is silently dropped; see
/// [`ProjectionPolicy`] for what happens when nothing survives.
pub fn project_keys(
    items: Vec<JsonObject>,
    keys: &[&str],
    policy: &ProjectionPolicy,
) -> Result<Vec<JsonObject>, ProjectionError> {
    if items.is_empty() {
        return Err(ProjectionError::EmptyInput {
            message: policy.empty_input_msg.clone(),
        });
    }
    if keys.is_empty() {
        return Ok(items);
    }

    let mut projected = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut reduced = JsonObject::new();
        for &key in keys {
            match item.get(key) {
                Some(value) => {
                    reduced.insert(key.to_string(), value.clone());
                }
                None if policy.strict => {
                    return Err(ProjectionError::MissingKey {
                        index,
                        key: key.to_string(),
                        message: policy.missing_key_msg.clone(),
                    });
                }
                None => {}
            }
        }
        if !reduced.is_empty() {
            projected.push(reduced);
        }
    }

    if projected.is_empty() {
        return Err(if policy.has_a_key {
            ProjectionError::NoKeysRetained {
                message: policy.no_keys_msg.clone(),
            }
        } else {
            ProjectionError::NoResults {
                message: policy.no_results_msg.clone(),
            }
        });
    }

    Ok(projected)
}
