//! DBnomics API integration for World Bank WDI series.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::{RawObservation, SeriesId};
use crate::error::AppError;

/// Backoff step between retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Dimension that carries the country code in WDI series.
const COUNTRY_DIMENSION: &str = "country";

/// Anything that can resolve series identifiers to observations.
///
/// The pipeline only talks to this trait so it can run against canned data.
pub trait SeriesProvider {
    /// Fetch all observations of the given series.
    ///
    /// Implementations must fail rather than return an empty result, and must
    /// fail when any requested series is unknown to the provider.
    fn fetch_series(&self, ids: &[SeriesId]) -> Result<Vec<RawObservation>, AppError>;
}

pub struct DbnomicsClient {
    client: Client,
    api_url: String,
    max_retries: u32,
}

impl DbnomicsClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("kuznets-curves/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            max_retries: settings.max_retries,
        })
    }

    fn get_with_retry(&self, ids: &[SeriesId]) -> Result<String, AppError> {
        let url = format!("{}/series", self.api_url);
        let joined = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");

        let mut attempt = 0u32;
        loop {
            debug!(%url, series = ids.len(), attempt, "requesting DBnomics series");
            let result = self
                .client
                .get(&url)
                .query(&[("observations", "1"), ("series_ids", joined.as_str())])
                .send();

            let failure = match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .text()
                            .map_err(|e| AppError::fetch(format!("Failed to read DBnomics response: {e}")));
                    }
                    let body = resp.text().unwrap_or_default();
                    let message = format!(
                        "DBnomics request failed with status {status}{}",
                        api_error_suffix(&body)
                    );
                    if !is_retryable_status(status) {
                        return Err(AppError::fetch(message));
                    }
                    message
                }
                Err(e) if e.is_timeout() => format!("DBnomics request timed out: {e}"),
                Err(e) => format!("DBnomics request failed: {e}"),
            };

            if attempt >= self.max_retries {
                return Err(AppError::fetch(failure));
            }
            attempt += 1;
            warn!(attempt, max_retries = self.max_retries, "{failure}; retrying");
            std::thread::sleep(RETRY_BACKOFF * attempt);
        }
    }
}

impl SeriesProvider for DbnomicsClient {
    fn fetch_series(&self, ids: &[SeriesId]) -> Result<Vec<RawObservation>, AppError> {
        if ids.is_empty() {
            return Err(AppError::fetch("No series requested."));
        }
        let body = self.get_with_retry(ids)?;
        let observations = parse_series_response(&body, ids)?;
        info!(series = ids.len(), observations = observations.len(), "fetched DBnomics series");
        Ok(observations)
    }
}

/// Transient statuses worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    series: SeriesPage,
    #[serde(default)]
    datasets: HashMap<String, DatasetMeta>,
}

#[derive(Debug, Deserialize)]
struct SeriesPage {
    #[serde(default)]
    docs: Vec<SeriesDoc>,
}

#[derive(Debug, Deserialize)]
struct SeriesDoc {
    provider_code: String,
    dataset_code: String,
    series_code: String,
    #[serde(default)]
    dimensions: HashMap<String, String>,
    #[serde(default)]
    original_period: Vec<String>,
    #[serde(default)]
    period: Vec<String>,
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetMeta {
    #[serde(default)]
    dimensions_values_labels: HashMap<String, DimensionLabels>,
}

/// DBnomics has served value labels both as an object and as `[code, label]` pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DimensionLabels {
    Map(HashMap<String, String>),
    Pairs(Vec<(String, String)>),
}

impl DimensionLabels {
    fn label(&self, code: &str) -> Option<&str> {
        match self {
            DimensionLabels::Map(map) => map.get(code).map(String::as_str),
            DimensionLabels::Pairs(pairs) => pairs.iter().find(|(c, _)| c == code).map(|(_, l)| l.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Parse a `/series?observations=1` body into flat observations.
///
/// Fails when the payload is malformed, holds no series or observations, or
/// lacks any of `requested`.
pub fn parse_series_response(body: &str, requested: &[SeriesId]) -> Result<Vec<RawObservation>, AppError> {
    let resp: SeriesResponse = serde_json::from_str(body)
        .map_err(|e| AppError::fetch(format!("Failed to parse DBnomics response: {e}")))?;

    if resp.series.docs.is_empty() {
        return Err(AppError::fetch("DBnomics returned no series."));
    }

    let returned: Vec<SeriesId> = resp
        .series
        .docs
        .iter()
        .map(|doc| SeriesId {
            provider: doc.provider_code.clone(),
            dataset: doc.dataset_code.clone(),
            series: doc.series_code.clone(),
        })
        .collect();
    let unknown: Vec<String> = requested
        .iter()
        .filter(|id| !returned.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::fetch(format!("Unknown series: {}", unknown.join(", "))));
    }

    let mut out = Vec::new();
    let mut missing_values = 0usize;
    for (doc, id) in resp.series.docs.into_iter().zip(returned) {
        let country = doc.dimensions.get(COUNTRY_DIMENSION).map(|code| {
            resp.datasets
                .get(&id.dataset_key())
                .and_then(|meta| meta.dimensions_values_labels.get(COUNTRY_DIMENSION))
                .and_then(|labels| labels.label(code))
                .unwrap_or(code)
                .to_string()
        });

        let periods = if doc.original_period.is_empty() { &doc.period } else { &doc.original_period };
        if periods.len() != doc.value.len() {
            return Err(AppError::fetch(format!(
                "Series {id} has {} periods but {} values.",
                periods.len(),
                doc.value.len()
            )));
        }

        for (period, raw) in periods.iter().zip(&doc.value) {
            let value = parse_value(raw);
            if value.is_none() {
                missing_values += 1;
            }
            out.push(RawObservation {
                series: id.clone(),
                original_period: period.clone(),
                value,
                country: country.clone(),
            });
        }
    }

    if out.is_empty() {
        return Err(AppError::fetch("DBnomics returned no observations."));
    }
    if missing_values > 0 {
        debug!(missing_values, "DBnomics payload contains missing observations");
    }
    Ok(out)
}

fn parse_value(raw: &serde_json::Value) -> Option<f64> {
    let v = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "NA" {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

fn api_error_suffix(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return String::new();
    };
    if let Some(message) = parsed.message {
        return format!(": {message}");
    }
    match parsed.errors.first() {
        Some(first) => format!(": {first}"),
        None => String::new(),
    }
}
