//! Weather and icon fetching.
//!
//! The service payload is validated at this boundary into the fixed-shape
//! [`Conditions`] record; nothing past here sees raw JSON. Both collaborators
//! sit behind traits so the dashboard can be exercised with canned data.

use std::io::Read;
use std::ops::RangeInclusive;
use std::time::Duration;

use log::debug;
use matrix_common::DecodeError;
use matrix_common::widgets::Conditions;
use serde::Deserialize;
use thiserror::Error;

/// Current conditions endpoint of weatherapi.com.
pub const CURRENT_URL: &str = "https://api.weatherapi.com/v1/current.json";

/// Plausible surface temperatures; anything outside is a bad payload.
const TEMPERATURE_RANGE: RangeInclusive<f32> = -100.0..=100.0;

/// Largest icon payload accepted.
const MAX_ICON_BYTES: u64 = 4 * 1024 * 1024;

/// Failure fetching or validating external data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("reading response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding icon: {0}")]
    Decode(#[from] DecodeError),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(transport) => Self::Http(transport.to_string()),
        }
    }
}

/// Source of current weather conditions.
pub trait WeatherSource {
    fn current_conditions(
        &self,
        location: &str,
    ) -> Result<Conditions, FetchError>;
}

/// Source of raw icon bytes.
pub trait IconFetcher {
    fn fetch_bytes(
        &self,
        url: &str,
    ) -> Result<Vec<u8>, FetchError>;
}

// =============================================================================
// Payload Validation
// =============================================================================

#[derive(Deserialize)]
struct Payload {
    location: Option<LocationPayload>,
    current: Option<CurrentPayload>,
}

#[derive(Deserialize)]
struct LocationPayload {
    name: Option<String>,
}

#[derive(Deserialize)]
struct CurrentPayload {
    temp_c: Option<f32>,
    condition: Option<ConditionPayload>,
}

#[derive(Deserialize)]
struct ConditionPayload {
    icon: Option<String>,
}

fn missing(field: &str) -> FetchError { FetchError::Malformed(format!("missing field `{field}`")) }

/// Validate a `current.json` response body.
pub fn parse_conditions(body: &str) -> Result<Conditions, FetchError> {
    let payload: Payload = serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let location_name = payload.location.and_then(|l| l.name).ok_or_else(|| missing("location.name"))?;
    let current = payload.current.ok_or_else(|| missing("current"))?;
    let temperature_celsius = current.temp_c.ok_or_else(|| missing("current.temp_c"))?;
    let condition_icon_url =
        current.condition.and_then(|c| c.icon).ok_or_else(|| missing("current.condition.icon"))?;

    if !TEMPERATURE_RANGE.contains(&temperature_celsius) {
        return Err(FetchError::Malformed(format!("temperature {temperature_celsius} out of range")));
    }

    Ok(Conditions { location_name, temperature_celsius, condition_icon_url })
}

/// Complete protocol-relative URLs (`//cdn...`) with `https:`.
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("//") { format!("https:{url}") } else { url.to_string() }
}

// =============================================================================
// HTTP Implementations
// =============================================================================

fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout_connect(timeout).timeout_read(timeout).build()
}

/// weatherapi.com client.
pub struct WeatherApi {
    agent: ureq::Agent,
    api_key: String,
}

impl WeatherApi {
    pub fn new(
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self { agent: agent(timeout), api_key }
    }
}

impl WeatherSource for WeatherApi {
    fn current_conditions(
        &self,
        location: &str,
    ) -> Result<Conditions, FetchError> {
        debug!("Requesting current conditions for '{location}'");
        let body = self
            .agent
            .get(CURRENT_URL)
            .query("key", &self.api_key)
            .query("q", location)
            .call()?
            .into_string()?;
        parse_conditions(&body)
    }
}

/// Plain HTTP GET for icon images.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self { Self { agent: agent(timeout) } }
}

impl IconFetcher for HttpFetcher {
    fn fetch_bytes(
        &self,
        url: &str,
    ) -> Result<Vec<u8>, FetchError> {
        let url = absolute_url(url);
        debug!("Fetching icon {url}");

        let mut bytes = Vec::new();
        self.agent.get(&url).call()?.into_reader().take(MAX_ICON_BYTES).read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {"name": "Chicago", "region": "Illinois", "country": "USA"},
        "current": {
            "temp_c": 12.5,
            "temp_f": 54.5,
            "condition": {"text": "Partly cloudy", "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png", "code": 1003}
        }
    }"#;

    #[test]
    fn test_parse_valid_payload() {
        let conditions = parse_conditions(SAMPLE).unwrap();
        assert_eq!(conditions.location_name, "Chicago");
        assert_eq!(conditions.temperature_celsius, 12.5);
        assert_eq!(conditions.condition_icon_url, "//cdn.weatherapi.com/weather/64x64/day/116.png");
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let cases = [
            (r#"{"current": {"temp_c": 1.0, "condition": {"icon": "x"}}}"#, "location.name"),
            (r#"{"location": {"name": "A"}}"#, "current"),
            (r#"{"location": {"name": "A"}, "current": {"condition": {"icon": "x"}}}"#, "current.temp_c"),
            (r#"{"location": {"name": "A"}, "current": {"temp_c": 1.0}}"#, "current.condition.icon"),
        ];
        for (body, field) in cases {
            match parse_conditions(body) {
                Err(FetchError::Malformed(msg)) => assert!(msg.contains(field), "{msg} should name {field}"),
                other => panic!("expected Malformed for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        let body = r#"{"location": {"name": "A"}, "current": {"temp_c": "warm", "condition": {"icon": "x"}}}"#;
        assert!(matches!(parse_conditions(body), Err(FetchError::Malformed(_))));
        assert!(matches!(parse_conditions("not json"), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_implausible_temperature_is_malformed() {
        for temp in ["1e15", "-273.5", "100.5"] {
            let body = format!(r#"{{"location": {{"name": "A"}}, "current": {{"temp_c": {temp}, "condition": {{"icon": "x"}}}}}}"#);
            match parse_conditions(&body) {
                Err(FetchError::Malformed(msg)) => assert!(msg.contains("out of range"), "{msg}"),
                other => panic!("expected Malformed for {temp}, got {other:?}"),
            }
        }

        let body = r#"{"location": {"name": "A"}, "current": {"temp_c": -99.9, "condition": {"icon": "x"}}}"#;
        assert_eq!(parse_conditions(body).unwrap().temperature_celsius, -99.9);
    }

    #[test]
    fn test_error_payload_is_malformed() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        assert!(matches!(parse_conditions(body), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("//cdn.example.com/a.png"), "https://cdn.example.com/a.png");
        assert_eq!(absolute_url("http://example.com/a.png"), "http://example.com/a.png");
    }
}
