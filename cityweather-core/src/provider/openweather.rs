use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    CityQuery, Config,
    error::TransportError,
    model::{CurrentConditions, ForecastEntry},
};

use super::{ProviderReply, WeatherProvider};

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_client(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            http,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self::with_client(config.api_key.clone(), config.base_url.clone(), http))
    }

    /// GET `{base_url}/{endpoint}` and return the body whatever the HTTP status;
    /// OpenWeather reports its own status inside the body.
    async fn fetch_body(
        &self,
        endpoint: &str,
        city: &CityQuery,
        context: &'static str,
    ) -> Result<String, TransportError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, city = %city, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city.as_str()),
                ("units", UNITS),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| TransportError::Http { context, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| TransportError::Http { context, source })?;

        tracing::debug!(%url, %status, bytes = body.len(), "OpenWeather responded");
        Ok(body)
    }
}

/// Decode `body` in two steps: first the status indicator, then the full
/// payload only when the status is 200.
fn decode_reply<T: DeserializeOwned>(
    body: &str,
    context: &'static str,
) -> Result<ProviderReply<T>, TransportError> {
    let decode_err = |source| TransportError::Decode {
        context,
        body: truncate_body(body),
        source,
    };

    let envelope: OwEnvelope = serde_json::from_str(body).map_err(decode_err)?;
    let code = envelope.cod.as_ref().map_or(0, OwCode::code);

    if code != 200 {
        return Ok(ProviderReply::Failure {
            code,
            message: envelope.message(),
        });
    }

    let parsed: T = serde_json::from_str(body).map_err(decode_err)?;
    Ok(ProviderReply::Success(parsed))
}

/// `cod` is a number on the current endpoint and a string on the forecast
/// endpoint and on most error bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(u16),
    Text(String),
}

impl OwCode {
    fn code(&self) -> u16 {
        match self {
            OwCode::Number(n) => *n,
            OwCode::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    // A string on errors, a number (0) on forecast success.
    message: Option<serde_json::Value>,
}

impl OwEnvelope {
    fn message(&self) -> Option<String> {
        match &self.message {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    #[serde(with = "chrono::serde::ts_seconds")]
    dt: DateTime<Utc>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

fn first_description(weather: Vec<OwWeather>) -> String {
    weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(r: OwCurrentResponse) -> Self {
        CurrentConditions {
            location: r.name,
            temperature_c: r.main.temp,
            description: first_description(r.weather),
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(e: OwForecastEntry) -> Self {
        ForecastEntry {
            timestamp: e.dt,
            temperature_c: e.main.temp,
            description: first_description(e.weather),
        }
    }
}

fn map_reply<A, B>(reply: ProviderReply<A>, f: impl FnOnce(A) -> B) -> ProviderReply<B> {
    match reply {
        ProviderReply::Success(v) => ProviderReply::Success(f(v)),
        ProviderReply::Failure { code, message } => ProviderReply::Failure { code, message },
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(
        &self,
        city: &CityQuery,
    ) -> Result<ProviderReply<CurrentConditions>, TransportError> {
        let body = self
            .fetch_body("weather", city, "Failed to send request to OpenWeather (current weather)")
            .await?;

        let reply: ProviderReply<OwCurrentResponse> =
            decode_reply(&body, "Failed to parse OpenWeather current JSON")?;

        Ok(map_reply(reply, CurrentConditions::from))
    }

    async fn forecast(
        &self,
        city: &CityQuery,
    ) -> Result<ProviderReply<Vec<ForecastEntry>>, TransportError> {
        let body = self
            .fetch_body("forecast", city, "Failed to send request to OpenWeather (5-day forecast)")
            .await?;

        let reply: ProviderReply<OwForecastResponse> =
            decode_reply(&body, "Failed to parse OpenWeather forecast JSON")?;

        Ok(map_reply(reply, |r| r.list.into_iter().map(ForecastEntry::from).collect()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_success_code() {
        let body = r#"{
            "cod": 200,
            "name": "Paris",
            "main": {"temp": 18.5},
            "weather": [{"description": "clear sky"}]
        }"#;
        let reply: ProviderReply<OwCurrentResponse> = decode_reply(body, "ctx").unwrap();

        match map_reply(reply, CurrentConditions::from) {
            ProviderReply::Success(c) => {
                assert_eq!(c.location, "Paris");
                assert_eq!(c.temperature_c, 18.5);
                assert_eq!(c.description, "clear sky");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn decodes_string_error_code_and_message() {
        let body = r#"{"cod":"404","message":"city not found"}"#;
        let reply: ProviderReply<OwForecastResponse> = decode_reply(body, "ctx").unwrap();

        match reply {
            ProviderReply::Failure { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message.as_deref(), Some("city not found"));
            }
            ProviderReply::Success(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn missing_status_is_a_failure() {
        let reply: ProviderReply<OwCurrentResponse> = decode_reply("{}", "ctx").unwrap();
        assert!(matches!(reply, ProviderReply::Failure { code: 0, .. }));
    }

    #[test]
    fn success_body_missing_fields_is_a_decode_error() {
        let err = decode_reply::<OwCurrentResponse>(r#"{"cod":200}"#, "ctx").unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn empty_weather_array_uses_unknown() {
        let body = r#"{"cod":200,"name":"Oslo","main":{"temp":-3.0},"weather":[]}"#;
        let reply: ProviderReply<OwCurrentResponse> = decode_reply(body, "ctx").unwrap();

        let ProviderReply::Success(c) = map_reply(reply, CurrentConditions::from) else {
            panic!("expected success");
        };
        assert_eq!(c.description, "unknown");
    }

    #[test]
    fn forecast_entries_use_unix_timestamp() {
        let body = r#"{"cod":"200","message":0,"list":[
            {
                "dt": 1741003200,
                "dt_txt": "2025-03-03 12:00:00",
                "main": {"temp": 9.5},
                "weather": [{"description": "light rain"}]
            }
        ]}"#;
        let reply: ProviderReply<OwForecastResponse> = decode_reply(body, "ctx").unwrap();

        let ProviderReply::Success(r) = reply else { panic!("expected success") };
        let entry = ForecastEntry::from(r.list.into_iter().next().unwrap());
        assert_eq!(entry.timestamp.to_rfc3339(), "2025-03-03T12:00:00+00:00");
        assert_eq!(entry.description, "light rain");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
