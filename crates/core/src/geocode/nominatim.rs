use crate::config::Settings;
use crate::geocode::{GeocodeCandidate, GeocodeClient, GeocodeError};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_PATH: &str = "/search";

/// Place search against a Nominatim-compatible endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            &settings.geocode_base_url,
            &settings.geocode_user_agent,
            Duration::from_secs(settings.geocode_timeout_secs),
        )
    }

    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        // Nominatim's usage policy rejects requests without an identifying User-Agent.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("failed to build geocoding http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }
}

#[async_trait::async_trait]
impl GeocodeClient for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let res = self
            .http
            .get(self.url())
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(|e| GeocodeError::LookupFailed(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeocodeError::LookupFailed(format!("HTTP {status}")));
        }

        let places = res
            .json::<Vec<Place>>()
            .await
            .map_err(|e| GeocodeError::LookupFailed(format!("unexpected response: {e}")))?;

        Ok(places.into_iter().filter_map(Place::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Coordinate,
    lon: Coordinate,
    #[serde(default)]
    display_name: String,
}

/// Nominatim sends coordinates as strings; other compatible services send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let v = match self {
            Coordinate::Number(v) => Some(*v),
            Coordinate::Text(s) => s.trim().parse::<f64>().ok(),
        };
        v.filter(|v| v.is_finite())
    }
}

impl Place {
    /// Places without usable coordinates are dropped so they never mask a good match.
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let (Some(lat), Some(lon)) = (self.lat.value(), self.lon.value()) else {
            tracing::debug!(
                place = %self.display_name,
                "skipping place with unparseable coordinates"
            );
            return None;
        };
        Some(GeocodeCandidate {
            lat,
            lon,
            display_name: self.display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::locate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NominatimClient {
        NominatimClient::new(&server.uri(), "cropmarket-tests/0.1", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_query_and_parses_string_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("format", "json"))
            .and(query_param("q", "Nashik"))
            .and(header("user-agent", "cropmarket-tests/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "lat": "19.9972700",
                    "lon": "73.7909600",
                    "display_name": "Nashik, Maharashtra, India"
                },
                {"lat": "19.95", "lon": "73.83", "display_name": "Nashik Road"},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let found = locate(&client_for(&server), "Nashik").await.unwrap();
        assert_eq!(found.display_name, "Nashik, Maharashtra, India");
        assert!((found.lat - 19.99727).abs() < 1e-9);
        assert!((found.lon - 73.79096).abs() < 1e-9);
    }

    #[tokio::test]
    async fn accepts_numeric_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": 28.6139, "lon": 77.209, "display_name": "New Delhi"},
            ])))
            .mount(&server)
            .await;

        let found = locate(&client_for(&server), "Delhi").await.unwrap();
        assert_eq!(found.lat, 28.6139);
    }

    #[tokio::test]
    async fn bad_later_candidate_does_not_hide_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "19.99", "lon": "73.79", "display_name": "Nashik"},
                {"lat": "", "lon": "73.83", "display_name": "Bad"},
            ])))
            .mount(&server)
            .await;

        let found = locate(&client_for(&server), "Nashik").await.unwrap();
        assert_eq!(found.display_name, "Nashik");
        assert_eq!(found.lat, 19.99);
    }

    #[tokio::test]
    async fn unusable_first_candidate_falls_through_to_next() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "n/a", "lon": "73.79", "display_name": "Broken"},
                {"lat": 19.95, "lon": 73.83, "display_name": "Nashik Road"},
            ])))
            .mount(&server)
            .await;

        let found = locate(&client_for(&server), "Nashik").await.unwrap();
        assert_eq!(found.display_name, "Nashik Road");
    }

    #[tokio::test]
    async fn empty_array_is_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = locate(&client_for(&server), "Nowhere").await.unwrap_err();
        assert_eq!(err, GeocodeError::NoResult);
    }

    #[tokio::test]
    async fn http_error_is_lookup_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = locate(&client_for(&server), "Pune").await.unwrap_err();
        assert!(matches!(err, GeocodeError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn non_array_body_is_lookup_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "bad"})))
            .mount(&server)
            .await;

        let err = locate(&client_for(&server), "Pune").await.unwrap_err();
        assert!(matches!(err, GeocodeError::LookupFailed(_)));
    }
}
