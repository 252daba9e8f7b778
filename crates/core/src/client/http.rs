use crate::client::error::ClientError;
use crate::client::json::parse_recommendations;
use crate::client::RecommendationClient;
use crate::config::Settings;
use crate::domain::recommendation::RecommendationSet;
use crate::domain::request::SubmissionRequest;
use anyhow::Context;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    http: reqwest::Client,
    url: reqwest::Url,
}

impl HttpRecommendationClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let url = settings.resolve_recommend_url()?;
        Self::new(url, Duration::from_secs(settings.recommend_timeout_secs))
    }

    pub fn new(url: reqwest::Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build recommendation http client")?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn submit(&self, request: &SubmissionRequest) -> Result<RecommendationSet, ClientError> {
        tracing::debug!(
            url = %self.url,
            commodity = %request.commodity,
            selected_date = %request.selected_date,
            "posting recommendation request"
        );

        let res = self
            .http
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::NetworkUnavailable(error_chain(&e)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let text = res
            .text()
            .await
            .map_err(|e| ClientError::NetworkUnavailable(error_chain(&e)))?;
        parse_recommendations(&text)
    }
}

// reqwest's top-level Display hides the cause (refused, DNS, timeout).
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
