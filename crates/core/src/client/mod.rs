pub mod error;
pub mod http;
pub mod json;

use crate::domain::recommendation::RecommendationSet;
use crate::domain::request::SubmissionRequest;
use anyhow::Context;
use error::ClientError;

#[async_trait::async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn submit(&self, request: &SubmissionRequest) -> Result<RecommendationSet, ClientError>;
}

/// Where the recommendation service lives.
///
/// A standalone front-end talks to an absolute URL; a front-end co-hosted with the
/// service only knows the path and resolves it against its own origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Absolute(String),
    Relative(String),
}

impl Endpoint {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match reqwest::Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                Endpoint::Absolute(s.to_string())
            }
            _ => Endpoint::Relative(s.to_string()),
        }
    }

    pub fn resolve(&self, base_url: &str) -> anyhow::Result<reqwest::Url> {
        match self {
            Endpoint::Absolute(url) => {
                reqwest::Url::parse(url).with_context(|| format!("invalid endpoint URL: {url}"))
            }
            Endpoint::Relative(path) => {
                let base = reqwest::Url::parse(base_url)
                    .with_context(|| format!("invalid base URL: {base_url}"))?;
                base.join(path)
                    .with_context(|| format!("cannot join {path} onto {base_url}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_absolute_and_relative_endpoints() {
        assert_eq!(
            Endpoint::parse("http://127.0.0.1:8000/recommend"),
            Endpoint::Absolute("http://127.0.0.1:8000/recommend".to_string())
        );
        assert_eq!(
            Endpoint::parse("/recommend"),
            Endpoint::Relative("/recommend".to_string())
        );
        assert_eq!(
            Endpoint::parse("recommend"),
            Endpoint::Relative("recommend".to_string())
        );
    }

    #[test]
    fn relative_endpoint_resolves_against_origin() {
        let url = Endpoint::parse("/recommend")
            .resolve("https://mandi.example.org/app/")
            .unwrap();
        assert_eq!(url.as_str(), "https://mandi.example.org/recommend");

        let url = Endpoint::parse("recommend")
            .resolve("https://mandi.example.org/app/")
            .unwrap();
        assert_eq!(url.as_str(), "https://mandi.example.org/app/recommend");
    }

    #[test]
    fn relative_endpoint_needs_a_valid_base() {
        assert!(Endpoint::parse("/recommend").resolve("").is_err());
    }
}
