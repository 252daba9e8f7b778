pub mod aggregate;
pub mod client;
pub mod display;
pub mod domain;
pub mod geocode;
pub mod present;
pub mod request;
pub mod session;
pub mod time;

pub mod config {
    use crate::client::Endpoint;
    use anyhow::Context;

    const DEFAULT_RECOMMEND_ENDPOINT: &str = "/recommend";
    const DEFAULT_RECOMMEND_BASE_URL: &str = "http://127.0.0.1:8000";
    const DEFAULT_RECOMMEND_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_GEOCODE_BASE_URL: &str = "https://nominatim.openstreetmap.org";
    const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_GEOCODE_USER_AGENT: &str = concat!("cropmarket/", env!("CARGO_PKG_VERSION"));

    #[derive(Debug, Clone)]
    pub struct Settings {
        /// Absolute URL (standalone) or path relative to `recommend_base_url` (co-hosted).
        pub recommend_endpoint: String,
        pub recommend_base_url: String,
        pub recommend_timeout_secs: u64,
        pub geocode_base_url: String,
        pub geocode_user_agent: String,
        pub geocode_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                recommend_endpoint: DEFAULT_RECOMMEND_ENDPOINT.to_string(),
                recommend_base_url: DEFAULT_RECOMMEND_BASE_URL.to_string(),
                recommend_timeout_secs: DEFAULT_RECOMMEND_TIMEOUT_SECS,
                geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
                geocode_user_agent: DEFAULT_GEOCODE_USER_AGENT.to_string(),
                geocode_timeout_secs: DEFAULT_GEOCODE_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();
            Ok(Self {
                recommend_endpoint: non_empty_var("RECOMMEND_ENDPOINT")
                    .unwrap_or(defaults.recommend_endpoint),
                recommend_base_url: non_empty_var("RECOMMEND_BASE_URL")
                    .unwrap_or(defaults.recommend_base_url),
                recommend_timeout_secs: parse_var("RECOMMEND_TIMEOUT_SECS")?
                    .unwrap_or(defaults.recommend_timeout_secs),
                geocode_base_url: non_empty_var("GEOCODE_BASE_URL")
                    .unwrap_or(defaults.geocode_base_url),
                geocode_user_agent: non_empty_var("GEOCODE_USER_AGENT")
                    .unwrap_or(defaults.geocode_user_agent),
                geocode_timeout_secs: parse_var("GEOCODE_TIMEOUT_SECS")?
                    .unwrap_or(defaults.geocode_timeout_secs),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn endpoint(&self) -> Endpoint {
            Endpoint::parse(&self.recommend_endpoint)
        }

        pub fn resolve_recommend_url(&self) -> anyhow::Result<reqwest::Url> {
            self.endpoint()
                .resolve(&self.recommend_base_url)
                .with_context(|| {
                    format!(
                        "invalid recommendation endpoint (endpoint={}, base={})",
                        self.recommend_endpoint, self.recommend_base_url
                    )
                })
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parse_var(key: &str) -> anyhow::Result<Option<u64>> {
        non_empty_var(key)
            .map(|s| {
                s.parse::<u64>()
                    .with_context(|| format!("{key} must be an integer (got {s})"))
            })
            .transpose()
    }

}
