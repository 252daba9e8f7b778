use crate::client::error::ClientError;
use crate::domain::contract::RecommendationResponse;
use crate::domain::recommendation::RecommendationSet;
use serde_json::Value;

const MAX_BODY_IN_ERROR: usize = 512;

pub fn parse_recommendations(text: &str) -> Result<RecommendationSet, ClientError> {
    let raw = serde_json::from_str::<Value>(text).map_err(|e| {
        ClientError::MalformedResponse(format!("body is not valid JSON ({e}): {}", truncate(text)))
    })?;

    match raw.get("recommendations") {
        Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(ClientError::MalformedResponse(format!(
                "`recommendations` is not an array: {}",
                truncate(&other.to_string())
            )))
        }
        None => {
            return Err(ClientError::MalformedResponse(format!(
                "missing `recommendations`: {}",
                truncate(text)
            )))
        }
    }

    let parsed = serde_json::from_value::<RecommendationResponse>(raw).map_err(|e| {
        ClientError::MalformedResponse(format!("invalid recommendation record: {e}"))
    })?;
    Ok(parsed.into_set())
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
