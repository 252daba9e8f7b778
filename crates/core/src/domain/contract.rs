use crate::domain::recommendation::{RecommendationRecord, RecommendationSet};
use serde::Deserialize;

/// Response body of `POST <endpoint>`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationRecord>,
}

impl RecommendationResponse {
    pub fn into_set(self) -> RecommendationSet {
        self.recommendations
    }
}
