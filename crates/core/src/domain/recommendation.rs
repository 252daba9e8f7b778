use serde::{Deserialize, Serialize};

/// One market's profit forecast for one date, as produced by the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    /// Kept verbatim; grouping compares these strings exactly.
    pub date: String,
    pub market_name: String,
    pub net_profit: f64,
    pub distance_km: f64,
    pub predicted_price_kg: f64,
}

/// All records returned for one submission, in response order.
pub type RecommendationSet = Vec<RecommendationRecord>;
