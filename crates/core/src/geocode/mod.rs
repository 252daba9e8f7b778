pub mod nominatim;

use crate::domain::request::RawFields;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeCandidate {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("no place name given")]
    EmptyQuery,

    #[error("no place matched the query")]
    NoResult,

    #[error("place lookup failed: {0}")]
    LookupFailed(String),
}

#[async_trait::async_trait]
pub trait GeocodeClient: Send + Sync {
    /// Candidates in the order the lookup service ranks them.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError>;
}

/// Resolves a free-text place name to the service's top-ranked candidate.
pub async fn locate<C>(client: &C, query: &str) -> Result<GeocodeCandidate, GeocodeError>
where
    C: GeocodeClient + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(GeocodeError::EmptyQuery);
    }

    client
        .search(query)
        .await?
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoResult)
}

/// Writes the candidate's coordinates into the form, four decimals each.
pub fn fill_coordinates(fields: &mut RawFields, candidate: &GeocodeCandidate) {
    fields.latitude = format!("{:.4}", candidate.lat);
    fields.longitude = format!("{:.4}", candidate.lon);
}
