use crate::aggregate::aggregate;
use crate::client::RecommendationClient;
use crate::display::{DisplaySlot, DisplaySurface, Ticket};
use crate::domain::request::{RawFields, SubmissionRequest};
use crate::geocode::{fill_coordinates, locate, GeocodeClient};
use crate::present::{geocode_status, render, DisplayModel, GeocodeStatus};
use crate::request::RequestBuilder;
use crate::time::sale_date::default_sale_date;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sends one validated request and renders whatever comes back.
pub async fn recommend<C>(client: &C, request: &SubmissionRequest) -> DisplayModel
where
    C: RecommendationClient + ?Sized,
{
    match client.submit(request).await {
        Ok(records) => {
            tracing::info!(
                commodity = %request.commodity,
                selected_date = %request.selected_date,
                records = records.len(),
                "received recommendations"
            );
            render(aggregate(Some(records.as_slice())).into())
        }
        Err(err) => render(err.into()),
    }
}

/// Looks up a place name and, on success, writes its coordinates into `fields`.
pub async fn fill_from_place<G>(geocoder: &G, query: &str, fields: &mut RawFields) -> GeocodeStatus
where
    G: GeocodeClient + ?Sized,
{
    let result = locate(geocoder, query).await;
    if let Ok(candidate) = &result {
        fill_coordinates(fields, candidate);
    }
    geocode_status(&result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub ticket: Ticket,
    /// False when a newer submission took the display first.
    pub shown: bool,
}

/// One user's form session: fixed default date, one client, one display.
pub struct Session<C, S> {
    builder: RequestBuilder,
    client: C,
    slot: Mutex<DisplaySlot<S>>,
}

impl<C, S> Session<C, S>
where
    C: RecommendationClient,
    S: DisplaySurface,
{
    pub fn start(client: C, surface: S) -> Self {
        Self::started_at(client, surface, Utc::now())
    }

    pub fn started_at(client: C, surface: S, now_utc: DateTime<Utc>) -> Self {
        Self {
            builder: RequestBuilder::new(default_sale_date(now_utc)),
            client,
            slot: Mutex::new(DisplaySlot::new(surface)),
        }
    }

    pub fn default_date(&self) -> NaiveDate {
        self.builder.default_date()
    }

    pub fn current(&self) -> DisplayModel {
        self.slot().current().clone()
    }

    pub async fn submit(&self, raw: &RawFields) -> SubmitOutcome {
        let request = match self.builder.build(raw) {
            Ok(request) => request,
            Err(err) => {
                let ticket = self.slot().begin(render(err.into()));
                return SubmitOutcome { ticket, shown: true };
            }
        };

        let ticket = self.slot().begin(DisplayModel::loading());
        let model = recommend(&self.client, &request).await;
        let shown = self.slot().commit(ticket, model);
        SubmitOutcome { ticket, shown }
    }

    fn slot(&self) -> MutexGuard<'_, DisplaySlot<S>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
