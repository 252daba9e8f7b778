use crate::aggregate::{AggregateResult, DateGroup};
use crate::client::error::ClientError;
use crate::domain::recommendation::RecommendationRecord;
use crate::geocode::{GeocodeCandidate, GeocodeError};
use crate::request::{Field, ValidationError};
use crate::time::sale_date::display_date;
use serde::Serialize;

const CURRENCY: &str = "₹";

const NO_RECOMMENDATIONS: &str = "No recommendations found.";
const LOADING: &str = "Fetching forecast...";
const SERVICE_UNREACHABLE: &str =
    "Could not reach the recommendation service. Check your connection and try again.";
const REQUEST_REJECTED: &str =
    "The recommendation service could not process this request. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub tone: Tone,
    /// Set when the notice belongs next to one form field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSummary {
    pub market_name: String,
    pub date: String,
    pub net_profit: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub market_name: String,
    pub net_profit: String,
    pub distance: String,
    pub predicted_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Date key exactly as the service sent it.
    pub date: String,
    pub title: String,
    pub cards: Vec<Card>,
}

/// Everything a display surface needs to draw one result view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayModel {
    /// Set while a submission is still waiting on the service.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_best: Option<BestSummary>,
    pub sections: Vec<Section>,
}

impl DisplayModel {
    pub fn loading() -> Self {
        Self {
            pending: true,
            ..Self::notice(Tone::Info, None, LOADING)
        }
    }

    fn notice(tone: Tone, field: Option<Field>, text: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice {
                tone,
                field,
                text: text.into(),
            }),
            pending: false,
            overall_best: None,
            sections: Vec::new(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|s| s.cards.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub enum RenderInput {
    Aggregate(AggregateResult),
    Client(ClientError),
    Validation(ValidationError),
}

impl From<AggregateResult> for RenderInput {
    fn from(v: AggregateResult) -> Self {
        RenderInput::Aggregate(v)
    }
}

impl From<ClientError> for RenderInput {
    fn from(v: ClientError) -> Self {
        RenderInput::Client(v)
    }
}

impl From<ValidationError> for RenderInput {
    fn from(v: ValidationError) -> Self {
        RenderInput::Validation(v)
    }
}

pub fn render(input: RenderInput) -> DisplayModel {
    match input {
        RenderInput::Aggregate(AggregateResult::Empty) => {
            DisplayModel::notice(Tone::Info, None, NO_RECOMMENDATIONS)
        }
        RenderInput::Aggregate(AggregateResult::Populated {
            overall_best,
            groups,
        }) => DisplayModel {
            pending: false,
            notice: None,
            overall_best: Some(best_summary(&overall_best)),
            sections: groups.iter().map(section).collect(),
        },
        RenderInput::Client(err) => {
            tracing::warn!(error = %err, "recommendation request failed");
            let text = match err {
                ClientError::NetworkUnavailable(_) => SERVICE_UNREACHABLE,
                ClientError::HttpStatus(_) | ClientError::MalformedResponse(_) => REQUEST_REJECTED,
            };
            DisplayModel::notice(Tone::Error, None, text)
        }
        RenderInput::Validation(err) => {
            tracing::debug!(error = %err, "submission rejected before sending");
            DisplayModel::notice(Tone::Error, Some(err.field()), validation_text(&err))
        }
    }
}

fn validation_text(err: &ValidationError) -> String {
    match err {
        ValidationError::InvalidNumber { field, .. } => {
            format!("Please enter a valid number for {field}.")
        }
        ValidationError::MissingField { field } => format!("Please fill in the {field}."),
        ValidationError::InvalidDate { .. } => {
            "Please enter the sale date as YYYY-MM-DD.".to_string()
        }
    }
}

fn best_summary(rec: &RecommendationRecord) -> BestSummary {
    let date = display_date(&rec.date);
    let net_profit = money_whole(rec.net_profit);
    let text = format!(
        "Overall Best Option: Sell at {} on {} for an estimated profit of {}!",
        rec.market_name, date, net_profit
    );
    BestSummary {
        market_name: rec.market_name.clone(),
        date,
        net_profit,
        text,
    }
}

fn section(group: &DateGroup) -> Section {
    Section {
        date: group.date.clone(),
        title: format!("Recommendations for {}", display_date(&group.date)),
        cards: group.records.iter().map(card).collect(),
    }
}

fn card(rec: &RecommendationRecord) -> Card {
    Card {
        market_name: rec.market_name.clone(),
        net_profit: money_whole(rec.net_profit),
        distance: format!("{} km", rec.distance_km),
        predicted_price: format!("{CURRENCY}{}/kg", rec.predicted_price_kg),
    }
}

fn money_whole(v: f64) -> String {
    let rounded = v.round();
    // Avoid printing "-0" for small losses that round away.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{CURRENCY}{rounded:.0}")
}

/// One-line status for the place-name lookup that fills the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeStatus {
    pub tone: Tone,
    pub text: String,
}

impl GeocodeStatus {
    pub fn searching() -> Self {
        Self {
            tone: Tone::Info,
            text: "Searching...".to_string(),
        }
    }
}

pub fn geocode_status(result: &Result<GeocodeCandidate, GeocodeError>) -> GeocodeStatus {
    match result {
        Ok(candidate) => GeocodeStatus {
            tone: Tone::Success,
            text: format!("Location found: {}", candidate.display_name),
        },
        Err(GeocodeError::EmptyQuery) => GeocodeStatus {
            tone: Tone::Warning,
            text: "Please enter a location name.".to_string(),
        },
        Err(GeocodeError::NoResult) => GeocodeStatus {
            tone: Tone::Error,
            text: "Location not found. Please try a more specific name.".to_string(),
        },
        Err(err @ GeocodeError::LookupFailed(_)) => {
            tracing::warn!(error = %err, "geocoding failed");
            GeocodeStatus {
                tone: Tone::Error,
                text: "Error fetching location.".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    fn rec(date: &str, market: &str, net_profit: f64) -> RecommendationRecord {
        RecommendationRecord {
            date: date.to_string(),
            market_name: market.to_string(),
            net_profit,
            distance_km: 12.5,
            predicted_price_kg: 21.35,
        }
    }

    #[test]
    fn empty_result_is_a_single_notice() {
        let model = render(AggregateResult::Empty.into());
        assert_eq!(model.notice.as_ref().unwrap().text, "No recommendations found.");
        assert_eq!(model.notice.as_ref().unwrap().tone, Tone::Info);
        assert!(model.overall_best.is_none());
        assert!(model.sections.is_empty());
    }

    #[test]
    fn populated_result_renders_best_then_sections_in_group_order() {
        let input = vec![
            rec("2024-01-01", "A", 100.0),
            rec("2024-01-01", "B", 150.0),
            rec("2024-01-02", "C", 200.4),
        ];
        let model = render(aggregate(Some(input.as_slice())).into());

        assert!(model.notice.is_none());
        let best = model.overall_best.as_ref().unwrap();
        assert_eq!(best.market_name, "C");
        assert_eq!(best.date, "Tue Jan 02 2024");
        assert_eq!(best.net_profit, "₹200");
        assert_eq!(
            best.text,
            "Overall Best Option: Sell at C on Tue Jan 02 2024 for an estimated profit of ₹200!"
        );

        assert_eq!(model.sections.len(), 2);
        assert_eq!(model.sections[0].title, "Recommendations for Mon Jan 01 2024");
        let names: Vec<_> = model.sections[0]
            .cards
            .iter()
            .map(|c| c.market_name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(model.sections[1].cards[0].market_name, "C");
        assert_eq!(model.card_count(), 3);
    }

    #[test]
    fn card_fields_are_formatted_for_display() {
        let mut r = rec("2024-01-01", "Delhi_Mandi", 41249.5);
        r.distance_km = 1180.0;
        let model = render(aggregate(Some(std::slice::from_ref(&r))).into());
        let card = &model.sections[0].cards[0];
        assert_eq!(card.net_profit, "₹41250");
        assert_eq!(card.distance, "1180 km");
        assert_eq!(card.predicted_price, "₹21.35/kg");
    }

    #[test]
    fn money_rounds_half_away_from_zero_without_negative_zero() {
        assert_eq!(money_whole(2.5), "₹3");
        assert_eq!(money_whole(-2.5), "₹-3");
        assert_eq!(money_whole(-0.4), "₹0");
        assert_eq!(money_whole(1234.49), "₹1234");
    }

    #[test]
    fn unparseable_dates_are_shown_verbatim() {
        let input = vec![rec("day after tomorrow", "A", 1.0)];
        let model = render(aggregate(Some(input.as_slice())).into());
        assert_eq!(model.sections[0].title, "Recommendations for day after tomorrow");
    }

    #[test]
    fn http_failure_is_a_single_generic_notice() {
        let model = render(ClientError::HttpStatus(500).into());
        let notice = model.notice.as_ref().unwrap();
        assert_eq!(notice.tone, Tone::Error);
        assert_eq!(notice.text, REQUEST_REJECTED);
        assert!(!notice.text.contains("500"));
        assert!(model.overall_best.is_none());
        assert_eq!(model.card_count(), 0);
    }

    #[test]
    fn network_failure_uses_unreachable_phrasing() {
        let err = ClientError::NetworkUnavailable("connection refused".to_string());
        let model = render(err.into());
        let notice = model.notice.unwrap();
        assert_eq!(notice.text, SERVICE_UNREACHABLE);
        assert!(!notice.text.contains("refused"));
    }

    #[test]
    fn malformed_response_uses_rejected_phrasing() {
        let model = render(ClientError::MalformedResponse("missing field".to_string()).into());
        assert_eq!(model.notice.unwrap().text, REQUEST_REJECTED);
    }

    #[test]
    fn validation_error_points_at_its_field() {
        let err = ValidationError::InvalidNumber {
            field: Field::Quantity,
            value: "abc".to_string(),
        };
        let model = render(err.into());
        let notice = model.notice.unwrap();
        assert_eq!(notice.field, Some(Field::Quantity));
        assert_eq!(notice.text, "Please enter a valid number for quantity.");
        assert!(model.sections.is_empty());
    }

    #[test]
    fn loading_model_has_no_cards() {
        let model = DisplayModel::loading();
        assert!(model.pending);
        assert_eq!(model.notice.unwrap().text, "Fetching forecast...");
        assert!(model.sections.is_empty());
    }

    #[test]
    fn only_loading_model_is_pending() {
        assert!(!render(AggregateResult::Empty.into()).pending);
        assert!(!render(ClientError::HttpStatus(500).into()).pending);

        let json = serde_json::to_value(render(AggregateResult::Empty.into())).unwrap();
        assert!(json.get("pending").is_none());
        assert_eq!(serde_json::to_value(DisplayModel::loading()).unwrap()["pending"], true);
    }

    #[test]
    fn geocode_statuses_match_lookup_outcome() {
        let found = geocode_status(&Ok(GeocodeCandidate {
            lat: 18.5204,
            lon: 73.8567,
            display_name: "Pune, Maharashtra, India".to_string(),
        }));
        assert_eq!(found.tone, Tone::Success);
        assert_eq!(found.text, "Location found: Pune, Maharashtra, India");

        assert_eq!(
            geocode_status(&Err(GeocodeError::EmptyQuery)).tone,
            Tone::Warning
        );
        assert_eq!(
            geocode_status(&Err(GeocodeError::NoResult)).text,
            "Location not found. Please try a more specific name."
        );
        assert_eq!(
            geocode_status(&Err(GeocodeError::LookupFailed("dns".to_string()))).text,
            "Error fetching location."
        );
    }

    #[test]
    fn display_model_serializes_without_empty_optionals() {
        let v = serde_json::to_value(render(AggregateResult::Empty.into())).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "notice": {"tone": "info", "text": "No recommendations found."},
                "sections": [],
            })
        );
    }
}
