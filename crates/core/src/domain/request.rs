use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Form fields as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub quantity: String,
    /// `None` or blank means the user left the session default in place.
    #[serde(default)]
    pub selected_date: Option<String>,
}

/// Canonical payload sent to the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub farmer_lat: f64,
    pub farmer_lon: f64,
    pub commodity: String,
    pub quantity_tonnes: f64,
    pub selected_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_wire_field_names_and_iso_date() {
        let req = SubmissionRequest {
            farmer_lat: 28.6,
            farmer_lon: 77.2,
            commodity: "Tomato".to_string(),
            quantity_tonnes: 2.0,
            selected_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        };

        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "farmer_lat": 28.6,
                "farmer_lon": 77.2,
                "commodity": "Tomato",
                "quantity_tonnes": 2.0,
                "selected_date": "2026-10-19",
            })
        );
    }

    #[test]
    fn raw_fields_accept_missing_keys() {
        let raw: RawFields = serde_json::from_value(json!({"commodity": "Onion"})).unwrap();
        assert_eq!(raw.commodity, "Onion");
        assert!(raw.latitude.is_empty());
        assert!(raw.selected_date.is_none());
    }
}
