use crate::domain::request::{RawFields, SubmissionRequest};
use crate::time::sale_date::parse_iso_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Latitude,
    Longitude,
    Commodity,
    Quantity,
    SelectedDate,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Commodity => "commodity",
            Field::Quantity => "quantity",
            Field::SelectedDate => "sale date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is not a valid number (got {value:?})")]
    InvalidNumber { field: Field, value: String },

    #[error("{field} is required")]
    MissingField { field: Field },

    #[error("{field} is not a YYYY-MM-DD date (got {value:?})")]
    InvalidDate { field: Field, value: String },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::InvalidNumber { field, .. }
            | ValidationError::MissingField { field }
            | ValidationError::InvalidDate { field, .. } => *field,
        }
    }
}

/// Turns raw form fields into a [`SubmissionRequest`].
///
/// The default sale date is fixed when the builder is created, so every
/// submission in one session shares it.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    default_date: NaiveDate,
}

impl RequestBuilder {
    pub fn new(default_date: NaiveDate) -> Self {
        Self { default_date }
    }

    pub fn default_date(&self) -> NaiveDate {
        self.default_date
    }

    pub fn build(&self, raw: &RawFields) -> Result<SubmissionRequest, ValidationError> {
        let farmer_lat = parse_number(Field::Latitude, &raw.latitude)?;
        ensure_within(Field::Latitude, &raw.latitude, farmer_lat, &LATITUDE_RANGE)?;

        let farmer_lon = parse_number(Field::Longitude, &raw.longitude)?;
        ensure_within(Field::Longitude, &raw.longitude, farmer_lon, &LONGITUDE_RANGE)?;

        let commodity = raw.commodity.trim();
        if commodity.is_empty() {
            return Err(ValidationError::MissingField {
                field: Field::Commodity,
            });
        }

        let quantity_tonnes = parse_number(Field::Quantity, &raw.quantity)?;
        if quantity_tonnes <= 0.0 {
            return Err(ValidationError::InvalidNumber {
                field: Field::Quantity,
                value: raw.quantity.clone(),
            });
        }

        let selected_date = match raw.selected_date.as_deref().map(str::trim) {
            None | Some("") => self.default_date,
            Some(s) => parse_iso_date(s).ok_or_else(|| ValidationError::InvalidDate {
                field: Field::SelectedDate,
                value: s.to_string(),
            })?,
        };

        Ok(SubmissionRequest {
            farmer_lat,
            farmer_lon,
            commodity: commodity.to_string(),
            quantity_tonnes,
            selected_date,
        })
    }
}

fn parse_number(field: Field, text: &str) -> Result<f64, ValidationError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(ValidationError::MissingField { field });
    }

    // f64::from_str accepts "inf" and "NaN"; neither is a usable form value.
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

fn ensure_within(
    field: Field,
    text: &str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNumber {
            field,
            value: text.to_string(),
        })
    }
}
