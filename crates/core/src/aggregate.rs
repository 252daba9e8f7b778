use crate::domain::recommendation::RecommendationRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// All records sharing one date key, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub records: Vec<RecommendationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateResult {
    Empty,
    Populated {
        overall_best: RecommendationRecord,
        groups: Vec<DateGroup>,
    },
}

/// Groups records by date and picks the overall best.
///
/// - The overall best is the first record holding the maximum `net_profit`.
/// - Dates are compared as exact strings; no calendar normalization.
/// - Groups keep the order in which their date first appears in `records`.
/// - Inside a group, records are sorted by `net_profit` descending; ties keep input order.
pub fn aggregate(records: Option<&[RecommendationRecord]>) -> AggregateResult {
    let records = match records {
        Some(r) if !r.is_empty() => r,
        _ => return AggregateResult::Empty,
    };

    let mut best = &records[0];
    for rec in &records[1..] {
        if rec.net_profit > best.net_profit {
            best = rec;
        }
    }

    let mut index_by_date: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DateGroup> = Vec::new();
    for rec in records {
        let idx = *index_by_date.entry(rec.date.as_str()).or_insert_with(|| {
            groups.push(DateGroup {
                date: rec.date.clone(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].records.push(rec.clone());
    }

    for group in &mut groups {
        // sort_by is stable, which keeps equal profits in input order.
        group.records.sort_by(|a, b| {
            b.net_profit
                .partial_cmp(&a.net_profit)
                .unwrap_or(Ordering::Equal)
        });
    }

    AggregateResult::Populated {
        overall_best: best.clone(),
        groups,
    }
}
