//! Column auto-detection from header names.
//!
//! Each field takes the first header whose lowercase form contains one of the
//! field's tokens, falling back to a fixed position when nothing matches.

use serde::Serialize;

use crate::config::ColumnMapping;

const AMOUNT_TOKENS: &[&str] = &["monto", "valor", "pago", "amount"];
const DATE_TOKENS: &[&str] = &["fecha", "date"];
const REFERENCE_TOKENS: &[&str] = &["ref", "doc", "obs"];

const AMOUNT_POSITION: usize = 0;
const DATE_POSITION: usize = 1;
const REFERENCE_POSITION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedBy {
    Token,
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedColumn {
    pub name: String,
    pub by: DetectedBy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedColumns {
    pub amount: Option<DetectedColumn>,
    pub date: Option<DetectedColumn>,
    pub reference: Option<DetectedColumn>,
}

impl DetectedColumns {
    /// All three fields resolved, as a mapping the engine can use.
    pub fn to_mapping(&self) -> Option<ColumnMapping> {
        Some(ColumnMapping::new(
            self.amount.as_ref()?.name.clone(),
            self.date.as_ref()?.name.clone(),
            self.reference.as_ref()?.name.clone(),
        ))
    }

    /// Names of the fields that could not be resolved at all.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("amount", &self.amount),
            ("date", &self.date),
            ("reference", &self.reference),
        ]
        .into_iter()
        .filter(|(_, col)| col.is_none())
        .map(|(field, _)| field)
        .collect()
    }
}

pub fn detect_columns(headers: &[String]) -> DetectedColumns {
    DetectedColumns {
        amount: detect_one(headers, AMOUNT_TOKENS, AMOUNT_POSITION),
        date: detect_one(headers, DATE_TOKENS, DATE_POSITION),
        reference: detect_one(headers, REFERENCE_TOKENS, REFERENCE_POSITION),
    }
}

fn detect_one(headers: &[String], tokens: &[&str], position: usize) -> Option<DetectedColumn> {
    let by_token = headers.iter().find(|h| {
        let lower = h.to_lowercase();
        tokens.iter().any(|t| lower.contains(t))
    });

    match by_token {
        Some(name) => Some(DetectedColumn {
            name: name.clone(),
            by: DetectedBy::Token,
        }),
        None => headers.get(position).map(|name| DetectedColumn {
            name: name.clone(),
            by: DetectedBy::Position,
        }),
    }
}
