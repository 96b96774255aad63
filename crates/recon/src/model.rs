use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell as delivered by a record source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// One ledger row: column name -> cell, in source column order. The engine
/// only ever reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Set a column. An existing column keeps its position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(k, v)| (k, v)))
    }
}

/// Decoded file: header order plus rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

// ---------------------------------------------------------------------------
// Pair matching
// ---------------------------------------------------------------------------

/// Which pass produced a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchType {
    /// Reference containment + amount + date window.
    ExactRefAmount,
    /// Amount + date window only.
    AmountDate,
}

impl MatchType {
    /// Short label for human-facing tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactRefAmount => "Exact (Ref + Amount)",
            Self::AmountDate => "Amount + Date",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactRefAmount => write!(f, "ExactRefAmount"),
            Self::AmountDate => write!(f, "AmountDate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair<'a> {
    pub match_type: MatchType,
    pub sale: &'a Record,
    pub bank: &'a Record,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_sales: usize,
    pub total_bank: usize,
    pub matched_count: usize,
    pub sales_pending_count: usize,
    pub bank_pending_count: usize,
}

/// Outcome of one run. Borrows the caller's records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult<'a> {
    pub matched: Vec<MatchedPair<'a>>,
    pub bank_pending: Vec<&'a Record>,
    pub sales_pending: Vec<&'a Record>,
    pub summary: ReconSummary,
}

impl ReconResult<'_> {
    /// True when nothing was left pending on either side.
    pub fn is_fully_reconciled(&self) -> bool {
        self.bank_pending.is_empty() && self.sales_pending.is_empty()
    }
}
