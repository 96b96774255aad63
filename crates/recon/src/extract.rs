use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::ColumnMapping;
use crate::model::{CellValue, Record};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Spreadsheet serial dates count days from this origin.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The three fields the engine compares, pulled out of a record once.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub amount: Option<f64>,
    pub date: Option<NaiveDateTime>,
    pub reference: String,
}

impl Extracted {
    pub fn from_record(record: &Record, columns: &ColumnMapping) -> Self {
        Self {
            amount: amount(record.get(&columns.amount)),
            date: date(record.get(&columns.date)),
            reference: reference(record.get(&columns.reference)),
        }
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Numeric value of a cell, or `None` when there is no leading number.
pub fn amount(cell: Option<&CellValue>) -> Option<f64> {
    match cell? {
        CellValue::Number(n) if !n.is_nan() => Some(*n),
        CellValue::Number(_) | CellValue::Empty => None,
        CellValue::Text(s) => parse_leading_float(s),
    }
}

/// Parse the longest decimal prefix of `s`, ignoring whatever follows it.
/// `"1000 CLP"` is 1000, `"1,5"` is 1, `"$10"` has no prefix.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------

/// Calendar timestamp of a cell. Text is tried against the accepted formats
/// in order; numbers are spreadsheet serial dates.
pub fn date(cell: Option<&CellValue>) -> Option<NaiveDateTime> {
    match cell? {
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Number(n) => serial_to_datetime(*n),
        CellValue::Empty => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // Beyond ~8000 years either way chrono cannot represent the result.
    if !serial.is_finite() || serial.abs() > 2_900_000.0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_time(NaiveTime::MIN);
    let offset = Duration::try_milliseconds((serial * MILLIS_PER_DAY).round() as i64)?;
    epoch.checked_add_signed(offset)
}

/// Absolute distance between two timestamps in (fractional) days.
pub fn days_between(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / MILLIS_PER_DAY
}

// ---------------------------------------------------------------------------
// Reference
// ---------------------------------------------------------------------------

/// Trimmed, lowercased text of a cell; empty when absent.
pub fn reference(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Text(s)) => s.trim().to_lowercase(),
        Some(CellValue::Number(n)) => format_number(*n),
        Some(CellValue::Empty) | None => String::new(),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string().to_lowercase()
    }
}
