//! Record sources: turn already-read CSV or JSON text into a [`Table`].
//!
//! No file access happens here; callers read the bytes and pass them in.

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{CellValue, Record, Table};

const BOM: char = '\u{feff}';

/// Decode CSV with a header row. Every cell becomes `Text`; a row shorter
/// than the header leaves its trailing columns absent. A repeated header name
/// gets a `_1`, `_2`, ... suffix so no column is lost.
pub fn load_csv_records(csv_data: &str) -> Result<Table, ReconError> {
    let parse_err = |e: csv::Error| ReconError::InputParse {
        source: "CSV".into(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.trim_start_matches(BOM).as_bytes());

    let headers = unique_headers(reader.headers().map_err(parse_err)?.iter());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_err)?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), CellValue::Text(v.to_string())))
            .collect();
        records.push(record);
    }

    Ok(Table { headers, records })
}

fn unique_headers<'h>(raw: impl Iterator<Item = &'h str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for name in raw {
        let mut candidate = name.to_string();
        let mut n = 0;
        while headers.contains(&candidate) {
            n += 1;
            candidate = format!("{name}_{n}");
        }
        if n > 0 {
            log::warn!("duplicate CSV header '{name}' renamed to '{candidate}'");
        }
        headers.push(candidate);
    }
    headers
}

/// Decode a JSON array of flat objects. Strings stay text, numbers stay
/// numbers, `null` is empty; nested arrays/objects are rejected.
pub fn load_json_records(json_data: &str) -> Result<Table, ReconError> {
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(json_data.trim_start_matches(BOM)).map_err(|e| {
            ReconError::InputParse {
                source: "JSON".into(),
                message: e.to_string(),
            }
        })?;

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let mut record = Record::new();
        for (column, value) in row {
            if !headers.contains(&column) {
                headers.push(column.clone());
            }
            let cell = json_cell(&column, value)?;
            record.insert(column, cell);
        }
        records.push(record);
    }

    Ok(Table { headers, records })
}

fn json_cell(column: &str, value: Value) -> Result<CellValue, ReconError> {
    match value {
        Value::Null => Ok(CellValue::Empty),
        Value::String(s) => Ok(CellValue::Text(s)),
        Value::Bool(b) => Ok(CellValue::Text(b.to_string())),
        Value::Number(n) => Ok(n.as_f64().map_or(CellValue::Empty, CellValue::Number)),
        nested @ (Value::Array(_) | Value::Object(_)) => Err(ReconError::UnsupportedValue {
            column: column.into(),
            value: nested.to_string(),
        }),
    }
}
