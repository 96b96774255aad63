use std::path::PathBuf;

use conciliador_recon::config::{ColumnMapping, ConfigFile, ReconConfig};
use conciliador_recon::detect::detect_columns;
use conciliador_recon::model::{CellValue, MatchType, Record, Table};
use conciliador_recon::reconcile;
use conciliador_recon::source::{load_csv_records, load_json_records};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_table(name: &str) -> Table {
    let path = fixtures_dir().join(name);
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    load_csv_records(&data).unwrap()
}

fn fixture_config(bank: &Table, sales: &Table) -> ReconConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("recon.toml")).unwrap();
    let file = ConfigFile::from_toml(&toml).unwrap();
    let mut config = ReconConfig::new(
        detect_columns(&bank.headers).to_mapping().unwrap(),
        detect_columns(&sales.headers).to_mapping().unwrap(),
    );
    config.tolerance = file.tolerance.unwrap();
    config.validate().unwrap();
    config
}

fn text<'a>(record: &'a Record, column: &str) -> &'a str {
    match record.get(column) {
        Some(CellValue::Text(s)) => s,
        other => panic!("column {column}: expected text, got {other:?}"),
    }
}

fn rec(amount: &str, date: &str, reference: &str) -> Record {
    [("amount", amount), ("date", date), ("ref", reference)]
        .into_iter()
        .collect()
}

fn simple_config(amount: f64, days: u32) -> ReconConfig {
    ReconConfig::new(
        ColumnMapping::new("amount", "date", "ref"),
        ColumnMapping::new("amount", "date", "ref"),
    )
    .with_tolerance(amount, days)
}

// -------------------------------------------------------------------------
// Fixture run
// -------------------------------------------------------------------------

#[test]
fn fixture_detects_columns() {
    let bank = load_table("bank.csv");
    let sales = load_table("sales.csv");
    let config = fixture_config(&bank, &sales);

    assert_eq!(config.bank, ColumnMapping::new("Monto", "Fecha", "N° Documento"));
    assert_eq!(config.sales, ColumnMapping::new("Valor", "Fecha", "Documento"));
    assert_eq!(config.tolerance.amount, 1.0);
    assert_eq!(config.tolerance.days, 3);
}

#[test]
fn fixture_reconciles() {
    let bank = load_table("bank.csv");
    let sales = load_table("sales.csv");
    let config = fixture_config(&bank, &sales);

    let result = reconcile(&bank.records, &sales.records, &config);

    assert_eq!(result.summary.total_sales, 5);
    assert_eq!(result.summary.total_bank, 5);
    assert_eq!(result.summary.matched_count, 3);
    assert_eq!(result.summary.sales_pending_count, 2);
    assert_eq!(result.summary.bank_pending_count, 2);

    let pairs: Vec<(&str, &str, MatchType)> = result
        .matched
        .iter()
        .map(|p| (text(p.sale, "Documento"), text(p.bank, "N° Documento"), p.match_type))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("TRF-12", "TRF-12", MatchType::ExactRefAmount),
            ("55", "PAGO-55", MatchType::ExactRefAmount),
            ("F-1234", "DEP-900", MatchType::AmountDate),
        ]
    );

    // Delta is 5 days after PAGO-77, outside the 3 day window.
    let sales_left: Vec<&str> = result.sales_pending.iter().map(|r| text(r, "Cliente")).collect();
    assert_eq!(sales_left, vec!["Delta SA", "Epsilon"]);
    let bank_left: Vec<&str> = result.bank_pending.iter().map(|r| text(r, "N° Documento")).collect();
    assert_eq!(bank_left, vec!["COM-1", "PAGO-77"]);
}

#[test]
fn fixture_with_wider_window_matches_delta() {
    let bank = load_table("bank.csv");
    let sales = load_table("sales.csv");
    let mut config = fixture_config(&bank, &sales);
    config.tolerance.days = 5;

    let result = reconcile(&bank.records, &sales.records, &config);
    assert_eq!(result.summary.matched_count, 4);
    let delta = result
        .matched
        .iter()
        .find(|p| text(p.sale, "Cliente") == "Delta SA")
        .unwrap();
    assert_eq!(delta.match_type, MatchType::ExactRefAmount);
}

#[test]
fn result_serializes_with_tags() {
    let bank = load_table("bank.csv");
    let sales = load_table("sales.csv");
    let config = fixture_config(&bank, &sales);
    let result = reconcile(&bank.records, &sales.records, &config);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["matched"][0]["match_type"], "ExactRefAmount");
    assert_eq!(json["matched"][2]["match_type"], "AmountDate");
    assert_eq!(json["matched"][0]["bank"]["Monto"], "780.50");
    assert_eq!(json["summary"]["matched_count"], 3);
    assert_eq!(json["bank_pending"].as_array().unwrap().len(), 2);
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn concrete_exact_scenario() {
    let bank = vec![rec("1000", "2024-01-05", "PAGO-55")];
    let sales = vec![rec("1000", "2024-01-06", "55")];
    let result = reconcile(&bank, &sales, &simple_config(1.0, 3));

    assert_eq!(result.matched.len(), 1);
    assert_eq!(result.matched[0].match_type, MatchType::ExactRefAmount);
    assert!(result.bank_pending.is_empty());
    assert!(result.sales_pending.is_empty());
    let s = result.summary;
    assert_eq!(
        (s.total_sales, s.total_bank, s.matched_count, s.sales_pending_count, s.bank_pending_count),
        (1, 1, 1, 0, 0)
    );
}

#[test]
fn fuzzy_fallback_scenario() {
    let bank = vec![rec("1000", "2024-01-05", "ZZZZ")];
    let sales = vec![rec("1000", "2024-01-06", "55")];
    let result = reconcile(&bank, &sales, &simple_config(1.0, 3));
    assert_eq!(result.matched.len(), 1);
    assert_eq!(result.matched[0].match_type, MatchType::AmountDate);
}

#[test]
fn no_match_scenario() {
    let bank = vec![rec("1000", "2024-01-05", "PAGO-55")];
    let sales = vec![rec("1002", "2024-01-05", "55")];
    let result = reconcile(&bank, &sales, &simple_config(1.0, 3));
    assert!(result.matched.is_empty());
    assert_eq!(result.bank_pending.len(), 1);
    assert_eq!(result.sales_pending.len(), 1);
}

#[test]
fn tolerance_day_boundary() {
    let sales = vec![rec("10", "2024-03-01", "x")];
    let on_edge = vec![rec("10", "2024-03-03", "x")];
    let past_edge = vec![rec("10", "2024-03-04", "x")];

    let on = reconcile(&on_edge, &sales, &simple_config(0.0, 2));
    assert_eq!(on.summary.matched_count, 1);

    let past = reconcile(&past_edge, &sales, &simple_config(0.0, 2));
    assert_eq!(past.summary.matched_count, 0);
}

#[test]
fn reference_containment_asymmetry() {
    let bank = vec![rec("10", "2024-03-01", "INV-100")];
    let sales = vec![rec("10", "2024-03-01", "100")];
    let forward = reconcile(&bank, &sales, &simple_config(0.0, 0));
    assert_eq!(forward.matched[0].match_type, MatchType::ExactRefAmount);

    let backward = reconcile(&sales, &bank, &simple_config(0.0, 0));
    assert_eq!(backward.matched[0].match_type, MatchType::ExactRefAmount);
}

#[test]
fn blank_references_fall_through_to_fuzzy() {
    let bank = vec![rec("10", "2024-03-01", "   ")];
    let sales = vec![rec("10", "2024-03-01", "")];
    let result = reconcile(&bank, &sales, &simple_config(0.0, 0));
    assert_eq!(result.matched[0].match_type, MatchType::AmountDate);
}

#[test]
fn unparsable_cells_stay_pending() {
    let bank = vec![
        rec("n/a", "2024-03-01", "a"),
        rec("10", "someday", "b"),
        rec("10", "2024-03-01", "c"),
    ];
    let sales = vec![rec("10", "2024-03-01", "z")];
    let result = reconcile(&bank, &sales, &simple_config(0.0, 0));
    assert_eq!(result.matched.len(), 1);
    assert!(std::ptr::eq(result.matched[0].bank, &bank[2]));
    assert_eq!(result.bank_pending.len(), 2);
}

#[test]
fn spreadsheet_style_json() {
    // Numeric amounts and serial dates, as a spreadsheet export produces them.
    let bank = load_json_records(
        r#"[{"Monto": 1000, "Fecha": 45296, "Ref": "PAGO-55"},
            {"Monto": 300, "Fecha": 45300, "Ref": null}]"#,
    )
    .unwrap();
    let sales = load_json_records(
        r#"[{"Valor": "1000", "Fecha": "2024-01-06", "Doc": 55},
            {"Valor": 300.4, "Fecha": "2024-01-09", "Doc": null}]"#,
    )
    .unwrap();

    let config = ReconConfig::new(
        detect_columns(&bank.headers).to_mapping().unwrap(),
        detect_columns(&sales.headers).to_mapping().unwrap(),
    )
    .with_tolerance(1.0, 3);

    let result = reconcile(&bank.records, &sales.records, &config);
    assert!(result.is_fully_reconciled());
    let types: Vec<MatchType> = result.matched.iter().map(|p| p.match_type).collect();
    assert_eq!(types, vec![MatchType::ExactRefAmount, MatchType::AmountDate]);
}

#[test]
fn deterministic_across_runs() {
    let bank = load_table("bank.csv");
    let sales = load_table("sales.csv");
    let config = fixture_config(&bank, &sales);

    let a = reconcile(&bank.records, &sales.records, &config);
    let b = reconcile(&bank.records, &sales.records, &config);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
