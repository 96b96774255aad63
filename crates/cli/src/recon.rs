//! `conciliador run|detect|validate`: load two ledgers, resolve columns, reconcile.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use conciliador_recon::detect::{detect_columns, DetectedColumns};
use conciliador_recon::source::{load_csv_records, load_json_records};
use conciliador_recon::{
    ColumnMapping, ConfigFile, ReconConfig, ReconResult, Record, Table, ToleranceConfig,
};

use crate::exit_codes::{
    EXIT_RECON_INPUT, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_OUTPUT, EXIT_RECON_PENDING, EXIT_USAGE,
};
use crate::util::{cell_text, fit_column};
use crate::CliError;

/// Tolerances used when neither flags nor a config file set them.
const DEFAULT_TOLERANCE_AMOUNT: f64 = 1.0;
const DEFAULT_TOLERANCE_DAYS: u32 = 3;

const DETAIL_WIDTHS: [usize; 4] = [12, 14, 24, 22];

#[derive(Args)]
pub struct RunArgs {
    /// Bank statement (.csv or .json)
    pub bank: PathBuf,

    /// Sales ledger (.csv or .json)
    pub sales: PathBuf,

    /// Optional .toml config with column names and tolerances
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Max absolute amount difference (currency units)
    #[arg(long)]
    pub tolerance_amount: Option<f64>,

    /// Max absolute date difference (days)
    #[arg(long)]
    pub tolerance_days: Option<u32>,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print matched and pending tables (to stderr when --json is set)
    #[arg(long)]
    pub details: bool,
}

/// Explicit column names; each overrides the config file and detection.
#[derive(Args)]
pub struct ColumnArgs {
    #[arg(long, value_name = "COL")]
    pub bank_amount: Option<String>,
    #[arg(long, value_name = "COL")]
    pub bank_date: Option<String>,
    #[arg(long, value_name = "COL")]
    pub bank_ref: Option<String>,
    #[arg(long, value_name = "COL")]
    pub sales_amount: Option<String>,
    #[arg(long, value_name = "COL")]
    pub sales_date: Option<String>,
    #[arg(long, value_name = "COL")]
    pub sales_ref: Option<String>,
}

// ============================================================================
// Report
// ============================================================================

#[derive(Serialize)]
struct Report<'a> {
    meta: ReportMeta<'a>,
    #[serde(flatten)]
    result: &'a ReconResult<'a>,
}

#[derive(Serialize)]
struct ReportMeta<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    engine_version: &'static str,
    run_at: String,
    bank_file: String,
    sales_file: String,
    config: &'a ReconConfig,
}

// ============================================================================
// Input
// ============================================================================

fn input_err(path: &Path, msg: impl std::fmt::Display) -> CliError {
    CliError {
        code: EXIT_RECON_INPUT,
        message: format!("{}: {msg}", path.display()),
        hint: None,
    }
}

fn config_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_RECON_INVALID_CONFIG, message: msg.into(), hint: None }
}

/// Read a ledger, choosing the decoder by file extension (`.json` or CSV).
pub fn load_table(path: &Path) -> Result<Table, CliError> {
    let data = std::fs::read_to_string(path).map_err(|e| input_err(path, e))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let table = if is_json { load_json_records(&data) } else { load_csv_records(&data) }
        .map_err(|e| input_err(path, e))?;

    log::info!(
        "{}: {} records, columns {:?}",
        path.display(),
        table.records.len(),
        table.headers
    );
    Ok(table)
}

fn load_config_file(path: &Path) -> Result<ConfigFile, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| config_err(format!("cannot read {}: {e}", path.display())))?;
    ConfigFile::from_toml(&text).map_err(|e| config_err(e.to_string()))
}

// ============================================================================
// Column resolution
// ============================================================================

/// Resolve one side's columns: explicit flag, then config file, then detection.
fn resolve_columns(
    side: &str,
    table: &Table,
    flags: [&Option<String>; 3],
    from_file: Option<&ColumnMapping>,
) -> Result<ColumnMapping, CliError> {
    let detected = detect_columns(&table.headers);
    let detected_names = [
        detected.amount.as_ref().map(|c| c.name.clone()),
        detected.date.as_ref().map(|c| c.name.clone()),
        detected.reference.as_ref().map(|c| c.name.clone()),
    ];
    let file_names = from_file.map(|m| [m.amount.clone(), m.date.clone(), m.reference.clone()]);

    let mut resolved: [Option<String>; 3] = [None, None, None];
    for (i, slot) in resolved.iter_mut().enumerate() {
        *slot = flags[i]
            .clone()
            .or_else(|| file_names.as_ref().map(|names| names[i].clone()))
            .or_else(|| detected_names[i].clone());
    }

    let missing: Vec<&str> = ["amount", "date", "reference"]
        .iter()
        .zip(&resolved)
        .filter(|(_, r)| r.is_none())
        .map(|(name, _)| *name)
        .collect();

    let [Some(amount), Some(date), Some(reference)] = resolved else {
        return Err(CliError::args(format!(
            "{side}: cannot determine {} column(s)",
            missing.join(", ")
        ))
        .with_hint(format!(
            "pass --{side}-amount/--{side}-date/--{side}-ref; available columns: {}",
            table.headers.join(", ")
        )));
    };

    let mapping = ColumnMapping::new(amount, date, reference);
    for column in [&mapping.amount, &mapping.date, &mapping.reference] {
        if !table.headers.iter().any(|h| h == column) {
            log::warn!("{side}: column '{column}' not found; its records will stay pending");
        }
    }
    Ok(mapping)
}

fn resolve_tolerance(args: &RunArgs, from_file: Option<ToleranceConfig>) -> ToleranceConfig {
    let base = from_file.unwrap_or(ToleranceConfig {
        amount: DEFAULT_TOLERANCE_AMOUNT,
        days: DEFAULT_TOLERANCE_DAYS,
    });
    ToleranceConfig {
        amount: args.tolerance_amount.unwrap_or(base.amount),
        days: args.tolerance_days.unwrap_or(base.days),
    }
}

// ============================================================================
// Commands
// ============================================================================

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let file = match args.config {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let bank = load_table(&args.bank)?;
    let sales = load_table(&args.sales)?;

    let c = &args.columns;
    let config = ReconConfig {
        bank: resolve_columns(
            "bank",
            &bank,
            [&c.bank_amount, &c.bank_date, &c.bank_ref],
            file.bank.as_ref(),
        )?,
        sales: resolve_columns(
            "sales",
            &sales,
            [&c.sales_amount, &c.sales_date, &c.sales_ref],
            file.sales.as_ref(),
        )?,
        tolerance: resolve_tolerance(&args, file.tolerance),
    };
    config.validate().map_err(|e| config_err(e.to_string()))?;

    log::debug!("resolved config: {config:?}");

    let result = conciliador_recon::reconcile(&bank.records, &sales.records, &config);

    if args.json || args.output.is_some() {
        let report = Report {
            meta: ReportMeta {
                name: file.name.as_deref(),
                engine_version: env!("CARGO_PKG_VERSION"),
                run_at: chrono::Utc::now().to_rfc3339(),
                bank_file: args.bank.display().to_string(),
                sales_file: args.sales.display().to_string(),
                config: &config,
            },
            result: &result,
        };
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_RECON_OUTPUT,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str).map_err(|e| CliError {
                code: EXIT_RECON_OUTPUT,
                message: format!("cannot write {}: {e}", path.display()),
                hint: None,
            })?;
            eprintln!("wrote {}", path.display());
        }
        if args.json {
            println!("{json_str}");
        }
    }

    if args.details {
        // stdout carries exactly one JSON value under --json
        let written = if args.json {
            write_details(&mut std::io::stderr().lock(), &result, &config)
        } else {
            write_details(&mut std::io::stdout().lock(), &result, &config)
        };
        written.map_err(|e| CliError {
            code: EXIT_RECON_OUTPUT,
            message: format!("cannot write details: {e}"),
            hint: None,
        })?;
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "reconciled {} of {} sales ({} bank records): {} bank pending, {} sales pending",
        s.matched_count, s.total_sales, s.total_bank, s.bank_pending_count, s.sales_pending_count,
    );

    if !result.is_fully_reconciled() {
        return Err(CliError {
            code: EXIT_RECON_PENDING,
            message: format!(
                "{} records pending",
                s.bank_pending_count + s.sales_pending_count
            ),
            hint: None,
        });
    }
    Ok(())
}

pub fn cmd_detect(file: PathBuf, json: bool) -> Result<(), CliError> {
    let table = load_table(&file)?;
    let detected = detect_columns(&table.headers);

    if json {
        let out = serde_json::to_string_pretty(&detected).map_err(|e| CliError {
            code: EXIT_RECON_OUTPUT,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{out}");
    } else {
        print_detected(&detected);
    }

    if detected.to_mapping().is_none() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("cannot determine {} column(s)", detected.missing().join(", ")),
            hint: None,
        });
    }
    Ok(())
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let file = load_config_file(&config)?;
    let tolerance = file.tolerance.unwrap_or_default();
    eprintln!(
        "{}: valid ({}bank columns {}, sales columns {}, tolerance {} / {} days)",
        config.display(),
        file.name.as_deref().map(|n| format!("\"{n}\", ")).unwrap_or_default(),
        if file.bank.is_some() { "set" } else { "detected" },
        if file.sales.is_some() { "set" } else { "detected" },
        tolerance.amount,
        tolerance.days,
    );
    Ok(())
}

// ============================================================================
// Human output
// ============================================================================

fn print_detected(detected: &DetectedColumns) {
    for (field, col) in [
        ("amount", &detected.amount),
        ("date", &detected.date),
        ("reference", &detected.reference),
    ] {
        match col {
            Some(c) => println!("{field:<10} {} ({:?})", c.name, c.by),
            None => println!("{field:<10} -"),
        }
    }
}

fn row(cells: [&str; 4]) -> String {
    cells
        .iter()
        .zip(DETAIL_WIDTHS)
        .map(|(c, w)| fit_column(c, w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn record_cells(record: &Record, columns: &ColumnMapping) -> [String; 3] {
    [
        cell_text(record.get(&columns.date)),
        cell_text(record.get(&columns.amount)),
        cell_text(record.get(&columns.reference)),
    ]
}

fn write_details(
    out: &mut dyn Write,
    result: &ReconResult<'_>,
    config: &ReconConfig,
) -> io::Result<()> {
    writeln!(out, "Matched ({})", result.summary.matched_count)?;
    writeln!(out, "{}", row(["Date", "Amount", "Reference", "Status"]))?;
    for pair in &result.matched {
        let [date, amount, reference] = record_cells(pair.sale, &config.sales);
        writeln!(out, "{}", row([&date, &amount, &reference, pair.match_type.label()]))?;
    }

    for (title, records, columns) in [
        ("Bank pending", &result.bank_pending, &config.bank),
        ("Sales pending", &result.sales_pending, &config.sales),
    ] {
        writeln!(out)?;
        writeln!(out, "{title} ({})", records.len())?;
        writeln!(out, "{}", row(["Date", "Amount", "Reference", "Status"]))?;
        for record in records {
            let [date, amount, reference] = record_cells(record, columns);
            writeln!(out, "{}", row([&date, &amount, &reference, "Pending"]))?;
        }
    }
    Ok(())
}
