use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything the engine needs for one run: which column holds what on each
/// side, and how far apart two records may be and still count as one payment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReconConfig {
    pub bank: ColumnMapping,
    pub sales: ColumnMapping,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnMapping {
    pub amount: String,
    pub date: String,
    pub reference: String,
}

impl ColumnMapping {
    pub fn new(
        amount: impl Into<String>,
        date: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            date: date.into(),
            reference: reference.into(),
        }
    }

    fn validate(&self, side: &str) -> Result<(), ReconError> {
        for (field, column) in [
            ("amount", &self.amount),
            ("date", &self.date),
            ("reference", &self.reference),
        ] {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{side}.{field}: column name must not be empty"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Absolute windows. `amount` is in currency units, `days` in calendar days;
/// both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ToleranceConfig {
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    2
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            amount: 0.0,
            days: default_days(),
        }
    }
}

impl ToleranceConfig {
    fn validate(&self) -> Result<(), ReconError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.amount must be a finite non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config file (columns optional)
// ---------------------------------------------------------------------------

/// On-disk form. Column sections may be left out, in which case the caller
/// fills them in (explicitly or via `detect`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bank: Option<ColumnMapping>,
    #[serde(default)]
    pub sales: Option<ColumnMapping>,
    #[serde(default)]
    pub tolerance: Option<ToleranceConfig>,
}

impl ConfigFile {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        if let Some(ref bank) = file.bank {
            bank.validate("bank")?;
        }
        if let Some(ref sales) = file.sales {
            sales.validate("sales")?;
        }
        if let Some(ref tolerance) = file.tolerance {
            tolerance.validate()?;
        }
        Ok(file)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn new(bank: ColumnMapping, sales: ColumnMapping) -> Self {
        Self {
            bank,
            sales,
            tolerance: ToleranceConfig::default(),
        }
    }

    pub fn with_tolerance(mut self, amount: f64, days: u32) -> Self {
        self.tolerance = ToleranceConfig { amount, days };
        self
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.bank.validate("bank")?;
        self.sales.validate("sales")?;
        self.tolerance.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[bank]
amount    = "Monto"
date      = "Fecha"
reference = "Referencia"

[sales]
amount    = "Valor"
date      = "Fecha Pago"
reference = "Documento"

[tolerance]
amount = 1.0
days   = 3
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.bank.amount, "Monto");
        assert_eq!(config.sales.date, "Fecha Pago");
        assert_eq!(config.tolerance.amount, 1.0);
        assert_eq!(config.tolerance.days, 3);
    }

    #[test]
    fn tolerance_defaults() {
        let input = r#"
[bank]
amount = "a"
date = "d"
reference = "r"

[sales]
amount = "a"
date = "d"
reference = "r"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.tolerance.amount, 0.0);
        assert_eq!(config.tolerance.days, 2);
    }

    #[test]
    fn partial_tolerance_keeps_day_default() {
        let file = ConfigFile::from_toml("[tolerance]\namount = 5\n").unwrap();
        let tol = file.tolerance.unwrap();
        assert_eq!(tol.amount, 5.0);
        assert_eq!(tol.days, 2);
    }

    #[test]
    fn reject_negative_tolerance() {
        let config = ReconConfig::new(
            ColumnMapping::new("a", "d", "r"),
            ColumnMapping::new("a", "d", "r"),
        )
        .with_tolerance(-1.0, 2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tolerance.amount"));
    }

    #[test]
    fn reject_empty_column() {
        let config = ReconConfig::new(
            ColumnMapping::new("a", "  ", "r"),
            ColumnMapping::new("a", "d", "r"),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bank.date"));
    }

    #[test]
    fn reject_missing_section() {
        let input = r#"
[bank]
amount = "a"
date = "d"
reference = "r"
"#;
        assert!(matches!(
            ReconConfig::from_toml(input),
            Err(ReconError::ConfigParse(_))
        ));
    }

    #[test]
    fn config_file_allows_missing_columns() {
        let file = ConfigFile::from_toml("name = \"Cartola\"\n").unwrap();
        assert_eq!(file.name.as_deref(), Some("Cartola"));
        assert!(file.bank.is_none());
        assert!(file.sales.is_none());
        assert!(file.tolerance.is_none());
    }
}
