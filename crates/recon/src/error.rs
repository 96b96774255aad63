use std::fmt;

/// Boundary errors. The matching engine itself never fails; these come from
/// parsing configuration and decoding record sources.
#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (negative tolerance, empty column name, etc.).
    ConfigValidation(String),
    /// CSV or JSON input could not be decoded.
    InputParse { source: String, message: String },
    /// A JSON record holds a value that is not a flat cell (array/object).
    UnsupportedValue { column: String, value: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InputParse { source, message } => {
                write!(f, "cannot parse {source} input: {message}")
            }
            Self::UnsupportedValue { column, value } => {
                write!(f, "column '{column}': unsupported nested value {value}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
