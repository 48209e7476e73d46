use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Invalid currency range: min {min} must be below max {max}")]
    InvalidCurrencyRange { min: f64, max: f64 },

    #[error("Invalid datetime format '{0}'")]
    InvalidDatetimeFormat(String),

    #[error("Invalid setting {name}: {message}")]
    InvalidSetting { name: String, message: String },
}

/// Failure while classifying a single cell. Always recovered by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("Component '{value}' of {field} is out of range")]
    ComponentOutOfRange { field: &'static str, value: String },

    #[error("No such calendar time: {0}")]
    InvalidTimestamp(String),

    #[error("Failed to render timestamp with format '{0}'")]
    Render(String),

    #[error("Failed to serialize nested value: {0}")]
    Serialize(String),
}
