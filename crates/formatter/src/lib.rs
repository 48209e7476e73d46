pub mod error;
pub mod labels;
pub mod patterns;
pub mod payload;
pub mod rules;
pub mod sanitize;
pub mod settings;
pub mod table;

#[cfg(test)]
mod tests;

pub use labels::derive_column_labels;
pub use sanitize::{ResultFormatter, sanitize};
pub use settings::FormatSettings;
pub use table::{RenderOptions, ResultTable};
