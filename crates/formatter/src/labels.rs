use crate::patterns::{AS_TOKEN, FROM_KEYWORD, LEADING_SELECT};
use model::core::column::ColumnLabel;
use tracing::debug;

/// Derives display labels from the projection list of a `SELECT` statement.
///
/// This is a text heuristic, not a SQL parser: commas inside function calls,
/// comments and string literals are not understood, so the labels can be
/// misaligned with the actual result columns. Callers render positionally.
pub fn derive_column_labels(sql: &str) -> Vec<ColumnLabel> {
    let Some(from) = FROM_KEYWORD.find(sql) else {
        debug!("No FROM keyword in query, skipping column labels");
        return Vec::new();
    };

    let projection = &sql[..from.start()];
    let projection = match LEADING_SELECT.find(projection) {
        Some(select) => &projection[select.end()..],
        None => projection,
    };

    projection.split(',').map(label_for_expression).collect()
}

fn label_for_expression(expression: &str) -> ColumnLabel {
    let expression = expression.trim();

    if let Some(alias) = AS_TOKEN.find_iter(expression).last() {
        return expression[alias.end()..].trim().to_string();
    }

    match expression.rsplit_once('.') {
        Some((_, column)) => column.trim().to_string(),
        None => expression.to_string(),
    }
}
