use crate::error::CliError;
use formatter::{RenderOptions, ResultTable};
use model::{core::column::ColumnLabel, records::result_set::ResultSet};
use tokio::io::AsyncReadExt;

/// Reads a whole input file, or stdin when `path` is `-`.
pub async fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        Ok(buf)
    } else {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

pub fn format_table(
    table: &ResultTable,
    as_json: bool,
    options: &RenderOptions,
) -> Result<String, CliError> {
    if as_json {
        serde_json::to_string_pretty(&table.to_json()).map_err(CliError::JsonSerialize)
    } else {
        Ok(table.render_text(options))
    }
}

pub fn format_labels(labels: &[ColumnLabel], as_json: bool) -> Result<String, CliError> {
    if as_json {
        serde_json::to_string(labels).map_err(CliError::JsonSerialize)
    } else {
        Ok(labels.join("\n"))
    }
}

pub fn format_rows(rows: &ResultSet) -> Result<String, CliError> {
    serde_json::to_string_pretty(rows).map_err(CliError::JsonSerialize)
}

/// Writes `content` to `path`, or prints it when no path is given.
pub async fn emit(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(path) => tokio::fs::write(path, content).await?,
        None => println!("{}", content.trim_end_matches('\n')),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::cell::Cell;

    #[test]
    fn test_format_labels() {
        let labels = vec!["id".to_string(), "name".to_string()];
        assert_eq!(format_labels(&labels, false).unwrap(), "id\nname");
        assert_eq!(format_labels(&labels, true).unwrap(), r#"["id","name"]"#);
    }

    #[test]
    fn test_format_table_json() {
        let table = ResultTable::new(vec!["n".into()], vec![vec![Cell::Number(1.0)]]);
        let json = format_table(&table, true, &RenderOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"columns": ["n"], "rows": [[1.0]]}));
    }

    #[tokio::test]
    async fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        let path = path.to_string_lossy().to_string();

        emit("a | b\n", Some(&path)).await.unwrap();
        assert_eq!(read_input(&path).await.unwrap(), "a | b\n");
    }
}
