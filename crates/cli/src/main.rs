use crate::{client::QaClient, config::CliConfig, error::CliError};
use clap::Parser;
use commands::Commands;
use formatter::{ResultFormatter, ResultTable, derive_column_labels, payload::ApproveResponse};
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod config;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "rview",
    version = "0.1.0",
    about = "Render SQL query results as readable tables"
)]
struct Cli {
    #[arg(long, global = true, help = "Env file with RVIEW_* settings")]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so rendered output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.env_file.as_deref())?;
    let formatter = ResultFormatter::new(config.format.clone());

    match cli.command {
        Commands::Render {
            input,
            sql,
            sql_file,
            json,
            output,
        } => {
            let envelope = load_envelope(&input).await?;
            let sql = match (sql, sql_file) {
                (Some(sql), _) => Some(sql),
                (None, Some(path)) => Some(tokio::fs::read_to_string(path).await?),
                (None, None) => envelope.query.clone(),
            };

            let table = build_table(&formatter, sql.as_deref(), &envelope);
            let rendered = output::format_table(&table, json, &config.render)?;
            output::emit(&rendered, output.as_deref()).await?;
        }
        Commands::Labels { sql, json } => {
            let labels = derive_column_labels(&sql);
            if labels.is_empty() {
                warn!("No column labels could be derived from the query");
            }
            println!("{}", output::format_labels(&labels, json)?);
        }
        Commands::Sanitize { input } => {
            let envelope = load_envelope(&input).await?;
            let rows = formatter.sanitize_with_kinds(&envelope.rows(), &envelope.column_kinds());
            println!("{}", output::format_rows(&rows)?);
        }
        Commands::Ask {
            question,
            yes,
            json,
        } => {
            ask(&config, &formatter, &question, yes, json).await?;
        }
        Commands::Config => {
            let json = serde_json::to_string_pretty(&config).map_err(CliError::JsonSerialize)?;
            println!("{json}");
        }
    }

    Ok(())
}

async fn load_envelope(input: &str) -> Result<ApproveResponse, CliError> {
    let source = output::read_input(input).await?;
    let body: JsonValue = serde_json::from_str(&source)?;
    Ok(ApproveResponse::from_body(body))
}

fn build_table(
    formatter: &ResultFormatter,
    sql: Option<&str>,
    envelope: &ApproveResponse,
) -> ResultTable {
    let labels = sql.map(derive_column_labels).unwrap_or_default();
    let rows = formatter.sanitize_with_kinds(&envelope.rows(), &envelope.column_kinds());
    ResultTable::new(labels, rows)
}

async fn ask(
    config: &CliConfig,
    formatter: &ResultFormatter,
    question: &str,
    auto_approve: bool,
    as_json: bool,
) -> Result<(), CliError> {
    if question.trim().is_empty() {
        return Err(CliError::InvalidInput("Question must not be empty".into()));
    }

    let client = QaClient::new(&config.api_url);
    let generated = client.submit_question(question).await?;

    if !generated.message.is_empty() {
        eprintln!("{}", generated.message);
    }
    println!("{}", generated.query);

    let Some(session_id) = generated.session_id.as_deref() else {
        return Ok(());
    };
    if !generated.needs_approval() {
        info!("Backend declined to generate a runnable query");
        return Ok(());
    }

    let approve = auto_approve || confirm("Run this query? [y/N] ").await?;
    let envelope = client.approve(session_id, approve).await?;
    if !approve {
        println!("Query rejected.");
        return Ok(());
    }

    let table = build_table(formatter, Some(&generated.query), &envelope);
    println!("{}", output::format_table(&table, as_json, &config.render)?);
    if let Some(answer) = envelope.answer.as_deref().filter(|a| !a.trim().is_empty()) {
        println!("\n{answer}");
    }

    Ok(())
}

async fn confirm(prompt: &str) -> Result<bool, CliError> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(prompt.as_bytes()).await?;
    stderr.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(parse_confirmation(&line))
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation("y\n"));
        assert!(parse_confirmation(" YES "));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("nope"));
    }

    #[test]
    fn test_build_table_from_envelope() {
        let envelope = ApproveResponse::from_body(json!({
            "result": "[('Widget', Decimal('19.99'))]",
            "query": "SELECT p.name, p.price FROM products p"
        }));
        let table = build_table(
            &ResultFormatter::default(),
            envelope.query.as_deref(),
            &envelope,
        );
        assert_eq!(table.labels, vec!["name", "price"]);
        assert_eq!(
            table.to_json()["rows"],
            json!([["Widget", "$19.99"]])
        );
    }
}
