use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Render a stored query result as a table
    Render {
        #[arg(long, help = "JSON file with the result, or '-' for stdin")]
        input: String,

        #[arg(long, help = "SQL text the result was produced by")]
        sql: Option<String>,

        #[arg(long, conflicts_with = "sql", help = "File containing the SQL text")]
        sql_file: Option<String>,

        #[arg(long, help = "Print the table as JSON instead of text")]
        json: bool,

        #[arg(
            long,
            help = "If specified, writes the rendered table to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the column labels derived from a SELECT statement
    Labels {
        #[arg(long, help = "SQL text")]
        sql: String,

        #[arg(long, help = "Print the labels as a JSON array")]
        json: bool,
    },
    /// Print the sanitized cells of a result as JSON
    Sanitize {
        #[arg(long, help = "JSON file with the result, or '-' for stdin")]
        input: String,
    },
    /// Ask the backend a question, review the generated SQL and show the result
    Ask {
        /// Natural language question
        question: String,

        #[arg(long, help = "Approve the generated query without prompting")]
        yes: bool,

        #[arg(long, help = "Print the table as JSON instead of text")]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}
