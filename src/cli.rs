use std::io::{self, Read};

use clap::Parser;
use partial_update::{
    error::Result, ChangeSet, ColumnPolicy, NameTranslationTable, PartialUpdateCompiler,
    UpdateStatement, Value,
};

/// Print the assignment clause and bound values for a partial update.
#[derive(Parser, Debug)]
#[command(name = "partial-update", version)]
struct Cli {
    /// Change-set as a JSON object, or `-` to read it from stdin
    changes: String,

    /// Field to column translations as a JSON object
    #[arg(long)]
    names: Option<String>,

    /// Reject columns that are not plain identifiers
    #[arg(long)]
    strict: bool,

    /// Render a full UPDATE statement against this table
    #[arg(long)]
    table: Option<String>,

    /// Column identifying the row to update
    #[arg(long, requires_all = ["table", "where_value"])]
    where_column: Option<String>,

    /// JSON value the row identifier must equal
    #[arg(long, requires = "where_column")]
    where_value: Option<String>,

    /// Field to return, under its caller-facing name (repeatable)
    #[arg(long, requires = "table")]
    returning: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(e) = get_results(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn get_results(cli: Cli) -> Result<()> {
    let changes = if cli.changes == "-" {
        let mut json = String::new();
        io::stdin().read_to_string(&mut json)?;
        ChangeSet::from_json(&json)?
    } else {
        ChangeSet::from_json(&cli.changes)?
    };
    let names = match &cli.names {
        Some(json) => NameTranslationTable::from_json(json)?,
        None => NameTranslationTable::new(),
    };
    let policy = if cli.strict {
        ColumnPolicy::Identifier
    } else {
        ColumnPolicy::Trusted
    };
    let compiled = PartialUpdateCompiler::with_policy(policy).compile(&changes, &names)?;

    let (sql, parameters) = match cli.table {
        Some(table) => {
            let mut statement = UpdateStatement::new(table, compiled);
            if let (Some(column), Some(value)) = (cli.where_column, cli.where_value) {
                let value: Value = serde_json::from_str(&value)?;
                statement = statement.filter(column, value);
            }
            statement
                .returning_fields(cli.returning.iter().map(|f| f.as_str()), &names)
                .into_parts()
        }
        None => compiled.into_parts(),
    };
    println!("{}", sql);
    println!("{}", serde_json::to_string(&parameters)?);
    Ok(())
}
