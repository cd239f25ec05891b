//! DynSQL CLI: inspect canonical statements and preview overrides.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use percolate_dynsql::executor::{DryRunExecutor, QueryContext};
use percolate_dynsql::types::Row;
use percolate_dynsql::users::UserQueries;
use percolate_dynsql::{parser, Arg, Config, PlaceholderFormat, Predicate, SelectBuilder};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dynsql")]
#[command(about = "Parse canonical SELECT statements and preview call-time overrides", long_about = None)]
struct Cli {
    /// Config file (default: ~/.p8/dynsql.json)
    #[arg(long, global = true, env = "P8_DYNSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table and columns of a statement
    Parse {
        /// Statement text, or @path to read it from a file
        statement: String,
    },

    /// Build a skeleton from a canonical statement and render it
    Render(RenderArgs),

    /// Run the ListUsers override against the dry-run executor
    Users {
        /// Minimum age filter
        #[arg(long)]
        min_age: Option<i64>,

        /// Name LIKE pattern
        #[arg(long)]
        name_like: Option<String>,

        /// Row cap (replaces the configured default)
        #[arg(long)]
        limit: Option<u64>,

        /// Use FindUser (single row) instead of ListUsers
        #[arg(long)]
        find: bool,
    },
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Statement text, or @path to read it from a file
    statement: String,

    /// Filter fragment with `?` placeholders (repeatable, joined with AND)
    #[arg(long = "where")]
    filters: Vec<String>,

    /// JSON value bound to the next `?` across all filters (repeatable)
    #[arg(long = "arg")]
    args: Vec<String>,

    /// Ordering term, e.g. "name" or "created_at DESC" (repeatable)
    #[arg(long)]
    order_by: Vec<String>,

    /// Row cap
    #[arg(long)]
    limit: Option<u64>,

    /// Rows to skip
    #[arg(long)]
    offset: Option<u64>,

    /// Use $1, $2, ... placeholders
    #[arg(long)]
    dollar: bool,
}

impl RenderArgs {
    /// Apply the flags to the skeleton parsed from `canonical`.
    fn build(&self, canonical: &str) -> anyhow::Result<SelectBuilder> {
        let mut sb = SelectBuilder::from_canonical(canonical)?;

        let args = self
            .args
            .iter()
            .map(|raw| serde_json::from_str::<Arg>(raw).with_context(|| format!("--arg is not JSON: {}", raw)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        if !self.filters.is_empty() {
            let fragment = self
                .filters
                .iter()
                .map(|f| format!("({})", f))
                .collect::<Vec<_>>()
                .join(" AND ");
            sb = sb.filter(Predicate::raw(fragment, args));
        } else if !args.is_empty() {
            anyhow::bail!("--arg given without --where");
        }

        for term in &self.order_by {
            sb = sb.order_by_expr(term.as_str());
        }
        if let Some(n) = self.limit {
            sb = sb.limit(n);
        }
        if let Some(n) = self.offset {
            sb = sb.offset(n);
        }
        if self.dollar {
            sb = sb.placeholder(PlaceholderFormat::Dollar);
        }
        Ok(sb)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Parse { statement } => {
            cmd_parse(&statement)?;
        }
        Commands::Render(args) => {
            cmd_render(&args)?;
        }
        Commands::Users {
            min_age,
            name_like,
            limit,
            find,
        } => {
            let config = load_config(cli.config.as_ref())?;
            cmd_users(&config, min_age, name_like, limit, find).await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?.apply_overrides(|key| std::env::var(key).ok())?,
        None => Config::load()?,
    };
    Ok(config)
}

fn read_statement(statement: &str) -> anyhow::Result<String> {
    match statement.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Cannot read statement from {}", path)),
        None => Ok(statement.to_string()),
    }
}

fn cmd_parse(statement: &str) -> anyhow::Result<()> {
    let meta = parser::parse(&read_statement(statement)?);
    if meta.is_empty() {
        eprintln!("Statement is not of the form SELECT <columns> FROM <table>");
    }
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}

fn cmd_render(args: &RenderArgs) -> anyhow::Result<()> {
    let sb = args.build(&read_statement(&args.statement)?)?;
    let (sql, binds) = sb.to_sql()?;
    println!("{}", serde_json::to_string_pretty(&json!({ "sql": sql, "args": binds }))?);
    Ok(())
}

async fn cmd_users(
    config: &Config,
    min_age: Option<i64>,
    name_like: Option<String>,
    limit: Option<u64>,
    find: bool,
) -> anyhow::Result<()> {
    let queries = UserQueries::new(&config.defaults).context("Cannot build user query skeletons")?;
    let db = DryRunExecutor::new().with_rows(vec![sample_user()?]);
    let mut ctx = QueryContext::new();
    if let Some(namespace) = &config.namespace {
        ctx = ctx.with_namespace(namespace.clone());
    }

    let customize = move |mut sb: SelectBuilder| {
        if let Some(age) = min_age {
            sb = sb.filter(Predicate::gte("age", age));
        }
        if let Some(pattern) = &name_like {
            sb = sb.filter(Predicate::Like("name".to_string(), pattern.clone()));
        }
        if let Some(n) = limit {
            sb = sb.limit(n);
        }
        sb
    };

    let users = if find {
        vec![queries.find_user(&ctx, &db, Some(&customize)).await?]
    } else {
        queries.list_users(&ctx, &db, Some(&customize)).await?
    };

    for call in db.calls() {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "operation": call.operation.as_str(),
                "sql": call.sql,
                "args": call.args,
            }))?
        );
    }
    println!("{}", serde_json::to_string_pretty(&users)?);
    Ok(())
}

fn sample_user() -> anyhow::Result<Row> {
    let columns = ["id", "name", "email", "age", "created_at", "updated_at"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let now = chrono::Utc::now().to_rfc3339();
    let row = Row::new(
        columns,
        vec![
            json!(1),
            json!("Ada"),
            json!("ada@example.com"),
            json!(36),
            json!(now),
            json!(now),
        ],
    )?;
    Ok(row)
}
