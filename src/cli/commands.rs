use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use http::Method;

use crate::echo::echo_handler;
use crate::handler::HandlerRegistry;
use crate::logging::{init_logging, LogConfig};
use crate::router::Router;
use crate::table::RouteTable;

/// Command-line interface for routechain
///
/// Inspects route tables and dry-runs requests against them.
#[derive(Debug, Parser)]
#[command(name = "routechain", version)]
#[command(about = "Inspect and exercise routechain route tables", long_about = None)]
pub struct Cli {
    /// Log at debug level (overrides ROUTECHAIN_LOG_LEVEL)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved routes of a table, in match order
    Routes {
        /// Route table file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        table: PathBuf,

        /// Mount the table under this base path
        #[arg(long, env = "ROUTECHAIN_BASE")]
        base: Option<String>,
    },
    /// Dispatch one request through a table whose handlers all echo their match
    Match {
        /// Route table file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        table: PathBuf,

        /// Mount the table under this base path
        #[arg(long, env = "ROUTECHAIN_BASE")]
        base: Option<String>,

        /// Request method, used verbatim
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Absolute URL, or an origin-form path such as /pets/1
        #[arg(short, long)]
        url: String,
    },
}

/// Load `table`, resolve every handler name to an [`echo_handler`], mount under `base`
fn load_router(table: &Path, base: Option<&str>) -> anyhow::Result<Router> {
    let table = RouteTable::from_path(table)?;

    let mut handlers = HandlerRegistry::new();
    for name in table.handler_names() {
        handlers.register(name, echo_handler(name));
    }
    let inner = table.build(&handlers)?;

    let mut router = Router::with_base(base.unwrap_or_default())?;
    router.use_router(&inner)?;
    Ok(router)
}

/// Execute `cli`, writing command output to `out`
///
/// # Errors
///
/// Table, pattern and handler errors, and I/O errors writing to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Routes { table, base } => {
            let router = load_router(&table, base.as_deref())?;
            for (index, route) in router.routes()?.iter().enumerate() {
                writeln!(out, "{index}\t{route}")?;
            }
        }
        Commands::Match {
            table,
            base,
            method,
            url,
        } => {
            let router = load_router(&table, base.as_deref())?;
            let method = Method::from_bytes(method.as_bytes())
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;
            let request = http::Request::builder()
                .method(method)
                .uri(url.as_str())
                .body(Bytes::new())
                .with_context(|| format!("Invalid request URL '{url}'"))?;

            let response = router.handle(request).await?;
            writeln!(out, "{}", response.status())?;
            if !response.body().is_empty() {
                writeln!(out, "{}", String::from_utf8_lossy(response.body()))?;
            }
        }
    }
    Ok(())
}

/// Parse process arguments, install logging, run the command against stdout
///
/// # Errors
///
/// See [`run`].
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.with_level(tracing::Level::DEBUG);
    }
    init_logging(&log_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out).await
}
