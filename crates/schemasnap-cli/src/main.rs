mod config;
mod run;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemasnap_core::{
    Error as CoreError, InferenceAlgorithm, MatchStrategy, RedactedConnection,
    redact_connection_string,
};
use schemasnap_introspect::MySqlCatalog;
use thiserror::Error;
use uuid::Uuid;

use config::{ConfigError, DEFAULT_CONFIG_FILE, SnapConfig, load_config, save_config};
use run::{
    FsArtifactWriter, LogFormat, PipelineError, RunError, RunSettings, execute, init_logging,
    write_bytes_atomic,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("run error: {0}")]
    Run(#[from] RunError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
    #[error("{count} artifact(s) failed to write: {details}")]
    WriteFailures { count: usize, details: String },
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(err) => CliError::Core(err),
            PipelineError::Run(err) => CliError::Run(err),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "schemasnap",
    version,
    about = "Snapshot a MySQL schema into table lists, structure dumps and DBML"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Introspect a database and write the six schema artifacts.
    Dump(DumpArgs),
    /// Write a default config file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Database connection string (flag form).
    #[arg(long, value_name = "CONNECTION_STRING", conflicts_with = "conn_pos")]
    conn: Option<String>,
    /// Database connection string (positional form).
    #[arg(value_name = "CONNECTION_STRING")]
    conn_pos: Option<String>,
    /// Config file (defaults to ./schemasnap.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for the generated artifacts.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Column-name matching heuristic for relationships.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Traversal used for relationship inference.
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,
    /// Column name never used as a relationship origin (repeatable).
    #[arg(long = "ignore-column", value_name = "COLUMN")]
    ignore_columns: Vec<String>,
    /// Only introspect these tables (repeatable).
    #[arg(long = "table", value_name = "TABLE")]
    tables: Vec<String>,
    /// Skip these tables (repeatable).
    #[arg(long = "exclude-table", value_name = "TABLE")]
    exclude_tables: Vec<String>,
    /// Include views alongside base tables.
    #[arg(long, default_value_t = false)]
    include_views: bool,
    /// Maximum concurrent catalog queries; also sizes the connection pool.
    #[arg(long)]
    concurrency: Option<usize>,
    /// Keep writing remaining artifacts after a write failure.
    #[arg(long, default_value_t = false)]
    keep_going: bool,
    /// Also write the snapshot as JSON to this path.
    #[arg(long)]
    snapshot_json: Option<PathBuf>,
    /// Append JSON logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Console log format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Args, Debug)]
struct InitConfigArgs {
    /// Where to write the config.
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    path: PathBuf,
    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Exact,
    Suffix,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Exact => MatchStrategy::Exact,
            StrategyArg::Suffix => MatchStrategy::Suffix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Auto,
    Scan,
    Indexed,
}

impl From<AlgorithmArg> for InferenceAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Auto => InferenceAlgorithm::Auto,
            AlgorithmArg::Scan => InferenceAlgorithm::Scan,
            AlgorithmArg::Indexed => InferenceAlgorithm::Indexed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Dump(args) => run_dump(args).await,
        Command::InitConfig(args) => run_init_config(args),
    }
}

async fn run_dump(args: DumpArgs) -> Result<(), CliError> {
    init_logging(args.log_format, args.log_file.as_deref())?;

    let mut config = load_config(args.config.as_deref())?;
    let conn = resolve_connection(&args, &config)?;
    apply_overrides(&mut config, args);

    let connection = redact_connection_string(&conn);
    let engine = detect_engine(&connection)
        .ok_or_else(|| CliError::UnsupportedEngine(connection.redacted.clone()))?;

    let run_id = Uuid::new_v4().to_string();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        engine = %engine,
        target = %connection_target(&connection),
        connection = %connection.redacted,
        out_dir = %config.output.dir.display()
    );
    let timer = Instant::now();

    let settings = RunSettings {
        introspect: config.introspect_options(),
        inference: config.inference_options(),
        keep_going: config.output.keep_going,
    };
    let writer = FsArtifactWriter::new(&config.output.dir).with_names(config.file_names()?);

    let max_connections =
        u32::try_from(settings.introspect.effective_concurrency()).unwrap_or(u32::MAX);
    let catalog = MySqlCatalog::connect(&conn, max_connections).await?;
    tracing::info!(event = "connected", max_connections = max_connections);

    let outcome = execute(&catalog, &writer, &settings).await;
    catalog.close().await;
    let summary = outcome?;

    if let Some(path) = &config.output.snapshot_json {
        let encoded =
            serde_json::to_vec_pretty(summary.snapshot.as_ref()).map_err(RunError::from)?;
        write_bytes_atomic(path, &encoded).map_err(RunError::from)?;
        tracing::info!(event = "snapshot_written", path = %path.display());
    }

    let duration_ms = timer.elapsed().as_millis() as u64;
    if !summary.failures.is_empty() {
        let details = summary
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        tracing::info!(
            event = "run_finished",
            run_id = %run_id,
            status = "partial",
            failures = summary.failures.len(),
            duration_ms = duration_ms
        );
        return Err(CliError::WriteFailures {
            count: summary.failures.len(),
            details,
        });
    }

    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        tables = summary.snapshot.tables().len(),
        relationships = summary.relationships,
        artifacts = summary.written.len(),
        duration_ms = duration_ms
    );

    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), CliError> {
    if args.path.exists() && !args.force {
        return Err(CliError::InvalidConfig(format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        )));
    }
    save_config(&args.path, &SnapConfig::default())?;
    println!("wrote {}", args.path.display());
    Ok(())
}

/// Flag, then positional argument, then config file, then `DATABASE_URL`.
fn resolve_connection(args: &DumpArgs, config: &SnapConfig) -> Result<String, CliError> {
    args.conn
        .clone()
        .or_else(|| args.conn_pos.clone())
        .or_else(|| config.connection.url.clone())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            CliError::InvalidConfig(
                "connection string is required (--conn, positional, config file or DATABASE_URL)"
                    .to_string(),
            )
        })
}

fn apply_overrides(config: &mut SnapConfig, args: DumpArgs) {
    if let Some(dir) = args.out_dir {
        config.output.dir = dir;
    }
    if let Some(path) = args.snapshot_json {
        config.output.snapshot_json = Some(path);
    }
    if let Some(strategy) = args.strategy {
        config.inference.strategy = strategy.into();
    }
    if let Some(algorithm) = args.algorithm {
        config.inference.algorithm = algorithm.into();
    }
    config.inference.ignored_columns.extend(args.ignore_columns);
    if !args.tables.is_empty() {
        config.introspect.tables = args.tables;
    }
    config.introspect.exclude_tables.extend(args.exclude_tables);
    if args.include_views {
        config.introspect.include_views = true;
    }
    if let Some(concurrency) = args.concurrency {
        config.introspect.concurrency = concurrency;
    }
    config.output.keep_going |= args.keep_going;
}

/// `user@host:port/database` with whatever parts the URL carries.
fn connection_target(connection: &RedactedConnection) -> String {
    let mut target = String::new();
    if let Some(user) = &connection.user {
        target.push_str(user);
        target.push('@');
    }
    target.push_str(connection.host.as_deref().unwrap_or("localhost"));
    if let Some(port) = connection.port {
        target.push_str(&format!(":{port}"));
    }
    if let Some(database) = &connection.database {
        target.push('/');
        target.push_str(database);
    }
    target
}

fn detect_engine(connection: &RedactedConnection) -> Option<&'static str> {
    match connection.engine.as_deref() {
        Some("mysql" | "mariadb") => Some("mysql"),
        _ => None,
    }
}
