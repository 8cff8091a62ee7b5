// ABOUTME: CLI entry point for sqlite-rds-migrator
// ABOUTME: Parses commands and routes to the split and ingest handlers

use clap::{Parser, Subcommand};
use sqlite_rds_migrator::commands;
use sqlite_rds_migrator::profile::SchemaProfile;

#[derive(Parser)]
#[command(name = "sqlite-rds-migrator")]
#[command(about = "Ingests sqlite3 registry dumps into an RDS PostgreSQL database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a sqlite3 .dump file into definition and row statement files
    Split {
        /// Path to the dump file to split
        src: String,
        /// Output file for table definition statements
        #[arg(short = 't', long, default_value = "create_tables_posix")]
        tables: String,
        /// Output file for dependency-ordered row inserts
        #[arg(short = 'r', long, default_value = "create_rows_posix")]
        rows: String,
        /// Output file for S3/PostgreSQL row inserts
        #[arg(long = "s3-rows", default_value = "create_rows_s3")]
        s3_rows: String,
        /// Schema profile TOML overriding the built-in table order and rename rules
        #[arg(long)]
        profile: Option<String>,
    },
    /// Replay previously split statement files against a target database
    Ingest {
        /// Connection string, or path to a file containing one
        constr: String,
        /// Issue table CREATE statements
        #[arg(long)]
        create_tables: bool,
        /// Skip inserting rows
        #[arg(long)]
        skip_rows: bool,
        /// Drop all registry tables instead of ingesting
        #[arg(long)]
        clean: bool,
        /// Skip the confirmation prompt for --clean
        #[arg(short = 'y', long)]
        yes: bool,
        /// Path to file with table definition statements
        #[arg(short = 't', long, default_value = "create_tables_s3")]
        tables: String,
        /// Path to file with row insert statements
        #[arg(short = 'r', long, default_value = "create_rows_s3")]
        rows: String,
        /// Schema profile TOML overriding the built-in drop order
        #[arg(long)]
        profile: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            src,
            tables,
            rows,
            s3_rows,
            profile,
        } => {
            let profile = SchemaProfile::load(profile.as_deref())?;
            commands::split(&src, &tables, &rows, Some(&s3_rows), &profile)
        }
        Commands::Ingest {
            constr,
            create_tables,
            skip_rows,
            clean,
            yes,
            tables,
            rows,
            profile,
        } => {
            let profile = SchemaProfile::load(profile.as_deref())?;
            if clean {
                commands::clean(&constr, yes, &profile).await
            } else {
                // Partial batch failures are reported through the log; the
                // process still exits zero so re-runs stay scriptable.
                commands::ingest(&constr, &tables, &rows, create_tables, !skip_rows)
                    .await
                    .map(|_| ())
            }
        }
    }
}
