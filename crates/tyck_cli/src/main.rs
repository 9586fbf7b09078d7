mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tyck")]
#[command(version, about = "Tyck schema validation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON data against a schema
    Validate {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Path to the JSON data file (an object or an array of objects)
        data: String,

        /// Disable lax coercions for every record in the schema
        #[arg(short, long)]
        strict: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compile a schema without validating data
    Check {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so that `--format json` output stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            schema,
            data,
            strict,
            format,
        } => commands::validate::execute(&schema, &data, strict, &format),

        Commands::Check { schema, format } => commands::check::execute(&schema, &format),
    }
}
