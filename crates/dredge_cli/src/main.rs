//! # Commands
//!
//! - `dredge scan` - Scan files for secrets
//! - `dredge rules` - List detection rules

mod files;
mod output;
mod scanning;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dredge_core::prelude::*;

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|_| {
        format!("invalid severity '{s}' (expected 'low', 'medium', 'high', or 'critical')")
    })
}

#[derive(Debug, Parser)]
#[command(name = "dredge", version, arg_required_else_help = true)]
#[command(about = "Scan source trees for leaked secrets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "r")]
    Rules(RulesArgs),
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

/// How secrets appear in output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RedactionArg {
    /// First and last four characters with a mask between.
    #[default]
    Affix,
    /// SHA-256 digest of the secret.
    Hash,
    /// Plaintext, unredacted.
    None,
}

impl From<RedactionArg> for Redaction {
    fn from(arg: RedactionArg) -> Self {
        match arg {
            RedactionArg::Affix => Self::Affix,
            RedactionArg::Hash => Self::Hash,
            RedactionArg::None => Self::None,
        }
    }
}

/// Arguments for the `dredge scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Paths to scan for secrets.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Additional rules from a TOML file, merged over the builtin set.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Allowlist entries from a TOML file.
    #[arg(long, value_name = "PATH")]
    pub allowlist: Option<PathBuf>,

    /// Minimum severity level to report.
    #[arg(short, long, value_parser = parse_severity)]
    pub severity: Option<Severity>,

    /// How to render matched secrets.
    #[arg(long, value_enum, default_value_t)]
    pub redaction: RedactionArg,

    /// Always exit with code 0, even when secrets are found.
    #[arg(long)]
    pub exit_zero: bool,

    /// Glob patterns to exclude from scanning.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Skip `.gitignore` rules when collecting files.
    #[arg(long)]
    pub skip_gitignore: bool,

    /// Skip files larger than this size in bytes.
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// Number of parallel scanning threads.
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for the `dredge rules` command.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    /// Filter rules by pack id prefix (e.g. `aws`).
    #[arg(short, long)]
    pub pack: Option<String>,

    /// Show rule details including severity and tags.
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Scan(args) => scanning::run(&args),
        Command::Rules(args) => {
            output::print_rules(args.pack.as_deref(), args.verbose)?;
            Ok(0)
        }
    }
}
