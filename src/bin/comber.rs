//! comber - merge YAML/JSON documents from the command line.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use comber::value::{self, Value};
use comber::{MergeProfile, Merger, Policy};

/// Deep-merge YAML/JSON documents by value kind
#[derive(Debug, Parser)]
#[command(name = "comber", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge two documents; the left-hand side wins on scalar conflicts
    Merge(MergeArgs),
    /// List the kind pairs and rules a profile registers
    Rules(ProfileArgs),
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Merge profile (YAML or JSON)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Keep the left-hand side of every collection instead of combining
    #[arg(long = "override")]
    override_: bool,

    /// Freeze merged sequences, sets and mappings into read-only forms
    #[arg(long)]
    immutable: bool,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Left-hand document (takes precedence)
    #[arg(long)]
    lhs: PathBuf,

    /// Right-hand document
    #[arg(long)]
    rhs: PathBuf,

    #[command(flatten)]
    profile: ProfileArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: bool) {
    let filter = log_filter(verbose, std::env::var("RUST_LOG").ok().as_deref());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

/// --verbose forces DEBUG; otherwise a valid RUST_LOG is used, else WARN.
fn log_filter(verbose: bool, env: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Merge(args) => merge(&args),
        Command::Rules(args) => rules(&args, &mut io::stdout()),
    }
}

fn build_merger(args: &ProfileArgs) -> Result<Merger, Box<dyn std::error::Error>> {
    let mut profile = match &args.profile {
        Some(path) => MergeProfile::load(path)?,
        None => MergeProfile::default(),
    };
    if args.override_ {
        profile = profile.with_policy(Policy::Override);
    }
    if args.immutable {
        profile = profile.with_immutable(true);
    }
    Ok(profile.build()?)
}

fn read_document(file: &Path, side: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {} file {:?}: {}", side, file, e))?;
    // JSON documents parse as YAML too.
    let value = value::from_yaml(&content)
        .map_err(|e| format!("Failed to parse {}: {}", side, e))?;
    Ok(value)
}

fn merge(args: &MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let merger = build_merger(&args.profile)?;
    let lhs = read_document(&args.lhs, "LHS")?;
    let rhs = read_document(&args.rhs, "RHS")?;

    let merged = merger
        .merge(&lhs, &rhs)
        .map_err(|e| format!("Merge failed: {}", e))?;
    tracing::debug!(kind = %merged.kind(), "merged documents");

    let rendered = match args.format {
        Format::Yaml => value::to_yaml(&merged)?,
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&merged)?;
            json.push('\n');
            json
        }
    };

    let mut output: Box<dyn Write> = if args.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&args.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", args.output, e))?,
        )
    };
    write!(output, "{}", rendered)?;

    Ok(())
}

fn rules(args: &ProfileArgs, output: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let merger = build_merger(args)?;
    writeln!(output, "Rules:")?;
    for (left, right, name) in merger.rules() {
        writeln!(output, "  ({}, {}) => {}", left, right, name)?;
    }
    let casts = merger.cast_kinds();
    if !casts.is_empty() {
        writeln!(output, "Casts:")?;
        for kind in casts {
            writeln!(output, "  {}", kind)?;
        }
    }
    Ok(())
}
