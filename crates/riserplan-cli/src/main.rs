//! riserplan CLI - Riser Replacement Scheduling
//!
//! Command-line interface for scheduling, checking and rendering riser
//! replacement works.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use riserplan_core::{io, DurationOverrides, Renderer, ScheduleInput, ScheduleResult};
use riserplan_render::{GanttRenderer, GanttScale, MermaidRenderer, SummaryRenderer};
use riserplan_solver::{generate_schedule, verify};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "riserplan")]
#[command(author, version, about = "Riser replacement scheduling engine", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and schedule a building
    Schedule {
        /// Input file (.toml or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Duration overrides file (.toml or .json), task id -> working days
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Column scale for the text Gantt chart
        #[arg(long, value_enum, default_value_t = Scale::Days)]
        scale: Scale,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Schedule a building and verify every constraint holds
    Check {
        /// Input file (.toml or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Duration overrides file
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,
    },

    /// Write a starter input file for the reference building
    Init {
        /// Name of the input file (without extension)
        #[arg(default_value = "riser-plan")]
        name: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Results summary
    Text,
    /// Full schedule result as JSON
    Json,
    /// Text Gantt chart
    Gantt,
    /// MermaidJS Gantt block
    Mermaid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scale {
    Days,
    Weeks,
}

impl From<Scale> for GanttScale {
    fn from(scale: Scale) -> Self {
        match scale {
            Scale::Days => GanttScale::Days,
            Scale::Weeks => GanttScale::Weeks,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Schedule {
            file,
            overrides,
            format,
            scale,
            output,
        } => cmd_schedule(&file, overrides.as_deref(), format, scale, output.as_deref()),
        Commands::Check { file, overrides } => cmd_check(&file, overrides.as_deref()),
        Commands::Init { name, output } => cmd_init(&name, &output),
    }
}

fn load(file: &Path, overrides: Option<&Path>) -> Result<ScheduleResult> {
    let input = io::load_input(file)
        .with_context(|| format!("Failed to load input {}", file.display()))?;

    let overrides: Option<DurationOverrides> = overrides
        .map(|path| {
            io::load_overrides(path)
                .with_context(|| format!("Failed to load overrides {}", path.display()))
        })
        .transpose()?;

    tracing::debug!(
        file = %file.display(),
        overrides = overrides.as_ref().map_or(0, DurationOverrides::len),
        "input loaded"
    );

    Ok(generate_schedule(&input, overrides.as_ref()))
}

fn cmd_schedule(
    file: &Path,
    overrides: Option<&Path>,
    format: OutputFormat,
    scale: Scale,
    output: Option<&Path>,
) -> Result<ExitCode> {
    let result = load(file, overrides)?;

    let rendered = match format {
        OutputFormat::Text => SummaryRenderer::new().render(&result)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&result)?;
            json.push('\n');
            json
        }
        OutputFormat::Gantt => GanttRenderer::new().scale(scale.into()).render(&result)?,
        OutputFormat::Mermaid => MermaidRenderer::new().render(&result)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Written: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_check(file: &Path, overrides: Option<&Path>) -> Result<ExitCode> {
    let result = load(file, overrides)?;
    let violations = verify(&result);

    if violations.is_empty() {
        println!(
            "OK: {} tasks, {} working days, no constraint violations",
            result.scheduled.len(),
            result.stats.total_work_days
        );
        return Ok(ExitCode::SUCCESS);
    }

    for violation in &violations {
        eprintln!("violation: {violation}");
    }
    eprintln!("{} constraint violation(s)", violations.len());
    Ok(ExitCode::FAILURE)
}

/// Keep letters, digits, `-` and `_`; everything else becomes `_`
fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn cmd_init(name: &str, dir: &Path) -> Result<ExitCode> {
    let path = dir.join(format!("{}.toml", sanitize_file_stem(name)));
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let today = chrono::Local::now().date_naive();
    let input = ScheduleInput::default().starting(today);
    let text = io::input_to_toml(&input)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created: {}", path.display());
    Ok(ExitCode::SUCCESS)
}
