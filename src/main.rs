//! cc-statusline - statusline generator for Claude Code
//!
//! Builds a bash statusline script from a short wizard (or a preset file)
//! and installs it into a `.claude` directory.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive setup, installed into ./.claude
//! cc-statusline init
//!
//! # Non-interactive, installed into ~/.claude
//! cc-statusline init --preset statusline.yaml --global
//!
//! # Print the script without installing
//! cc-statusline generate --preset statusline.yaml
//!
//! # Check a preset, probe tools, benchmark scripts
//! cc-statusline validate statusline.yaml
//! cc-statusline deps
//! cc-statusline bench --iterations 20 --report perf.json
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use statusline_core::{
    InstallLocation, LogGuard, StatuslineConfig, StatuslineError, init_logging, logging,
    validate_dependencies,
};
use statusline_init::{
    ConfigSummary, InstallOptions, compose_script, install, load_preset, run_wizard,
    validate_config,
};
use statusline_perf::{
    PerfError, PerfReport, PerfRunner, ascii_chart, default_scenarios, filter_scenarios,
    format_summary_table, recommendations,
};
use tracing::{error, info, warn};

/// Interactive generator for Claude Code statusline scripts
#[derive(Parser, Debug)]
#[command(name = "cc-statusline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.claude/cc-statusline/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configure, generate and install a statusline (default)
    Init(InitArgs),

    /// Print or write a generated script without installing it
    Generate {
        /// Preset file (YAML or JSON); defaults are used when omitted
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Write the script here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a preset file
    Validate {
        /// Preset file (YAML or JSON)
        file: PathBuf,
    },

    /// Check for the tools generated scripts rely on
    Deps,

    /// Benchmark generated scripts
    Bench {
        /// Runs per scenario
        #[arg(short = 'n', long, default_value_t = 10)]
        iterations: usize,

        /// Only run scenarios whose name contains this (case-insensitive)
        #[arg(long)]
        scenario: Option<String>,

        /// Write a JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct InitArgs {
    /// Skip the wizard and read choices from a preset file
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Install into ~/.claude
    #[arg(long, conflicts_with = "project")]
    global: bool,

    /// Install into ./.claude
    #[arg(long)]
    project: bool,

    /// Overwrite an existing statusline.sh
    #[arg(long)]
    force: bool,

    /// Print the script instead of installing it
    #[arg(long)]
    no_install: bool,

    /// Project root for project installs (defaults to the current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    // Install panic hook to ensure terminal cleanup
    install_panic_hook();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("cc-statusline error: {:#}", e);
            report_error(&e);
            ExitCode::from(1)
        }
    }
}

/// Print an error and, when available, a hint for fixing it.
fn report_error(err: &anyhow::Error) {
    let statusline_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<StatuslineError>());

    if let Some(StatuslineError::UserCancelled) = statusline_error {
        eprintln!("Setup cancelled");
        return;
    }

    eprintln!("Error: {:#}", err);
    if let Some(hint) = statusline_error.and_then(StatuslineError::guidance) {
        eprintln!("Hint: {}", hint);
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    stdout.flush()?;

    Ok(())
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> statusline_core::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command.unwrap_or(Command::Init(InitArgs::default())) {
        Command::Init(args) => cmd_init(&args),
        Command::Generate { preset, output } => cmd_generate(preset.as_deref(), output.as_deref()),
        Command::Validate { file } => cmd_validate(&file),
        Command::Deps => Ok(cmd_deps()),
        Command::Bench {
            iterations,
            scenario,
            report,
        } => cmd_bench(iterations, scenario.as_deref(), report.as_deref()),
    }
}

fn load_or_default(preset: Option<&std::path::Path>) -> anyhow::Result<StatuslineConfig> {
    match preset {
        Some(path) => Ok(load_preset(path)?),
        None => Ok(StatuslineConfig::default()),
    }
}

/// Print warnings and fail on validation errors.
fn check_config(config: &StatuslineConfig) -> anyhow::Result<()> {
    let result = validate_config(config);
    for warning in &result.warnings {
        warn!(%warning, "configuration warning");
        eprintln!("⚠️  {}", warning);
    }
    if !result.is_valid() {
        return Err(StatuslineError::ConfigValidation {
            errors: result.errors,
        }
        .into());
    }
    Ok(())
}

fn creation_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}

fn cmd_init(args: &InitArgs) -> anyhow::Result<ExitCode> {
    let mut config = match &args.preset {
        Some(path) => load_preset(path)?,
        None => run_wizard().map_err(StatuslineError::from)?,
    };

    if args.global {
        config.install_location = Some(InstallLocation::Global);
    } else if args.project {
        config.install_location = Some(InstallLocation::Project);
    }

    println!();
    print!("{}", ConfigSummary(&config));
    println!();

    check_config(&config)?;

    let deps = validate_dependencies();
    if !deps.missing().is_empty() {
        eprint!("{}", deps.format_missing());
    }

    let script = compose_script(&config, Some(&creation_stamp()))?;

    if args.no_install {
        print!("{}", script);
        return Ok(ExitCode::SUCCESS);
    }

    let location = config.install_location.unwrap_or_default();
    let project_root = match &args.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let options = InstallOptions::new(location, project_root, logging::home_dir()?)
        .with_force(args.force);

    let outcome = install(&script, &options)?;
    info!(script = %outcome.script_path.display(), "init complete");

    println!("✅ Statusline installed to {}", outcome.script_path.display());
    println!("   Registered in {}", outcome.settings_path.display());
    println!();
    println!("🎉 Restart Claude Code to see your new statusline.");
    Ok(ExitCode::SUCCESS)
}

fn cmd_generate(
    preset: Option<&std::path::Path>,
    output: Option<&std::path::Path>,
) -> anyhow::Result<ExitCode> {
    let config = load_or_default(preset)?;
    check_config(&config)?;

    let script = compose_script(&config, Some(&creation_stamp()))?;
    match output {
        Some(path) => {
            std::fs::write(path, &script)
                .map_err(|e| StatuslineError::io("writing", path, e))?;
            eprintln!("✅ Wrote {}", path.display());
        }
        None => print!("{}", script),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(file: &std::path::Path) -> anyhow::Result<ExitCode> {
    let config = load_preset(file)?;
    let result = validate_config(&config);

    for error in &result.errors {
        println!("❌ {}", error);
    }
    for warning in &result.warnings {
        println!("⚠️  {}", warning);
    }

    if result.is_valid() {
        println!("✅ {} is valid", file.display());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn cmd_deps() -> ExitCode {
    let report = validate_dependencies();
    println!("{}", report.format_summary());
    print!("{}", report.format_table());

    let missing = report.format_missing();
    if !missing.is_empty() {
        println!();
        print!("{}", missing);
    }
    ExitCode::SUCCESS
}

fn cmd_bench(
    iterations: usize,
    filter: Option<&str>,
    report_path: Option<&std::path::Path>,
) -> anyhow::Result<ExitCode> {
    let scenarios = filter_scenarios(default_scenarios(), filter);
    if scenarios.is_empty() {
        let filter = filter.unwrap_or_default().to_string();
        return Err(StatuslineError::from(PerfError::NoMatchingScenario(filter)).into());
    }

    println!("🏁 Starting Performance Test Suite");
    println!("{}", "=".repeat(50));

    let mut runner = PerfRunner::new().map_err(StatuslineError::from)?;
    for scenario in &scenarios {
        let result = runner
            .run_scenario(scenario, iterations)
            .map_err(StatuslineError::from)?;
        println!();
        print!("{}", result.summary());
        if result.measurements.len() > 1 {
            let times: Vec<f64> = result.measurements.iter().map(|m| m.millis()).collect();
            println!();
            println!("{}", ascii_chart(&times, 50, 8, Some("   Execution time per run (ms)")));
        }
    }

    let results = runner.into_results();

    println!();
    println!("{}", "=".repeat(50));
    println!("📊 Overall Performance Summary");
    println!("{}", "=".repeat(50));
    print!("{}", format_summary_table(&results));

    let advice = recommendations(&results);
    if !advice.is_empty() {
        println!();
        println!("💡 Recommendations:");
        for line in advice {
            println!("   - {}", line);
        }
    }

    if let Some(path) = report_path {
        PerfReport::from_results(&results)
            .write(path)
            .map_err(StatuslineError::from)?;
        println!();
        println!("📁 Results exported to: {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
