//! CLI command handlers.
//!
//! Each handler prints its own output and maps failures to an exit code.
//! The fallible core of each command is a separate function returning
//! [`VizResult`] so it can be tested without capturing stdout.

use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

use crate::config::{PlaybackConfig, ScenarioConfig};
use crate::engine::{PlaybackController, PlaybackState, StepSequence};
use crate::error::{VizError, VizResult};
use crate::generators::{AlgorithmSpec, Snapshot};

use super::args::StepOptions;
use super::output::{
    format_algorithm_list, format_check_report, format_sequence, format_sequence_json,
    format_step, print_help, print_version,
};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::List => {
            print!("{}", format_algorithm_list());
            ExitCode::SUCCESS
        }
        Command::Steps { algorithm, options } => show_steps(&algorithm, &options),
        Command::Play {
            scenario_path,
            interval_override,
        } => play_scenario(&scenario_path, interval_override),
        Command::Check { scenario_path } => check_scenario(&scenario_path),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

fn report(err: &VizError) -> ExitCode {
    eprintln!("Error: {err}");
    if err.is_usage_error() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

/// Build the sequence requested by `steps`.
///
/// # Errors
///
/// Returns error for unknown algorithms and missing or malformed flags.
pub fn build_sequence(algorithm: &str, options: &StepOptions) -> VizResult<StepSequence<Snapshot>> {
    let inputs = options.to_inputs()?;
    let spec = AlgorithmSpec::from_parts(algorithm, &inputs)?;
    Ok(spec.generate())
}

/// Render the output of `steps` as text or JSON.
///
/// # Errors
///
/// Returns error if the sequence cannot be built or serialized.
pub fn render_steps(algorithm: &str, options: &StepOptions) -> VizResult<String> {
    let sequence = build_sequence(algorithm, options)?;
    if options.json {
        format_sequence_json(&sequence)
    } else {
        Ok(format_sequence(&sequence))
    }
}

/// Print every step of one algorithm run.
#[must_use]
pub fn show_steps(algorithm: &str, options: &StepOptions) -> ExitCode {
    match render_steps(algorithm, options) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Load a scenario and apply the interval override, if any.
///
/// # Errors
///
/// Returns error if the scenario cannot be loaded.
pub fn load_scenario(path: &Path, interval_override: Option<u64>) -> VizResult<ScenarioConfig> {
    let mut scenario = ScenarioConfig::load(path)?;
    if let Some(ms) = interval_override {
        scenario.playback = PlaybackConfig::builder()
            .interval_ms(ms)
            .autoplay(scenario.playback.autoplay)
            .build();
    }
    Ok(scenario)
}

/// Auto-advance through a scenario, printing each step as it is reached.
#[must_use]
pub fn play_scenario(path: &Path, interval_override: Option<u64>) -> ExitCode {
    let scenario = match load_scenario(path, interval_override) {
        Ok(s) => s,
        Err(e) => return report(&e),
    };

    println!("▶ {} ({} ms per step)", scenario.display_name(), scenario.playback.interval_ms);
    let mut controller = PlaybackController::with_config(scenario.algorithm.generate(), &scenario.playback);
    let total = controller.sequence().len();

    let mut last_printed = controller.cursor();
    if let Some(step) = controller.current() {
        println!("{}", format_step(step, total));
    }
    controller.subscribe(move |state: &PlaybackState<Snapshot>| {
        if state.cursor() == last_printed {
            return;
        }
        last_printed = state.cursor();
        if let Some(step) = state.current() {
            println!("{}", format_step(step, total));
        }
    });

    if !controller.play() {
        debug!("nothing to animate");
    }
    let ticks = controller.run_to_completion(std::thread::sleep);
    info!(ticks, "playback finished");
    ExitCode::SUCCESS
}

/// Load, validate and generate a scenario.
///
/// # Errors
///
/// Returns error if the scenario cannot be loaded.
pub fn check(path: &Path) -> VizResult<String> {
    let scenario = ScenarioConfig::load(path)?;
    let sequence = scenario.algorithm.generate();
    let deterministic = scenario.algorithm.verify_determinism();
    Ok(format_check_report(&scenario, &sequence, deterministic))
}

/// Validate a scenario file and report on it.
#[must_use]
pub fn check_scenario(path: &Path) -> ExitCode {
    println!("Checking: {}\n", path.display());
    match check(path) {
        Ok(report_text) => {
            print!("{report_text}");
            println!("✓ Scenario is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ Scenario is invalid");
            report(&e)
        }
    }
}
