//! CLI output formatting.
//!
//! Formatting is split from printing so the text can be tested.

use std::fmt::Write as _;

use crate::config::ScenarioConfig;
use crate::engine::{Narrated, Step, StepSequence};
use crate::error::VizResult;
use crate::generators::{Snapshot, ALGORITHMS};

/// Version string including the git hash when one was captured at build time.
#[must_use]
pub fn version_string() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("algoviz {} ({hash})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("algoviz {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_string());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"algoviz - step-by-step algorithm walkthroughs

USAGE:
    algoviz <COMMAND> [OPTIONS]

COMMANDS:
    list                        List available algorithms

    steps <algorithm>           Print every step of one run
        --array <a,b,c>         Input values
        --target <N>            Value (or sum) to search for
        --n <N>                 Argument for numeric algorithms
        --window <K>            Window size for sliding window
        --json                  Emit the sequence as JSON

    play <scenario.yaml>        Auto-advance through a scenario
        --interval-ms <N>       Override the scenario's interval

    check <scenario.yaml>       Validate a scenario and report its step count

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    algoviz steps factorial --n 4
    algoviz steps linear_search --array 10,25,30,42,55 --target 42
    algoviz steps sliding_window_max_sum --array 2,1,5,1,3,2 --window 3 --json
    algoviz play scenarios/bubble_sort.yaml --interval-ms 300

Set RUST_LOG=debug to trace playback transitions."
    );
}

/// Table of registered algorithms.
#[must_use]
pub fn format_algorithm_list() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<12} {:<16} SUMMARY", "NAME", "FAMILY", "PARAMETERS");
    for info in ALGORITHMS {
        let _ = writeln!(
            out,
            "{:<24} {:<12} {:<16} {}",
            info.name,
            info.family,
            info.parameters.join(", "),
            info.summary
        );
    }
    out
}

/// One line per step: position, narration, and a marker on the terminal step.
#[must_use]
pub fn format_step(step: &Step<Snapshot>, total: usize) -> String {
    let width = total.to_string().len();
    let marker = if step.is_terminal() { " ✓" } else { "" };
    let mut line = format!(
        "[{:>width$}/{total}] {}{marker}",
        step.index() + 1,
        step.payload().description()
    );
    if let Some(values) = step.payload().values() {
        let highlighted = step.payload().highlighted();
        let cells: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if highlighted.contains(&i) {
                    format!("[{v}]")
                } else {
                    v.to_string()
                }
            })
            .collect();
        let _ = write!(line, "\n{:width$}    {}", "", cells.join(" "));
    }
    line
}

/// Whole sequence as text.
#[must_use]
pub fn format_sequence(sequence: &StepSequence<Snapshot>) -> String {
    let total = sequence.len();
    sequence
        .iter()
        .map(|step| format_step(step, total))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whole sequence as pretty JSON.
///
/// # Errors
///
/// Returns a serialization error if JSON encoding fails.
pub fn format_sequence_json(sequence: &StepSequence<Snapshot>) -> VizResult<String> {
    Ok(serde_json::to_string_pretty(sequence)?)
}

/// Summary printed by `check`.
#[must_use]
pub fn format_check_report(
    scenario: &ScenarioConfig,
    sequence: &StepSequence<Snapshot>,
    deterministic: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario:      {}", scenario.display_name());
    let _ = writeln!(out, "Algorithm:     {}", scenario.algorithm.name());
    let _ = writeln!(out, "Steps:         {}", sequence.len());
    let _ = writeln!(out, "Interval:      {} ms", scenario.playback.interval_ms);
    let _ = writeln!(out, "Autoplay:      {}", scenario.playback.autoplay);
    let sym = if deterministic { "✓" } else { "✗" };
    let _ = writeln!(out, "Deterministic: {sym}");
    if let Some(last) = sequence.terminal() {
        let _ = writeln!(out, "Final step:    {}", last.payload().description());
    }
    out
}
