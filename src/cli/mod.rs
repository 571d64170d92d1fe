//! CLI module for algoviz.
//!
//! This module contains all CLI logic extracted from main.rs to enable
//! full test coverage. The entry point `run_cli` can be called from main.rs
//! with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{parse_array, Args, Command, StepOptions};
pub use commands::{
    build_sequence, check, check_scenario, load_scenario, play_scenario, render_steps, run_cli,
    show_steps,
};
pub use output::{
    format_algorithm_list, format_check_report, format_sequence, format_sequence_json,
    format_step, print_help, print_version, version_string,
};

#[cfg(test)]
mod tests;
