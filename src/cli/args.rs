//! CLI argument parsing.
//!
//! Hand-rolled so the parser is testable with [`Args::parse_from`]. Parsing
//! never fails: unknown commands fall back to help, and flag values are kept
//! as raw strings until [`StepOptions::to_inputs`] interprets them.

use std::path::PathBuf;

use crate::error::{VizError, VizResult};
use crate::generators::AlgorithmInputs;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the available algorithms
    List,
    /// Print the step sequence of one algorithm
    Steps {
        /// Registry name of the algorithm.
        algorithm: String,
        /// Raw parameter flags.
        options: StepOptions,
    },
    /// Auto-advance through a scenario on its timer
    Play {
        /// Path to the scenario YAML file.
        scenario_path: PathBuf,
        /// Optional interval override in milliseconds.
        interval_override: Option<u64>,
    },
    /// Load and validate a scenario
    Check {
        /// Path to the scenario YAML file.
        scenario_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Flags accepted by `steps`, unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOptions {
    /// `--array 1,2,3`
    pub array: Option<String>,
    /// `--target N`
    pub target: Option<String>,
    /// `--n N`
    pub n: Option<String>,
    /// `--window K`
    pub window: Option<String>,
    /// `--json`
    pub json: bool,
}

impl StepOptions {
    /// Interpret the raw flag values.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidParameter`] when a value is not a number.
    pub fn to_inputs(&self) -> VizResult<AlgorithmInputs> {
        Ok(AlgorithmInputs {
            array: self.array.as_deref().map(parse_array).transpose()?,
            target: self
                .target
                .as_deref()
                .map(|v| parse_number("target", v))
                .transpose()?,
            n: self
                .n
                .as_deref()
                .map(|v| parse_number("n", v))
                .transpose()?,
            window: self
                .window
                .as_deref()
                .map(|v| parse_number("window", v))
                .transpose()?,
        })
    }
}

fn parse_number<T: std::str::FromStr>(parameter: &'static str, raw: &str) -> VizResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| VizError::invalid(parameter, format!("'{raw}' is not a valid number")))
}

/// Parse a comma-separated list of integers. Blank input is an empty array.
///
/// # Errors
///
/// Returns [`VizError::InvalidParameter`] naming the first bad element.
pub fn parse_array(raw: &str) -> VizResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse()
                .map_err(|_| VizError::invalid("array", format!("'{item}' is not an integer")))
        })
        .collect()
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings.
    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "list" => Command::List,
            "steps" => Self::parse_steps_command(args),
            "play" => Self::parse_play_command(args),
            "check" => Self::parse_check_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'steps' command arguments.
    fn parse_steps_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'steps' command requires an algorithm name");
            return Command::Help;
        }

        let mut options = StepOptions::default();
        let mut i = 3;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            let slot = match args[i].as_str() {
                "--array" | "-a" => Some(&mut options.array),
                "--target" | "-t" => Some(&mut options.target),
                "--n" | "-n" => Some(&mut options.n),
                "--window" | "-k" => Some(&mut options.window),
                "--json" => {
                    options.json = true;
                    None
                }
                other => {
                    eprintln!("Warning: ignoring unexpected argument '{other}'");
                    None
                }
            };
            match slot {
                Some(slot) if value.is_some() => {
                    *slot = value;
                    i += 2;
                }
                Some(_) => {
                    eprintln!("Warning: '{}' expects a value", args[i]);
                    i += 1;
                }
                None => i += 1,
            }
        }

        Command::Steps {
            algorithm: args[2].clone(),
            options,
        }
    }

    /// Parse the 'play' command arguments.
    fn parse_play_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'play' command requires a scenario path");
            return Command::Help;
        }

        let mut interval_override = None;
        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--interval-ms" => {
                    if i + 1 < args.len() {
                        if let Ok(ms) = args[i + 1].parse() {
                            interval_override = Some(ms);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        Command::Play {
            scenario_path: PathBuf::from(&args[2]),
            interval_override,
        }
    }

    /// Parse the 'check' command arguments.
    fn parse_check_command(args: &[String]) -> Command {
        if args.len() < 3 {
            eprintln!("Error: 'check' command requires a scenario path");
            return Command::Help;
        }

        Command::Check {
            scenario_path: PathBuf::from(&args[2]),
        }
    }
}
