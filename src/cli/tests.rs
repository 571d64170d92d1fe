//! CLI module tests.

use super::args::{parse_array, Args, Command, StepOptions};
use super::commands::{build_sequence, check, load_scenario, render_steps, run_cli};
use super::output::{format_algorithm_list, format_sequence, format_step, version_string};
use crate::error::VizError;
use crate::generators::ALGORITHMS;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tempfile::NamedTempFile;

fn options(pairs: &[(&str, &str)]) -> StepOptions {
    let mut opts = StepOptions::default();
    for (key, value) in pairs {
        let value = Some((*value).to_string());
        match *key {
            "array" => opts.array = value,
            "target" => opts.target = value,
            "n" => opts.n = value,
            "window" => opts.window = value,
            _ => {}
        }
    }
    opts
}

fn scenario_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("write");
    file
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["algoviz"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_help_variants() {
    for flag in ["-h", "--help", "help"] {
        assert_eq!(Args::parse_from(["algoviz", flag]).command, Command::Help);
    }
}

#[test]
fn test_parse_version_variants() {
    for flag in ["-V", "--version", "version"] {
        assert_eq!(Args::parse_from(["algoviz", flag]).command, Command::Version);
    }
}

#[test]
fn test_parse_unknown_command() {
    let args = Args::parse_from(["algoviz", "animate"]);
    assert_eq!(args.command, Command::Help);
}

#[test]
fn test_parse_list() {
    assert_eq!(Args::parse_from(["algoviz", "list"]).command, Command::List);
}

#[test]
fn test_parse_steps_with_flags() {
    let args = Args::parse_from([
        "algoviz",
        "steps",
        "linear_search",
        "--array",
        "10,25,30",
        "--target",
        "25",
        "--json",
    ]);
    assert_eq!(
        args.command,
        Command::Steps {
            algorithm: "linear_search".to_string(),
            options: StepOptions {
                array: Some("10,25,30".to_string()),
                target: Some("25".to_string()),
                n: None,
                window: None,
                json: true,
            },
        }
    );
}

#[test]
fn test_parse_steps_short_flags() {
    let args = Args::parse_from(["algoviz", "steps", "sliding_window_max_sum", "-a", "1,2", "-k", "1"]);
    match args.command {
        Command::Steps { options, .. } => {
            assert_eq!(options.array.as_deref(), Some("1,2"));
            assert_eq!(options.window.as_deref(), Some("1"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_steps_flag_without_value() {
    let args = Args::parse_from(["algoviz", "steps", "factorial", "--n"]);
    match args.command {
        Command::Steps { options, .. } => assert!(options.n.is_none()),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_steps_missing_algorithm() {
    assert_eq!(Args::parse_from(["algoviz", "steps"]).command, Command::Help);
}

#[test]
fn test_parse_play() {
    let args = Args::parse_from(["algoviz", "play", "s.yaml", "--interval-ms", "200"]);
    assert_eq!(
        args.command,
        Command::Play {
            scenario_path: PathBuf::from("s.yaml"),
            interval_override: Some(200),
        }
    );
}

#[test]
fn test_parse_play_bad_interval_ignored() {
    let args = Args::parse_from(["algoviz", "play", "s.yaml", "--interval-ms", "fast"]);
    assert_eq!(
        args.command,
        Command::Play {
            scenario_path: PathBuf::from("s.yaml"),
            interval_override: None,
        }
    );
}

#[test]
fn test_parse_check() {
    let args = Args::parse_from(["algoviz", "check", "s.yaml"]);
    assert_eq!(
        args.command,
        Command::Check {
            scenario_path: PathBuf::from("s.yaml"),
        }
    );
    assert_eq!(Args::parse_from(["algoviz", "check"]).command, Command::Help);
}

// ============================================================================
// Parameter interpretation tests
// ============================================================================

#[test]
fn test_parse_array() {
    assert_eq!(parse_array("1, 2,3").ok(), Some(vec![1, 2, 3]));
    assert_eq!(parse_array("-4,0").ok(), Some(vec![-4, 0]));
    assert_eq!(parse_array("").ok(), Some(Vec::new()));
    assert!(matches!(
        parse_array("1,x,3"),
        Err(VizError::InvalidParameter { parameter: "array", .. })
    ));
}

#[test]
fn test_options_to_inputs() {
    let inputs = options(&[("array", "3,1"), ("target", "4"), ("window", "2")])
        .to_inputs()
        .expect("valid");
    assert_eq!(inputs.array, Some(vec![3, 1]));
    assert_eq!(inputs.target, Some(4));
    assert_eq!(inputs.window, Some(2));
    assert_eq!(inputs.n, None);
}

#[test]
fn test_options_reject_negative_window() {
    let err = options(&[("window", "-1")]).to_inputs().err();
    assert!(matches!(
        err,
        Some(VizError::InvalidParameter { parameter: "window", .. })
    ));
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_build_sequence_factorial() {
    let seq = build_sequence("factorial", &options(&[("n", "4")])).expect("sequence");
    assert_eq!(seq.len(), 8);
}

#[test]
fn test_build_sequence_unknown_algorithm() {
    let err = build_sequence("bogo_sort", &options(&[("array", "1")])).err();
    assert!(matches!(err, Some(VizError::UnknownAlgorithm(_))));
}

#[test]
fn test_build_sequence_missing_target() {
    let err = build_sequence("binary_search", &options(&[("array", "1,2")])).err();
    assert!(matches!(
        err,
        Some(VizError::MissingParameter { parameter: "target", .. })
    ));
}

#[test]
fn test_render_steps_text() {
    let text = render_steps(
        "linear_search",
        &options(&[("array", "10,25,30,42,55"), ("target", "42")]),
    )
    .expect("text");
    assert_eq!(text.lines().filter(|l| l.starts_with('[')).count(), 4);
    assert!(text.contains("[42]"));
    assert!(text.contains('✓'));
}

#[test]
fn test_render_steps_json() {
    let mut opts = options(&[("array", "2,1,5,1,3,2"), ("window", "3")]);
    opts.json = true;
    let json = render_steps("sliding_window_max_sum", &opts).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    let steps = value.as_array().expect("array");
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[3]["is_terminal"], true);
    assert_eq!(steps[3]["payload"]["max_sum"], 9);
    assert_eq!(steps[0]["payload"]["family"], "window");
}

#[test]
fn test_run_cli_usage_error_exit_code() {
    let code = run_cli(Args::parse_from(["algoviz", "steps", "factorial"]));
    assert_eq!(code, ExitCode::from(2));
}

#[test]
fn test_build_sequence_rejects_oversized_array() {
    let values = vec!["1"; 257].join(",");
    let err = build_sequence("pair_sum", &options(&[("array", values.as_str()), ("target", "3")])).err();
    assert!(matches!(
        err,
        Some(VizError::InvalidParameter { parameter: "array", .. })
    ));
}

#[test]
fn test_run_cli_oversized_array_is_usage_error() {
    let values = vec!["7"; 257].join(",");
    let code = run_cli(Args::parse_from([
        "algoviz", "steps", "pair_sum", "--array", values.as_str(), "--target", "14",
    ]));
    assert_eq!(code, ExitCode::from(2));
}

#[test]
fn test_build_sequence_recursive_array_algorithms() {
    let seq = build_sequence("sum_array", &options(&[("array", "1,2,3")])).expect("sequence");
    assert_eq!(seq.len(), 8);
    let seq = build_sequence(
        "binary_search_recursive",
        &options(&[("array", "1,3,5,7,9,11,13"), ("target", "7")]),
    )
    .expect("sequence");
    assert_eq!(seq.len(), 2);
}

#[test]
fn test_run_cli_help_and_version() {
    assert_eq!(run_cli(Args::parse_from(["algoviz", "help"])), ExitCode::SUCCESS);
    assert_eq!(run_cli(Args::parse_from(["algoviz", "version"])), ExitCode::SUCCESS);
    assert_eq!(run_cli(Args::parse_from(["algoviz", "list"])), ExitCode::SUCCESS);
}

#[test]
fn test_check_scenario_file() {
    let file = scenario_file("name: Demo\nalgorithm:\n  kind: bubble_sort\n  array: [3, 1, 2]\n");
    let report = check(file.path()).expect("report");
    assert!(report.contains("Demo"));
    assert!(report.contains("bubble_sort"));
    assert!(report.contains("Deterministic: ✓"));
}

#[test]
fn test_check_invalid_scenario() {
    let file = scenario_file("algorithm:\n  kind: factorial\n");
    assert!(check(file.path()).is_err());
    assert_eq!(
        run_cli(Args::parse_from([
            "algoviz".to_string(),
            "check".to_string(),
            file.path().display().to_string(),
        ])),
        ExitCode::from(1)
    );
}

#[test]
fn test_load_scenario_interval_override() {
    let file = scenario_file(
        "playback:\n  interval_ms: 2000\n  autoplay: true\nalgorithm:\n  kind: factorial\n  n: 3\n",
    );
    let scenario = load_scenario(file.path(), Some(120)).expect("scenario");
    assert_eq!(scenario.playback.interval_ms, 120);
    assert!(scenario.playback.autoplay);
}

#[test]
fn test_play_single_step_scenario_returns_immediately() {
    let file = scenario_file("algorithm:\n  kind: linear_search\n  array: []\n  target: 1\n");
    let code = run_cli(Args::parse_from([
        "algoviz".to_string(),
        "play".to_string(),
        file.path().display().to_string(),
    ]));
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn test_play_short_scenario() {
    let file = scenario_file("algorithm:\n  kind: linear_search\n  array: [1, 2]\n  target: 2\n");
    let code = run_cli(Args::parse_from([
        "algoviz".to_string(),
        "play".to_string(),
        file.path().display().to_string(),
        "--interval-ms".to_string(),
        "50".to_string(),
    ]));
    assert_eq!(code, ExitCode::SUCCESS);
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_version_string() {
    assert!(version_string().starts_with("algoviz "));
}

#[test]
fn test_algorithm_list_mentions_every_algorithm() {
    let list = format_algorithm_list();
    for info in ALGORITHMS {
        assert!(list.contains(info.name), "{}", info.name);
    }
}

#[test]
fn test_format_step_recursion_has_no_values_line() {
    let seq = build_sequence("factorial", &options(&[("n", "2")])).expect("sequence");
    let first = seq.get(0).expect("step");
    let line = format_step(first, seq.len());
    assert_eq!(line, "[1/4] Call factorial(2)");
}

#[test]
fn test_format_sequence_pads_positions() {
    let seq = build_sequence("sum_iterative", &options(&[("n", "9")])).expect("sequence");
    let text = format_sequence(&seq);
    assert!(text.starts_with("[ 1/11] "));
    assert!(text.ends_with('✓'));
}
