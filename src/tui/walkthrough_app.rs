//! Walkthrough TUI application state and logic.
//!
//! Terminal I/O is handled by the `walkthrough_tui` binary; everything that
//! can be tested without a terminal lives here.
//!
//! ```bash
//! cargo run --bin walkthrough_tui --features tui -- scenarios/factorial.yaml
//! ```

use crossterm::event::KeyCode;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::config::{ScenarioConfig, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use crate::engine::{Clock, PlaybackController, PlaybackState, Step};
use crate::error::VizResult;
use crate::generators::Snapshot;

/// Embedded default scenario.
const DEFAULT_SCENARIO_YAML: &str = include_str!("../../scenarios/bubble_sort.yaml");

/// Application state for the walkthrough TUI.
pub struct WalkthroughApp {
    /// Scenario being shown.
    pub scenario: ScenarioConfig,
    /// Cursor over the generated steps.
    pub controller: PlaybackController<Snapshot>,
    /// Frame counter.
    pub frame_count: u64,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Path the scenario was loaded from, if any.
    pub loaded_path: Option<String>,
    changes: Rc<Cell<u64>>,
}

impl WalkthroughApp {
    /// Create an app for `scenario`, starting playback if it asks for autoplay.
    #[must_use]
    pub fn new(scenario: ScenarioConfig) -> Self {
        let controller =
            PlaybackController::with_config(scenario.algorithm.generate(), &scenario.playback);
        Self::from_controller(scenario, controller)
    }

    /// Same as [`new`](Self::new) with an explicit clock.
    #[must_use]
    pub fn with_clock(scenario: ScenarioConfig, clock: Box<dyn Clock>) -> Self {
        let controller = PlaybackController::with_clock(
            scenario.algorithm.generate(),
            scenario.playback.interval(),
            clock,
        );
        Self::from_controller(scenario, controller)
    }

    fn from_controller(scenario: ScenarioConfig, mut controller: PlaybackController<Snapshot>) -> Self {
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        controller.subscribe(move |_: &PlaybackState<Snapshot>| counter.set(counter.get() + 1));
        if scenario.playback.autoplay {
            controller.play();
        }
        Self {
            scenario,
            controller,
            frame_count: 0,
            should_quit: false,
            loaded_path: None,
            changes,
        }
    }

    /// Create the app from a YAML scenario string.
    ///
    /// # Errors
    ///
    /// Returns error if YAML parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        Ok(Self::new(ScenarioConfig::from_yaml(yaml)?))
    }

    /// Create the app from a YAML scenario file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the scenario is invalid.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let mut app = Self::new(ScenarioConfig::load(&path)?);
        app.loaded_path = Some(path_str);
        Ok(app)
    }

    /// The embedded default scenario.
    ///
    /// # Errors
    ///
    /// Returns error if the embedded scenario fails to validate.
    pub fn default_scenario() -> VizResult<Self> {
        Self::from_yaml(DEFAULT_SCENARIO_YAML)
    }

    /// Advance the frame and fire any due auto-advance ticks.
    pub fn update(&mut self) {
        self.frame_count += 1;
        self.controller.poll();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.controller.toggle();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.controller.step_forward();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.controller.step_backward();
            }
            KeyCode::Home | KeyCode::Char('r') => {
                self.controller.reset();
            }
            KeyCode::End | KeyCode::Char('g') => {
                self.controller.jump(usize::MAX);
            }
            KeyCode::Char('+' | '=') => self.scale_interval(false),
            KeyCode::Char('-') => self.scale_interval(true),
            _ => {}
        }
    }

    /// Halve (`slower == false`) or double the auto-advance period.
    fn scale_interval(&mut self, slower: bool) {
        let current = self.controller.interval().as_millis() as u64;
        let next = if slower { current.saturating_mul(2) } else { current / 2 };
        let next = next.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.controller.set_interval(Duration::from_millis(next));
    }

    /// Check if the app should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Step under the cursor.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step<Snapshot>> {
        self.controller.current()
    }

    /// Fraction of the sequence already shown, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let len = self.controller.sequence().len();
        match self.controller.cursor() {
            Some(cursor) if len > 0 => (cursor + 1) as f64 / len as f64,
            _ => 0.0,
        }
    }

    /// Playback status for the status bar.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.controller.is_running() {
            "PLAYING"
        } else if self.controller.is_complete() {
            "COMPLETE"
        } else {
            "PAUSED"
        }
    }

    /// Number of state changes observed since the app was created.
    #[must_use]
    pub fn change_count(&self) -> u64 {
        self.changes.get()
    }
}

/// Bar heights for `values`, offset so the smallest value still shows.
///
/// Heights are at least 1 and saturate instead of overflowing when the
/// values span the whole `i64` range.
#[must_use]
pub fn bar_heights(values: &[i64]) -> Vec<u64> {
    let floor = values.iter().copied().min().unwrap_or(0).min(0);
    values
        .iter()
        .map(|&v| v.abs_diff(floor).saturating_add(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualClock;
    use crate::generators::AlgorithmSpec;

    fn app(autoplay: bool) -> (WalkthroughApp, ManualClock) {
        let mut scenario = ScenarioConfig::new(AlgorithmSpec::LinearSearch {
            array: vec![10, 25, 30, 42, 55],
            target: 42,
        });
        scenario.playback.interval_ms = 1000;
        scenario.playback.autoplay = autoplay;
        let clock = ManualClock::new();
        let app = WalkthroughApp::with_clock(scenario, Box::new(clock.clone()));
        (app, clock)
    }

    #[test]
    fn test_new_app() {
        let (app, _) = app(false);
        assert!(!app.should_quit());
        assert_eq!(app.frame_count, 0);
        assert_eq!(app.controller.cursor(), Some(0));
        assert_eq!(app.status_label(), "PAUSED");
    }

    #[test]
    fn test_autoplay_starts_running() {
        let (app, _) = app(true);
        assert!(app.controller.is_running());
        assert_eq!(app.status_label(), "PLAYING");
    }

    #[test]
    fn test_update_advances_on_clock() {
        let (mut app, clock) = app(true);
        app.update();
        assert_eq!(app.controller.cursor(), Some(0));
        clock.advance_ms(1000);
        app.update();
        assert_eq!(app.controller.cursor(), Some(1));
        assert_eq!(app.frame_count, 2);
    }

    #[test]
    fn test_runs_to_complete() {
        let (mut app, clock) = app(true);
        for _ in 0..10 {
            clock.advance_ms(1000);
            app.update();
        }
        assert_eq!(app.controller.cursor(), Some(3));
        assert_eq!(app.status_label(), "COMPLETE");
        assert!((app.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_key_quit() {
        let (mut app, _) = app(false);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_handle_key_navigation() {
        let (mut app, _) = app(false);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.controller.cursor(), Some(2));
        app.handle_key(KeyCode::Left);
        assert_eq!(app.controller.cursor(), Some(1));
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.controller.cursor(), Some(3));
        app.handle_key(KeyCode::Home);
        assert_eq!(app.controller.cursor(), Some(0));
    }

    #[test]
    fn test_space_toggles_playback() {
        let (mut app, _) = app(false);
        app.handle_key(KeyCode::Char(' '));
        assert!(app.controller.is_running());
        app.handle_key(KeyCode::Char(' '));
        assert!(!app.controller.is_running());
    }

    #[test]
    fn test_manual_step_ignored_while_playing() {
        let (mut app, _) = app(true);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.cursor(), Some(0));
    }

    #[test]
    fn test_interval_keys_clamp() {
        let (mut app, _) = app(false);
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.controller.interval(), Duration::from_millis(500));
        for _ in 0..20 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.controller.interval(), Duration::from_millis(MIN_INTERVAL_MS));
        for _ in 0..20 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.controller.interval(), Duration::from_millis(MAX_INTERVAL_MS));
    }

    #[test]
    fn test_speed_change_takes_effect_mid_play() {
        let (mut app, clock) = app(true);
        clock.advance_ms(600);
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.controller.interval(), Duration::from_millis(500));
        assert_eq!(
            app.controller.time_until_next_tick(),
            Some(Duration::from_millis(500))
        );
        clock.advance_ms(500);
        app.update();
        assert_eq!(app.controller.cursor(), Some(1));
        assert_eq!(app.status_label(), "PLAYING");
    }

    #[test]
    fn test_change_count_tracks_observer() {
        let (mut app, _) = app(false);
        assert_eq!(app.change_count(), 0);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Left);
        assert_eq!(app.change_count(), 2);
    }

    #[test]
    fn test_bar_heights() {
        assert_eq!(bar_heights(&[3, 1, 2]), vec![4, 2, 3]);
        assert_eq!(bar_heights(&[-2, 0, 5]), vec![1, 3, 8]);
        assert!(bar_heights(&[]).is_empty());
    }

    #[test]
    fn test_bar_heights_full_i64_range() {
        assert_eq!(bar_heights(&[i64::MIN, 0, i64::MAX]), vec![1, (1 << 63) + 1, u64::MAX]);
    }

    #[test]
    fn test_default_scenario_loads() {
        let app = WalkthroughApp::default_scenario().expect("embedded scenario");
        assert_eq!(app.scenario.algorithm.name(), "bubble_sort");
        assert!(app.controller.is_running());
    }
}
