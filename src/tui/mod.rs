//! TUI module for algoviz.
//!
//! This module contains reusable TUI application state and logic
//! extracted from bin/*.rs to enable testing.
//!
//! The actual terminal I/O remains in the binaries, but all testable
//! state management lives here.

#[cfg(feature = "tui")]
pub mod walkthrough_app;
