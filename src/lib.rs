//! # algoviz
//!
//! Step-sequence generation and playback for algorithm walkthroughs.
//!
//! Every supported algorithm is a pure generator that enumerates the
//! observable states of one run as an immutable [`StepSequence`]. A
//! [`PlaybackController`] then walks a cursor over that sequence, manually or
//! on a scoped auto-advance timer, and notifies observers on every change.
//!
//! ## Example
//!
//! ```rust
//! use algoviz::prelude::*;
//!
//! let sequence = AlgorithmSpec::Factorial { n: 4 }.generate();
//! assert_eq!(sequence.len(), 8);
//!
//! let mut controller = PlaybackController::new(sequence);
//! controller.jump(100);
//! assert_eq!(controller.cursor(), Some(7));
//! assert!(controller.is_complete());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Index loops mirror the textbook algorithms
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod tui;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PlaybackConfig, PlaybackConfigBuilder, ScenarioConfig};
    pub use crate::engine::{
        Clock, ManualClock, MonotonicClock, Narrated, PlaybackController, PlaybackState, Step,
        StepGenerator, StepRecorder, StepSequence,
    };
    pub use crate::error::{VizError, VizResult};
    pub use crate::generators::{AlgorithmInputs, AlgorithmSpec, Snapshot, ALGORITHMS};
}

/// Re-export for public API
pub use engine::{PlaybackController, StepSequence};
pub use error::{VizError, VizResult};
