//! Step-sequence engine.
//!
//! - [`step`]: immutable [`Step`] records, [`StepSequence`] and the
//!   [`StepRecorder`] every generator builds with
//! - [`generator`]: the [`StepGenerator`] contract
//! - [`controller`]: [`PlaybackController`], the cursor state machine
//! - [`timer`] / [`clock`]: the scoped auto-advance timer and its time source

pub mod clock;
pub mod controller;
pub mod generator;
pub mod step;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use controller::{PlaybackController, PlaybackState, SubscriptionId};
pub use generator::{Narrated, StepGenerator};
pub use step::{Step, StepRecorder, StepSequence};
pub use timer::AutoAdvance;
