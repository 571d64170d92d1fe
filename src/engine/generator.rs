//! Step generator abstraction.
//!
//! A generator is a pure function from algorithm parameters to a
//! [`StepSequence`]. Implementations must:
//!
//! - be deterministic (same parameters, same sequence),
//! - never return an empty sequence, even for degenerate input,
//! - never mutate the caller's parameters,
//! - never panic.

use serde::Serialize;
use std::fmt::Debug;

use super::step::StepSequence;

/// Payloads that carry a human-readable narration of their instant.
pub trait Narrated {
    /// One-line description of what happens at this step.
    fn description(&self) -> &str;
}

/// Deterministic producer of step sequences for one algorithm family.
pub trait StepGenerator {
    /// Algorithm input.
    type Params: Debug;

    /// Self-contained render data for one step.
    type Payload: Clone + Debug + PartialEq + Serialize + Narrated;

    /// Stable identifier (snake case), used by the CLI and scenario files.
    const NAME: &'static str;

    /// Enumerate every observable state for `params`.
    fn generate(params: &Self::Params) -> StepSequence<Self::Payload>;

    /// Generate twice and compare.
    fn verify_determinism(params: &Self::Params) -> bool {
        Self::generate(params) == Self::generate(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::step::StepRecorder;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Countdown {
        remaining: u32,
        description: String,
    }

    impl Narrated for Countdown {
        fn description(&self) -> &str {
            &self.description
        }
    }

    struct CountdownGenerator;

    impl StepGenerator for CountdownGenerator {
        type Params = u32;
        type Payload = Countdown;
        const NAME: &'static str = "countdown";

        fn generate(params: &u32) -> StepSequence<Countdown> {
            let mut recorder = StepRecorder::new();
            for remaining in (0..=*params).rev() {
                recorder.record(Countdown {
                    remaining,
                    description: format!("{remaining} left"),
                });
            }
            recorder.seal_or(|| Countdown {
                remaining: 0,
                description: "done".to_string(),
            })
        }
    }

    #[test]
    fn test_generator_contract() {
        let seq = CountdownGenerator::generate(&3);
        assert_eq!(seq.len(), 4);
        assert_eq!(
            seq.terminal().map(|s| s.payload().description()),
            Some("0 left")
        );
        assert!(CountdownGenerator::verify_determinism(&3));
        assert_eq!(CountdownGenerator::NAME, "countdown");
    }
}
