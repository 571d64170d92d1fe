//! Iterative `sum(1..=n)`, the loop counterpart of
//! [`RecursiveSum`](super::recursion::RecursiveSum).

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::recursion::{RecursionParams, MAX_SUM_N};
use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Render data for one loop iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationPayload {
    /// Loop variable, `None` before the loop and after it.
    pub iteration: Option<i64>,
    /// Running total.
    pub total: i64,
    /// Final answer, present on the result step.
    pub result: Option<i64>,
    /// Narration.
    pub description: String,
}

impl Narrated for IterationPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// `total = 0; for i in 1..=n { total += i }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeSum;

impl StepGenerator for IterativeSum {
    type Params = RecursionParams;
    type Payload = IterationPayload;
    const NAME: &'static str = "sum_iterative";

    fn generate(params: &RecursionParams) -> StepSequence<IterationPayload> {
        let n = params.n;
        if !(0..=MAX_SUM_N).contains(&n) {
            warn!(n, "iterative sum input rejected");
            return StepSequence::single(IterationPayload {
                iteration: None,
                total: 0,
                result: None,
                description: format!("sum({n}) requires 0 <= n <= {MAX_SUM_N}"),
            });
        }

        let mut recorder = StepRecorder::with_capacity(n.unsigned_abs() as usize + 2);
        recorder.record(IterationPayload {
            iteration: None,
            total: 0,
            result: None,
            description: "Initialize: total = 0".to_string(),
        });

        let mut total = 0;
        for i in 1..=n {
            total += i;
            recorder.record(IterationPayload {
                iteration: Some(i),
                total,
                result: None,
                description: format!("Loop {i}: total += {i} = {total}"),
            });
        }

        recorder.finish(IterationPayload {
            iteration: None,
            total,
            result: Some(total),
            description: format!("Result: {total}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_five() {
        let seq = IterativeSum::generate(&RecursionParams::new(5));
        // init + 5 iterations + result
        assert_eq!(seq.len(), 7);
        let terminal = seq.terminal().expect("terminal");
        assert!(terminal.is_terminal());
        assert_eq!(terminal.payload().result, Some(15));
        let totals: Vec<i64> = seq.payloads().map(|p| p.total).collect();
        assert_eq!(totals, vec![0, 1, 3, 6, 10, 15, 15]);
    }

    #[test]
    fn test_sum_zero() {
        let seq = IterativeSum::generate(&RecursionParams::new(0));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.terminal().and_then(|s| s.payload().result), Some(0));
    }

    #[test]
    fn test_sum_rejects_negative() {
        let seq = IterativeSum::generate(&RecursionParams::new(-1));
        assert_eq!(seq.len(), 1);
        assert!(seq.terminal().is_some_and(|s| s.payload().result.is_none()));
    }

    #[test]
    fn test_matches_recursive_result() {
        use crate::generators::recursion::RecursiveSum;
        for n in 0..20 {
            let params = RecursionParams::new(n);
            let iterative = IterativeSum::generate(&params)
                .terminal()
                .and_then(|s| s.payload().result);
            let recursive = RecursiveSum::generate(&params)
                .terminal()
                .and_then(|s| s.payload().result);
            assert_eq!(iterative.map(i128::from), recursive, "n = {n}");
        }
    }
}
