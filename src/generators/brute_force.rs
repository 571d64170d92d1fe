//! Brute-force pair sum: try every pair `(i, j)` with `i < j`.

use serde::{Deserialize, Serialize};

use super::search::{SearchOutcome, SearchParams};
use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Render data for one pair check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSumPayload {
    /// Input values.
    pub array: Vec<i64>,
    /// Sum being looked for.
    pub target: i64,
    /// Pair under test.
    pub pair: Option<(usize, usize)>,
    /// `array[i] + array[j]`, widened so it never overflows.
    pub current_sum: Option<i128>,
    /// Whether the pair sums to the target.
    pub is_match: bool,
    /// Pairs examined so far, this one included.
    pub operations: usize,
    /// Search status after this check. `Found` carries the first index.
    pub outcome: SearchOutcome,
    /// Narration.
    pub description: String,
}

impl Narrated for PairSumPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// Nested-loop pair search, O(n²) checks in the worst case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairSum;

impl StepGenerator for PairSum {
    type Params = SearchParams;
    type Payload = PairSumPayload;
    const NAME: &'static str = "pair_sum";

    fn generate(params: &SearchParams) -> StepSequence<PairSumPayload> {
        let SearchParams { array, target } = params;
        let target = *target;
        let n = array.len();
        let mut recorder = StepRecorder::with_capacity(n * n.saturating_sub(1) / 2);
        let mut operations = 0usize;

        'outer: for i in 0..n {
            for j in (i + 1)..n {
                operations += 1;
                let (a, b) = (array[i], array[j]);
                let sum = i128::from(a) + i128::from(b);
                let is_match = sum == i128::from(target);
                let is_last_pair = i + 2 == n && j + 1 == n;
                let (outcome, description) = if is_match {
                    (
                        SearchOutcome::Found { index: i },
                        format!("Pair ({i}, {j}): {a} + {b} = {sum}. Match after {operations} checks"),
                    )
                } else if is_last_pair {
                    (
                        SearchOutcome::NotFound,
                        format!("Pair ({i}, {j}): {a} + {b} = {sum} != {target}. No pair sums to {target}"),
                    )
                } else {
                    (
                        SearchOutcome::InProgress,
                        format!("Pair ({i}, {j}): {a} + {b} = {sum} != {target}"),
                    )
                };
                recorder.record(PairSumPayload {
                    array: array.clone(),
                    target,
                    pair: Some((i, j)),
                    current_sum: Some(sum),
                    is_match,
                    operations,
                    outcome,
                    description,
                });
                if is_match {
                    break 'outer;
                }
            }
        }

        recorder.seal_or(|| PairSumPayload {
            array: array.clone(),
            target,
            pair: None,
            current_sum: None,
            is_match: false,
            operations: 0,
            outcome: SearchOutcome::EmptyInput,
            description: format!("Need at least two values to form a pair, got {n}"),
        })
    }
}
