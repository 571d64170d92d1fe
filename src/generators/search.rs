//! Linear and binary search.
//!
//! One step per comparison. The step that finds the target, or the one that
//! exhausts the input, is terminal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Input for both searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Values to search.
    pub array: Vec<i64>,
    /// Value to look for.
    pub target: i64,
}

impl SearchParams {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(array: impl Into<Vec<i64>>, target: i64) -> Self {
        Self {
            array: array.into(),
            target,
        }
    }
}

/// Where the search stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SearchOutcome {
    /// More comparisons follow.
    InProgress,
    /// Target located.
    Found {
        /// Index of the match.
        index: usize,
    },
    /// Every candidate was examined without a match.
    NotFound,
    /// There was nothing to search.
    EmptyInput,
}

impl SearchOutcome {
    /// Whether the search has finished.
    #[must_use]
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Render data for one linear-search comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearSearchPayload {
    /// Input values.
    pub array: Vec<i64>,
    /// Target value.
    pub target: i64,
    /// Index being compared.
    pub current: Option<usize>,
    /// Comparisons made so far, this one included.
    pub comparisons: usize,
    /// Whether `array[current] == target`.
    pub is_match: bool,
    /// Search status after this comparison.
    pub outcome: SearchOutcome,
    /// Narration.
    pub description: String,
}

impl Narrated for LinearSearchPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// Scan left to right until the target is found.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSearch;

impl StepGenerator for LinearSearch {
    type Params = SearchParams;
    type Payload = LinearSearchPayload;
    const NAME: &'static str = "linear_search";

    fn generate(params: &SearchParams) -> StepSequence<LinearSearchPayload> {
        let SearchParams { array, target } = params;
        let target = *target;
        let mut recorder = StepRecorder::with_capacity(array.len());

        for (index, &value) in array.iter().enumerate() {
            let comparisons = index + 1;
            let is_match = value == target;
            let (outcome, description) = if is_match {
                (
                    SearchOutcome::Found { index },
                    format!("Check index {index}: {value} == {target}. Found after {comparisons} comparisons"),
                )
            } else if comparisons == array.len() {
                (
                    SearchOutcome::NotFound,
                    format!("Check index {index}: {value} != {target}. {target} is not in the array"),
                )
            } else {
                (
                    SearchOutcome::InProgress,
                    format!("Check index {index}: {value} != {target}, move on"),
                )
            };
            recorder.record(LinearSearchPayload {
                array: array.clone(),
                target,
                current: Some(index),
                comparisons,
                is_match,
                outcome,
                description,
            });
            if is_match {
                break;
            }
        }

        recorder.seal_or(|| {
            debug!("linear search over empty input");
            LinearSearchPayload {
                array: Vec::new(),
                target,
                current: None,
                comparisons: 0,
                is_match: false,
                outcome: SearchOutcome::EmptyInput,
                description: format!("Array is empty: {target} cannot be found"),
            }
        })
    }
}

/// Render data for one binary-search probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearchPayload {
    /// Values in ascending order.
    pub array: Vec<i64>,
    /// Target value.
    pub target: i64,
    /// Inclusive range examined by this probe.
    pub range: Option<(usize, usize)>,
    /// Probed index.
    pub mid: Option<usize>,
    /// Inclusive range left to search afterwards.
    pub next_range: Option<(usize, usize)>,
    /// Comparisons made so far, this one included.
    pub comparisons: usize,
    /// Whether `array[mid] == target`.
    pub is_match: bool,
    /// Search status after this probe.
    pub outcome: SearchOutcome,
    /// Whether the caller's array had to be sorted first.
    pub reordered: bool,
    /// Narration.
    pub description: String,
}

impl Narrated for BinarySearchPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// Halve the candidate range on every comparison.
///
/// Runs on a sorted copy of the input; the caller's array is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch;

impl StepGenerator for BinarySearch {
    type Params = SearchParams;
    type Payload = BinarySearchPayload;
    const NAME: &'static str = "binary_search";

    fn generate(params: &SearchParams) -> StepSequence<BinarySearchPayload> {
        let target = params.target;
        let mut sorted = params.array.clone();
        sorted.sort_unstable();
        let reordered = sorted != params.array;

        let Some(mut high) = sorted.len().checked_sub(1) else {
            return StepSequence::single(BinarySearchPayload {
                array: sorted,
                target,
                range: None,
                mid: None,
                next_range: None,
                comparisons: 0,
                is_match: false,
                outcome: SearchOutcome::EmptyInput,
                reordered,
                description: format!("Array is empty: {target} cannot be found"),
            });
        };

        let mut low = 0usize;
        let mut comparisons = 0usize;
        let mut recorder = StepRecorder::new();

        loop {
            let mid = low + (high - low) / 2;
            let value = sorted[mid];
            comparisons += 1;

            let (next_range, outcome, description) = if value == target {
                (
                    None,
                    SearchOutcome::Found { index: mid },
                    format!("Search [{low}, {high}], mid = {mid}: {value} == {target}. Found"),
                )
            } else if value < target {
                let next = (mid < high).then(|| (mid + 1, high));
                let description = match next {
                    Some((l, h)) => format!(
                        "Search [{low}, {high}], mid = {mid}: {value} < {target}, continue in [{l}, {h}]"
                    ),
                    None => format!(
                        "Search [{low}, {high}], mid = {mid}: {value} < {target}, range exhausted. Not found"
                    ),
                };
                (next, Self::status(next), description)
            } else {
                let next = (mid > low).then(|| (low, mid - 1));
                let description = match next {
                    Some((l, h)) => format!(
                        "Search [{low}, {high}], mid = {mid}: {value} > {target}, continue in [{l}, {h}]"
                    ),
                    None => format!(
                        "Search [{low}, {high}], mid = {mid}: {value} > {target}, range exhausted. Not found"
                    ),
                };
                (next, Self::status(next), description)
            };

            recorder.record(BinarySearchPayload {
                array: sorted.clone(),
                target,
                range: Some((low, high)),
                mid: Some(mid),
                next_range,
                comparisons,
                is_match: value == target,
                outcome,
                reordered,
                description,
            });

            match next_range {
                Some((l, h)) => {
                    low = l;
                    high = h;
                }
                None => break,
            }
        }

        recorder.seal_or(|| BinarySearchPayload {
            array: Vec::new(),
            target,
            range: None,
            mid: None,
            next_range: None,
            comparisons,
            is_match: false,
            outcome: SearchOutcome::NotFound,
            reordered,
            description: format!("{target} is not in the array"),
        })
    }
}

impl BinarySearch {
    const fn status(next: Option<(usize, usize)>) -> SearchOutcome {
        match next {
            Some(_) => SearchOutcome::InProgress,
            None => SearchOutcome::NotFound,
        }
    }
}
