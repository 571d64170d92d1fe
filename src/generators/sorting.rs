//! Comparison sorts: bubble, selection and insertion.
//!
//! All three work on a private copy of the input and snapshot the whole array
//! on every step, so each step renders on its own.

use serde::{Deserialize, Serialize};

use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Input for the sorting generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParams {
    /// Values to sort (ascending).
    pub array: Vec<i64>,
}

impl SortParams {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(array: impl Into<Vec<i64>>) -> Self {
        Self {
            array: array.into(),
        }
    }
}

/// What the step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAction {
    /// Untouched input.
    Initial,
    /// Two elements are compared.
    Compare,
    /// Two elements were exchanged.
    Swap,
    /// A pass over the unsorted region finished.
    PassComplete,
    /// Selection sort found a smaller candidate.
    NewMinimum,
    /// Insertion sort picked the next key.
    SelectKey,
    /// Insertion sort moved an element one slot right.
    Shift,
    /// Insertion sort dropped the key into its slot.
    Insert,
    /// The array is sorted.
    Sorted,
}

/// Render data for one sorting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPayload {
    /// Array contents at this instant.
    pub array: Vec<i64>,
    /// What happened.
    pub action: SortAction,
    /// Indices involved in this step.
    pub highlighted: Vec<usize>,
    /// Indices inside the sorted region.
    pub sorted: Vec<usize>,
    /// 1-based pass number, 0 before the first pass.
    pub pass: usize,
    /// Comparisons made so far.
    pub comparisons: usize,
    /// Swaps or shifts made so far.
    pub writes: usize,
    /// Narration.
    pub description: String,
}

impl Narrated for SortPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

struct SortTrace {
    recorder: StepRecorder<SortPayload>,
    comparisons: usize,
    writes: usize,
}

impl SortTrace {
    fn new() -> Self {
        Self {
            recorder: StepRecorder::new(),
            comparisons: 0,
            writes: 0,
        }
    }

    fn snap(
        &mut self,
        array: &[i64],
        action: SortAction,
        highlighted: Vec<usize>,
        sorted: impl IntoIterator<Item = usize>,
        pass: usize,
        description: String,
    ) {
        self.recorder.record(SortPayload {
            array: array.to_vec(),
            action,
            highlighted,
            sorted: sorted.into_iter().collect(),
            pass,
            comparisons: self.comparisons,
            writes: self.writes,
            description,
        });
    }

    fn finish(self, array: &[i64], pass: usize) -> StepSequence<SortPayload> {
        let Self {
            recorder,
            comparisons,
            writes,
        } = self;
        recorder.finish(SortPayload {
            array: array.to_vec(),
            action: SortAction::Sorted,
            highlighted: Vec::new(),
            sorted: (0..array.len()).collect(),
            pass,
            comparisons,
            writes,
            description: format!(
                "Array is now sorted: {comparisons} comparisons, {writes} writes"
            ),
        })
    }
}

fn trivially_sorted(array: &[i64]) -> Option<StepSequence<SortPayload>> {
    (array.len() <= 1).then(|| {
        StepSequence::single(SortPayload {
            array: array.to_vec(),
            action: SortAction::Sorted,
            highlighted: Vec::new(),
            sorted: (0..array.len()).collect(),
            pass: 0,
            comparisons: 0,
            writes: 0,
            description: format!(
                "An array of {} element(s) is already sorted",
                array.len()
            ),
        })
    })
}

/// Repeatedly swap adjacent out-of-order pairs; the largest value bubbles to
/// the end of each pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl StepGenerator for BubbleSort {
    type Params = SortParams;
    type Payload = SortPayload;
    const NAME: &'static str = "bubble_sort";

    fn generate(params: &SortParams) -> StepSequence<SortPayload> {
        if let Some(seq) = trivially_sorted(&params.array) {
            return seq;
        }
        let mut arr = params.array.clone();
        let n = arr.len();
        let mut trace = SortTrace::new();
        trace.snap(&arr, SortAction::Initial, Vec::new(), [], 0, "Initial array".to_string());

        for i in 0..n - 1 {
            let pass = i + 1;
            for j in 0..n - i - 1 {
                trace.comparisons += 1;
                trace.snap(
                    &arr,
                    SortAction::Compare,
                    vec![j, j + 1],
                    n - i..n,
                    pass,
                    format!("Pass {pass}: comparing {} and {}", arr[j], arr[j + 1]),
                );
                if arr[j] > arr[j + 1] {
                    arr.swap(j, j + 1);
                    trace.writes += 1;
                    trace.snap(
                        &arr,
                        SortAction::Swap,
                        vec![j, j + 1],
                        n - i..n,
                        pass,
                        format!("Pass {pass}: swapped {} and {}", arr[j + 1], arr[j]),
                    );
                }
            }
            trace.snap(
                &arr,
                SortAction::PassComplete,
                Vec::new(),
                n - i - 1..n,
                pass,
                format!(
                    "Pass {pass} complete. Largest element {} is now in position",
                    arr[n - i - 1]
                ),
            );
        }

        trace.finish(&arr, n - 1)
    }
}

/// Select the minimum of the unsorted region and swap it to the front.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSort;

impl StepGenerator for SelectionSort {
    type Params = SortParams;
    type Payload = SortPayload;
    const NAME: &'static str = "selection_sort";

    fn generate(params: &SortParams) -> StepSequence<SortPayload> {
        if let Some(seq) = trivially_sorted(&params.array) {
            return seq;
        }
        let mut arr = params.array.clone();
        let n = arr.len();
        let mut trace = SortTrace::new();
        trace.snap(&arr, SortAction::Initial, Vec::new(), [], 0, "Initial array".to_string());

        for i in 0..n - 1 {
            let pass = i + 1;
            let mut min = i;
            for j in i + 1..n {
                trace.comparisons += 1;
                trace.snap(
                    &arr,
                    SortAction::Compare,
                    vec![min, j],
                    0..i,
                    pass,
                    format!(
                        "Pass {pass}: compare current minimum {} with {}",
                        arr[min], arr[j]
                    ),
                );
                if arr[j] < arr[min] {
                    min = j;
                    trace.snap(
                        &arr,
                        SortAction::NewMinimum,
                        vec![min],
                        0..i,
                        pass,
                        format!("Found minimum {} at index {min}", arr[min]),
                    );
                }
            }
            if min != i {
                arr.swap(i, min);
                trace.writes += 1;
                trace.snap(
                    &arr,
                    SortAction::Swap,
                    vec![i, min],
                    0..i,
                    pass,
                    format!("Swapped {} with {}", arr[i], arr[min]),
                );
            }
            trace.snap(
                &arr,
                SortAction::PassComplete,
                Vec::new(),
                0..=i,
                pass,
                format!("Pass {pass} complete. {} is in position {i}", arr[i]),
            );
        }

        trace.finish(&arr, n - 1)
    }
}

/// Grow a sorted prefix by inserting one key at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl StepGenerator for InsertionSort {
    type Params = SortParams;
    type Payload = SortPayload;
    const NAME: &'static str = "insertion_sort";

    fn generate(params: &SortParams) -> StepSequence<SortPayload> {
        if let Some(seq) = trivially_sorted(&params.array) {
            return seq;
        }
        let mut arr = params.array.clone();
        let n = arr.len();
        let mut trace = SortTrace::new();
        trace.snap(
            &arr,
            SortAction::Initial,
            Vec::new(),
            [0],
            0,
            "Initial array. First element is considered sorted".to_string(),
        );

        for i in 1..n {
            let key = arr[i];
            trace.snap(
                &arr,
                SortAction::SelectKey,
                vec![i],
                0..i,
                i,
                format!("Select key element {key} at position {i}"),
            );
            let mut j = i;
            while j > 0 {
                trace.comparisons += 1;
                if arr[j - 1] <= key {
                    break;
                }
                trace.snap(
                    &arr,
                    SortAction::Compare,
                    vec![j - 1, j],
                    0..i,
                    i,
                    format!(
                        "Compare {key} with {}. {} > {key}, so shift {} right",
                        arr[j - 1],
                        arr[j - 1],
                        arr[j - 1]
                    ),
                );
                arr[j] = arr[j - 1];
                trace.writes += 1;
                trace.snap(
                    &arr,
                    SortAction::Shift,
                    vec![j],
                    0..i,
                    i,
                    format!("Shifted {} to position {j}", arr[j]),
                );
                j -= 1;
            }
            arr[j] = key;
            trace.snap(
                &arr,
                SortAction::Insert,
                vec![j],
                0..=i,
                i,
                format!(
                    "Inserted {key} at position {j}. Sorted portion now includes first {} elements",
                    i + 1
                ),
            );
        }

        trace.finish(&arr, n - 1)
    }
}
