//! Concrete step generators and the registry that selects them by name.
//!
//! Each family module exposes one or more [`StepGenerator`] implementations
//! with their own typed payload. [`AlgorithmSpec`] is the type-erased entry
//! point used by scenario files, the CLI and the terminal walkthrough: it
//! names an algorithm together with its parameters and produces a
//! [`StepSequence<Snapshot>`].

pub mod brute_force;
pub mod iteration;
pub mod recursion;
pub mod search;
pub mod sorting;
pub mod window;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Narrated, StepGenerator, StepSequence};
use crate::config::MAX_ARRAY_LEN;
use crate::error::{VizError, VizResult};

use brute_force::{PairSum, PairSumPayload};
use iteration::{IterationPayload, IterativeSum};
use recursion::{
    ArrayParams, Factorial, Fibonacci, Frame, RecursionParams, RecursionPayload,
    RecursiveBinarySearch, RecursiveSum, SumArray,
};
use search::{BinarySearch, BinarySearchPayload, LinearSearch, LinearSearchPayload, SearchParams};
use sorting::{BubbleSort, InsertionSort, SelectionSort, SortParams, SortPayload};
use window::{SlidingWindowMaxSum, WindowParams, WindowPayload};

/// Registry entry describing one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    /// Identifier accepted by [`AlgorithmSpec::from_parts`].
    pub name: &'static str,
    /// Family the generator belongs to.
    pub family: &'static str,
    /// Inputs the generator needs.
    pub parameters: &'static [&'static str],
    /// One-line summary.
    pub summary: &'static str,
}

/// Every available generator, in display order.
pub const ALGORITHMS: &[AlgorithmInfo] = &[
    AlgorithmInfo {
        name: Factorial::NAME,
        family: "recursion",
        parameters: &["n"],
        summary: "n! traced as calls and returns",
    },
    AlgorithmInfo {
        name: Fibonacci::NAME,
        family: "recursion",
        parameters: &["n"],
        summary: "fib(n) call tree in execution order",
    },
    AlgorithmInfo {
        name: RecursiveSum::NAME,
        family: "recursion",
        parameters: &["n"],
        summary: "sum(1..=n) as n + sum(n - 1)",
    },
    AlgorithmInfo {
        name: SumArray::NAME,
        family: "recursion",
        parameters: &["array"],
        summary: "arr[n - 1] + sum_array(arr, n - 1)",
    },
    AlgorithmInfo {
        name: RecursiveBinarySearch::NAME,
        family: "recursion",
        parameters: &["array", "target"],
        summary: "binary search as calls over [left, right]",
    },
    AlgorithmInfo {
        name: IterativeSum::NAME,
        family: "iteration",
        parameters: &["n"],
        summary: "sum(1..=n) with a loop",
    },
    AlgorithmInfo {
        name: LinearSearch::NAME,
        family: "search",
        parameters: &["array", "target"],
        summary: "scan left to right for target",
    },
    AlgorithmInfo {
        name: BinarySearch::NAME,
        family: "search",
        parameters: &["array", "target"],
        summary: "halve a sorted range until target is found",
    },
    AlgorithmInfo {
        name: PairSum::NAME,
        family: "brute_force",
        parameters: &["array", "target"],
        summary: "check every pair for a given sum",
    },
    AlgorithmInfo {
        name: BubbleSort::NAME,
        family: "sorting",
        parameters: &["array"],
        summary: "swap adjacent out-of-order pairs",
    },
    AlgorithmInfo {
        name: SelectionSort::NAME,
        family: "sorting",
        parameters: &["array"],
        summary: "move the minimum of the rest to the front",
    },
    AlgorithmInfo {
        name: InsertionSort::NAME,
        family: "sorting",
        parameters: &["array"],
        summary: "insert each key into the sorted prefix",
    },
    AlgorithmInfo {
        name: SlidingWindowMaxSum::NAME,
        family: "window",
        parameters: &["array", "window"],
        summary: "maximum sum of k consecutive values",
    },
];

/// Look up a registry entry by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static AlgorithmInfo> {
    ALGORITHMS.iter().find(|info| info.name == name)
}

/// An algorithm together with its parameters.
///
/// Serialized with an internal `kind` tag so scenario files read naturally:
///
/// ```yaml
/// kind: linear_search
/// array: [10, 25, 30, 42, 55]
/// target: 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgorithmSpec {
    /// See [`Factorial`].
    Factorial {
        /// Argument.
        n: i64,
    },
    /// See [`Fibonacci`].
    Fibonacci {
        /// Argument.
        n: i64,
    },
    /// See [`RecursiveSum`].
    SumRecursive {
        /// Upper bound.
        n: i64,
    },
    /// See [`SumArray`].
    SumArray {
        /// Values to add up.
        array: Vec<i64>,
    },
    /// See [`RecursiveBinarySearch`].
    BinarySearchRecursive {
        /// Values to search; sorted internally.
        array: Vec<i64>,
        /// Value to find.
        target: i64,
    },
    /// See [`IterativeSum`].
    SumIterative {
        /// Upper bound.
        n: i64,
    },
    /// See [`LinearSearch`].
    LinearSearch {
        /// Values to search.
        array: Vec<i64>,
        /// Value to find.
        target: i64,
    },
    /// See [`BinarySearch`].
    BinarySearch {
        /// Values to search; sorted internally.
        array: Vec<i64>,
        /// Value to find.
        target: i64,
    },
    /// See [`PairSum`].
    PairSum {
        /// Values to pair.
        array: Vec<i64>,
        /// Sum to find.
        target: i64,
    },
    /// See [`BubbleSort`].
    BubbleSort {
        /// Values to sort.
        array: Vec<i64>,
    },
    /// See [`SelectionSort`].
    SelectionSort {
        /// Values to sort.
        array: Vec<i64>,
    },
    /// See [`InsertionSort`].
    InsertionSort {
        /// Values to sort.
        array: Vec<i64>,
    },
    /// See [`SlidingWindowMaxSum`].
    SlidingWindowMaxSum {
        /// Values to scan.
        array: Vec<i64>,
        /// Window length.
        window_size: usize,
    },
}

/// Loosely typed inputs, as collected from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmInputs {
    /// `--array`
    pub array: Option<Vec<i64>>,
    /// `--target`
    pub target: Option<i64>,
    /// `--n`
    pub n: Option<i64>,
    /// `--window`
    pub window: Option<usize>,
}

impl AlgorithmSpec {
    /// Build an `AlgorithmSpec` from an algorithm name and loose inputs.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::UnknownAlgorithm`] for unregistered names,
    /// [`VizError::MissingParameter`] when a required input is absent and
    /// [`VizError::InvalidParameter`] for arrays longer than
    /// [`MAX_ARRAY_LEN`].
    pub fn from_parts(name: &str, inputs: &AlgorithmInputs) -> VizResult<Self> {
        let info = find(name).ok_or_else(|| VizError::UnknownAlgorithm(name.to_string()))?;
        let n = || inputs.n.ok_or_else(|| VizError::missing(info.name, "n"));
        let array = || {
            inputs
                .array
                .clone()
                .ok_or_else(|| VizError::missing(info.name, "array"))
        };
        let target = || inputs.target.ok_or_else(|| VizError::missing(info.name, "target"));

        let spec = match info.name {
            "factorial" => Self::Factorial { n: n()? },
            "fibonacci" => Self::Fibonacci { n: n()? },
            "sum_recursive" => Self::SumRecursive { n: n()? },
            "sum_array" => Self::SumArray { array: array()? },
            "binary_search_recursive" => Self::BinarySearchRecursive {
                array: array()?,
                target: target()?,
            },
            "sum_iterative" => Self::SumIterative { n: n()? },
            "linear_search" => Self::LinearSearch {
                array: array()?,
                target: target()?,
            },
            "binary_search" => Self::BinarySearch {
                array: array()?,
                target: target()?,
            },
            "pair_sum" => Self::PairSum {
                array: array()?,
                target: target()?,
            },
            "bubble_sort" => Self::BubbleSort { array: array()? },
            "selection_sort" => Self::SelectionSort { array: array()? },
            "insertion_sort" => Self::InsertionSort { array: array()? },
            "sliding_window_max_sum" => Self::SlidingWindowMaxSum {
                array: array()?,
                window_size: inputs
                    .window
                    .ok_or_else(|| VizError::missing(info.name, "window"))?,
            },
            other => return Err(VizError::UnknownAlgorithm(other.to_string())),
        };
        spec.check_array_len()?;
        Ok(spec)
    }

    /// Input array, for algorithms that take one.
    #[must_use]
    pub fn array(&self) -> Option<&[i64]> {
        match self {
            Self::SumArray { array }
            | Self::BinarySearchRecursive { array, .. }
            | Self::LinearSearch { array, .. }
            | Self::BinarySearch { array, .. }
            | Self::PairSum { array, .. }
            | Self::BubbleSort { array }
            | Self::SelectionSort { array }
            | Self::InsertionSort { array }
            | Self::SlidingWindowMaxSum { array, .. } => Some(array),
            Self::Factorial { .. }
            | Self::Fibonacci { .. }
            | Self::SumRecursive { .. }
            | Self::SumIterative { .. } => None,
        }
    }

    /// Reject arrays longer than [`MAX_ARRAY_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidParameter`] naming the array.
    pub fn check_array_len(&self) -> VizResult<()> {
        let len = self.array().map_or(0, <[i64]>::len);
        if len > MAX_ARRAY_LEN {
            return Err(VizError::invalid(
                "array",
                format!(
                    "{} got {len} values, at most {MAX_ARRAY_LEN} are supported",
                    self.name()
                ),
            ));
        }
        Ok(())
    }

    /// Registry name of the selected generator.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Factorial { .. } => Factorial::NAME,
            Self::Fibonacci { .. } => Fibonacci::NAME,
            Self::SumRecursive { .. } => RecursiveSum::NAME,
            Self::SumArray { .. } => SumArray::NAME,
            Self::BinarySearchRecursive { .. } => RecursiveBinarySearch::NAME,
            Self::SumIterative { .. } => IterativeSum::NAME,
            Self::LinearSearch { .. } => LinearSearch::NAME,
            Self::BinarySearch { .. } => BinarySearch::NAME,
            Self::PairSum { .. } => PairSum::NAME,
            Self::BubbleSort { .. } => BubbleSort::NAME,
            Self::SelectionSort { .. } => SelectionSort::NAME,
            Self::InsertionSort { .. } => InsertionSort::NAME,
            Self::SlidingWindowMaxSum { .. } => SlidingWindowMaxSum::NAME,
        }
    }

    /// Run the selected generator.
    #[must_use]
    pub fn generate(&self) -> StepSequence<Snapshot> {
        let sequence = match self {
            Self::Factorial { n } => {
                Factorial::generate(&RecursionParams::new(*n)).map(Snapshot::recursion)
            }
            Self::Fibonacci { n } => {
                Fibonacci::generate(&RecursionParams::new(*n)).map(Snapshot::recursion)
            }
            Self::SumRecursive { n } => {
                RecursiveSum::generate(&RecursionParams::new(*n)).map(Snapshot::recursion)
            }
            Self::SumArray { array } => {
                SumArray::generate(&ArrayParams::new(array.clone())).map(Snapshot::recursion)
            }
            Self::BinarySearchRecursive { array, target } => {
                RecursiveBinarySearch::generate(&SearchParams::new(array.clone(), *target))
                    .map(Snapshot::recursion)
            }
            Self::SumIterative { n } => IterativeSum::generate(&RecursionParams::new(*n))
                .map(|p| Snapshot::Iteration(p.clone())),
            Self::LinearSearch { array, target } => {
                LinearSearch::generate(&SearchParams::new(array.clone(), *target))
                    .map(|p| Snapshot::LinearSearch(p.clone()))
            }
            Self::BinarySearch { array, target } => {
                BinarySearch::generate(&SearchParams::new(array.clone(), *target))
                    .map(|p| Snapshot::BinarySearch(p.clone()))
            }
            Self::PairSum { array, target } => {
                PairSum::generate(&SearchParams::new(array.clone(), *target))
                    .map(|p| Snapshot::PairSum(p.clone()))
            }
            Self::BubbleSort { array } => {
                BubbleSort::generate(&SortParams::new(array.clone())).map(Snapshot::sort)
            }
            Self::SelectionSort { array } => {
                SelectionSort::generate(&SortParams::new(array.clone())).map(Snapshot::sort)
            }
            Self::InsertionSort { array } => {
                InsertionSort::generate(&SortParams::new(array.clone())).map(Snapshot::sort)
            }
            Self::SlidingWindowMaxSum { array, window_size } => {
                SlidingWindowMaxSum::generate(&WindowParams::new(array.clone(), *window_size))
                    .map(|p| Snapshot::Window(p.clone()))
            }
        };
        debug!(algorithm = self.name(), steps = sequence.len(), "generated step sequence");
        sequence
    }

    /// Generate twice and compare.
    #[must_use]
    pub fn verify_determinism(&self) -> bool {
        self.generate() == self.generate()
    }
}

/// Payload of any registered generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Snapshot {
    /// Factorial, Fibonacci, recursive sums and recursive binary search.
    Recursion(RecursionPayload),
    /// Iterative sum.
    Iteration(IterationPayload),
    /// Linear search.
    LinearSearch(LinearSearchPayload),
    /// Binary search.
    BinarySearch(BinarySearchPayload),
    /// Pair sum.
    PairSum(PairSumPayload),
    /// Bubble, selection and insertion sort.
    Sort(SortPayload),
    /// Sliding window.
    Window(WindowPayload),
}

impl Snapshot {
    fn recursion(payload: &RecursionPayload) -> Self {
        Self::Recursion(payload.clone())
    }

    fn sort(payload: &SortPayload) -> Self {
        Self::Sort(payload.clone())
    }

    /// Array contents, for families that work on one.
    #[must_use]
    pub fn values(&self) -> Option<&[i64]> {
        match self {
            Self::LinearSearch(p) => Some(&p.array),
            Self::BinarySearch(p) => Some(&p.array),
            Self::PairSum(p) => Some(&p.array),
            Self::Sort(p) => Some(&p.array),
            Self::Window(p) => Some(&p.array),
            Self::Recursion(_) | Self::Iteration(_) => None,
        }
    }

    /// Indices to emphasize when drawing [`values`](Self::values).
    #[must_use]
    pub fn highlighted(&self) -> Vec<usize> {
        match self {
            Self::LinearSearch(p) => p.current.into_iter().collect(),
            Self::BinarySearch(p) => p.mid.into_iter().collect(),
            Self::PairSum(p) => p.pair.map(|(i, j)| vec![i, j]).unwrap_or_default(),
            Self::Sort(p) => p.highlighted.clone(),
            Self::Window(p) => p.span.map(|(lo, hi)| (lo..=hi).collect()).unwrap_or_default(),
            Self::Recursion(_) | Self::Iteration(_) => Vec::new(),
        }
    }

    /// Call stack, for recursive generators.
    #[must_use]
    pub fn call_stack(&self) -> Option<&[Frame]> {
        match self {
            Self::Recursion(p) => Some(&p.call_stack),
            _ => None,
        }
    }
}

impl Narrated for Snapshot {
    fn description(&self) -> &str {
        match self {
            Self::Recursion(p) => p.description(),
            Self::Iteration(p) => p.description(),
            Self::LinearSearch(p) => p.description(),
            Self::BinarySearch(p) => p.description(),
            Self::PairSum(p) => p.description(),
            Self::Sort(p) => p.description(),
            Self::Window(p) => p.description(),
        }
    }
}
