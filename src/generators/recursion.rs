//! Recursive functions: factorial, Fibonacci, `sum(1..=n)`, the sum of an
//! array and binary search.
//!
//! Every invocation contributes one descent step (its frame is pushed) and
//! every return contributes one ascent step (its frame is popped), in
//! execution order. Each payload carries the call stack as it stands after
//! that push or pop, so a stack view rendered from any single step is exact.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::search::SearchParams;
use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Largest `n` whose factorial stays within `u64` range.
pub const MAX_FACTORIAL_N: i64 = 20;

/// Largest Fibonacci input; the call tree doubles with every increment.
pub const MAX_FIBONACCI_N: i64 = 15;

/// Largest input for the recursive sum.
pub const MAX_SUM_N: i64 = 100;

/// Longest array accepted by [`SumArray`]; recursion depth equals its length.
pub const MAX_SUM_ARRAY_LEN: usize = 100;

/// Input for the recursive numeric generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursionParams {
    /// Argument of the outermost call.
    pub n: i64,
}

impl RecursionParams {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(n: i64) -> Self {
        Self { n }
    }
}

/// Input for [`SumArray`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayParams {
    /// Values to add up.
    pub array: Vec<i64>,
}

impl ArrayParams {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(array: impl Into<Vec<i64>>) -> Self {
        Self {
            array: array.into(),
        }
    }
}

/// Which half of the call the step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Entering a smaller subproblem.
    Descent,
    /// Returning a computed value to the caller.
    Ascent,
    /// Input was outside the function's domain; nothing was evaluated.
    Rejected,
}

/// One activation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Function name.
    pub function: String,
    /// Scalar arguments of this call; array arguments are left out.
    pub arguments: Vec<i64>,
    /// The call as written, e.g. `sum_array(arr, 3)`.
    pub call: String,
    /// Distance from the outermost call.
    pub depth: usize,
    /// Whether this call hits the base case.
    pub is_base_case: bool,
    /// Value returned, once known.
    pub return_value: Option<i128>,
}

/// Render data for one call or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursionPayload {
    /// Descent, ascent or rejected input.
    pub phase: Phase,
    /// Frame being entered or returned from.
    pub frame: Option<Frame>,
    /// Live frames, outermost first.
    pub call_stack: Vec<Frame>,
    /// Final answer, present once the outermost call has returned.
    pub result: Option<i128>,
    /// Narration.
    pub description: String,
}

impl RecursionPayload {
    fn rejected(description: String) -> Self {
        Self {
            phase: Phase::Rejected,
            frame: None,
            call_stack: Vec::new(),
            result: None,
            description,
        }
    }
}

impl Narrated for RecursionPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// Records push/pop steps while a recursive function runs.
struct CallTrace {
    function: &'static str,
    stack: Vec<Frame>,
    recorder: StepRecorder<RecursionPayload>,
}

impl CallTrace {
    fn new(function: &'static str) -> Self {
        Self {
            function,
            stack: Vec::new(),
            recorder: StepRecorder::new(),
        }
    }

    fn enter(&mut self, argument: i64, is_base_case: bool) {
        let call = format!("{}({argument})", self.function);
        let description = if is_base_case {
            format!("Call {call}: base case")
        } else {
            format!("Call {call}")
        };
        self.enter_call(vec![argument], call, is_base_case, description);
    }

    fn enter_call(
        &mut self,
        arguments: Vec<i64>,
        call: String,
        is_base_case: bool,
        description: String,
    ) {
        let frame = Frame {
            function: self.function.to_string(),
            arguments,
            call,
            depth: self.stack.len(),
            is_base_case,
            return_value: None,
        };
        self.stack.push(frame.clone());
        self.recorder.record(RecursionPayload {
            phase: Phase::Descent,
            frame: Some(frame),
            call_stack: self.stack.clone(),
            result: None,
            description,
        });
    }

    fn leave(&mut self, value: i128, description: String) {
        let Some(mut frame) = self.stack.pop() else {
            return;
        };
        frame.return_value = Some(value);
        let result = self.stack.is_empty().then_some(value);
        self.recorder.record(RecursionPayload {
            phase: Phase::Ascent,
            frame: Some(frame),
            call_stack: self.stack.clone(),
            result,
            description,
        });
    }

    fn finish(self) -> StepSequence<RecursionPayload> {
        let function = self.function;
        self.recorder.seal_or(|| {
            RecursionPayload::rejected(format!("{function}: no calls were made"))
        })
    }
}

fn domain_error(function: &str, n: i64, max: i64) -> Option<String> {
    if n < 0 {
        Some(format!("{function}({n}) is undefined for negative input"))
    } else if n > max {
        Some(format!(
            "{function}({n}) exceeds the supported maximum input of {max}"
        ))
    } else {
        None
    }
}

fn rejected(reason: String) -> StepSequence<RecursionPayload> {
    warn!(%reason, "recursion input rejected");
    StepSequence::single(RecursionPayload::rejected(reason))
}

/// `factorial(n) = n * factorial(n - 1)`, base case `n <= 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Factorial;

impl StepGenerator for Factorial {
    type Params = RecursionParams;
    type Payload = RecursionPayload;
    const NAME: &'static str = "factorial";

    fn generate(params: &RecursionParams) -> StepSequence<RecursionPayload> {
        if let Some(reason) = domain_error(Self::NAME, params.n, MAX_FACTORIAL_N) {
            return rejected(reason);
        }
        let mut trace = CallTrace::new(Self::NAME);
        factorial(&mut trace, params.n);
        trace.finish()
    }
}

fn factorial(trace: &mut CallTrace, n: i64) -> i128 {
    let is_base_case = n <= 1;
    trace.enter(n, is_base_case);
    if is_base_case {
        trace.leave(1, format!("Return 1 from factorial({n}) (base case)"));
        return 1;
    }
    let child = factorial(trace, n - 1);
    let value = i128::from(n) * child;
    trace.leave(
        value,
        format!("Return {n} * {child} = {value} from factorial({n})"),
    );
    value
}

/// `fib(n) = fib(n - 1) + fib(n - 2)`, base case `n <= 1` returns `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fibonacci;

impl StepGenerator for Fibonacci {
    type Params = RecursionParams;
    type Payload = RecursionPayload;
    const NAME: &'static str = "fibonacci";

    fn generate(params: &RecursionParams) -> StepSequence<RecursionPayload> {
        if let Some(reason) = domain_error(Self::NAME, params.n, MAX_FIBONACCI_N) {
            return rejected(reason);
        }
        let mut trace = CallTrace::new("fib");
        fibonacci(&mut trace, params.n);
        trace.finish()
    }
}

fn fibonacci(trace: &mut CallTrace, n: i64) -> i128 {
    let is_base_case = n <= 1;
    trace.enter(n, is_base_case);
    if is_base_case {
        let value = i128::from(n);
        trace.leave(value, format!("Return {value} from fib({n}) (base case)"));
        return value;
    }
    let left = fibonacci(trace, n - 1);
    let right = fibonacci(trace, n - 2);
    let value = left + right;
    trace.leave(
        value,
        format!("Return {left} + {right} = {value} from fib({n})"),
    );
    value
}

/// `sum(n) = n + sum(n - 1)`, base case `sum(0) = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveSum;

impl StepGenerator for RecursiveSum {
    type Params = RecursionParams;
    type Payload = RecursionPayload;
    const NAME: &'static str = "sum_recursive";

    fn generate(params: &RecursionParams) -> StepSequence<RecursionPayload> {
        if let Some(reason) = domain_error("sum", params.n, MAX_SUM_N) {
            return rejected(reason);
        }
        let mut trace = CallTrace::new("sum");
        recursive_sum(&mut trace, params.n);
        trace.finish()
    }
}

fn recursive_sum(trace: &mut CallTrace, n: i64) -> i128 {
    let is_base_case = n == 0;
    trace.enter(n, is_base_case);
    if is_base_case {
        trace.leave(0, "Return 0 from sum(0) (base case)".to_string());
        return 0;
    }
    let rest = recursive_sum(trace, n - 1);
    let value = i128::from(n) + rest;
    trace.leave(value, format!("Return {n} + {rest} = {value} from sum({n})"));
    value
}

/// `sum_array(arr, n) = arr[n - 1] + sum_array(arr, n - 1)`, base case
/// `n == 0` returns 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumArray;

impl StepGenerator for SumArray {
    type Params = ArrayParams;
    type Payload = RecursionPayload;
    const NAME: &'static str = "sum_array";

    fn generate(params: &ArrayParams) -> StepSequence<RecursionPayload> {
        let len = params.array.len();
        if len > MAX_SUM_ARRAY_LEN {
            return rejected(format!(
                "sum_array over {len} values exceeds the supported maximum of {MAX_SUM_ARRAY_LEN}"
            ));
        }
        let mut trace = CallTrace::new(Self::NAME);
        sum_array(&mut trace, &params.array, len);
        trace.finish()
    }
}

fn sum_array(trace: &mut CallTrace, array: &[i64], n: usize) -> i128 {
    let call = format!("sum_array(arr, {n})");
    let arguments = vec![i64::try_from(n).unwrap_or(i64::MAX)];
    let Some(last) = n.checked_sub(1) else {
        trace.enter_call(arguments, call.clone(), true, format!("Call {call}: base case"));
        trace.leave(0, format!("Return 0 from {call} (base case)"));
        return 0;
    };
    let element = array[last];
    trace.enter_call(
        arguments,
        call.clone(),
        false,
        format!("Call {call}: arr[{last}] = {element}"),
    );
    let rest = sum_array(trace, array, last);
    let value = i128::from(element) + rest;
    trace.leave(value, format!("Return {element} + {rest} = {value} from {call}"));
    value
}

/// Binary search written as recursion over `[left, right]`.
///
/// Runs on a sorted copy of the input. Returns the index of the target, or
/// `-1` once the range is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveBinarySearch;

impl StepGenerator for RecursiveBinarySearch {
    type Params = SearchParams;
    type Payload = RecursionPayload;
    const NAME: &'static str = "binary_search_recursive";

    fn generate(params: &SearchParams) -> StepSequence<RecursionPayload> {
        let mut sorted = params.array.clone();
        sorted.sort_unstable();
        let right = i64::try_from(sorted.len()).unwrap_or(i64::MAX) - 1;
        let mut trace = CallTrace::new("binary_search");
        binary_search(&mut trace, &sorted, params.target, 0, right);
        trace.finish()
    }
}

fn binary_search(trace: &mut CallTrace, array: &[i64], target: i64, left: i64, right: i64) -> i128 {
    let call = format!("binary_search(arr, {left}, {right})");
    let arguments = vec![left, right];
    if left > right {
        trace.enter_call(
            arguments,
            call.clone(),
            true,
            format!("Call {call}: empty range, base case"),
        );
        trace.leave(-1, format!("Return -1 from {call}: {target} not found"));
        return -1;
    }

    let mid = left + (right - left) / 2;
    let value = usize::try_from(mid).ok().and_then(|i| array.get(i)).copied();
    let Some(value) = value else {
        return -1;
    };

    if value == target {
        trace.enter_call(
            arguments,
            call.clone(),
            true,
            format!("Call {call}: mid = {mid}, arr[{mid}] = {value} == {target}, base case"),
        );
        trace.leave(i128::from(mid), format!("Return {mid} from {call}: found"));
        return i128::from(mid);
    }

    let (next_left, next_right, relation) = if value < target {
        (mid + 1, right, '<')
    } else {
        (left, mid - 1, '>')
    };
    trace.enter_call(
        arguments,
        call.clone(),
        false,
        format!(
            "Call {call}: mid = {mid}, arr[{mid}] = {value} {relation} {target}, recurse on [{next_left}, {next_right}]"
        ),
    );
    let index = binary_search(trace, array, target, next_left, next_right);
    trace.leave(index, format!("Return {index} from {call}"));
    index
}
