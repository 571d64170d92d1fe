//! Fixed-size sliding window: maximum sum of any `k` consecutive values.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{Narrated, StepGenerator, StepRecorder, StepSequence};

/// Input for [`SlidingWindowMaxSum`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    /// Values to scan.
    pub array: Vec<i64>,
    /// Window length `k`.
    pub window_size: usize,
}

impl WindowParams {
    /// Shorthand constructor.
    #[must_use]
    pub fn new(array: impl Into<Vec<i64>>, window_size: usize) -> Self {
        Self {
            array: array.into(),
            window_size,
        }
    }
}

/// Render data for one window position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPayload {
    /// Input values.
    pub array: Vec<i64>,
    /// Inclusive bounds of the current window, `None` when no window fits.
    pub span: Option<(usize, usize)>,
    /// Sum of the current window, widened so it never overflows.
    pub sum: i128,
    /// Best sum seen so far.
    pub max_sum: Option<i128>,
    /// Window that produced `max_sum`.
    pub best_span: Option<(usize, usize)>,
    /// Value that slid in on this step.
    pub entered: Option<i64>,
    /// Value that slid out on this step.
    pub left: Option<i64>,
    /// Narration.
    pub description: String,
}

impl Narrated for WindowPayload {
    fn description(&self) -> &str {
        &self.description
    }
}

/// One step per window position: the first window is summed directly,
/// each later one adds the entering value and subtracts the leaving one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowMaxSum;

impl StepGenerator for SlidingWindowMaxSum {
    type Params = WindowParams;
    type Payload = WindowPayload;
    const NAME: &'static str = "sliding_window_max_sum";

    fn generate(params: &WindowParams) -> StepSequence<WindowPayload> {
        let WindowParams { array, window_size } = params;
        let k = *window_size;
        let n = array.len();

        if k == 0 || k > n {
            warn!(k, n, "window does not fit the input");
            return StepSequence::single(WindowPayload {
                array: array.clone(),
                span: None,
                sum: 0,
                max_sum: None,
                best_span: None,
                entered: None,
                left: None,
                description: format!(
                    "Window size {k} is invalid for an array of length {n}"
                ),
            });
        }

        let mut recorder = StepRecorder::with_capacity(n - k + 1);
        let mut sum: i128 = array[..k].iter().map(|&v| i128::from(v)).sum();
        let mut best = (sum, (0, k - 1));
        recorder.record(WindowPayload {
            array: array.clone(),
            span: Some((0, k - 1)),
            sum,
            max_sum: Some(sum),
            best_span: Some((0, k - 1)),
            entered: None,
            left: None,
            description: format!("Window [0, {}]: sum = {sum}", k - 1),
        });

        for end in k..n {
            let start = end + 1 - k;
            let (entered, left) = (array[end], array[start - 1]);
            sum += i128::from(entered) - i128::from(left);
            let improved = sum > best.0;
            if improved {
                best = (sum, (start, end));
            }
            let description = if improved {
                format!("Window [{start}, {end}]: sum = {sum} (+{entered}, -{left}), new maximum")
            } else {
                format!("Window [{start}, {end}]: sum = {sum} (+{entered}, -{left})")
            };
            recorder.record(WindowPayload {
                array: array.clone(),
                span: Some((start, end)),
                sum,
                max_sum: Some(best.0),
                best_span: Some(best.1),
                entered: Some(entered),
                left: Some(left),
                description,
            });
        }

        recorder.seal_or(|| WindowPayload {
            array: Vec::new(),
            span: None,
            sum: 0,
            max_sum: None,
            best_span: None,
            entered: None,
            left: None,
            description: String::new(),
        })
    }
}
