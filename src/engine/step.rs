//! Immutable step records and the sequences they live in.
//!
//! A [`StepSequence`] is produced once per set of algorithm parameters and is
//! never mutated afterwards. Sequences are only built through a
//! [`StepRecorder`], which guarantees that:
//!
//! - indices are 0-based and contiguous,
//! - exactly the final step is terminal,
//! - a generated sequence is never empty.

use serde::Serialize;
use std::sync::Arc;

/// One observable instant of an algorithm's execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step<P> {
    index: usize,
    payload: P,
    is_terminal: bool,
}

impl<P> Step<P> {
    /// Ordinal position within the owning sequence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Algorithm-specific render data for this instant.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Whether this step is the final (completed) state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.is_terminal
    }
}

/// Ordered, finite, immutable list of steps.
///
/// Cloning is cheap: the steps are shared behind an [`Arc`].
///
/// Sequences serialize as a plain list but cannot be deserialized, so a
/// list with gaps or several terminal steps never becomes a sequence:
///
/// ```compile_fail
/// let seq: algoviz::StepSequence<u8> = serde_json::from_str("[]").unwrap();
/// ```
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepSequence<P> {
    steps: Arc<[Step<P>]>,
}

impl<P> Clone for StepSequence<P> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<P> Default for StepSequence<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> StepSequence<P> {
    /// An empty sequence.
    ///
    /// Generators never return this; it exists so the playback controller
    /// can be exercised against the sentinel case.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            steps: Arc::from(Vec::new()),
        }
    }

    /// A sequence consisting of a single terminal step.
    #[must_use]
    pub fn single(payload: P) -> Self {
        StepRecorder::new().finish(payload)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step, `None` when empty.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step<P>> {
        self.steps.get(index)
    }

    /// The terminal step.
    #[must_use]
    pub fn terminal(&self) -> Option<&Step<P>> {
        self.steps.last()
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step<P>] {
        &self.steps
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<P>> {
        self.steps.iter()
    }

    /// Iterate over payloads in order.
    pub fn payloads(&self) -> impl Iterator<Item = &P> + '_ {
        self.steps.iter().map(Step::payload)
    }

    /// Project every payload into another shape, keeping indices and the
    /// terminal flag.
    #[must_use]
    pub fn map<Q, F>(&self, mut f: F) -> StepSequence<Q>
    where
        F: FnMut(&P) -> Q,
    {
        let steps: Vec<Step<Q>> = self
            .steps
            .iter()
            .map(|step| Step {
                index: step.index,
                payload: f(&step.payload),
                is_terminal: step.is_terminal,
            })
            .collect();
        StepSequence {
            steps: Arc::from(steps),
        }
    }
}

impl<'a, P> IntoIterator for &'a StepSequence<P> {
    type Item = &'a Step<P>;
    type IntoIter = std::slice::Iter<'a, Step<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only builder used by every generator.
#[derive(Debug)]
pub struct StepRecorder<P> {
    payloads: Vec<P>,
}

impl<P> Default for StepRecorder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> StepRecorder<P> {
    /// Create an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            payloads: Vec::new(),
        }
    }

    /// Create a recorder with room for `capacity` steps.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            payloads: Vec::with_capacity(capacity),
        }
    }

    /// Record a non-final step and return its index.
    pub fn record(&mut self, payload: P) -> usize {
        self.payloads.push(payload);
        self.payloads.len() - 1
    }

    /// Number of steps recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Record `terminal` as the final step and seal the sequence.
    #[must_use]
    pub fn finish(mut self, terminal: P) -> StepSequence<P> {
        self.payloads.push(terminal);
        self.seal_inner()
    }

    /// Seal the sequence, marking the most recently recorded step terminal.
    ///
    /// When nothing was recorded, `fallback` supplies a single terminal step.
    #[must_use]
    pub fn seal_or<F>(mut self, fallback: F) -> StepSequence<P>
    where
        F: FnOnce() -> P,
    {
        if self.payloads.is_empty() {
            self.payloads.push(fallback());
        }
        self.seal_inner()
    }

    fn seal_inner(self) -> StepSequence<P> {
        let last = self.payloads.len().saturating_sub(1);
        let steps: Vec<Step<P>> = self
            .payloads
            .into_iter()
            .enumerate()
            .map(|(index, payload)| Step {
                index,
                payload,
                is_terminal: index == last,
            })
            .collect();
        StepSequence {
            steps: Arc::from(steps),
        }
    }
}
