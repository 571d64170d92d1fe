//! Playback controller: a single cursor over a [`StepSequence`].
//!
//! # State machine
//!
//! ```text
//!            play()                     tick() reaches last index
//!   Idle(c) ────────► Running(c) ──────────────────────────────► Idle(last)
//!      ▲                 │  │
//!      │     pause()     │  │ tick(): c += 1
//!      └─────────────────┘  └───────┐
//!                                   ▼
//!                              Running(c+1)
//! ```
//!
//! `reset`, `jump` and `replace_sequence` are legal from any state and always
//! land in `Idle`. Manual stepping is only honoured while `Idle`. The
//! completed state is `Idle` with the cursor on the last index.
//!
//! Every operation is total: out-of-range requests are clamped and illegal
//! ones are no-ops. An empty sequence turns every operation into a no-op and
//! reports the cursor as `None`.
//!
//! # Timing
//!
//! While running the controller owns exactly one [`AutoAdvance`]. The host
//! loop calls [`PlaybackController::poll`], which fires every due tick in
//! order. Leaving the running state drops the timer, so no tick can be
//! observed after `pause`, `reset`, `jump` or `replace_sequence` returns.

use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

use super::clock::{Clock, MonotonicClock};
use super::step::{Step, StepSequence};
use super::timer::AutoAdvance;
use crate::config::PlaybackConfig;

/// Identifier handed out by [`PlaybackController::subscribe`].
pub type SubscriptionId = u64;

type Observer<P> = Box<dyn FnMut(&PlaybackState<P>)>;

/// Everything a renderer needs to draw the current instant.
#[derive(Debug, Clone)]
pub struct PlaybackState<P> {
    sequence: StepSequence<P>,
    cursor: Option<usize>,
    is_running: bool,
}

impl<P> PlaybackState<P> {
    fn new(sequence: StepSequence<P>) -> Self {
        let cursor = if sequence.is_empty() { None } else { Some(0) };
        Self {
            sequence,
            cursor,
            is_running: false,
        }
    }

    /// The sequence being played.
    #[must_use]
    pub const fn sequence(&self) -> &StepSequence<P> {
        &self.sequence
    }

    /// Cursor position, `None` for an empty sequence.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether auto-advance is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Number of steps in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Step under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Step<P>> {
        self.cursor.and_then(|c| self.sequence.get(c))
    }

    /// Whether the cursor sits on the last step.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!((self.cursor, self.sequence.last_index()), (Some(c), Some(last)) if c == last)
    }

    fn fingerprint(&self) -> (Option<usize>, bool) {
        (self.cursor, self.is_running)
    }
}

/// Drives a cursor over one step sequence.
pub struct PlaybackController<P> {
    state: PlaybackState<P>,
    timer: Option<AutoAdvance>,
    interval: Duration,
    clock: Box<dyn Clock>,
    observers: Vec<(SubscriptionId, Observer<P>)>,
    next_subscription: SubscriptionId,
}

impl<P> fmt::Debug for PlaybackController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("len", &self.state.len())
            .field("cursor", &self.state.cursor)
            .field("is_running", &self.state.is_running)
            .field("interval", &self.interval)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<P> PlaybackController<P> {
    /// Create a controller with the default interval and a real clock.
    #[must_use]
    pub fn new(sequence: StepSequence<P>) -> Self {
        Self::with_clock(
            sequence,
            PlaybackConfig::default().interval(),
            Box::new(MonotonicClock::new()),
        )
    }

    /// Create a controller using the interval from `config`.
    #[must_use]
    pub fn with_config(sequence: StepSequence<P>, config: &PlaybackConfig) -> Self {
        Self::with_clock(sequence, config.interval(), Box::new(MonotonicClock::new()))
    }

    /// Create a controller with an explicit interval and clock.
    #[must_use]
    pub fn with_clock(sequence: StepSequence<P>, interval: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            state: PlaybackState::new(sequence),
            timer: None,
            interval,
            clock,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // === Accessors ===

    /// Current playback state.
    #[must_use]
    pub const fn state(&self) -> &PlaybackState<P> {
        &self.state
    }

    /// The sequence being played.
    #[must_use]
    pub const fn sequence(&self) -> &StepSequence<P> {
        &self.state.sequence
    }

    /// Step under the cursor, `None` for an empty sequence.
    #[must_use]
    pub fn current(&self) -> Option<&Step<P>> {
        self.state.current()
    }

    /// Cursor position, `None` for an empty sequence.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.state.cursor
    }

    /// Whether auto-advance is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Whether the cursor sits on the last step.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Auto-advance period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the auto-advance period.
    ///
    /// While running, the timer is re-armed at once: the next tick is due one
    /// new period from now.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.timer.is_some() {
            debug!(interval_ms = interval.as_millis() as u64, "auto-advance re-armed");
            self.timer = Some(AutoAdvance::start(self.clock.now(), interval));
        }
    }

    /// Time until the next tick is due, `None` while idle.
    #[must_use]
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.timer
            .as_ref()
            .map(|timer| timer.remaining(self.clock.now()))
    }

    // === Observers ===

    /// Register a callback invoked after every change of cursor or running
    /// flag.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackState<P>) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // === Transitions ===

    /// Start auto-advance.
    ///
    /// Restarts from the first step when the cursor is already on the last
    /// one. Idempotent while running. Sequences with fewer than two steps have
    /// nothing to animate and are left untouched.
    pub fn play(&mut self) -> bool {
        if self.state.is_running {
            trace!("play ignored: already running");
            return false;
        }
        if self.state.len() < 2 {
            debug!(len = self.state.len(), "play ignored: nothing to animate");
            return false;
        }
        self.apply(|this| {
            if this.state.is_complete() {
                this.state.cursor = Some(0);
            }
            this.start_timer();
        })
    }

    /// Stop auto-advance, keeping the cursor where it is.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running {
            return false;
        }
        self.apply(Self::stop_timer)
    }

    /// Toggle between [`play`](Self::play) and [`pause`](Self::pause).
    pub fn toggle(&mut self) -> bool {
        if self.state.is_running {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Stop and return to the first step.
    pub fn reset(&mut self) -> bool {
        self.apply(|this| {
            this.stop_timer();
            this.state.cursor = if this.state.is_empty() { None } else { Some(0) };
        })
    }

    /// Move one step forward, clamped at the last step. Ignored while running.
    pub fn step_forward(&mut self) -> bool {
        if self.state.is_running {
            debug!("step_forward rejected while running");
            return false;
        }
        let Some(last) = self.state.sequence.last_index() else {
            return false;
        };
        self.apply(|this| {
            this.state.cursor = this.state.cursor.map(|c| (c + 1).min(last));
        })
    }

    /// Move one step back, clamped at the first step. Ignored while running.
    pub fn step_backward(&mut self) -> bool {
        if self.state.is_running {
            debug!("step_backward rejected while running");
            return false;
        }
        self.apply(|this| {
            this.state.cursor = this.state.cursor.map(|c| c.saturating_sub(1));
        })
    }

    /// Stop and move the cursor to `index`, clamped into range.
    pub fn jump(&mut self, index: usize) -> bool {
        let Some(last) = self.state.sequence.last_index() else {
            return false;
        };
        self.apply(|this| {
            this.stop_timer();
            this.state.cursor = Some(index.min(last));
        })
    }

    /// Advance by exactly one step while running.
    ///
    /// Reaching the last step stops playback. Ticks delivered while idle are
    /// ignored.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running {
            trace!("tick ignored: idle");
            return false;
        }
        self.apply(|this| {
            let (Some(cursor), Some(last)) = (this.state.cursor, this.state.sequence.last_index())
            else {
                this.stop_timer();
                return;
            };
            if cursor < last {
                this.state.cursor = Some(cursor + 1);
                trace!(cursor = cursor + 1, "tick");
            }
            if this.state.is_complete() {
                debug!(cursor = last, "reached terminal step; stopping");
                this.stop_timer();
            }
        })
    }

    /// Fire every tick that is due by the clock, in order.
    ///
    /// Returns the number of ticks that moved the cursor.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(timer) = self.timer.as_mut() {
            if !timer.take_due(now) {
                break;
            }
            if self.tick() {
                fired += 1;
            }
        }
        fired
    }

    /// Block the caller until playback stops on its own.
    ///
    /// `wait` is handed the time remaining until the next tick; a real host
    /// passes [`std::thread::sleep`]. Returns the number of ticks fired.
    pub fn run_to_completion<W>(&mut self, mut wait: W) -> usize
    where
        W: FnMut(Duration),
    {
        let mut fired = 0;
        while let Some(remaining) = self.time_until_next_tick() {
            wait(remaining);
            fired += self.poll();
        }
        fired
    }

    /// Install a freshly generated sequence.
    ///
    /// Any running timer is cancelled first and the cursor returns to the
    /// first step. Observers are always notified.
    pub fn replace_sequence(&mut self, sequence: StepSequence<P>) {
        self.stop_timer();
        debug!(len = sequence.len(), "sequence replaced");
        self.state = PlaybackState::new(sequence);
        self.notify();
    }

    // === Internals ===

    fn apply<F>(&mut self, transition: F) -> bool
    where
        F: FnOnce(&mut Self),
    {
        let before = self.state.fingerprint();
        transition(self);
        let changed = self.state.fingerprint() != before;
        if changed {
            self.notify();
        }
        changed
    }

    fn start_timer(&mut self) {
        self.timer = Some(AutoAdvance::start(self.clock.now(), self.interval));
        self.state.is_running = true;
    }

    fn stop_timer(&mut self) {
        self.timer = None;
        self.state.is_running = false;
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::engine::step::StepRecorder;
    use std::cell::RefCell;
    use std::rc::Rc;

    const INTERVAL_MS: u64 = 1000;

    fn sequence(len: usize) -> StepSequence<usize> {
        let mut recorder = StepRecorder::new();
        for i in 0..len {
            recorder.record(i * 10);
        }
        recorder.seal_or(|| 0)
    }

    fn controller(len: usize) -> (PlaybackController<usize>, ManualClock) {
        let clock = ManualClock::new();
        let seq = if len == 0 {
            StepSequence::empty()
        } else {
            sequence(len)
        };
        let ctrl = PlaybackController::with_clock(
            seq,
            Duration::from_millis(INTERVAL_MS),
            Box::new(clock.clone()),
        );
        (ctrl, clock)
    }

    #[test]
    fn test_starts_idle_at_zero() {
        let (ctrl, _) = controller(4);
        assert_eq!(ctrl.cursor(), Some(0));
        assert!(!ctrl.is_running());
        assert_eq!(ctrl.current().map(|s| *s.payload()), Some(0));
    }

    #[test]
    fn test_step_forward_clamps_at_end() {
        let (mut ctrl, _) = controller(4);
        for _ in 0..3 {
            assert!(ctrl.step_forward());
        }
        assert_eq!(ctrl.cursor(), Some(3));
        assert!(ctrl.is_complete());
        assert!(!ctrl.step_forward());
        assert_eq!(ctrl.cursor(), Some(3));
    }

    #[test]
    fn test_step_backward_at_zero_is_noop() {
        let (mut ctrl, _) = controller(4);
        assert!(!ctrl.step_backward());
        assert_eq!(ctrl.cursor(), Some(0));
    }

    #[test]
    fn test_jump_clamps() {
        let (mut ctrl, _) = controller(4);
        assert!(ctrl.jump(2));
        assert_eq!(ctrl.cursor(), Some(2));
        assert!(ctrl.jump(100));
        assert_eq!(ctrl.cursor(), Some(3));
        assert!(ctrl.jump(0));
        assert_eq!(ctrl.cursor(), Some(0));
    }

    #[test]
    fn test_reset_returns_to_zero_and_stops() {
        let (mut ctrl, _) = controller(4);
        ctrl.jump(2);
        ctrl.play();
        assert!(ctrl.reset());
        assert_eq!(ctrl.cursor(), Some(0));
        assert!(!ctrl.is_running());
        assert!(ctrl.time_until_next_tick().is_none());
    }

    #[test]
    fn test_play_ticks_until_terminal_then_stops() {
        let (mut ctrl, clock) = controller(4);
        assert!(ctrl.play());
        for expected in 1..=3 {
            clock.advance_ms(INTERVAL_MS);
            assert_eq!(ctrl.poll(), 1);
            assert_eq!(ctrl.cursor(), Some(expected));
        }
        assert!(!ctrl.is_running());
        clock.advance_ms(INTERVAL_MS * 5);
        assert_eq!(ctrl.poll(), 0);
        assert!(!ctrl.tick());
        assert_eq!(ctrl.cursor(), Some(3));
    }

    #[test]
    fn test_poll_before_deadline_fires_nothing() {
        let (mut ctrl, clock) = controller(4);
        ctrl.play();
        clock.advance_ms(INTERVAL_MS - 1);
        assert_eq!(ctrl.poll(), 0);
        assert_eq!(ctrl.cursor(), Some(0));
    }

    #[test]
    fn test_late_poll_catches_up_one_step_per_tick() {
        let (mut ctrl, clock) = controller(10);
        ctrl.play();
        clock.advance_ms(INTERVAL_MS * 3);
        assert_eq!(ctrl.poll(), 3);
        assert_eq!(ctrl.cursor(), Some(3));
        assert!(ctrl.is_running());
    }

    #[test]
    fn test_late_poll_stops_at_terminal() {
        let (mut ctrl, clock) = controller(3);
        ctrl.play();
        clock.advance_ms(INTERVAL_MS * 50);
        assert_eq!(ctrl.poll(), 2);
        assert_eq!(ctrl.cursor(), Some(2));
        assert!(!ctrl.is_running());
    }

    #[test]
    fn test_play_then_pause_before_tick_keeps_cursor() {
        let (mut ctrl, clock) = controller(4);
        ctrl.jump(1);
        ctrl.play();
        ctrl.pause();
        clock.advance_ms(INTERVAL_MS * 10);
        assert_eq!(ctrl.poll(), 0);
        assert_eq!(ctrl.cursor(), Some(1));
        assert!(!ctrl.is_running());
    }

    #[test]
    fn test_play_is_idempotent() {
        let (mut ctrl, clock) = controller(5);
        assert!(ctrl.play());
        clock.advance_ms(INTERVAL_MS / 2);
        assert!(!ctrl.play());
        clock.advance_ms(INTERVAL_MS / 2);
        assert_eq!(ctrl.poll(), 1);
        assert_eq!(ctrl.cursor(), Some(1));
    }

    #[test]
    fn test_play_from_terminal_restarts() {
        let (mut ctrl, _) = controller(4);
        ctrl.jump(3);
        assert!(ctrl.play());
        assert_eq!(ctrl.cursor(), Some(0));
        assert!(ctrl.is_running());
    }

    #[test]
    fn test_manual_steps_rejected_while_running() {
        let (mut ctrl, _) = controller(4);
        ctrl.jump(1);
        ctrl.play();
        assert!(!ctrl.step_forward());
        assert!(!ctrl.step_backward());
        assert_eq!(ctrl.cursor(), Some(1));
        assert!(ctrl.is_running());
    }

    #[test]
    fn test_jump_while_running_stops() {
        let (mut ctrl, clock) = controller(6);
        ctrl.play();
        assert!(ctrl.jump(4));
        assert!(!ctrl.is_running());
        clock.advance_ms(INTERVAL_MS * 3);
        assert_eq!(ctrl.poll(), 0);
        assert_eq!(ctrl.cursor(), Some(4));
    }

    #[test]
    fn test_single_step_sequence() {
        let (mut ctrl, _) = controller(1);
        assert!(ctrl.is_complete());
        assert!(!ctrl.play());
        assert!(!ctrl.step_forward());
        assert!(!ctrl.step_backward());
        assert!(!ctrl.jump(9));
        assert_eq!(ctrl.cursor(), Some(0));
    }

    #[test]
    fn test_empty_sequence_is_inert() {
        let (mut ctrl, _) = controller(0);
        assert_eq!(ctrl.cursor(), None);
        assert!(ctrl.current().is_none());
        assert!(!ctrl.play());
        assert!(!ctrl.pause());
        assert!(!ctrl.reset());
        assert!(!ctrl.step_forward());
        assert!(!ctrl.step_backward());
        assert!(!ctrl.jump(3));
        assert!(!ctrl.tick());
        assert_eq!(ctrl.poll(), 0);
        assert!(!ctrl.is_complete());
        assert_eq!(ctrl.cursor(), None);
    }

    #[test]
    fn test_observers_see_every_change() {
        let (mut ctrl, clock) = controller(3);
        let seen: Rc<RefCell<Vec<(Option<usize>, bool)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        ctrl.subscribe(move |state| {
            sink.borrow_mut().push((state.cursor(), state.is_running()));
        });

        ctrl.play();
        clock.advance_ms(INTERVAL_MS);
        ctrl.poll();
        clock.advance_ms(INTERVAL_MS);
        ctrl.poll();

        assert_eq!(
            *seen.borrow(),
            vec![(Some(0), true), (Some(1), true), (Some(2), false)]
        );
    }

    #[test]
    fn test_noop_does_not_notify() {
        let (mut ctrl, _) = controller(3);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        ctrl.subscribe(move |_| *sink.borrow_mut() += 1);

        ctrl.step_backward();
        ctrl.pause();
        ctrl.reset();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut ctrl, _) = controller(3);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = ctrl.subscribe(move |_| *sink.borrow_mut() += 1);

        ctrl.step_forward();
        assert!(ctrl.unsubscribe(id));
        assert!(!ctrl.unsubscribe(id));
        ctrl.step_forward();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_replace_sequence_resets_and_cancels() {
        let (mut ctrl, clock) = controller(5);
        ctrl.jump(2);
        ctrl.play();
        let notified = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&notified);
        ctrl.subscribe(move |_| *sink.borrow_mut() += 1);

        ctrl.replace_sequence(sequence(8));
        assert_eq!(ctrl.cursor(), Some(0));
        assert!(!ctrl.is_running());
        assert_eq!(ctrl.sequence().len(), 8);
        assert_eq!(*notified.borrow(), 1);

        clock.advance_ms(INTERVAL_MS * 4);
        assert_eq!(ctrl.poll(), 0);
    }

    #[test]
    fn test_run_to_completion_with_manual_clock() {
        let (mut ctrl, clock) = controller(5);
        ctrl.play();
        let waits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&waits);
        let fired = ctrl.run_to_completion(|d| {
            sink.borrow_mut().push(d);
            clock.advance(d);
        });
        assert_eq!(fired, 4);
        assert!(ctrl.is_complete());
        assert_eq!(waits.borrow().len(), 4);
        assert!(waits
            .borrow()
            .iter()
            .all(|d| *d == Duration::from_millis(INTERVAL_MS)));
    }

    #[test]
    fn test_run_to_completion_when_idle_returns_immediately() {
        let (mut ctrl, _) = controller(5);
        assert_eq!(ctrl.run_to_completion(|_| unreachable!("idle")), 0);
    }

    #[test]
    fn test_set_interval_while_running_rearms_timer() {
        let (mut ctrl, clock) = controller(6);
        ctrl.play();
        clock.advance_ms(INTERVAL_MS);
        assert_eq!(ctrl.poll(), 1);

        clock.advance_ms(400);
        ctrl.set_interval(Duration::from_millis(200));
        assert!(ctrl.is_running());
        assert_eq!(ctrl.time_until_next_tick(), Some(Duration::from_millis(200)));

        clock.advance_ms(200);
        assert_eq!(ctrl.poll(), 1);
        assert_eq!(ctrl.cursor(), Some(2));
        clock.advance_ms(400);
        assert_eq!(ctrl.poll(), 2);
        assert_eq!(ctrl.cursor(), Some(4));
    }

    #[test]
    fn test_set_interval_slower_while_running() {
        let (mut ctrl, clock) = controller(4);
        ctrl.play();
        clock.advance_ms(900);
        ctrl.set_interval(Duration::from_millis(3000));
        clock.advance_ms(INTERVAL_MS);
        assert_eq!(ctrl.poll(), 0);
        clock.advance_ms(2000);
        assert_eq!(ctrl.poll(), 1);
        assert_eq!(ctrl.cursor(), Some(1));
    }

    #[test]
    fn test_set_interval_while_idle_does_not_start() {
        let (mut ctrl, clock) = controller(4);
        ctrl.set_interval(Duration::from_millis(100));
        assert!(!ctrl.is_running());
        assert_eq!(ctrl.time_until_next_tick(), None);
        clock.advance_ms(500);
        assert_eq!(ctrl.poll(), 0);
        ctrl.play();
        assert_eq!(ctrl.time_until_next_tick(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_toggle() {
        let (mut ctrl, _) = controller(4);
        assert!(ctrl.toggle());
        assert!(ctrl.is_running());
        assert!(ctrl.toggle());
        assert!(!ctrl.is_running());
    }

    #[test]
    fn test_steps_are_not_mutated_by_navigation() {
        let (mut ctrl, clock) = controller(4);
        let snapshot = ctrl.sequence().clone();
        ctrl.play();
        clock.advance_ms(INTERVAL_MS * 2);
        ctrl.poll();
        ctrl.pause();
        ctrl.step_backward();
        ctrl.jump(3);
        assert_eq!(ctrl.sequence(), &snapshot);
    }
}
