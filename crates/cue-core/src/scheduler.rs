//! Frame-scheduler contract and a deterministic implementation.
//!
//! The engine compiles storyboards into progress-driven callables and hands
//! them to a [`FrameScheduler`]; the scheduler owns the clock. The contract:
//! tick receives monotonically non-decreasing progress over `[0,1]` across
//! the scheduled horizon, the finished callback fires exactly once, and
//! cancelling fires it with the cancelled flag set — the state machinery
//! depends on that guarantee to force-complete aborted runs.
//!
//! [`StepScheduler`] is the in-tree implementation: a manual clock advanced
//! explicitly, giving tests and headless hosts deterministic playback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration as StdDuration;

/// Opaque token identifying one scheduled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(pub u64);

impl ScheduleHandle {
    /// Allocate a fresh unique handle.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ScheduleHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick progress callback; progress is in `[0,1]` over the horizon.
pub type TickFn = Box<dyn FnMut(f64)>;

/// End-of-run callback: `(progress, cancelled)`. Fires exactly once.
pub type FinishedFn = Box<dyn FnOnce(f64, bool)>;

/// Host frame-scheduler contract.
///
/// Receivers are `&self` so finished callbacks may re-enter the scheduler to
/// chain follow-up schedules; implementations must not hold internal borrows
/// while invoking callbacks.
pub trait FrameScheduler {
    /// Drive `tick` with increasing progress over `length`, then call
    /// `finished(1.0, false)`. A zero `length` completes on the next frame.
    fn schedule(&self, handle: ScheduleHandle, length: StdDuration, tick: TickFn, finished: FinishedFn);

    /// Abort the run identified by `handle`, firing its finished callback
    /// with the cancelled flag. Returns whether a run was aborted.
    fn cancel(&self, handle: ScheduleHandle) -> bool;
}

struct Entry {
    handle: ScheduleHandle,
    started_ms: f64,
    length_ms: f64,
    tick: Option<TickFn>,
    finished: Option<FinishedFn>,
    done: bool,
}

impl Entry {
    fn progress_at(&self, now_ms: f64) -> f64 {
        if self.length_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.started_ms) / self.length_ms).clamp(0.0, 1.0)
        }
    }
}

/// Deterministic manual-clock scheduler.
pub struct StepScheduler {
    clock_ms: Cell<f64>,
    entries: RefCell<Vec<Rc<RefCell<Entry>>>>,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self {
            clock_ms: Cell::new(0.0),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Advance the clock, ticking every active run and finishing the ones
    /// whose horizon has passed. Callbacks run with no internal borrow held,
    /// so they may schedule or cancel freely.
    pub fn advance(&self, delta: StdDuration) {
        let now = self.clock_ms.get() + delta.as_secs_f64() * 1_000.0;
        self.clock_ms.set(now);

        let batch: Vec<Rc<RefCell<Entry>>> = self.entries.borrow().clone();
        for cell in batch {
            let (tick, progress) = {
                let mut entry = cell.borrow_mut();
                if entry.done {
                    continue;
                }
                (entry.tick.take(), entry.progress_at(now))
            };

            let mut tick = match tick {
                Some(t) => t,
                None => continue,
            };
            tick(progress);

            let finished = {
                let mut entry = cell.borrow_mut();
                if entry.done {
                    // Cancelled from inside its own tick; finished already ran.
                    None
                } else {
                    entry.tick = Some(tick);
                    if progress >= 1.0 {
                        entry.done = true;
                        entry.finished.take()
                    } else {
                        None
                    }
                }
            };
            if let Some(finished) = finished {
                finished(1.0, false);
            }
        }

        self.entries.borrow_mut().retain(|cell| !cell.borrow().done);
    }

    /// Number of runs still in flight.
    pub fn active_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|cell| !cell.borrow().done)
            .count()
    }

    /// Current clock value.
    pub fn now(&self) -> StdDuration {
        StdDuration::from_secs_f64(self.clock_ms.get() / 1_000.0)
    }
}

impl Default for StepScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for StepScheduler {
    fn schedule(&self, handle: ScheduleHandle, length: StdDuration, tick: TickFn, finished: FinishedFn) {
        log::trace!(
            "scheduling run {:?} over {}ms",
            handle,
            length.as_secs_f64() * 1_000.0
        );
        self.entries.borrow_mut().push(Rc::new(RefCell::new(Entry {
            handle,
            started_ms: self.clock_ms.get(),
            length_ms: length.as_secs_f64() * 1_000.0,
            tick: Some(tick),
            finished: Some(finished),
            done: false,
        })));
    }

    fn cancel(&self, handle: ScheduleHandle) -> bool {
        let found = self
            .entries
            .borrow()
            .iter()
            .find(|cell| {
                let entry = cell.borrow();
                entry.handle == handle && !entry.done
            })
            .cloned();

        let Some(cell) = found else {
            return false;
        };

        let (finished, progress) = {
            let mut entry = cell.borrow_mut();
            entry.done = true;
            (entry.finished.take(), entry.progress_at(self.clock_ms.get()))
        };
        if let Some(finished) = finished {
            log::trace!("cancelling run {handle:?} at progress {progress}");
            finished(progress, true);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell as StdRefCell;

    fn ms(v: u64) -> StdDuration {
        StdDuration::from_millis(v)
    }

    #[test]
    fn progress_is_monotonic_and_completes() {
        let scheduler = StepScheduler::new();
        let ticks = Rc::new(StdRefCell::new(Vec::new()));
        let ends = Rc::new(StdRefCell::new(Vec::new()));

        let t = Rc::clone(&ticks);
        let e = Rc::clone(&ends);
        scheduler.schedule(
            ScheduleHandle::new(),
            ms(100),
            Box::new(move |x| t.borrow_mut().push(x)),
            Box::new(move |x, cancelled| e.borrow_mut().push((x, cancelled))),
        );

        scheduler.advance(ms(25));
        scheduler.advance(ms(25));
        scheduler.advance(ms(60));
        scheduler.advance(ms(10));

        let ticks = ticks.borrow();
        assert_eq!(ticks.as_slice(), &[0.25, 0.5, 1.0]);
        assert_eq!(ends.borrow().as_slice(), &[(1.0, false)]);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn zero_length_completes_next_advance() {
        let scheduler = StepScheduler::new();
        let ends = Rc::new(StdRefCell::new(Vec::new()));
        let e = Rc::clone(&ends);
        scheduler.schedule(
            ScheduleHandle::new(),
            StdDuration::ZERO,
            Box::new(|_| {}),
            Box::new(move |x, cancelled| e.borrow_mut().push((x, cancelled))),
        );
        assert_eq!(scheduler.active_count(), 1);
        scheduler.advance(ms(1));
        assert_eq!(ends.borrow().as_slice(), &[(1.0, false)]);
    }

    #[test]
    fn cancel_fires_finished_with_flag() {
        let scheduler = StepScheduler::new();
        let handle = ScheduleHandle::new();
        let ends = Rc::new(StdRefCell::new(Vec::new()));
        let e = Rc::clone(&ends);
        scheduler.schedule(
            handle,
            ms(100),
            Box::new(|_| {}),
            Box::new(move |x, cancelled| e.borrow_mut().push((x, cancelled))),
        );

        scheduler.advance(ms(40));
        assert!(scheduler.cancel(handle));
        assert_eq!(ends.borrow().as_slice(), &[(0.4, true)]);

        // A second cancel is a no-op; the callback never fires twice.
        assert!(!scheduler.cancel(handle));
        scheduler.advance(ms(100));
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn cancel_unknown_handle_is_false() {
        let scheduler = StepScheduler::new();
        assert!(!scheduler.cancel(ScheduleHandle::new()));
    }

    #[test]
    fn finished_callback_may_chain_schedules() {
        let scheduler = Rc::new(StepScheduler::new());
        let ends = Rc::new(StdRefCell::new(Vec::new()));

        let chained = Rc::clone(&scheduler);
        let e = Rc::clone(&ends);
        scheduler.schedule(
            ScheduleHandle::new(),
            ms(10),
            Box::new(|_| {}),
            Box::new(move |_, _| {
                let e = Rc::clone(&e);
                chained.schedule(
                    ScheduleHandle::new(),
                    ms(10),
                    Box::new(|_| {}),
                    Box::new(move |x, cancelled| e.borrow_mut().push((x, cancelled))),
                );
            }),
        );

        scheduler.advance(ms(10));
        assert_eq!(scheduler.active_count(), 1);
        scheduler.advance(ms(10));
        assert_eq!(ends.borrow().as_slice(), &[(1.0, false)]);
    }
}
