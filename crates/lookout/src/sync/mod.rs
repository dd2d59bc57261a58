//! Frame quiescence tracking.
//!
//! The host reports each completed scheduler tick through
//! [`Synchronizer::on_tick`]. Waiters suspend until a tick observes the
//! condition they asked for, or until the host clock passes their deadline.
//! Nothing here spawns threads or timers: time only advances when the host
//! says so.

mod signals;
mod wait;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::task::Waker;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};

pub use signals::{FrameSignals, SchedulerSignals};
pub use wait::{NextTick, QuiescenceWait};

pub(crate) const SYNC_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::sync");

/// Condition a waiter suspends for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quiescence {
    /// No transient callbacks pending and no frame scheduled.
    Idle,
    /// No transient callbacks pending; a scheduled frame is allowed.
    NoTransientCallbacks,
}

impl fmt::Display for Quiescence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("the application to become idle"),
            Self::NoTransientCallbacks => f.write_str("transient callbacks to finish"),
        }
    }
}

/// Last observed scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// The most recent observation found no pending work.
    #[default]
    Idle,
    /// Work was pending at the most recent observation.
    Busy,
}

/// A wait whose deadline passed before its condition held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out waiting for {condition}")]
pub struct WaitTimedOut {
    /// The condition that never held.
    pub condition: Quiescence,
}

struct Waiter {
    id: u64,
    condition: Quiescence,
    deadline: Option<Duration>,
    outcome: Option<Result<(), WaitTimedOut>>,
    waker: Option<Waker>,
}

#[derive(Default)]
struct SyncState {
    now: Duration,
    status: SyncStatus,
    ticks: u64,
    next_waiter: u64,
    waiters: Vec<Waiter>,
    tick_wakers: Vec<Waker>,
}

/// Shared handle onto the scheduler's quiescence state.
///
/// Clones observe and drive the same state.
#[derive(Clone)]
pub struct Synchronizer {
    state: Rc<RefCell<SyncState>>,
    signals: Rc<dyn SchedulerSignals>,
}

impl fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Synchronizer")
            .field("now", &state.now)
            .field("status", &state.status)
            .field("ticks", &state.ticks)
            .field("pending_waiters", &state.waiters.len())
            .finish_non_exhaustive()
    }
}

impl Synchronizer {
    /// Creates a synchronizer reading the host's scheduler through `signals`.
    #[must_use]
    pub fn new(signals: Rc<dyn SchedulerSignals>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SyncState::default())),
            signals,
        }
    }

    /// Returns a future that completes once no transient callbacks are
    /// pending and no frame is scheduled.
    ///
    /// Completes on first poll when the application is already idle. With a
    /// `deadline` on the host clock, fails with [`WaitTimedOut`] at the first
    /// tick at or past it.
    #[must_use]
    pub fn wait_until_idle(&self, deadline: Option<Duration>) -> QuiescenceWait {
        QuiescenceWait::new(self.clone(), Quiescence::Idle, deadline)
    }

    /// Returns a future that completes once no transient callbacks are
    /// pending, whether or not a frame is scheduled.
    #[must_use]
    pub fn wait_until_no_transient_callbacks(&self, deadline: Option<Duration>) -> QuiescenceWait {
        QuiescenceWait::new(self.clone(), Quiescence::NoTransientCallbacks, deadline)
    }

    /// Returns a future that completes at the next reported tick.
    #[must_use]
    pub fn next_tick(&self) -> NextTick {
        NextTick::new(self.clone(), self.state.borrow().ticks)
    }

    /// Suspends until a tick reports a timestamp at or past `deadline`.
    pub async fn sleep_until(&self, deadline: Duration) {
        while self.now() < deadline {
            self.next_tick().await;
        }
    }

    /// Records a completed scheduler tick at `timestamp` on the host clock.
    ///
    /// Resumes every waiter whose condition now holds, then fails every
    /// remaining waiter whose deadline has passed. Each waiter is resumed at
    /// most once. The clock never moves backwards.
    pub fn on_tick(&self, timestamp: Duration) {
        let signals = self.signals.signals();
        let wakers = {
            let mut state = self.state.borrow_mut();
            state.now = state.now.max(timestamp);
            state.ticks = state.ticks.saturating_add(1);
            state.status = signals.status();

            let now = state.now;
            let mut wakers = std::mem::take(&mut state.tick_wakers);
            for waiter in state
                .waiters
                .iter_mut()
                .filter(|waiter| waiter.outcome.is_none())
            {
                if signals.satisfies(waiter.condition) {
                    waiter.outcome = Some(Ok(()));
                } else if waiter.deadline.is_some_and(|deadline| deadline <= now) {
                    waiter.outcome = Some(Err(WaitTimedOut {
                        condition: waiter.condition,
                    }));
                } else {
                    continue;
                }
                wakers.extend(waiter.waker.take());
            }
            trace!(
                target: SYNC_TARGET,
                ticks = state.ticks,
                status = ?state.status,
                resumed = wakers.len(),
                "scheduler tick"
            );
            wakers
        };
        for waker in wakers {
            waker.wake();
        }
    }

    /// Returns the timestamp of the most recent tick.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Returns the scheduler state observed most recently.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.state.borrow().status
    }

    /// Returns the number of ticks reported so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks
    }

    /// Returns the number of suspended quiescence waiters.
    #[must_use]
    pub fn pending_waiters(&self) -> usize {
        self.state
            .borrow()
            .waiters
            .iter()
            .filter(|waiter| waiter.outcome.is_none())
            .count()
    }

    pub(crate) fn current_signals(&self) -> FrameSignals {
        let signals = self.signals.signals();
        if !signals.is_idle() {
            self.state.borrow_mut().status = SyncStatus::Busy;
        }
        signals
    }

    pub(crate) fn register(
        &self,
        condition: Quiescence,
        deadline: Option<Duration>,
        waker: Waker,
    ) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_waiter;
        state.next_waiter = state.next_waiter.wrapping_add(1);
        state.waiters.push(Waiter {
            id,
            condition,
            deadline,
            outcome: None,
            waker: Some(waker),
        });
        debug!(target: SYNC_TARGET, id, %condition, ?deadline, "waiter suspended");
        id
    }

    /// Takes the outcome of waiter `id`, refreshing its waker while pending.
    pub(crate) fn poll_waiter(&self, id: u64, waker: &Waker) -> Option<Result<(), WaitTimedOut>> {
        let mut state = self.state.borrow_mut();
        let position = state.waiters.iter().position(|waiter| waiter.id == id)?;
        let outcome = state.waiters.get(position)?.outcome;
        if outcome.is_some() {
            state.waiters.swap_remove(position);
        } else if let Some(waiter) = state.waiters.get_mut(position) {
            waiter.waker = Some(waker.clone());
        }
        outcome
    }

    pub(crate) fn forget(&self, id: u64) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.waiters.retain(|waiter| waiter.id != id);
        }
    }

    pub(crate) fn poll_tick(&self, target: u64, waker: &Waker) -> bool {
        let mut state = self.state.borrow_mut();
        if state.ticks >= target {
            return true;
        }
        state.tick_wakers.push(waker.clone());
        false
    }
}
