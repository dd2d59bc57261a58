//! Scheduler signal snapshots.

use super::{Quiescence, SyncStatus};

/// Scheduler state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSignals {
    /// Animation-style callbacks are registered for the next frame.
    pub transient_callbacks: bool,
    /// A frame has been requested but not yet produced.
    pub frame_scheduled: bool,
}

impl FrameSignals {
    /// No pending work at all.
    pub const IDLE: Self = Self {
        transient_callbacks: false,
        frame_scheduled: false,
    };

    /// Returns whether both signals are clear.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        !self.transient_callbacks && !self.frame_scheduled
    }

    /// Returns whether these signals satisfy `condition`.
    #[must_use]
    pub const fn satisfies(self, condition: Quiescence) -> bool {
        match condition {
            Quiescence::Idle => self.is_idle(),
            Quiescence::NoTransientCallbacks => !self.transient_callbacks,
        }
    }

    pub(crate) const fn status(self) -> SyncStatus {
        if self.is_idle() {
            SyncStatus::Idle
        } else {
            SyncStatus::Busy
        }
    }
}

/// Read access to the host scheduler.
pub trait SchedulerSignals {
    /// Returns the scheduler's current state.
    fn signals(&self) -> FrameSignals;
}

impl<F> SchedulerSignals for F
where
    F: Fn() -> FrameSignals,
{
    fn signals(&self) -> FrameSignals {
        self()
    }
}
