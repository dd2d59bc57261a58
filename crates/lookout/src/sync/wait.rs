//! Futures returned by [`Synchronizer`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use super::{Quiescence, Synchronizer, WaitTimedOut};

/// Future returned by [`Synchronizer::wait_until_idle`] and
/// [`Synchronizer::wait_until_no_transient_callbacks`].
///
/// Dropping it before completion withdraws the waiter.
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct QuiescenceWait {
    sync: Synchronizer,
    condition: Quiescence,
    deadline: Option<Duration>,
    waiter: Option<u64>,
    done: bool,
}

impl QuiescenceWait {
    pub(super) const fn new(
        sync: Synchronizer,
        condition: Quiescence,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            sync,
            condition,
            deadline,
            waiter: None,
            done: false,
        }
    }

    /// Returns the condition this future waits for.
    #[must_use]
    pub const fn condition(&self) -> Quiescence {
        self.condition
    }

    fn finish(&mut self, outcome: Result<(), WaitTimedOut>) -> Poll<Result<(), WaitTimedOut>> {
        self.done = true;
        self.waiter = None;
        Poll::Ready(outcome)
    }
}

impl Future for QuiescenceWait {
    type Output = Result<(), WaitTimedOut>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.done {
            return Poll::Pending;
        }

        if let Some(id) = this.waiter {
            return match this.sync.poll_waiter(id, cx.waker()) {
                Some(outcome) => this.finish(outcome),
                None => Poll::Pending,
            };
        }

        if this.sync.current_signals().satisfies(this.condition) {
            return this.finish(Ok(()));
        }
        let now = this.sync.now();
        if this.deadline.is_some_and(|deadline| deadline <= now) {
            let condition = this.condition;
            return this.finish(Err(WaitTimedOut { condition }));
        }
        this.waiter = Some(
            this.sync
                .register(this.condition, this.deadline, cx.waker().clone()),
        );
        Poll::Pending
    }
}

impl Drop for QuiescenceWait {
    fn drop(&mut self) {
        if let Some(id) = self.waiter.take() {
            self.sync.forget(id);
        }
    }
}

/// Future returned by [`Synchronizer::next_tick`].
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct NextTick {
    sync: Synchronizer,
    target: u64,
}

impl NextTick {
    pub(super) const fn new(sync: Synchronizer, seen: u64) -> Self {
        Self {
            sync,
            target: seen.saturating_add(1),
        }
    }
}

impl Future for NextTick {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.sync.poll_tick(self.target, cx.waker()) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
