//! Shared state handed to every command handler.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use lookout_tree::{ElementTree, ResolvePolicy, TreeSource};
use tracing::debug;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use crate::data::DataHandler;
use crate::sync::Synchronizer;

/// Collaborators and settings available to handlers while they run.
pub struct DriverContext {
    tree: Rc<dyn TreeSource>,
    sync: Synchronizer,
    frame_sync: Cell<bool>,
    finder_timeout: Duration,
    policy: ResolvePolicy,
    data_handler: Option<Rc<dyn DataHandler>>,
}

impl DriverContext {
    pub(crate) fn new(
        tree: Rc<dyn TreeSource>,
        sync: Synchronizer,
        frame_sync: bool,
        finder_timeout: Duration,
        policy: ResolvePolicy,
        data_handler: Option<Rc<dyn DataHandler>>,
    ) -> Self {
        Self {
            tree,
            sync,
            frame_sync: Cell::new(frame_sync),
            finder_timeout,
            policy,
            data_handler,
        }
    }

    /// Returns a fresh snapshot of the live tree.
    pub fn snapshot(&self) -> Rc<dyn ElementTree> {
        self.tree.snapshot()
    }

    /// Returns the quiescence synchronizer.
    pub const fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    /// Returns whether finder commands wait for an idle frame first.
    pub fn frame_sync(&self) -> bool {
        self.frame_sync.get()
    }

    /// Enables or disables frame synchronisation for later commands.
    pub fn set_frame_sync(&self, enabled: bool) {
        self.frame_sync.set(enabled);
    }

    /// Returns the polling window used when a command names no timeout.
    pub const fn finder_timeout(&self) -> Duration {
        self.finder_timeout
    }

    /// Returns the visibility rules for resolution.
    pub const fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// Returns the application's data handler, if one is registered.
    pub fn data_handler(&self) -> Option<&Rc<dyn DataHandler>> {
        self.data_handler.as_ref()
    }

    /// Returns the host-clock instant `timeout` from now.
    pub fn deadline_after(&self, timeout: Duration) -> Duration {
        self.sync
            .now()
            .checked_add(timeout)
            .unwrap_or(Duration::MAX)
    }

    /// Runs `attempt` against fresh snapshots until it succeeds, fails for
    /// good, or the polling window closes.
    ///
    /// An explicit `timeout` always bounds the search, so a zero timeout
    /// means "now". Without one the configured finder timeout applies, and a
    /// zero configured timeout leaves the idle wait unbounded.
    ///
    /// With frame sync enabled each attempt first waits for an idle frame.
    /// If the window closes before the application settles the command fails
    /// with the wait timeout. A retryable failure is retried after the next
    /// tick while the window is open; once it closes the most recent failure
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns the idle-wait timeout, or whatever `attempt` last returned.
    pub async fn poll_tree<T>(
        &self,
        timeout: Option<Duration>,
        mut attempt: impl FnMut(&dyn ElementTree) -> Result<T, DispatchError>,
    ) -> Result<T, DispatchError> {
        let deadline = match timeout {
            Some(limit) => Some(self.deadline_after(limit)),
            None if self.finder_timeout.is_zero() => None,
            None => Some(self.deadline_after(self.finder_timeout)),
        };
        let mut attempts: u32 = 0;
        loop {
            if self.frame_sync() {
                if let Err(elapsed) = self.sync.wait_until_idle(deadline).await {
                    debug!(target: DISPATCH_TARGET, attempts, %elapsed, "application never settled");
                    return Err(elapsed.into());
                }
            }

            attempts = attempts.saturating_add(1);
            let snapshot = self.snapshot();
            let open = deadline.is_some_and(|limit| self.sync.now() < limit);
            match attempt(snapshot.as_ref()) {
                Ok(value) => return Ok(value),
                Err(error) if open && error.is_retryable() => {
                    debug!(target: DISPATCH_TARGET, attempts, %error, "retrying after next tick");
                    self.sync.next_tick().await;
                }
                Err(error) => {
                    debug!(target: DISPATCH_TARGET, attempts, %error, "giving up");
                    return Err(error);
                }
            }
        }
    }
}
