/*!
 * Single-exchange state machine.
 *
 * Each session owns two of these, one for translation and one for audio.
 * A flow is `Idle` or `Requested`; completion passes through `Succeeded` or
 * `Failed` within the tick that observes it and settles back to `Idle`.
 * Starting a request while one is in flight is refused; callers check state
 * first, there is no internal queuing.
 */

use bytes::Bytes;

use crate::errors::{ProviderError, SessionError};
use crate::transport::{ExchangePoll, PendingExchange};

/// Observable state of an exchange flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Nothing in flight
    Idle,
    /// An exchange is in flight, waiting on the transport
    Requested,
    /// The last exchange completed successfully (transient, within a tick)
    Succeeded,
    /// The last exchange failed (transient, within a tick)
    Failed,
}

/// One serialized exchange: at most one request in flight at a time
#[derive(Default)]
pub struct ExchangeFlow {
    state: FlowState,
    pending: Option<PendingExchange>,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ExchangeFlow {
    /// Create an idle flow
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Whether an exchange is in flight
    pub fn is_requested(&self) -> bool {
        self.state == FlowState::Requested
    }

    /// Start an exchange
    ///
    /// # Errors
    /// `SessionError::ExchangeInFlight` if one is already in flight.
    pub fn begin(&mut self, exchange: PendingExchange) -> Result<(), SessionError> {
        if self.is_requested() {
            return Err(SessionError::ExchangeInFlight);
        }
        self.pending = Some(exchange);
        self.state = FlowState::Requested;
        Ok(())
    }

    /// Poll the in-flight exchange, if any
    ///
    /// Returns `Some(result)` exactly once when the exchange completes; the
    /// flow moves to `Succeeded`/`Failed` and the caller settles it back to
    /// idle with [`ExchangeFlow::settle`] after handling the result.
    /// Transport errors complete the flow as `Failed` rather than leaving it
    /// stuck in `Requested`.
    pub fn poll(&mut self) -> Option<Result<Bytes, ProviderError>> {
        let pending = self.pending.as_mut()?;
        match pending.poll() {
            ExchangePoll::Pending => None,
            ExchangePoll::Finished(result) => {
                self.pending = None;
                self.state = if result.is_ok() {
                    FlowState::Succeeded
                } else {
                    FlowState::Failed
                };
                Some(result)
            }
        }
    }

    /// Mark a completed exchange as handled, returning the flow to idle
    pub fn settle(&mut self) {
        if self.state != FlowState::Requested {
            self.state = FlowState::Idle;
        }
    }

    /// Mark the handled completion as failed, then return to idle
    ///
    /// Used when the payload arrived but parsing or layout rejected it.
    pub fn settle_failed(&mut self) {
        self.state = FlowState::Idle;
    }

    /// Abandon any in-flight exchange, aborting its task
    pub fn abandon(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        self.state = FlowState::Idle;
    }
}
