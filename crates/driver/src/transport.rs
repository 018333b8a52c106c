//! Transport traits — the boundary between the driver and the host's USB
//! stack.
//!
//! A [`Transport`] hands out [`Transfer`] resources (a reusable
//! asynchronous write bound to a fixed-size buffer), performs one-shot
//! fire-and-forget submissions, and runs the bounded synchronous writes
//! the command channel needs. Implementations decide how the bytes
//! actually move; [`mock::MockTransport`] is the in-memory implementation
//! the tests drive.

use std::time::Duration;

use crate::error::TransportError;

/// A reusable asynchronous write resource with a fixed-size buffer.
///
/// One transfer belongs to exactly one (effect slot, stage) pair for its
/// whole life. `cancel` before `submit` guarantees at most one submission
/// of this resource is ever in flight.
pub trait Transfer: Send {
    /// The backing buffer, sized at allocation time.
    fn buffer_mut(&mut self) -> &mut [u8];

    /// Queue the current buffer contents for delivery. Fire-and-forget:
    /// completion is not awaited and completion order across transfers is
    /// not defined.
    fn submit(&mut self) -> Result<(), TransportError>;

    /// Revoke a pending submission, if any. Idempotent.
    fn cancel(&mut self);
}

/// Byte pipe to the wheel.
pub trait Transport: Send + Sync {
    /// Allocate a transfer resource with a buffer of exactly `len` bytes.
    fn alloc_transfer(&self, len: usize) -> Result<Box<dyn Transfer>, TransportError>;

    /// One-shot asynchronous write whose resources are released on
    /// completion.
    fn submit_transient(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Bounded synchronous write on the command pipe.
    fn write_interrupt(&self, data: &[u8], timeout: Duration) -> Result<(), TransportError>;

    /// Bounded synchronous vendor control read.
    fn read_control(
        &self,
        request: u8,
        request_type: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

pub mod mock {
    //! In-memory transport for tests: records all traffic and injects
    //! failures on demand.

    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Default)]
    struct MockState {
        interrupt_writes: Vec<Vec<u8>>,
        submissions: Vec<(usize, Vec<u8>)>,
        transient: Vec<Vec<u8>>,
        control_responses: VecDeque<Vec<u8>>,
        pending: Vec<usize>,
        live_transfers: usize,
        next_transfer_id: usize,
        alloc_budget: Option<usize>,
        submits_until_failure: Option<usize>,
        fail_interrupt_writes: bool,
    }

    /// Test transport recording every write, submission, and allocation.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Arc<Mutex<MockState>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Allow only `budget` further transfer allocations.
        pub fn limit_allocations(&self, budget: usize) {
            self.state.lock().alloc_budget = Some(budget);
        }

        /// Let `successes` more submissions succeed, then fail the rest.
        /// Applies to persistent and transient submissions alike.
        pub fn fail_submits_after(&self, successes: usize) {
            self.state.lock().submits_until_failure = Some(successes);
        }

        pub fn fail_interrupt_writes(&self, fail: bool) {
            self.state.lock().fail_interrupt_writes = fail;
        }

        /// Queue a response for the next control read.
        pub fn queue_control_response(&self, data: Vec<u8>) {
            self.state.lock().control_responses.push_back(data);
        }

        /// Synchronous command-pipe writes, in order.
        pub fn interrupt_writes(&self) -> Vec<Vec<u8>> {
            self.state.lock().interrupt_writes.clone()
        }

        /// Persistent-transfer submissions as (transfer id, bytes), in order.
        pub fn submissions(&self) -> Vec<(usize, Vec<u8>)> {
            self.state.lock().submissions.clone()
        }

        /// One-shot submissions, in order.
        pub fn transient_submissions(&self) -> Vec<Vec<u8>> {
            self.state.lock().transient.clone()
        }

        /// Submitted-but-not-cancelled transfer count.
        pub fn pending_transfers(&self) -> usize {
            self.state.lock().pending.len()
        }

        /// Allocated-and-not-yet-dropped transfer count.
        pub fn live_transfers(&self) -> usize {
            self.state.lock().live_transfers
        }
    }

    impl Transport for MockTransport {
        fn alloc_transfer(&self, len: usize) -> Result<Box<dyn Transfer>, TransportError> {
            let mut state = self.state.lock();
            if let Some(budget) = state.alloc_budget.as_mut() {
                if *budget == 0 {
                    return Err(TransportError::Exhausted);
                }
                *budget -= 1;
            }
            let id = state.next_transfer_id;
            state.next_transfer_id += 1;
            state.live_transfers += 1;
            Ok(Box::new(MockTransfer {
                id,
                buf: vec![0; len],
                state: Arc::clone(&self.state),
            }))
        }

        fn submit_transient(&self, data: &[u8]) -> Result<(), TransportError> {
            let mut state = self.state.lock();
            take_submit_token(&mut state)?;
            state.transient.push(data.to_vec());
            Ok(())
        }

        fn write_interrupt(&self, data: &[u8], _timeout: Duration) -> Result<(), TransportError> {
            let mut state = self.state.lock();
            if state.fail_interrupt_writes {
                return Err(TransportError::Io("injected write failure".into()));
            }
            state.interrupt_writes.push(data.to_vec());
            Ok(())
        }

        fn read_control(
            &self,
            _request: u8,
            _request_type: u8,
            _value: u16,
            _index: u16,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> Result<usize, TransportError> {
            let mut state = self.state.lock();
            match state.control_responses.pop_front() {
                Some(response) => {
                    let n = response.len().min(buf.len());
                    buf[..n].copy_from_slice(&response[..n]);
                    Ok(n)
                }
                None => Err(TransportError::Io("no queued control response".into())),
            }
        }
    }

    fn take_submit_token(state: &mut MockState) -> Result<(), TransportError> {
        if let Some(left) = state.submits_until_failure.as_mut() {
            if *left == 0 {
                return Err(TransportError::Io("injected submit failure".into()));
            }
            *left -= 1;
        }
        Ok(())
    }

    struct MockTransfer {
        id: usize,
        buf: Vec<u8>,
        state: Arc<Mutex<MockState>>,
    }

    impl Transfer for MockTransfer {
        fn buffer_mut(&mut self) -> &mut [u8] {
            &mut self.buf
        }

        fn submit(&mut self) -> Result<(), TransportError> {
            let mut state = self.state.lock();
            take_submit_token(&mut state)?;
            state.submissions.push((self.id, self.buf.clone()));
            if !state.pending.contains(&self.id) {
                state.pending.push(self.id);
            }
            Ok(())
        }

        fn cancel(&mut self) {
            self.state.lock().pending.retain(|&pending| pending != self.id);
        }
    }

    impl Drop for MockTransfer {
        fn drop(&mut self) {
            self.state.lock().live_transfers -= 1;
        }
    }

}
