//! Lampgate relay crate - access to the remote relay device.
//!
//! Provides the RelayDevice trait for reading and writing the relay output,
//! a MockRelayDevice for testing, and an HttpRelayClient speaking the
//! device's HTTP protocol.

pub mod error;
pub mod http;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use lampgate_core::ActuatorState;

pub use error::RelayError;
pub use http::HttpRelayClient;

/// Access to a relay output on a remote device.
///
/// The physical device holds the authoritative state; implementations never
/// cache it. No retry is performed inside the client -- retries are a
/// controller-level decision.
pub trait RelayDevice: Send + Sync {
    /// Read the live state of the relay output.
    fn get_state(
        &self,
    ) -> impl std::future::Future<Output = Result<ActuatorState, RelayError>> + Send;

    /// Switch the relay output. The physical actuator changes state only on
    /// success; on failure the state is unchanged.
    fn set_state(
        &self,
        state: ActuatorState,
    ) -> impl std::future::Future<Output = Result<(), RelayError>> + Send;
}

/// Mock relay device for testing.
///
/// Holds an in-memory state, records every `set_state` call, and can be told
/// to fail reads or writes.
#[derive(Debug)]
pub struct MockRelayDevice {
    state: Mutex<ActuatorState>,
    set_calls: Mutex<Vec<ActuatorState>>,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
}

impl MockRelayDevice {
    /// Create a mock device starting in the given state.
    pub fn new(initial: ActuatorState) -> Self {
        Self {
            state: Mutex::new(initial),
            set_calls: Mutex::new(Vec::new()),
            fail_get: AtomicBool::new(false),
            fail_set: AtomicBool::new(false),
        }
    }

    /// Every state written through `set_state`, in call order.
    pub fn set_calls(&self) -> Vec<ActuatorState> {
        self.set_calls.lock().expect("mock mutex poisoned").clone()
    }

    /// Current in-memory state.
    pub fn state(&self) -> ActuatorState {
        *self.state.lock().expect("mock mutex poisoned")
    }

    /// Make subsequent `get_state` calls fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set_state` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }
}

impl RelayDevice for MockRelayDevice {
    async fn get_state(&self) -> Result<ActuatorState, RelayError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(RelayError::DeviceUnreachable(
                "mock read failure".to_string(),
            ));
        }
        Ok(*self.state.lock().expect("mock mutex poisoned"))
    }

    async fn set_state(&self, state: ActuatorState) -> Result<(), RelayError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(RelayError::DeviceUnreachable(
                "mock write failure".to_string(),
            ));
        }
        *self.state.lock().expect("mock mutex poisoned") = state;
        self.set_calls
            .lock()
            .expect("mock mutex poisoned")
            .push(state);
        Ok(())
    }
}
