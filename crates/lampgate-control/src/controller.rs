//! Detection-triggered actuator controller.
//!
//! Consumes frame batches from one named upstream stage, debounces the
//! target label into a stable presence signal, and switches the relay:
//! - a run of consecutive target detections reaching the activation
//!   threshold switches the relay on,
//! - a detection gap while on arms a turn-off delay that absorbs flicker,
//! - an inactivity timer forces the relay off if the upstream pipeline
//!   stalls or stops reporting.
//!
//! Every check-then-act sequence touching the relay runs under the state
//! lock, including timer callbacks, so device transitions are totally
//! ordered. The live device state is re-read before every transition; it is
//! never trusted from cache.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use lampgate_core::config::ControlConfig;
use lampgate_core::{ActuatorState, DetectionRecord, FrameInput};
use lampgate_relay::RelayDevice;

use crate::debounce::DebounceCounter;
use crate::timers::TimerSet;

/// Controller driving one relay output from one detection stream.
///
/// Created once at component startup; timers live until [`shutdown`].
///
/// [`shutdown`]: ActuatorController::shutdown
pub struct ActuatorController<R: RelayDevice + 'static> {
    relay: Arc<R>,
    config: ControlConfig,
    /// State lock: guards the debounce counter and every read-modify-write
    /// of the relay, held across the full check-then-act sequence.
    counter: Arc<Mutex<DebounceCounter>>,
    timers: Arc<TimerSet>,
}

impl<R: RelayDevice + 'static> ActuatorController<R> {
    pub fn new(relay: Arc<R>, config: ControlConfig) -> Self {
        Self {
            relay,
            config,
            counter: Arc::new(Mutex::new(DebounceCounter::new())),
            timers: Arc::new(TimerSet::new()),
        }
    }

    /// Force the relay off so the device starts in a known state.
    ///
    /// Best effort: an unreachable device is logged and startup proceeds.
    pub async fn initialize(&self) {
        let _counter = self.counter.lock().await;
        match self.relay.set_state(ActuatorState::Off).await {
            Ok(()) => info!("Relay forced off at startup"),
            Err(e) => warn!(error = %e, "Could not force relay off at startup"),
        }
    }

    /// Process one batch of frame inputs.
    ///
    /// Each item is decoded independently; a malformed item is logged and
    /// skipped without aborting its siblings. Never fails or panics -- the
    /// returned mapping is always empty, the controller acts purely by side
    /// effect on the device.
    pub async fn process_inputs(
        &self,
        inputs: &[serde_json::Value],
    ) -> serde_json::Map<String, serde_json::Value> {
        for (idx, item) in inputs.iter().enumerate() {
            let frame: FrameInput = match serde_json::from_value(item.clone()) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(item = idx, error = %e, "Skipping frame input that failed to decode");
                    continue;
                }
            };
            self.process_frame(&frame).await;
        }
        serde_json::Map::new()
    }

    /// Cancel both timers. In-flight device calls complete naturally.
    pub fn shutdown(&self) {
        self.timers.shutdown();
        info!("Actuator controller shut down");
    }

    async fn process_frame(&self, frame: &FrameInput) {
        for record in frame.detections(&self.config.stage_name) {
            self.handle_record(record).await;
        }
    }

    /// Apply one detection record to the state machine.
    async fn handle_record(&self, record: &DetectionRecord) {
        let mut counter = self.counter.lock().await;

        if record.label == self.config.target_label {
            // The target is back: a pending turn-off must not fire.
            self.timers.cancel_turn_off();

            let count = counter.increment();
            if count < self.config.activation_threshold {
                debug!(count, "Target detected, below activation threshold");
                return;
            }
            counter.reset();

            match self.relay.get_state().await {
                Ok(ActuatorState::Off) => match self.relay.set_state(ActuatorState::On).await {
                    Ok(()) => {
                        info!(label = %record.label, "Relay switched on");
                        self.arm_inactivity_timer();
                    }
                    Err(e) => error!(error = %e, "Failed to switch relay on"),
                },
                Ok(ActuatorState::On) => {
                    // Already on: extend the activity window.
                    self.arm_inactivity_timer();
                }
                Err(e) => warn!(error = %e, "Relay state unknown; activation skipped"),
            }
        } else {
            counter.reset();

            match self.relay.get_state().await {
                Ok(ActuatorState::On) => self.arm_turn_off_timer(),
                Ok(ActuatorState::Off) => {}
                Err(e) => {
                    warn!(error = %e, "Relay state unknown; turn-off scheduling skipped")
                }
            }
        }
    }

    /// Re-arm the safety net that forces the relay off after a quiet period.
    fn arm_inactivity_timer(&self) {
        let relay = Arc::clone(&self.relay);
        let counter = Arc::clone(&self.counter);
        self.timers
            .arm_inactivity(self.config.inactivity_timeout(), async move {
                let mut counter = counter.lock().await;
                match relay.get_state().await {
                    Ok(ActuatorState::On) => match relay.set_state(ActuatorState::Off).await {
                        Ok(()) => {
                            counter.reset();
                            info!("Relay switched off after inactivity window");
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to switch relay off after inactivity")
                        }
                    },
                    Ok(ActuatorState::Off) => {}
                    Err(e) => warn!(error = %e, "Relay state unknown; inactivity turn-off skipped"),
                }
            });
    }

    /// Arm the grace period before switching off after the target vanished.
    fn arm_turn_off_timer(&self) {
        let relay = Arc::clone(&self.relay);
        let counter = Arc::clone(&self.counter);
        self.timers
            .arm_turn_off(self.config.turn_off_delay(), async move {
                // Serialize with the frame path even though the counter
                // itself is untouched here.
                let _counter = counter.lock().await;
                match relay.get_state().await {
                    Ok(ActuatorState::On) => match relay.set_state(ActuatorState::Off).await {
                        Ok(()) => info!("Relay switched off after detection gap"),
                        Err(e) => error!(error = %e, "Failed to switch relay off after gap"),
                    },
                    Ok(ActuatorState::Off) => {}
                    Err(e) => warn!(error = %e, "Relay state unknown; delayed turn-off skipped"),
                }
            });
    }
}
