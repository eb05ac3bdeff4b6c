//! Cancellable one-shot timers for the actuator controller.
//!
//! Two independent timers: the inactivity timer forces the relay off after a
//! quiet period, and the turn-off delay timer postpones switching off after
//! the target disappears. Arming a timer cancels and replaces any prior
//! instance of the same timer, so at most one of each exists at any instant.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Default)]
struct Slots {
    inactivity: Option<Arc<Notify>>,
    turn_off: Option<Arc<Notify>>,
}

/// Owner of the two controller timers.
///
/// The slot mutex is the timer-lifecycle lock: it guards arm/cancel of the
/// timer handles only, never device state. Callbacks fire at most once, on a
/// scheduler task distinct from the frame-processing path; once a callback
/// has started, cancellation no longer affects it.
#[derive(Default)]
pub struct TimerSet {
    slots: Mutex<Slots>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the inactivity timer, replacing any pending instance.
    pub fn arm_inactivity<F>(&self, after: Duration, on_fire: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut slots = self.slots.lock().expect("timer mutex poisoned");
        Self::arm(&mut slots.inactivity, after, on_fire);
    }

    /// Arm the turn-off delay timer, replacing any pending instance.
    pub fn arm_turn_off<F>(&self, after: Duration, on_fire: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut slots = self.slots.lock().expect("timer mutex poisoned");
        Self::arm(&mut slots.turn_off, after, on_fire);
    }

    /// Cancel the inactivity timer. No-op if not armed.
    pub fn cancel_inactivity(&self) {
        let mut slots = self.slots.lock().expect("timer mutex poisoned");
        Self::cancel(&mut slots.inactivity);
    }

    /// Cancel the turn-off delay timer. No-op if not armed.
    pub fn cancel_turn_off(&self) {
        let mut slots = self.slots.lock().expect("timer mutex poisoned");
        Self::cancel(&mut slots.turn_off);
    }

    /// Cancel both timers.
    pub fn shutdown(&self) {
        let mut slots = self.slots.lock().expect("timer mutex poisoned");
        Self::cancel(&mut slots.inactivity);
        Self::cancel(&mut slots.turn_off);
    }

    fn arm<F>(slot: &mut Option<Arc<Notify>>, after: Duration, on_fire: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = Arc::new(Notify::new());
        let cancelled = Arc::clone(&cancel);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => on_fire.await,
                _ = cancelled.notified() => {}
            }
        });
        if let Some(prev) = slot.replace(cancel) {
            prev.notify_one();
        }
    }

    fn cancel(slot: &mut Option<Arc<Notify>>) {
        if let Some(handle) = slot.take() {
            handle.notify_one();
        }
    }
}
