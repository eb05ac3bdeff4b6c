//! Lampgate control crate - debounce, timers, and the actuator controller.
//!
//! Consumes per-frame detection batches, debounces them into a stable
//! presence signal, and drives the relay device accordingly. The controller
//! guarantees the relay is never left on indefinitely: an inactivity timer
//! forces it off after a quiet period, and a turn-off delay absorbs brief
//! detection gaps without oscillating the output.

pub mod controller;
pub mod debounce;
pub mod timers;

pub use controller::ActuatorController;
pub use debounce::DebounceCounter;
pub use timers::TimerSet;
