// Measurement scheduling and event plumbing
//
// BattMeas owns the run-time state and is driven from two contexts:
// the sampling tick and the charger pin interrupt. Events leave
// through an EventHandler, normally a Channel drained by the main
// loop, which sleeps on WFI until wake flags are raised.

pub mod event;
pub mod monitor;
pub mod slot;
pub mod wake;

pub use event::{BattEvent, EventHandler};
pub use monitor::{BattMeas, MEAS_INTERVAL_LOW_LIMIT_MS, TickTimer};
pub use slot::Slot;
pub use wake::{WakeFlags, try_wake, wait_for_interrupt};
