// Battery measurement for USB-charged devices
//
// Periodic ADC sampling through a voltage divider, state of charge
// lookup, low/full threshold events and charger state tracking from
// two status pins. Hardware access stays behind small traits so the
// whole engine runs on the host under test.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod config;
pub mod drivers;
pub mod error;
pub mod kernel;

pub use config::MeasConfig;
pub use error::Error;
pub use kernel::{BattEvent, BattMeas, EventHandler, TickTimer};
