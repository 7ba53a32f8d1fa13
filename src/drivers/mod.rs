// Measurement building blocks, board-independent.
//
// Pure conversion and state tracking; the only hardware contact is
// through the traits in `sense`.

pub mod battery;
pub mod charger;
pub mod sense;
pub mod threshold;

pub use battery::{SocTable, VoltageDivider};
pub use charger::{ChargeEvent, ChargeState, ChargeStateMachine, ChargerInputs, FaultDetect};
pub use sense::{BatterySense, ChargerPins, DigitalChargerPins};
pub use threshold::{Crossing, Side, ThresholdMonitor};
