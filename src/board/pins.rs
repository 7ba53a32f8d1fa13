//! GPIO |     Function      |      Notes
//! -----+-------------------+----------------------------------
//!  0   | ADC1 - Battery    | Voltage divider (2x100K), reads 1/2 actual voltage
//!  3   | Charger CSO       | Open drain, LOW while charging, internal pullup
//! 20   | USB detect        | HIGH while VBUS is present

// ----- Battery -----
pub const BATTERY_ADC: u8 = 0; // GPIO0 - voltage divider, 1/2 of battery voltage

// ----- Charger -----
pub const CHARGER_STATUS: u8 = 3; // active LOW
pub const USB_DETECT: u8 = 20;

// ----- Monitoring gate -----
// The divider is permanently connected on this board.
pub const MONITOR_ENABLE: Option<u8> = None;
