//! Reference board calibration
//!
//! ESP32-C3 with a single Li-ion cell behind a 100K/100K divider and a
//! linear charger with an open-drain status output. Pin assignments
//! live in [`pins`]; everything the engine needs is collected into
//! [`DEFAULT_CONFIG`] so the firmware only wires peripherals.

pub mod pins;

use crate::config::{MeasConfig, Pins};
use crate::drivers::{FaultDetect, SocTable, VoltageDivider};

pub const DIVIDER: VoltageDivider = VoltageDivider::new(100_000, 100_000);

pub const LIMIT_LOW_MV: u16 = 3300;
pub const LIMIT_FULL_MV: u16 = 4150;

// Li-ion discharge curve at ~0.2C, 100 mV buckets from 3.0 V to 4.2 V
const LIION_SOC: [u8; 13] = [0, 1, 2, 4, 7, 12, 20, 40, 58, 72, 84, 94, 100];

pub const SOC_TABLE: SocTable = SocTable::new(3000, 100, &LIION_SOC);

// CSO blinks at ~1 Hz on a fault; six edges in 4 s is well past normal
// plug/charge/finish traffic.
pub const FAULT_DETECT: FaultDetect = FaultDetect {
    max_toggles: 6,
    window_ms: 4000,
};

pub const DEFAULT_CONFIG: MeasConfig = MeasConfig {
    pins: Pins {
        adc: pins::BATTERY_ADC,
        usb_detect: pins::USB_DETECT,
        charger_status: pins::CHARGER_STATUS,
        monitor_enable: pins::MONITOR_ENABLE,
    },
    divider: DIVIDER,
    limit_low_mv: LIMIT_LOW_MV,
    limit_full_mv: LIMIT_FULL_MV,
    soc: SOC_TABLE,
    charger_active_low: true,
    oversample: 4,
    fault: Some(FAULT_DETECT),
};

/// Default sampling period.
pub const MEAS_INTERVAL_MS: u32 = 30_000;
