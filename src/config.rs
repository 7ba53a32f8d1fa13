//! Measurement configuration
//!
//! Built once at boot, validated by [`BattMeas::init`](crate::BattMeas::init)
//! and read-only afterwards. Nothing here is persisted.

use log::warn;

use crate::drivers::{FaultDetect, SocTable, ThresholdMonitor, VoltageDivider};
use crate::error::Error;

/// Pin identities.
///
/// `adc`, `usb_detect` and `charger_status` are informational: HALs hand
/// out typed pins, so the board glue claims them itself and only logs
/// these numbers. The engine reads `monitor_enable` to decide whether to
/// drive the gate around each conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// Analog input connected to the battery (through the divider)
    pub adc: u8,
    /// High while USB is connected
    pub usb_detect: u8,
    /// Charger "charging status output"
    pub charger_status: u8,
    /// Output that enables battery monitoring, e.g. switches the divider
    /// in. Driven active only while a sample is taken.
    pub monitor_enable: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasConfig {
    pub pins: Pins,
    pub divider: VoltageDivider,
    pub limit_low_mv: u16,
    pub limit_full_mv: u16,
    pub soc: SocTable,
    /// Charger status pin reads low while charging
    pub charger_active_low: bool,
    /// ADC reads averaged per tick, 0 behaves like 1
    pub oversample: u8,
    pub fault: Option<FaultDetect>,
}

impl MeasConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.divider.r2_ohm == 0 {
            return Err(Error::InvalidParam("divider.r2_ohm"));
        }
        if self.limit_low_mv > self.limit_full_mv {
            return Err(Error::InvalidParam("limit_low_mv > limit_full_mv"));
        }
        if self.soc.num_elements() == 0 {
            return Err(Error::InvalidParam("soc.levels"));
        }
        if self.soc.delta_mv == 0 {
            return Err(Error::InvalidParam("soc.delta_mv"));
        }
        if self.fault.is_some_and(|fd| !fd.fits_history()) {
            return Err(Error::InvalidParam("fault.max_toggles"));
        }
        if !self.soc.is_monotonic() {
            warn!("batt: state of charge table is not monotonic");
        }
        Ok(())
    }

    pub fn thresholds(&self) -> ThresholdMonitor {
        ThresholdMonitor::new(self.limit_low_mv, self.limit_full_mv)
    }

    pub fn samples_per_tick(&self) -> u8 {
        self.oversample.max(1)
    }

    pub fn has_monitor_gate(&self) -> bool {
        self.pins.monitor_enable.is_some()
    }
}
