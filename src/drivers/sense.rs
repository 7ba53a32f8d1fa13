// Hardware seams for the measurement engine
//
// The engine never touches peripherals directly. The tick context hands
// it a BatterySense (ADC + optional monitoring gate output), the pin-change
// context hands it ChargerPins. Both report failure through their own
// error type; the engine maps that to Error::HardwareFailure.

use core::fmt::Debug;

use embedded_hal::digital::InputPin;

use super::charger::ChargerInputs;
use crate::config::MeasConfig;

/// Source of battery pin readings.
pub trait BatterySense {
    type Error: Debug;

    /// Calibrated voltage at the ADC pin, in millivolts (before the
    /// divider is undone).
    fn read_pin_mv(&mut self) -> nb::Result<u16, Self::Error>;

    /// Drive the monitoring-enable gate. Only called when the
    /// configuration names a gate pin: switched on before the first read
    /// of a tick and off again after the last, also when a read failed.
    fn set_monitor_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        let _ = on;
        Ok(())
    }
}

/// Source of USB-detect and charger-status levels.
pub trait ChargerPins {
    type Error: Debug;

    fn read(&mut self) -> Result<ChargerInputs, Self::Error>;
}

/// USB-detect and charger-status inputs from any `embedded-hal` pins.
///
/// USB detect is high while connected. The charger status output is
/// active-low on most charger ICs (open drain), see `active_low`.
pub struct DigitalChargerPins<U, C> {
    usb_detect: U,
    charger_status: C,
    active_low: bool,
}

impl<U, C> DigitalChargerPins<U, C> {
    pub fn new(usb_detect: U, charger_status: C, active_low: bool) -> Self {
        Self {
            usb_detect,
            charger_status,
            active_low,
        }
    }

    /// Polarity taken from `config.charger_active_low`.
    pub fn from_config(usb_detect: U, charger_status: C, config: &MeasConfig) -> Self {
        Self::new(usb_detect, charger_status, config.charger_active_low)
    }

    pub fn pins_mut(&mut self) -> (&mut U, &mut C) {
        (&mut self.usb_detect, &mut self.charger_status)
    }
}

/// Error from either pin of a [`DigitalChargerPins`].
#[derive(Debug)]
pub enum PinError<U, C> {
    UsbDetect(U),
    ChargerStatus(C),
}

impl<U, C> ChargerPins for DigitalChargerPins<U, C>
where
    U: InputPin,
    C: InputPin,
{
    type Error = PinError<U::Error, C::Error>;

    fn read(&mut self) -> Result<ChargerInputs, Self::Error> {
        let usb_present = self.usb_detect.is_high().map_err(PinError::UsbDetect)?;
        let status_high = self
            .charger_status
            .is_high()
            .map_err(PinError::ChargerStatus)?;
        Ok(ChargerInputs {
            usb_present,
            charging: status_high != self.active_low,
        })
    }
}
