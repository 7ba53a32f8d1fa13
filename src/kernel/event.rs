// Battery events and their delivery
//
// Handlers run synchronously in whichever context produced the event
// (sampling tick or pin interrupt) and must not block. The usual
// handler is a Channel: the ISR side pushes, the main loop drains with
// try_receive() after a wake.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use super::wake;
use crate::drivers::ChargeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattEvent {
    /// Periodic report. `valid` is false when no conversion took place
    /// (gate or ADC failure); the other fields are then 0.
    Data {
        voltage_mv: u16,
        level_percent: u8,
        valid: bool,
    },
    /// Voltage dropped to or below the low limit
    LowBattery { voltage_mv: u16 },
    /// Voltage reached the full limit
    FullBattery { voltage_mv: u16 },
    UsbChargingStarted,
    UsbChargingFinished,
    UsbDisconnected,
    ChargerError,
}

impl BattEvent {
    pub const fn invalid_data() -> Self {
        BattEvent::Data {
            voltage_mv: 0,
            level_percent: 0,
            valid: false,
        }
    }
}

impl From<ChargeEvent> for BattEvent {
    fn from(ev: ChargeEvent) -> Self {
        match ev {
            ChargeEvent::ChargingStarted => BattEvent::UsbChargingStarted,
            ChargeEvent::ChargingFinished => BattEvent::UsbChargingFinished,
            ChargeEvent::UsbDisconnected => BattEvent::UsbDisconnected,
            ChargeEvent::ChargerError => BattEvent::ChargerError,
        }
    }
}

impl fmt::Display for BattEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattEvent::Data {
                voltage_mv,
                level_percent,
                valid: true,
            } => write!(f, "Data({}mV, {}%)", voltage_mv, level_percent),
            BattEvent::Data { valid: false, .. } => write!(f, "Data(not measured)"),
            BattEvent::LowBattery { voltage_mv } => write!(f, "LowBattery({}mV)", voltage_mv),
            BattEvent::FullBattery { voltage_mv } => write!(f, "FullBattery({}mV)", voltage_mv),
            BattEvent::UsbChargingStarted => write!(f, "UsbChargingStarted"),
            BattEvent::UsbChargingFinished => write!(f, "UsbChargingFinished"),
            BattEvent::UsbDisconnected => write!(f, "UsbDisconnected"),
            BattEvent::ChargerError => write!(f, "ChargerError"),
        }
    }
}

/// Receiver of battery events.
pub trait EventHandler {
    fn on_event(&self, event: BattEvent);
}

impl<F> EventHandler for F
where
    F: Fn(BattEvent),
{
    fn on_event(&self, event: BattEvent) {
        self(event)
    }
}

/// Queue for the main loop. When full the oldest event is dropped so
/// the newest reading always gets through.
impl<M: RawMutex, const N: usize> EventHandler for Channel<M, BattEvent, N> {
    fn on_event(&self, event: BattEvent) {
        if let Err(TrySendError::Full(event)) = self.try_send(event) {
            let _ = self.try_receive();
            let _ = self.try_send(event);
            wake::signal_overflow();
        }
        wake::signal_event();
    }
}
