// USB / charger status tracking
//
// Two digital levels come in on every pin-change interrupt: USB present
// and the charger's status output (CSO). USB presence is applied first,
// then the charger status, so a single reading can walk UsbAbsent ->
// UsbPresentNotCharging -> Charging and still report one event.
// Repeated identical readings are no-ops.
//
// Fault detection is a heuristic: the charger IC signals errors by
// toggling CSO, which we see as many status edges in a short window.
// The limits need calibrating against the actual charger datasheet.

use core::fmt;

/// Sampled pin levels, already corrected for polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChargerInputs {
    pub usb_present: bool,
    pub charging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    #[default]
    UsbAbsent,
    UsbPresentNotCharging,
    Charging,
    ChargingFinished,
    ChargerFault,
}

impl ChargeState {
    pub const fn usb_present(self) -> bool {
        !matches!(self, ChargeState::UsbAbsent)
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChargeState::UsbAbsent => "usb absent",
            ChargeState::UsbPresentNotCharging => "usb present",
            ChargeState::Charging => "charging",
            ChargeState::ChargingFinished => "charging finished",
            ChargeState::ChargerFault => "charger fault",
        };
        f.write_str(name)
    }
}

/// Externally visible outcome of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeEvent {
    ChargingStarted,
    ChargingFinished,
    UsbDisconnected,
    ChargerError,
}

/// Edge timestamps kept for fault detection. `max_toggles` must stay
/// below this.
pub const TOGGLE_HISTORY: usize = 16;

/// More than `max_toggles` charger status edges within any `window_ms`
/// span while USB is present is treated as a charger fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultDetect {
    pub max_toggles: u8,
    pub window_ms: u32,
}

impl FaultDetect {
    pub const fn fits_history(&self) -> bool {
        (self.max_toggles as usize) < TOGGLE_HISTORY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChargeStateMachine {
    state: ChargeState,
    // last charger status level seen while USB was present
    last_charging: bool,
    // ring of recent status edge times, `edge_head` is the next slot
    edges: [u32; TOGGLE_HISTORY],
    edge_head: u8,
    edge_count: u8,
}

impl ChargeStateMachine {
    pub const fn new() -> Self {
        Self {
            state: ChargeState::UsbAbsent,
            last_charging: false,
            edges: [0; TOGGLE_HISTORY],
            edge_head: 0,
            edge_count: 0,
        }
    }

    pub fn state(&self) -> ChargeState {
        self.state
    }

    /// Feed one pin reading taken at `now_ms` (free-running, may wrap).
    pub fn update(
        &mut self,
        inputs: ChargerInputs,
        now_ms: u32,
        fault: Option<FaultDetect>,
    ) -> Option<ChargeEvent> {
        if !inputs.usb_present {
            let was = self.state;
            *self = Self::new();
            return match was {
                ChargeState::UsbAbsent => None,
                _ => Some(ChargeEvent::UsbDisconnected),
            };
        }

        if self.state == ChargeState::UsbAbsent {
            self.state = ChargeState::UsbPresentNotCharging;
            self.last_charging = false;
            self.edge_head = 0;
            self.edge_count = 0;
        }

        if inputs.charging != self.last_charging {
            self.last_charging = inputs.charging;
            if let Some(fd) = fault {
                if self.count_toggle(now_ms, fd) && self.state != ChargeState::ChargerFault {
                    self.state = ChargeState::ChargerFault;
                    return Some(ChargeEvent::ChargerError);
                }
            }
        }

        match (self.state, inputs.charging) {
            (ChargeState::UsbPresentNotCharging | ChargeState::ChargingFinished, true) => {
                self.state = ChargeState::Charging;
                Some(ChargeEvent::ChargingStarted)
            }
            (ChargeState::Charging, false) => {
                self.state = ChargeState::ChargingFinished;
                Some(ChargeEvent::ChargingFinished)
            }
            _ => None,
        }
    }

    // true when this edge and the `max_toggles` before it all fall
    // within one window
    fn count_toggle(&mut self, now_ms: u32, fd: FaultDetect) -> bool {
        let head = self.edge_head as usize;
        self.edges[head] = now_ms;
        self.edge_head = ((head + 1) % TOGGLE_HISTORY) as u8;
        if (self.edge_count as usize) < TOGGLE_HISTORY {
            self.edge_count += 1;
        }

        if !fd.fits_history() {
            return false;
        }
        let span = fd.max_toggles as usize + 1;
        if (self.edge_count as usize) < span {
            return false;
        }
        let oldest = (head + TOGGLE_HISTORY + 1 - span) % TOGGLE_HISTORY;
        now_ms.wrapping_sub(self.edges[oldest]) <= fd.window_ms
    }
}
