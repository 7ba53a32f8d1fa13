// Edge-triggered low/full limit detection
//
// One side per sample: at or below the low limit is Low, at or above the
// full limit is Full, anything between is Normal. A crossing is reported
// only when the side changes into Low or Full; lingering there, or coming
// back to Normal, is silent.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Low,
    #[default]
    Normal,
    Full,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Low => f.write_str("low"),
            Side::Normal => f.write_str("normal"),
            Side::Full => f.write_str("full"),
        }
    }
}

/// Edge reported by [`ThresholdMonitor::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Low,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdMonitor {
    pub low_mv: u16,
    pub full_mv: u16,
}

impl ThresholdMonitor {
    /// `low_mv <= full_mv` is checked by `MeasConfig::validate`.
    pub const fn new(low_mv: u16, full_mv: u16) -> Self {
        Self { low_mv, full_mv }
    }

    pub fn side_of(&self, mv: u16) -> Side {
        if mv <= self.low_mv {
            Side::Low
        } else if mv >= self.full_mv {
            Side::Full
        } else {
            Side::Normal
        }
    }

    /// New side for `mv`, plus the crossing to report if the side just
    /// changed into one of the extremes.
    pub fn evaluate(&self, mv: u16, prior: Side) -> (Side, Option<Crossing>) {
        let side = self.side_of(mv);
        let crossing = match side {
            _ if side == prior => None,
            Side::Low => Some(Crossing::Low),
            Side::Full => Some(Crossing::Full),
            Side::Normal => None,
        };
        (side, crossing)
    }
}
