// Li-ion battery voltage estimation
//
// The ADC pin sits between R1 (to the battery) and R2 (to GND), so the
// pin sees vbat * R2 / (R1 + R2). Scaling back is integer math on u64,
// rounded down. State of charge comes from a calibration vector with
// one entry every `delta_mv`, linearly interpolated between entries.

/// Resistive divider in front of the ADC pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageDivider {
    pub r1_ohm: u32,
    pub r2_ohm: u32,
}

impl VoltageDivider {
    /// Pin wired straight to the battery.
    pub const DIRECT: Self = Self {
        r1_ohm: 0,
        r2_ohm: 1,
    };

    pub const fn new(r1_ohm: u32, r2_ohm: u32) -> Self {
        Self { r1_ohm, r2_ohm }
    }

    /// Battery voltage for a calibrated ADC pin voltage.
    ///
    /// `adc_mv * (r1 + r2) / r2`, rounded down, saturating at `u16::MAX`.
    /// A zero `r2_ohm` yields 0; `MeasConfig::validate` rejects it earlier.
    pub fn adc_to_battery_mv(&self, adc_mv: u16) -> u16 {
        if self.r2_ohm == 0 {
            return 0;
        }
        let total = self.r1_ohm as u64 + self.r2_ohm as u64;
        let mv = adc_mv as u64 * total / self.r2_ohm as u64;
        mv.min(u16::MAX as u64) as u16
    }
}

/// Voltage to state of charge calibration.
///
/// `levels[i]` is the remaining capacity in percent at
/// `first_element_mv + i * delta_mv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocTable {
    pub first_element_mv: u16,
    pub delta_mv: u16,
    pub levels: &'static [u8],
}

impl SocTable {
    pub const fn new(first_element_mv: u16, delta_mv: u16, levels: &'static [u8]) -> Self {
        Self {
            first_element_mv,
            delta_mv,
            levels,
        }
    }

    pub const fn num_elements(&self) -> usize {
        self.levels.len()
    }

    /// Start of the last bucket; lookups at or above it report 100%.
    pub fn last_bucket_mv(&self) -> u32 {
        let n = self.levels.len().saturating_sub(1) as u32;
        self.first_element_mv as u32 + n * self.delta_mv as u32
    }

    pub fn is_monotonic(&self) -> bool {
        self.levels.windows(2).all(|w| w[0] <= w[1])
    }

    /// Remaining capacity in percent, always within 0..=100.
    pub fn lookup(&self, battery_mv: u16) -> u8 {
        let n = self.levels.len();
        if n == 0 || self.delta_mv == 0 || battery_mv < self.first_element_mv {
            return 0;
        }

        let offset = (battery_mv - self.first_element_mv) as u32;
        let delta = self.delta_mv as u32;
        let i = (offset / delta) as usize;
        if i >= n - 1 {
            return 100;
        }

        let lo = self.levels[i] as i32;
        let hi = self.levels[i + 1] as i32;
        let frac = (offset % delta) as i32;
        let pct = lo + (hi - lo) * frac / delta as i32;
        pct.clamp(0, 100) as u8
    }
}
