use core::fmt;

/// Errors reported synchronously by the measurement API.
///
/// Runtime sampling failures never show up here; they are folded into
/// the event stream as `Data { valid: false, .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Rejected configuration or argument, names the offending field
    InvalidParam(&'static str),
    /// A hardware collaborator (timer, ADC, pin) reported failure
    HardwareFailure,
    /// enable/disable reached before a handle was installed
    NotInitialized,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParam(what) => write!(f, "invalid parameter: {}", what),
            Error::HardwareFailure => write!(f, "hardware failure"),
            Error::NotInitialized => write!(f, "not initialized"),
        }
    }
}
