// Interrupt-safe home for the measurement handle
//
// The handle is created once at boot and leaked to 'static (StaticCell
// in the firmware). ISRs and the main loop reach it through a Slot;
// before install every access reports NotInitialized.

use core::cell::Cell;

use critical_section::Mutex;

use crate::error::Error;

pub struct Slot<T: 'static> {
    inner: Mutex<Cell<Option<&'static T>>>,
}

impl<T: 'static> Slot<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(None)),
        }
    }

    /// Install `value`, returning whatever was installed before.
    pub fn install(&self, value: &'static T) -> Option<&'static T> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(value)))
    }

    pub fn take(&self) -> Option<&'static T> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    pub fn get(&self) -> Result<&'static T, Error> {
        critical_section::with(|cs| self.inner.borrow(cs).get()).ok_or(Error::NotInitialized)
    }

    pub fn is_installed(&self) -> bool {
        self.get().is_ok()
    }
}

impl<T: 'static> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
