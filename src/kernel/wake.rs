// Wake flag signaling between ISRs and the main loop
//
// Tick and pin ISRs run the measurement engine, which queues events.
// Queueing sets EVENT; a full queue also sets OVERFLOW so the main loop
// can report the loss outside interrupt context. Critical section
// guards riscv32imc (no atomic RMW).

use core::sync::atomic::{AtomicBool, Ordering};

static WAKE_EVENT: AtomicBool = AtomicBool::new(false);
static WAKE_OVERFLOW: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeFlags {
    pub event: bool,
    pub overflow: bool,
}

fn take_wake_flags() -> Option<WakeFlags> {
    critical_section::with(|_| {
        let event = WAKE_EVENT.load(Ordering::Relaxed);
        let overflow = WAKE_OVERFLOW.load(Ordering::Relaxed);

        if !event && !overflow {
            return None;
        }

        WAKE_EVENT.store(false, Ordering::Relaxed);
        WAKE_OVERFLOW.store(false, Ordering::Relaxed);

        Some(WakeFlags { event, overflow })
    })
}

#[inline]
pub fn signal_event() {
    WAKE_EVENT.store(true, Ordering::Release);
}

#[inline]
pub fn signal_overflow() {
    WAKE_OVERFLOW.store(true, Ordering::Release);
}

#[inline]
pub fn wait_for_interrupt() {
    #[cfg(target_arch = "riscv32")]
    unsafe {
        core::arch::asm!("wfi", options(nomem, nostack));
    }

    #[cfg(not(target_arch = "riscv32"))]
    core::hint::spin_loop();
}

pub fn try_wake() -> Option<WakeFlags> {
    take_wake_flags()
}
