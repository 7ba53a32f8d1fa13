// battmon entry point and main loop
//
// Boot sequence: logger -> hardware -> BattMeas -> charger sync -> enable
// Tick ISR (TIMG0) samples the battery, GPIO ISR feeds the charger state
// machine. Each ISR takes its hardware out of the static for the duration
// of the call, so the engine runs with interrupts enabled. Both push into
// EVENTS; the main loop sleeps on WFI and drains the queue when woken.

#![no_std]
#![no_main]

mod board;

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::time::{Duration, Instant};
use esp_hal::timer::PeriodicTimer;
use log::{info, warn};
use static_cell::StaticCell;

use battmon::board::{DEFAULT_CONFIG, MEAS_INTERVAL_MS};
use battmon::kernel::{Slot, try_wake, wait_for_interrupt};
use battmon::{BattEvent, BattMeas, TickTimer};

use crate::board::{Board, ChargerHw, SenseHw};

esp_bootloader_esp_idf::esp_app_desc!();

const EVENT_QUEUE_CAP: usize = 8;

type EventQueue = Channel<CriticalSectionRawMutex, BattEvent, EVENT_QUEUE_CAP>;
type Meas = BattMeas<'static, EventQueue, Timer0>;

static EVENTS: EventQueue = Channel::new();
static MEAS_CELL: StaticCell<Meas> = StaticCell::new();
static MEAS: Slot<Meas> = Slot::new();

static TIMER0: Mutex<RefCell<Option<PeriodicTimer<'static, esp_hal::Blocking>>>> =
    Mutex::new(RefCell::new(None));
static SENSE: Mutex<RefCell<Option<SenseHw>>> = Mutex::new(RefCell::new(None));
static CHARGER: Mutex<RefCell<Option<ChargerHw>>> = Mutex::new(RefCell::new(None));

/// TIMG0 timer0 as the sampling tick.
struct Timer0;

impl TickTimer for Timer0 {
    type Error = esp_hal::timer::Error;

    fn start(&mut self, period_ms: u32) -> Result<(), Self::Error> {
        critical_section::with(|cs| match TIMER0.borrow_ref_mut(cs).as_mut() {
            Some(timer) => timer.start(Duration::from_millis(period_ms as u64)),
            None => Ok(()),
        })
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        critical_section::with(|cs| match TIMER0.borrow_ref_mut(cs).as_mut() {
            Some(timer) => timer.cancel(),
            None => Ok(()),
        })
    }
}

fn now_ms() -> u32 {
    Instant::now().duration_since_epoch().as_millis() as u32
}

#[esp_hal::handler(priority = esp_hal::interrupt::Priority::Priority1)]
fn timer0_handler() {
    critical_section::with(|cs| {
        if let Some(timer) = TIMER0.borrow_ref_mut(cs).as_mut() {
            timer.clear_interrupt();
        }
    });

    let Ok(meas) = MEAS.get() else {
        return;
    };
    // the ADC busy-waits, keep interrupts on while sampling
    let Some(mut sense) = critical_section::with(|cs| SENSE.borrow_ref_mut(cs).take()) else {
        return;
    };
    meas.on_tick(&mut sense);
    critical_section::with(|cs| {
        SENSE.borrow_ref_mut(cs).replace(sense);
    });
}

#[esp_hal::handler(priority = esp_hal::interrupt::Priority::Priority1)]
fn gpio_handler() {
    let now = now_ms();
    let Some(mut hw) = critical_section::with(|cs| CHARGER.borrow_ref_mut(cs).take()) else {
        return;
    };
    if hw.take_interrupt() {
        if let Ok(meas) = MEAS.get() {
            // failure is logged by the engine; next edge retries
            let _ = meas.on_pin_change(&mut hw.pins, now);
        }
    }
    critical_section::with(|cs| {
        CHARGER.borrow_ref_mut(cs).replace(hw);
    });
}

fn handle_event(event: BattEvent) {
    match event {
        BattEvent::Data { valid: true, .. } => info!("{}", event),
        BattEvent::Data { valid: false, .. } => warn!("{}", event),
        BattEvent::LowBattery { .. } | BattEvent::ChargerError => warn!("{}", event),
        _ => info!("{}", event),
    }
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("booting...");

    let Board {
        sense,
        mut charger,
        mut timer,
        mut io,
    } = Board::init(peripherals, &DEFAULT_CONFIG);

    critical_section::with(|cs| {
        timer.set_interrupt_handler(timer0_handler);
        timer.listen();
        TIMER0.borrow_ref_mut(cs).replace(timer);
        SENSE.borrow_ref_mut(cs).replace(sense);
    });
    info!("hardware initialized.");

    let meas = match BattMeas::init(DEFAULT_CONFIG, &EVENTS, Timer0) {
        Ok(meas) => meas,
        Err(e) => panic!("battery config rejected: {}", e),
    };
    let meas: &'static Meas = MEAS_CELL.init(meas);
    MEAS.install(meas);

    // Arm edges first so nothing between the sync read and listen() is
    // lost; a pending edge replays the same reading, which is a no-op.
    charger.listen();
    if let Err(e) = meas.on_pin_change(&mut charger.pins, now_ms()) {
        warn!("charger sync failed: {}", e);
    }
    critical_section::with(|cs| {
        CHARGER.borrow_ref_mut(cs).replace(charger);
    });
    io.set_interrupt_handler(gpio_handler);

    if let Err(e) = meas.enable(MEAS_INTERVAL_MS) {
        warn!("sampling not started: {}", e);
    }
    info!("battmon ready.");

    loop {
        wait_for_interrupt();

        let Some(flags) = try_wake() else {
            continue;
        };
        if flags.overflow {
            warn!("event queue full, oldest events dropped");
        }
        while let Ok(event) = EVENTS.try_receive() {
            handle_event(event);
        }
    }
}
