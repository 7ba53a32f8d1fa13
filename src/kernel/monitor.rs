//! Measurement scheduler
//!
//! [`BattMeas`] is the handle returned by [`BattMeas::init`]. It owns the
//! validated configuration, the tick timer and the two pieces of mutable
//! state:
//!
//! - sampling state (enabled, interval, last reported threshold side),
//!   touched by `enable`/`disable` and the tick context
//! - the charger state machine, touched only by the pin context
//!
//! Each lives in its own critical-section mutex, so a tick and a pin
//! interrupt never see a half-updated machine. Handlers are called after
//! the critical section is released.

use core::cell::{Cell, RefCell};
use core::fmt::Debug;

use critical_section::Mutex;
use log::{debug, info, warn};

use super::event::{BattEvent, EventHandler};
use crate::config::MeasConfig;
use crate::drivers::{
    BatterySense, ChargeState, ChargeStateMachine, ChargerPins, Crossing, Side, ThresholdMonitor,
};
use crate::error::Error;

/// Shortest sampling period the ADC front end supports.
pub const MEAS_INTERVAL_LOW_LIMIT_MS: u32 = 50;

/// Periodic tick source driving [`BattMeas::on_tick`].
pub trait TickTimer {
    type Error: Debug;

    /// Start (or restart) firing every `period_ms`.
    fn start(&mut self, period_ms: u32) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy)]
struct Sampling {
    enabled: bool,
    interval_ms: u32,
    side: Side,
}

pub struct BattMeas<'a, H: ?Sized, T> {
    config: MeasConfig,
    thresholds: ThresholdMonitor,
    handler: &'a H,
    timer: Mutex<RefCell<T>>,
    sampling: Mutex<Cell<Sampling>>,
    charge: Mutex<Cell<ChargeStateMachine>>,
}

impl<'a, H, T> BattMeas<'a, H, T>
where
    H: EventHandler + ?Sized,
    T: TickTimer,
{
    /// Validate `config` and build a disabled handle.
    pub fn init(config: MeasConfig, handler: &'a H, timer: T) -> Result<Self, Error> {
        config.validate()?;

        info!(
            "batt: init, divider {}/{} ohm, limits {}..{} mV, {} soc points",
            config.divider.r1_ohm,
            config.divider.r2_ohm,
            config.limit_low_mv,
            config.limit_full_mv,
            config.soc.num_elements()
        );

        Ok(Self {
            thresholds: config.thresholds(),
            config,
            handler,
            timer: Mutex::new(RefCell::new(timer)),
            sampling: Mutex::new(Cell::new(Sampling {
                enabled: false,
                interval_ms: 0,
                side: Side::Normal,
            })),
            charge: Mutex::new(Cell::new(ChargeStateMachine::new())),
        })
    }

    /// Start sampling every `interval_ms`. Calling again restarts the
    /// timer with the new period. The threshold side starts over at
    /// Normal, so a battery that is already low reports LowBattery on
    /// the first tick.
    pub fn enable(&self, interval_ms: u32) -> Result<(), Error> {
        if interval_ms < MEAS_INTERVAL_LOW_LIMIT_MS {
            return Err(Error::InvalidParam("interval_ms"));
        }

        critical_section::with(|cs| -> Result<(), Error> {
            self.timer
                .borrow_ref_mut(cs)
                .start(interval_ms)
                .map_err(|e| {
                    warn!("batt: timer start failed: {:?}", e);
                    Error::HardwareFailure
                })?;
            self.sampling.borrow(cs).set(Sampling {
                enabled: true,
                interval_ms,
                side: Side::Normal,
            });
            Ok(())
        })?;

        info!("batt: sampling every {}ms", interval_ms);
        Ok(())
    }

    /// Stop sampling. Charger events keep flowing.
    pub fn disable(&self) -> Result<(), Error> {
        critical_section::with(|cs| {
            let cell = self.sampling.borrow(cs);
            let mut st = cell.get();
            st.enabled = false;
            cell.set(st);

            self.timer.borrow_ref_mut(cs).stop().map_err(|e| {
                warn!("batt: timer stop failed: {:?}", e);
                Error::HardwareFailure
            })
        })?;

        info!("batt: sampling stopped");
        Ok(())
    }

    /// One sampling cycle, called from the tick context.
    ///
    /// Always reports a `Data` event while enabled; failures show up as
    /// `valid: false` instead of stopping the schedule. A tick that
    /// races with `disable` is dropped.
    pub fn on_tick<S>(&self, sense: &mut S)
    where
        S: BatterySense + ?Sized,
    {
        if !self.is_enabled() {
            return;
        }

        let reading = match self.measure(sense) {
            Ok(mv) => Some(mv),
            Err(e) => {
                warn!("batt: sample failed: {:?}", e);
                None
            }
        };

        let outcome = critical_section::with(|cs| {
            let cell = self.sampling.borrow(cs);
            let mut st = cell.get();
            if !st.enabled {
                return None;
            }
            let crossing = reading.and_then(|mv| {
                let (side, crossing) = self.thresholds.evaluate(mv, st.side);
                st.side = side;
                crossing
            });
            cell.set(st);
            Some(crossing)
        });
        let Some(crossing) = outcome else {
            return;
        };

        let data = match reading {
            Some(mv) => {
                let level_percent = self.config.soc.lookup(mv);
                debug!("batt: {}mV {}%", mv, level_percent);
                BattEvent::Data {
                    voltage_mv: mv,
                    level_percent,
                    valid: true,
                }
            }
            None => BattEvent::invalid_data(),
        };
        self.handler.on_event(data);

        if let (Some(crossing), Some(voltage_mv)) = (crossing, reading) {
            let event = match crossing {
                Crossing::Low => BattEvent::LowBattery { voltage_mv },
                Crossing::Full => BattEvent::FullBattery { voltage_mv },
            };
            info!("batt: {}", event);
            self.handler.on_event(event);
        }
    }

    /// Feed the charger state machine, called from the pin interrupt
    /// with a free-running millisecond timestamp.
    ///
    /// A failed pin read leaves the state untouched.
    pub fn on_pin_change<P>(&self, pins: &mut P, now_ms: u32) -> Result<ChargeState, Error>
    where
        P: ChargerPins + ?Sized,
    {
        let inputs = pins.read().map_err(|e| {
            warn!("batt: charger pin read failed: {:?}", e);
            Error::HardwareFailure
        })?;

        let (state, event) = critical_section::with(|cs| {
            let cell = self.charge.borrow(cs);
            let mut sm = cell.get();
            let event = sm.update(inputs, now_ms, self.config.fault);
            cell.set(sm);
            (sm.state(), event)
        });

        if let Some(event) = event {
            info!("batt: charger {}", state);
            self.handler.on_event(event.into());
        }
        Ok(state)
    }

    // Battery voltage in mV. The gate, if any, is active only around
    // the reads.
    fn measure<S>(&self, sense: &mut S) -> Result<u16, S::Error>
    where
        S: BatterySense + ?Sized,
    {
        if !self.config.has_monitor_gate() {
            return self.sample(sense);
        }

        sense.set_monitor_enable(true)?;
        let sample = self.sample(sense);
        if let Err(e) = sense.set_monitor_enable(false) {
            warn!("batt: monitoring gate left on: {:?}", e);
        }
        sample
    }

    fn sample<S>(&self, sense: &mut S) -> Result<u16, S::Error>
    where
        S: BatterySense + ?Sized,
    {
        let n = self.config.samples_per_tick() as u32;
        let mut sum: u32 = 0;
        for _ in 0..n {
            sum += nb::block!(sense.read_pin_mv())? as u32;
        }
        let adc_mv = (sum / n) as u16;
        Ok(self.config.divider.adc_to_battery_mv(adc_mv))
    }

    pub fn is_enabled(&self) -> bool {
        critical_section::with(|cs| self.sampling.borrow(cs).get().enabled)
    }

    /// Current sampling period, 0 before the first `enable`.
    pub fn interval_ms(&self) -> u32 {
        critical_section::with(|cs| self.sampling.borrow(cs).get().interval_ms)
    }

    /// Threshold side of the last valid sample.
    pub fn side(&self) -> Side {
        critical_section::with(|cs| self.sampling.borrow(cs).get().side)
    }

    pub fn charge_state(&self) -> ChargeState {
        critical_section::with(|cs| self.charge.borrow(cs).get().state())
    }

    pub fn config(&self) -> &MeasConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pins;
    use crate::drivers::{ChargerInputs, FaultDetect, SocTable, VoltageDivider};

    #[derive(Default)]
    struct Recorder(RefCell<Vec<BattEvent>>);

    impl EventHandler for Recorder {
        fn on_event(&self, event: BattEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    impl Recorder {
        fn take(&self) -> Vec<BattEvent> {
            self.0.borrow_mut().drain(..).collect()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TimerOp {
        Start(u32),
        Stop,
    }

    struct MockTimer<'a> {
        ops: &'a RefCell<Vec<TimerOp>>,
        fail: bool,
    }

    impl TickTimer for MockTimer<'_> {
        type Error = ();

        fn start(&mut self, period_ms: u32) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.ops.borrow_mut().push(TimerOp::Start(period_ms));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.ops.borrow_mut().push(TimerOp::Stop);
            Ok(())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum SenseOp {
        GateOn,
        GateOff,
        Read,
        ReadFailed,
    }

    /// ADC pin voltage source; set `pin_mv` to half the battery voltage.
    struct MockAdc {
        pin_mv: u16,
        fail: bool,
        gate_fails: bool,
        would_block: u8,
        reads: u32,
        ops: Vec<SenseOp>,
    }

    impl MockAdc {
        fn battery(mv: u16) -> Self {
            Self {
                pin_mv: mv / 2,
                fail: false,
                gate_fails: false,
                would_block: 0,
                reads: 0,
                ops: Vec::new(),
            }
        }
    }

    impl BatterySense for MockAdc {
        type Error = ();

        fn read_pin_mv(&mut self) -> nb::Result<u16, ()> {
            if self.would_block > 0 {
                self.would_block -= 1;
                return Err(nb::Error::WouldBlock);
            }
            if self.fail {
                self.ops.push(SenseOp::ReadFailed);
                return Err(nb::Error::Other(()));
            }
            self.reads += 1;
            self.ops.push(SenseOp::Read);
            Ok(self.pin_mv)
        }

        fn set_monitor_enable(&mut self, on: bool) -> Result<(), ()> {
            if self.gate_fails {
                return Err(());
            }
            self.ops
                .push(if on { SenseOp::GateOn } else { SenseOp::GateOff });
            Ok(())
        }
    }

    struct MockPins(Result<ChargerInputs, ()>);

    impl ChargerPins for MockPins {
        type Error = ();

        fn read(&mut self) -> Result<ChargerInputs, ()> {
            self.0
        }
    }

    fn pins(usb_present: bool, charging: bool) -> MockPins {
        MockPins(Ok(ChargerInputs {
            usb_present,
            charging,
        }))
    }

    fn config() -> MeasConfig {
        MeasConfig {
            pins: Pins {
                adc: 0,
                usb_detect: 20,
                charger_status: 3,
                monitor_enable: None,
            },
            divider: VoltageDivider::new(100_000, 100_000),
            limit_low_mv: 3200,
            limit_full_mv: 4100,
            soc: SocTable::new(3300, 400, &[0, 50, 100]),
            charger_active_low: true,
            oversample: 1,
            fault: Some(FaultDetect {
                max_toggles: 4,
                window_ms: 1000,
            }),
        }
    }

    fn data(voltage_mv: u16, level_percent: u8) -> BattEvent {
        BattEvent::Data {
            voltage_mv,
            level_percent,
            valid: true,
        }
    }

    #[test]
    fn init_rejects_bad_config() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());

        let mut cfg = config();
        cfg.divider.r2_ohm = 0;
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        assert!(matches!(
            BattMeas::init(cfg, &rec, timer),
            Err(Error::InvalidParam(_))
        ));

        let mut cfg = config();
        cfg.limit_low_mv = 4200;
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        assert!(matches!(
            BattMeas::init(cfg, &rec, timer),
            Err(Error::InvalidParam(_))
        ));

        let mut cfg = config();
        cfg.soc = SocTable::new(3300, 400, &[]);
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        assert!(matches!(
            BattMeas::init(cfg, &rec, timer),
            Err(Error::InvalidParam(_))
        ));
    }

    #[test]
    fn enable_interval_floor() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        assert_eq!(meas.enable(49), Err(Error::InvalidParam("interval_ms")));
        assert!(!meas.is_enabled());
        assert!(ops.borrow().is_empty());

        assert_eq!(meas.enable(50), Ok(()));
        assert!(meas.is_enabled());
        assert_eq!(meas.interval_ms(), 50);
        assert_eq!(*ops.borrow(), [TimerOp::Start(50)]);
    }

    #[test]
    fn enable_disable_drive_the_timer() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        meas.enable(1000).unwrap();
        meas.enable(250).unwrap();
        assert_eq!(meas.interval_ms(), 250);
        meas.disable().unwrap();
        assert!(!meas.is_enabled());
        assert_eq!(
            *ops.borrow(),
            [TimerOp::Start(1000), TimerOp::Start(250), TimerOp::Stop]
        );
    }

    #[test]
    fn timer_failure_is_hardware_failure() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: true,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        assert_eq!(meas.enable(100), Err(Error::HardwareFailure));
        assert!(!meas.is_enabled());
        assert_eq!(meas.disable(), Err(Error::HardwareFailure));
    }

    #[test]
    fn interpolated_level_then_low_battery() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        meas.enable(100).unwrap();

        meas.on_tick(&mut MockAdc::battery(3500));
        assert_eq!(rec.take(), [data(3500, 25)]);
        assert_eq!(meas.side(), Side::Normal);

        meas.on_tick(&mut MockAdc::battery(3150));
        assert_eq!(
            rec.take(),
            [data(3150, 0), BattEvent::LowBattery { voltage_mv: 3150 }]
        );
        assert_eq!(meas.side(), Side::Low);

        // still low: data only
        meas.on_tick(&mut MockAdc::battery(3100));
        assert_eq!(rec.take(), [data(3100, 0)]);
    }

    #[test]
    fn full_battery_edge() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        meas.enable(100).unwrap();

        meas.on_tick(&mut MockAdc::battery(4100));
        assert_eq!(
            rec.take(),
            [data(4100, 100), BattEvent::FullBattery { voltage_mv: 4100 }]
        );
        meas.on_tick(&mut MockAdc::battery(4150));
        assert_eq!(rec.take(), [data(4150, 100)]);
        meas.on_tick(&mut MockAdc::battery(3900));
        assert_eq!(rec.take(), [data(3900, 75)]);
        assert_eq!(meas.side(), Side::Normal);
    }

    #[test]
    fn reenable_rearms_thresholds() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        meas.enable(100).unwrap();
        meas.on_tick(&mut MockAdc::battery(3000));
        meas.disable().unwrap();
        meas.enable(100).unwrap();
        rec.take();

        meas.on_tick(&mut MockAdc::battery(3000));
        assert_eq!(
            rec.take(),
            [data(3000, 0), BattEvent::LowBattery { voltage_mv: 3000 }]
        );
    }

    #[test]
    fn no_events_while_disabled() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        let mut adc = MockAdc::battery(3000);
        meas.on_tick(&mut adc);
        meas.enable(100).unwrap();
        meas.disable().unwrap();
        meas.on_tick(&mut adc);
        assert!(rec.take().is_empty());
        assert_eq!(adc.reads, 0);
    }

    #[test]
    fn charger_events_ignore_sampling_state() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        assert!(!meas.is_enabled());

        let states = [
            meas.on_pin_change(&mut pins(false, false), 0),
            meas.on_pin_change(&mut pins(true, false), 5000),
            meas.on_pin_change(&mut pins(true, false), 5001),
            meas.on_pin_change(&mut pins(true, true), 10_000),
            meas.on_pin_change(&mut pins(true, true), 10_001),
            meas.on_pin_change(&mut pins(true, false), 15_000),
            meas.on_pin_change(&mut pins(false, false), 20_000),
            meas.on_pin_change(&mut pins(false, false), 20_001),
        ];
        assert_eq!(
            states,
            [
                Ok(ChargeState::UsbAbsent),
                Ok(ChargeState::UsbPresentNotCharging),
                Ok(ChargeState::UsbPresentNotCharging),
                Ok(ChargeState::Charging),
                Ok(ChargeState::Charging),
                Ok(ChargeState::ChargingFinished),
                Ok(ChargeState::UsbAbsent),
                Ok(ChargeState::UsbAbsent),
            ]
        );
        assert_eq!(
            rec.take(),
            [
                BattEvent::UsbChargingStarted,
                BattEvent::UsbChargingFinished,
                BattEvent::UsbDisconnected
            ]
        );
    }

    #[test]
    fn rapid_status_toggling_reports_charger_error() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        for i in 0..6u32 {
            meas.on_pin_change(&mut pins(true, i % 2 == 0), i * 20).unwrap();
        }
        assert_eq!(meas.charge_state(), ChargeState::ChargerFault);
        assert_eq!(rec.take().last(), Some(&BattEvent::ChargerError));
    }

    #[test]
    fn pin_read_failure_keeps_state() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();

        meas.on_pin_change(&mut pins(true, true), 0).unwrap();
        rec.take();
        assert_eq!(
            meas.on_pin_change(&mut MockPins(Err(())), 10),
            Err(Error::HardwareFailure)
        );
        assert_eq!(meas.charge_state(), ChargeState::Charging);
        assert!(rec.take().is_empty());
    }

    #[test]
    fn adc_failure_is_reported_as_invalid_data() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3000);
        adc.fail = true;
        meas.on_tick(&mut adc);
        meas.on_tick(&mut adc);
        assert_eq!(
            rec.take(),
            [BattEvent::invalid_data(), BattEvent::invalid_data()]
        );
        // invalid samples do not move the threshold side
        assert_eq!(meas.side(), Side::Normal);
        assert!(meas.is_enabled());

        adc.fail = false;
        meas.on_tick(&mut adc);
        assert_eq!(
            rec.take(),
            [data(3000, 0), BattEvent::LowBattery { voltage_mv: 3000 }]
        );
    }

    #[test]
    fn monitor_gate_wraps_the_reads() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let mut cfg = config();
        cfg.pins.monitor_enable = Some(5);
        cfg.oversample = 2;
        let meas = BattMeas::init(cfg, &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3700);
        meas.on_tick(&mut adc);
        assert_eq!(
            adc.ops,
            [SenseOp::GateOn, SenseOp::Read, SenseOp::Read, SenseOp::GateOff]
        );
        assert_eq!(rec.take(), [data(3700, 50)]);
    }

    #[test]
    fn monitor_gate_released_after_adc_failure() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let mut cfg = config();
        cfg.pins.monitor_enable = Some(5);
        let meas = BattMeas::init(cfg, &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3700);
        adc.fail = true;
        meas.on_tick(&mut adc);
        assert_eq!(
            adc.ops,
            [SenseOp::GateOn, SenseOp::ReadFailed, SenseOp::GateOff]
        );
        assert_eq!(rec.take(), [BattEvent::invalid_data()]);
    }

    #[test]
    fn monitor_gate_failure_skips_sample() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let mut cfg = config();
        cfg.pins.monitor_enable = Some(5);
        let meas = BattMeas::init(cfg, &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3700);
        adc.gate_fails = true;
        meas.on_tick(&mut adc);
        assert_eq!(adc.reads, 0);
        assert_eq!(rec.take(), [BattEvent::invalid_data()]);

        adc.gate_fails = false;
        meas.on_tick(&mut adc);
        assert_eq!(rec.take(), [data(3700, 50)]);
    }

    #[test]
    fn gate_untouched_when_not_configured() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3700);
        adc.gate_fails = true;
        meas.on_tick(&mut adc);
        assert_eq!(adc.ops, [SenseOp::Read]);
        assert_eq!(rec.take(), [data(3700, 50)]);
    }

    #[test]
    fn oversampling_averages_and_waits() {
        let rec = Recorder::default();
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let mut cfg = config();
        cfg.oversample = 4;
        let meas = BattMeas::init(cfg, &rec, timer).unwrap();
        meas.enable(100).unwrap();

        let mut adc = MockAdc::battery(3500);
        adc.would_block = 3;
        meas.on_tick(&mut adc);
        assert_eq!(adc.reads, 4);
        assert_eq!(rec.take(), [data(3500, 25)]);
    }

    #[test]
    fn closure_handler() {
        let seen = RefCell::new(Vec::new());
        let handler = |ev: BattEvent| seen.borrow_mut().push(ev);
        let ops = RefCell::new(Vec::new());
        let timer = MockTimer {
            ops: &ops,
            fail: false,
        };
        let meas = BattMeas::init(config(), &handler, timer).unwrap();
        meas.enable(60).unwrap();
        meas.on_tick(&mut MockAdc::battery(3700));
        assert_eq!(*seen.borrow(), [data(3700, 50)]);
    }
}
