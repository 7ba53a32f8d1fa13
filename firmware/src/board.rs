//! Reference board hardware bundles
//!
//! Pin numbers follow `battmon::board::pins`; esp-hal hands out typed
//! peripherals, so the mapping is spelled out again here.

use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcCalCurve, AdcConfig, AdcPin, Attenuation},
    gpio::{Event, Input, InputConfig, Io, Level, Output, Pull},
    peripherals::{ADC1, GPIO0, Peripherals},
    timer::{PeriodicTimer, timg::TimerGroup},
};

use log::info;

use battmon::MeasConfig;
use battmon::drivers::sense::{BatterySense, DigitalChargerPins};

/// Battery ADC channel (GPIO0, 11dB, calibrated to mV) and the optional
/// divider switch.
pub struct SenseHw {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    battery: AdcPin<GPIO0<'static>, ADC1<'static>, AdcCalCurve<ADC1<'static>>>,
    monitor_enable: Option<Output<'static>>,
}

impl BatterySense for SenseHw {
    type Error = ();

    fn read_pin_mv(&mut self) -> nb::Result<u16, ()> {
        self.adc.read_oneshot(&mut self.battery)
    }

    fn set_monitor_enable(&mut self, on: bool) -> Result<(), ()> {
        match self.monitor_enable.as_mut() {
            Some(pin) => {
                pin.set_level(Level::from(on));
                Ok(())
            }
            // configured in MeasConfig but not wired up here
            None => Err(()),
        }
    }
}

/// USB detect (GPIO20) and charger status (GPIO3).
pub struct ChargerHw {
    pub pins: DigitalChargerPins<Input<'static>, Input<'static>>,
}

impl ChargerHw {
    pub fn listen(&mut self) {
        let (usb, chg) = self.pins.pins_mut();
        usb.listen(Event::AnyEdge);
        chg.listen(Event::AnyEdge);
    }

    // true if one of our pins raised the shared GPIO interrupt
    pub fn take_interrupt(&mut self) -> bool {
        let (usb, chg) = self.pins.pins_mut();
        let fired = usb.is_interrupt_set() || chg.is_interrupt_set();
        usb.clear_interrupt();
        chg.clear_interrupt();
        fired
    }
}

pub struct Board {
    pub sense: SenseHw,
    pub charger: ChargerHw,
    pub timer: PeriodicTimer<'static, Blocking>,
    pub io: Io<'static>,
}

impl Board {
    pub fn init(p: Peripherals, config: &MeasConfig) -> Self {
        info!(
            "board: battery GPIO{}, usb detect GPIO{}, charger status GPIO{}",
            config.pins.adc, config.pins.usb_detect, config.pins.charger_status
        );

        let mut adc_cfg = AdcConfig::new();
        let battery =
            adc_cfg.enable_pin_with_cal::<_, AdcCalCurve<ADC1>>(p.GPIO0, Attenuation::_11dB);
        let adc = Adc::new(p.ADC1, adc_cfg);

        let usb_detect = Input::new(p.GPIO20, InputConfig::default().with_pull(Pull::Down));
        let charger_status = Input::new(p.GPIO3, InputConfig::default().with_pull(Pull::Up));
        let pins = DigitalChargerPins::from_config(usb_detect, charger_status, config);

        let timg0 = TimerGroup::new(p.TIMG0);
        let timer = PeriodicTimer::new(timg0.timer0);

        Board {
            // the reference board has its divider permanently connected
            sense: SenseHw {
                adc,
                battery,
                monitor_enable: None,
            },
            charger: ChargerHw { pins },
            timer,
            io: Io::new(p.IO_MUX),
        }
    }
}
