use avr_device::atmega128a::TC0;
use embedded_hal::blocking::delay::DelayMs;

/// Timer0 clock select (CS02:0); Timer0 on the ATmega128 has its own table
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div32 = 3,
    Div64 = 4,
    Div128 = 5,
    Div256 = 6,
    Div1024 = 7,
}

const PRESCALER_MASK: u8 = 0x07;

// 16MHz/64 = 250kHz, 250 ticks = 1ms
const TICKS_PER_MS: u8 = 250;

/// Millisecond busy delay on Timer0 in normal mode
pub struct Delay {
    tc0: TC0,
}

impl Delay {
    pub fn new(tc0: TC0) -> Self {
        tc0.tccr0.write(|w| unsafe { w.bits(0) });
        tc0.tcnt0.write(|w| w.bits(0));
        Self { tc0 }
    }

    fn start(&mut self, prescaler: Prescaler) {
        self.tc0.tccr0.modify(|r, w| unsafe {
            w.bits((r.bits() & !PRESCALER_MASK) | (prescaler as u8 & PRESCALER_MASK))
        });
    }

    fn stop(&mut self) {
        self.tc0
            .tccr0
            .modify(|r, w| unsafe { w.bits(r.bits() & !PRESCALER_MASK) });
    }

    fn set_counter(&mut self, value: u8) {
        self.tc0.tcnt0.write(|w| w.bits(value));
    }

    fn counter(&self) -> u8 {
        self.tc0.tcnt0.read().bits()
    }

    pub fn free(self) -> TC0 {
        self.tc0
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        self.set_counter(0);
        self.start(Prescaler::Div64);

        for _ in 0..ms {
            while self.counter() < TICKS_PER_MS {}
            self.set_counter(0);
        }

        self.stop();
    }
}
