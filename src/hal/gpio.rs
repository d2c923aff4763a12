use avr_device::atmega128a::PORTB;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

use crate::config::GYRO_CS_PIN;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

// PORTB pins used by the SPI peripheral
const SS: u8 = 0;
const SCK: u8 = 1;
const MOSI: u8 = 2;
const MISO: u8 = 3;

/// Single PORTB pin. All pins share the port registers, so they are
/// accessed through the register block pointer.
#[derive(Debug)]
pub struct Pin<const P: u8, MODE> {
    _mode: PhantomData<MODE>,
}

#[inline]
fn port() -> &'static avr_device::atmega128a::portb::RegisterBlock {
    unsafe { &*PORTB::ptr() }
}

impl<const P: u8, MODE: PinMode> Pin<P, MODE> {
    pub fn into_output(self) -> Pin<P, Output> {
        // Set DDRx bit
        port().ddrb.modify(|r, w| unsafe { w.bits(r.bits() | (1 << P)) });
        Pin { _mode: PhantomData }
    }

    pub fn into_input(self) -> Pin<P, Input> {
        // Clear DDRx bit and disable pull-up
        port().ddrb.modify(|r, w| unsafe { w.bits(r.bits() & !(1 << P)) });
        port().portb.modify(|r, w| unsafe { w.bits(r.bits() & !(1 << P)) });
        Pin { _mode: PhantomData }
    }
}

impl<const P: u8> OutputPin for Pin<P, Output> {
    type Error = Infallible;

    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        port().portb.modify(|r, w| unsafe { w.bits(r.bits() & !(1 << P)) });
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        port().portb.modify(|r, w| unsafe { w.bits(r.bits() | (1 << P)) });
        Ok(())
    }
}

/// Gyroscope chip select (CS*, active low)
pub type ChipSelect = Pin<GYRO_CS_PIN, Output>;

/// Owner of PORTB
pub struct PortB {
    _port: PORTB,
}

impl PortB {
    pub fn new(port: PORTB) -> Self {
        Self { _port: port }
    }

    /// Hand SCK/MOSI/MISO to the SPI peripheral and return the chip select,
    /// already driven high so the sensor stays deselected.
    ///
    /// SS has to be an output for the SPI to stay in master mode.
    pub fn into_spi(self) -> ChipSelect {
        // latch the idle level before the pin starts driving
        port().portb.modify(|r, w| unsafe { w.bits(r.bits() | (1 << GYRO_CS_PIN)) });
        let cs = Pin::<GYRO_CS_PIN, Input> { _mode: PhantomData }.into_output();

        Pin::<SS, Input> { _mode: PhantomData }.into_output();
        Pin::<SCK, Input> { _mode: PhantomData }.into_output();
        Pin::<MOSI, Input> { _mode: PhantomData }.into_output();
        Pin::<MISO, Input> { _mode: PhantomData }.into_input();

        cs
    }
}
