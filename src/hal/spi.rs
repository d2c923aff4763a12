//! SPI (Serial Peripheral Interface) HAL implementation

use avr_device::atmega128a::SPI;
use core::convert::Infallible;
use embedded_hal::spi::FullDuplex;

use crate::bus::{BitOrder, BusConfig, ClockPhase, ClockPolarity, Prescaler};

// SPCR bits
const SPE: u8 = 1 << 6;
const DORD: u8 = 1 << 5;
const MSTR: u8 = 1 << 4;
const CPOL: u8 = 1 << 3;
const CPHA: u8 = 1 << 2;

// SPSR bits
const SPIF: u8 = 1 << 7;
const SPI2X: u8 = 1 << 0;

/// SPR1:0 and SPI2X for a prescaler
const fn clock_bits(prescaler: Prescaler) -> (u8, u8) {
    match prescaler {
        Prescaler::Div2 => (0, SPI2X),
        Prescaler::Div4 => (0, 0),
        Prescaler::Div8 => (1, SPI2X),
        Prescaler::Div16 => (1, 0),
        Prescaler::Div32 => (2, SPI2X),
        Prescaler::Div64 => (2, 0),
        Prescaler::Div128 => (3, 0),
    }
}

/// SPI master, polled (no transfer-complete interrupt)
pub struct Spi {
    spi: SPI,
}

impl Spi {
    /// Apply `config` and enable the peripheral in master mode.
    ///
    /// SCK/MOSI/SS must already be outputs, see [`super::gpio::PortB::into_spi`].
    pub fn new(spi: SPI, config: &BusConfig) -> Self {
        let (spr, spi2x) = clock_bits(config.prescaler);

        // Enable SPI, Master mode, no interrupt
        let mut spcr = SPE | MSTR | spr;
        if config.bit_order == BitOrder::LsbFirst {
            spcr |= DORD;
        }
        if config.mode.polarity() == ClockPolarity::IdleHigh {
            spcr |= CPOL;
        }
        if config.mode.phase() == ClockPhase::SecondEdge {
            spcr |= CPHA;
        }

        spi.spsr.write(|w| unsafe { w.bits(spi2x) });
        spi.spcr.write(|w| unsafe { w.bits(spcr) });

        Self { spi }
    }

    /// Raw SPSR: SPIF (transfer complete), WCOL (write collision), SPI2X
    pub fn status(&self) -> u8 {
        self.spi.spsr.read().bits()
    }

    pub fn free(self) -> SPI {
        self.spi.spcr.write(|w| unsafe { w.bits(0) });
        self.spi
    }
}

impl FullDuplex<u8> for Spi {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        // Wait for transmission complete; reading SPDR after SPSR clears SPIF
        if self.spi.spsr.read().bits() & SPIF == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.spi.spdr.read().bits())
    }

    fn send(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        // Start transmission
        self.spi.spdr.write(|w| w.bits(byte));
        Ok(())
    }
}
