//! Chip-select gated SPI bus driver.
//!
//! [`SpiBus`] wraps any `embedded-hal` full-duplex SPI peripheral plus an
//! output pin used as an active-low chip select, and exposes the three
//! primitives the register protocol is built from through the [`Bus`] trait.

mod config;

pub use config::{BitOrder, BusConfig, ClockPhase, ClockPolarity, Prescaler, SpiMode};

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::spi::FullDuplex;

/// Byte-level access to a chip-select framed bus
pub trait Bus {
    type Error;

    /// Assert chip select (drive it low)
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Deassert chip select (drive it high)
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Shift `byte` out and return the byte shifted in during the same
    /// transfer. Blocks until the peripheral reports completion.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    type Error = B::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        (**self).select()
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        (**self).deselect()
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        (**self).transfer_byte(byte)
    }
}

/// Bus driver errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, PinE> {
    /// The SPI peripheral reported an error
    Spi(SpiE),
    /// Driving the chip-select line failed
    Pin(PinE),
    /// The peripheral stayed busy past the configured poll limit
    Timeout,
}

/// SPI peripheral plus its chip-select line
pub struct SpiBus<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: BusConfig,
}

impl<SPI, CS, SpiE, PinE> SpiBus<SPI, CS>
where
    SPI: FullDuplex<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    /// Take ownership of the peripheral and chip select.
    ///
    /// The peripheral must already be configured according to `config`;
    /// chip select is driven to its idle (deasserted) level here.
    pub fn new(spi: SPI, mut cs: CS, config: BusConfig) -> Result<Self, Error<SpiE, PinE>> {
        cs.set_high().map_err(Error::Pin)?;
        debug!("spi bus ready, prescaler /{=u32}", config.prescaler.divisor());
        Ok(Self { spi, cs, config })
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// The wrapped peripheral, for status dumps
    pub fn peripheral(&self) -> &SPI {
        &self.spi
    }

    /// Release the peripheral and chip select
    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn poll<T>(
        &mut self,
        mut op: impl FnMut(&mut SPI) -> nb::Result<T, SpiE>,
    ) -> Result<T, Error<SpiE, PinE>> {
        let mut polls: u32 = 0;
        loop {
            match op(&mut self.spi) {
                Ok(value) => return Ok(value),
                Err(nb::Error::Other(e)) => return Err(Error::Spi(e)),
                Err(nb::Error::WouldBlock) => {
                    if let Some(limit) = self.config.poll_limit {
                        polls += 1;
                        if polls >= limit {
                            warn!("spi transfer timed out after {=u32} polls", polls);
                            return Err(Error::Timeout);
                        }
                    }
                }
            }
        }
    }
}

impl<SPI, CS, SpiE, PinE> Bus for SpiBus<SPI, CS>
where
    SPI: FullDuplex<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
{
    type Error = Error<SpiE, PinE>;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(Error::Pin)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(Error::Pin)
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        self.poll(|spi| spi.send(byte))?;
        self.poll(|spi| spi.read())
    }
}
