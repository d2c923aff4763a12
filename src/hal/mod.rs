//! ATmega128 hardware backend: SPI master, chip select, console UART and
//! millisecond delay.

pub mod gpio;
pub mod spi;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use gpio::{ChipSelect, PortB};
pub use spi::Spi;
pub use timer::Delay;
pub use uart::Uart;

use avr_device::atmega128a::{PORTB, SPI};
use core::convert::Infallible;

use crate::bus::{BusConfig, Error, SpiBus};

/// SPI bus wired to the gyroscope
pub type GyroBus = SpiBus<Spi, ChipSelect>;

/// Bring up the gyroscope bus: chip select idle high, SPI pins handed to
/// the peripheral, `config` applied and the peripheral enabled.
pub fn spi_bus(
    spi: SPI,
    portb: PORTB,
    config: BusConfig,
) -> Result<GyroBus, Error<Infallible, Infallible>> {
    let cs = PortB::new(portb).into_spi();
    let spi = Spi::new(spi, &config);
    SpiBus::new(spi, cs, config)
}
