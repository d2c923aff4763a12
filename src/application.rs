//! Application layer: configure the gyroscope once, then stream readings
//! to the console forever.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use ufmt::uWrite;

use crate::bus::Bus;
use crate::config::{BANNER, REPORT_INTERVAL_MS};
use crate::drivers::l3gd20::{self, L3gd20, ScaledSample, DEVICE_ID};
use crate::drivers::{SerialConsole, Vec3};

/// Anything that stopped the report loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusE, ConsoleE> {
    Bus(BusE),
    Console(ConsoleE),
}

/// Main application state and logic
pub struct Application<B, W, D> {
    gyro: L3gd20<B>,
    console: SerialConsole<W>,
    delay: D,
    interval_ms: u16,
}

impl<B, W, D> Application<B, W, D>
where
    B: Bus,
    W: uWrite,
    D: DelayMs<u16>,
{
    pub fn new(gyro: L3gd20<B>, console: SerialConsole<W>, delay: D) -> Self {
        Self {
            gyro,
            console,
            delay,
            interval_ms: REPORT_INTERVAL_MS,
        }
    }

    /// Override the pause between two reports
    pub fn with_interval_ms(mut self, interval_ms: u16) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Identify and configure the sensor, print its temperature
    pub fn start(&mut self, config: l3gd20::Config) -> Result<(), Error<B::Error, W::Error>> {
        self.console.write_line(BANNER).map_err(Error::Console)?;

        let id = self.gyro.who_am_i().map_err(Error::Bus)?;
        self.console.debug("WHO_AM_I", id).map_err(Error::Console)?;
        if id != DEVICE_ID {
            warn!("unexpected WHO_AM_I {=u8:#x}", id);
            self.console
                .write_line("Maybe this isn't a Gyroscope.")
                .map_err(Error::Console)?;
        }

        self.gyro.configure(config).map_err(Error::Bus)?;

        let temperature = self.gyro.temperature().map_err(Error::Bus)?;
        self.console.write_str("Temperature: ").map_err(Error::Console)?;
        self.console
            .write_decimal(i32::from(temperature))
            .map_err(Error::Console)?;
        self.console.write_line(" C").map_err(Error::Console)?;
        Ok(())
    }

    /// Read one sample and print it in whole degrees per second
    pub fn report(&mut self) -> Result<Vec3<ScaledSample>, Error<B::Error, W::Error>> {
        let rates = self.gyro.read_rates().map_err(Error::Bus)?;
        self.console
            .write_axes(rates.map(ScaledSample::dps).to_array())
            .map_err(Error::Console)?;
        Ok(rates)
    }

    /// Report, then wait for the next slot
    pub fn step(&mut self) -> Result<Vec3<ScaledSample>, Error<B::Error, W::Error>> {
        let rates = self.report()?;
        self.delay.delay_ms(self.interval_ms);
        Ok(rates)
    }

    /// Report forever. Only returns when the bus or console fails.
    pub fn run(mut self) -> Result<Infallible, Error<B::Error, W::Error>> {
        loop {
            self.step()?;
        }
    }

    pub fn free(self) -> (L3gd20<B>, SerialConsole<W>, D) {
        (self.gyro, self.console, self.delay)
    }
}
