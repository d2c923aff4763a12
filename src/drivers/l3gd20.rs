//! L3GD20 3-axis gyroscope driver (SPI)

use super::register_client::{RegisterClient, Vec3};
use crate::bus::Bus;

// L3GD20 registers
pub const REG_WHO_AM_I: u8 = 0x0F;
pub const REG_CTRL_REG1: u8 = 0x20;
pub const REG_CTRL_REG4: u8 = 0x23;
pub const REG_OUT_TEMP: u8 = 0x26;
pub const REG_STATUS: u8 = 0x27;
pub const REG_OUT_X_L: u8 = 0x28;

/// WHO_AM_I answer of an L3GD20
pub const DEVICE_ID: u8 = 0xD4;

// CTRL_REG1 bits
const CTRL1_PD: u8 = 1 << 3;
const CTRL1_ZEN: u8 = 1 << 2;
const CTRL1_YEN: u8 = 1 << 1;
const CTRL1_XEN: u8 = 1 << 0;

/// Output data rate (CTRL_REG1 DR bits)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    Hz95 = 0,
    Hz190 = 1,
    Hz380 = 2,
    Hz760 = 3,
}

/// Bandwidth selection (CTRL_REG1 BW bits), meaning depends on the data rate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    Narrowest = 0,
    Narrow = 1,
    Wide = 2,
    Widest = 3,
}

/// Gyroscope full-scale range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    Dps250 = 0,  // ±250°/s
    Dps500 = 1,  // ±500°/s
    Dps2000 = 2, // ±2000°/s
}

impl FullScale {
    /// Sensitivity in micro-degrees per second per LSB
    pub const fn sensitivity_udps(self) -> u32 {
        match self {
            FullScale::Dps250 => 8_750,
            FullScale::Dps500 => 17_500,
            FullScale::Dps2000 => 70_000,
        }
    }
}

/// Sensor settings written by [`L3gd20::configure`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub data_rate: DataRate,
    pub bandwidth: Bandwidth,
    pub full_scale: FullScale,
}

impl Config {
    pub fn with_data_rate(mut self, data_rate: DataRate) -> Self {
        self.data_rate = data_rate;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_full_scale(mut self, full_scale: FullScale) -> Self {
        self.full_scale = full_scale;
        self
    }

    /// CTRL_REG1: data rate, bandwidth, normal mode, all axes enabled
    pub const fn ctrl_reg1(&self) -> u8 {
        (self.data_rate as u8) << 6
            | (self.bandwidth as u8) << 4
            | CTRL1_PD
            | CTRL1_ZEN
            | CTRL1_YEN
            | CTRL1_XEN
    }

    /// CTRL_REG4: full-scale selection
    pub const fn ctrl_reg4(&self) -> u8 {
        (self.full_scale as u8) << 4
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_rate: DataRate::Hz95,
            bandwidth: Bandwidth::Widest,
            full_scale: FullScale::Dps500,
        }
    }
}

/// STATUS_REG contents
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
    /// New X, Y and Z samples are available
    pub const fn xyz_ready(self) -> bool {
        self.0 & (1 << 3) != 0
    }

    /// A sample was overwritten before being read
    pub const fn overrun(self) -> bool {
        self.0 & (1 << 7) != 0
    }
}

/// Angular rate in millidegrees per second
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaledSample {
    pub millidps: i32,
}

impl ScaledSample {
    /// Scale a raw reading, rounding half away from zero
    pub fn from_raw(raw: i16, sensitivity_udps: u32) -> Self {
        let product = i64::from(raw) * i64::from(sensitivity_udps);
        Self {
            millidps: div_round(product, 1000) as i32,
        }
    }

    /// Whole degrees per second, rounded to nearest
    pub fn dps(self) -> i32 {
        div_round(i64::from(self.millidps), 1000) as i32
    }

    /// Whole degrees per second, fraction dropped
    pub fn dps_truncated(self) -> i32 {
        self.millidps / 1000
    }
}

fn div_round(value: i64, divisor: i64) -> i64 {
    let half = divisor / 2;
    if value < 0 {
        (value - half) / divisor
    } else {
        (value + half) / divisor
    }
}

/// L3GD20 driver
pub struct L3gd20<B> {
    client: RegisterClient<B>,
    full_scale: FullScale,
}

impl<B: Bus> L3gd20<B> {
    /// Wrap a bus. The sensor is not touched until [`configure`](Self::configure).
    pub fn new(bus: B) -> Self {
        Self {
            client: RegisterClient::new(bus),
            full_scale: Config::default().full_scale,
        }
    }

    /// Power up the sensor with the given settings
    pub fn configure(&mut self, config: Config) -> Result<(), B::Error> {
        self.client.write_register(REG_CTRL_REG1, config.ctrl_reg1())?;
        self.client.write_register(REG_CTRL_REG4, config.ctrl_reg4())?;
        self.full_scale = config.full_scale;
        info!(
            "gyro configured: ctrl1={=u8:#x} ctrl4={=u8:#x}",
            config.ctrl_reg1(),
            config.ctrl_reg4()
        );
        Ok(())
    }

    pub fn full_scale(&self) -> FullScale {
        self.full_scale
    }

    pub fn who_am_i(&mut self) -> Result<u8, B::Error> {
        self.client.read_register(REG_WHO_AM_I)
    }

    /// Whether the device answers with the L3GD20 id
    pub fn is_present(&mut self) -> Result<bool, B::Error> {
        Ok(self.who_am_i()? == DEVICE_ID)
    }

    /// Raw die temperature reading
    pub fn temperature(&mut self) -> Result<i8, B::Error> {
        self.client
            .read_register(REG_OUT_TEMP)
            .map(|raw| i8::from_le_bytes([raw]))
    }

    pub fn status(&mut self) -> Result<Status, B::Error> {
        self.client.read_register(REG_STATUS).map(Status)
    }

    /// Raw angular rate on all three axes
    pub fn read_raw(&mut self) -> Result<Vec3<i16>, B::Error> {
        self.client.read_axis_vector(REG_OUT_X_L)
    }

    /// Angular rate scaled by the configured full-scale sensitivity
    pub fn read_rates(&mut self) -> Result<Vec3<ScaledSample>, B::Error> {
        let sensitivity = self.full_scale.sensitivity_udps();
        let raw = self.read_raw()?;
        Ok(raw.map(|value| ScaledSample::from_raw(value, sensitivity)))
    }

    /// Raw register access for anything not covered above
    pub fn registers(&mut self) -> &mut RegisterClient<B> {
        &mut self.client
    }

    pub fn release(self) -> B {
        self.client.release()
    }
}
