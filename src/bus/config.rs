//! Static SPI bus configuration

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI clock prescaler options (SCK = F_CPU / divisor)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl Prescaler {
    /// Clock divisor applied to the CPU clock
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div32 => 32,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
        }
    }
}

/// Clock level while the bus is idle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPolarity {
    IdleLow,
    IdleHigh,
}

/// Clock edge on which data is sampled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockPhase {
    FirstEdge,
    SecondEdge,
}

/// SPI mode configurations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    Mode0, // CPOL=0, CPHA=0
    Mode1, // CPOL=0, CPHA=1
    Mode2, // CPOL=1, CPHA=0
    Mode3, // CPOL=1, CPHA=1
}

impl SpiMode {
    pub const fn polarity(self) -> ClockPolarity {
        match self {
            SpiMode::Mode0 | SpiMode::Mode1 => ClockPolarity::IdleLow,
            SpiMode::Mode2 | SpiMode::Mode3 => ClockPolarity::IdleHigh,
        }
    }

    pub const fn phase(self) -> ClockPhase {
        match self {
            SpiMode::Mode0 | SpiMode::Mode2 => ClockPhase::FirstEdge,
            SpiMode::Mode1 | SpiMode::Mode3 => ClockPhase::SecondEdge,
        }
    }
}

impl From<Mode> for SpiMode {
    fn from(mode: Mode) -> Self {
        match (mode.polarity, mode.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => SpiMode::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => SpiMode::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => SpiMode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => SpiMode::Mode3,
        }
    }
}

/// SPI data order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Bus settings applied once at initialization.
///
/// The bus always runs full duplex in master mode; only the timing and
/// framing details are configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Clock prescaler
    pub prescaler: Prescaler,
    /// Clock polarity (idle level) and phase (sample edge)
    pub mode: SpiMode,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Give up on a transfer after this many consecutive not-ready polls.
    /// `None` waits forever.
    pub poll_limit: Option<u32>,
}

impl BusConfig {
    pub const fn new() -> Self {
        Self {
            prescaler: Prescaler::Div64,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            poll_limit: None,
        }
    }

    pub const fn with_prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = prescaler;
        self
    }

    /// Accepts either [`SpiMode`] or an `embedded_hal::spi::Mode`
    pub fn with_mode(mut self, mode: impl Into<SpiMode>) -> Self {
        self.mode = mode.into();
        self
    }

    pub const fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    pub const fn with_poll_limit(mut self, polls: u32) -> Self {
        self.poll_limit = Some(polls);
        self
    }

    /// Resulting SCK frequency for a given CPU clock
    pub const fn clock_hz(&self, cpu_hz: u32) -> u32 {
        cpu_hz / self.prescaler.divisor()
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new()
    }
}
