//! Gyroscope console firmware.
//!
//! Polls an L3GD20 gyroscope over a chip-select framed SPI bus and streams
//! the angular rate of each axis, in degrees per second, to a serial
//! console.
//!
//! ```text
//!  application   configure once, then report forever
//!       |
//!  drivers       L3GD20 registers, register protocol, decimal console
//!       |
//!  bus           Bus trait, SpiBus over embedded-hal FullDuplex + OutputPin
//!       |
//!  hal           ATmega128 SPI / GPIO / USART0 / Timer0 (feature "atmega128")
//! ```
#![cfg_attr(not(test), no_std)]

// must come first so the logging macros are visible everywhere
mod fmt;

pub mod application;
pub mod bus;
pub mod config;
pub mod drivers;

#[cfg(feature = "atmega128")]
pub mod hal;

pub use application::Application;
pub use bus::{Bus, BusConfig, SpiBus};
pub use drivers::{L3gd20, RegisterClient, SerialConsole};
