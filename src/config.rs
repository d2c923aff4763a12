//! Configuration constants for the gyroscope console firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Pause between two reported samples, in milliseconds
pub const REPORT_INTERVAL_MS: u16 = 100;

/// PORTB pin wired to the gyroscope's CS* input (PB0, the SPI SS pin)
pub const GYRO_CS_PIN: u8 = 0;

/// Startup banner printed on the console
pub const BANNER: &str = "Gyro console v0.1.0";
