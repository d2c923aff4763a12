use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use ufmt::uWrite;

use crate::config::CPU_FREQ_HZ;

// UCSR0A bits
const UDRE: u8 = 1 << 5;

// UCSR0B bits
const TXEN: u8 = 1 << 3;

// UCSR0C: asynchronous, no parity, 1 stop bit, 8 data bits
const FRAME_8N1: u8 = (1 << 2) | (1 << 1);

/// Baud rate register value for normal speed mode
const fn ubrr(baud: u32) -> u16 {
    (CPU_FREQ_HZ / (16 * baud) - 1) as u16
}

/// Transmit-only, blocking USART0 used as the console sink
pub struct Uart {
    usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0, baud: u32) -> Self {
        let [low, high] = ubrr(baud).to_le_bytes();
        usart.ubrr0h.write(|w| w.bits(high));
        usart.ubrr0l.write(|w| w.bits(low));
        usart.ucsr0c.write(|w| unsafe { w.bits(FRAME_8N1) });
        usart.ucsr0b.write(|w| unsafe { w.bits(TXEN) });

        Self { usart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        while self.usart.ucsr0a.read().bits() & UDRE == 0 {}
        self.usart.udr0.write(|w| w.bits(byte));
    }
}

impl uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
