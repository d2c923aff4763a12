//! Register read/write protocol over a chip-select framed bus.
//!
//! Every transaction is one address byte (bit 7 = read flag, bits 6:0 =
//! register address) followed by one data byte, with chip select held
//! asserted for both.

use crate::bus::Bus;

/// Bit 7 of the address byte marks a read
pub const READ_FLAG: u8 = 0x80;

const ADDRESS_MASK: u8 = 0x7F;

/// Byte clocked out while reading
const DUMMY: u8 = 0x00;

/// 7-bit register address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(u8);

impl RegisterAddress {
    /// Addresses above 0x7F lose their top bit.
    pub const fn new(addr: u8) -> Self {
        Self(addr & ADDRESS_MASK)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// First byte of a read transaction
    pub const fn read_frame(self) -> u8 {
        self.0 | READ_FLAG
    }

    /// First byte of a write transaction
    pub const fn write_frame(self) -> u8 {
        self.0
    }

    /// Address `n` registers further on
    pub const fn offset(self, n: u8) -> Self {
        Self::new(self.0.wrapping_add(n))
    }
}

/// 3-axis sensor data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vec3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vec3<U> {
        Vec3 {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}

/// Register protocol client
pub struct RegisterClient<B> {
    bus: B,
}

impl<B: Bus> RegisterClient<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Give back the underlying bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Read one register
    pub fn read_register(&mut self, addr: u8) -> Result<u8, B::Error> {
        let frame = RegisterAddress::new(addr).read_frame();
        self.transaction(|bus| {
            bus.transfer_byte(frame)?;
            bus.transfer_byte(DUMMY)
        })
    }

    /// Write one register
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), B::Error> {
        let frame = RegisterAddress::new(addr).write_frame();
        self.transaction(|bus| {
            bus.transfer_byte(frame)?;
            bus.transfer_byte(value)?;
            Ok(())
        })
    }

    /// Read three little-endian 16-bit values stored from `base` upwards,
    /// X low/high first, one register per transaction.
    pub fn read_axis_vector(&mut self, base: u8) -> Result<Vec3<i16>, B::Error> {
        let base = RegisterAddress::new(base);
        let mut axes = [0i16; 3];
        for (index, axis) in (0u8..).zip(axes.iter_mut()) {
            let low = self.read_register(base.offset(2 * index).value())?;
            let high = self.read_register(base.offset(2 * index + 1).value())?;
            *axis = i16::from_le_bytes([low, high]);
        }
        Ok(Vec3::new(axes[0], axes[1], axes[2]))
    }

    /// Run `body` with chip select asserted. Chip select is released even
    /// when `body` fails; the first error wins.
    fn transaction<T>(
        &mut self,
        body: impl FnOnce(&mut B) -> Result<T, B::Error>,
    ) -> Result<T, B::Error> {
        self.bus.select()?;
        let result = body(&mut self.bus);
        let released = self.bus.deselect();
        let value = result?;
        released?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Select,
        Deselect,
        Transfer(u8),
    }

    /// Bus that records every call and answers transfers from a queue
    #[derive(Default)]
    struct TraceBus {
        events: Vec<Event>,
        replies: VecDeque<u8>,
        fail_on_transfer: Option<usize>,
        transfers: usize,
    }

    impl TraceBus {
        fn replying(replies: &[u8]) -> Self {
            Self {
                replies: replies.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Broken;

    impl Bus for TraceBus {
        type Error = Broken;

        fn select(&mut self) -> Result<(), Broken> {
            self.events.push(Event::Select);
            Ok(())
        }

        fn deselect(&mut self) -> Result<(), Broken> {
            self.events.push(Event::Deselect);
            Ok(())
        }

        fn transfer_byte(&mut self, byte: u8) -> Result<u8, Broken> {
            if self.fail_on_transfer == Some(self.transfers) {
                return Err(Broken);
            }
            self.transfers += 1;
            self.events.push(Event::Transfer(byte));
            Ok(self.replies.pop_front().unwrap_or(0xFF))
        }
    }

    /// Every Select is followed by transfers and exactly one Deselect
    fn assert_framed(events: &[Event]) {
        let mut selected = false;
        for event in events {
            match event {
                Event::Select => {
                    assert!(!selected, "select while already selected");
                    selected = true;
                }
                Event::Deselect => {
                    assert!(selected, "deselect without select");
                    selected = false;
                }
                Event::Transfer(_) => assert!(selected, "transfer outside a transaction"),
            }
        }
        assert!(!selected, "chip select left asserted");
    }

    #[test]
    fn read_register_frames_two_transfers_for_every_address() {
        for addr in 0u8..=127 {
            let mut client = RegisterClient::new(TraceBus::replying(&[0x00, addr ^ 0x55]));
            assert_eq!(client.read_register(addr), Ok(addr ^ 0x55));
            let bus = client.release();
            assert_eq!(
                bus.events,
                [
                    Event::Select,
                    Event::Transfer(addr | READ_FLAG),
                    Event::Transfer(0x00),
                    Event::Deselect,
                ]
            );
        }
    }

    #[test]
    fn write_register_sends_address_then_value() {
        for value in 0u8..=255 {
            let addr = value & 0x7F;
            let mut client = RegisterClient::new(TraceBus::default());
            client.write_register(addr, value).unwrap();
            let bus = client.release();
            assert_eq!(
                bus.events,
                [
                    Event::Select,
                    Event::Transfer(addr),
                    Event::Transfer(value),
                    Event::Deselect,
                ]
            );
        }
    }

    #[test]
    fn address_high_bit_is_masked() {
        let mut client = RegisterClient::new(TraceBus::default());
        client.write_register(0xA0, 0x01).unwrap();
        client.read_register(0xA0).unwrap();
        let bus = client.release();
        assert_eq!(bus.events[1], Event::Transfer(0x20));
        assert_eq!(bus.events[5], Event::Transfer(0xA0));
    }

    #[test]
    fn axis_vector_assembles_little_endian_words() {
        // address phase replies are ignored, so interleave fillers
        let replies = [
            0, 0x34, 0, 0x12, // X = 0x1234
            0, 0xFF, 0, 0xFF, // Y = -1
            0, 0x00, 0, 0x80, // Z = i16::MIN
        ];
        let mut client = RegisterClient::new(TraceBus::replying(&replies));
        let axes = client.read_axis_vector(0x28).unwrap();
        assert_eq!(axes, Vec3::new(0x1234, -1, i16::MIN));

        let bus = client.release();
        assert_framed(&bus.events);
        let addresses: Vec<u8> = bus
            .events
            .chunks(4)
            .map(|chunk| match chunk[1] {
                Event::Transfer(frame) => frame,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(addresses, [0xA8, 0xA9, 0xAA, 0xAB, 0xAC, 0xAD]);
    }

    #[test]
    fn failed_transfer_still_releases_chip_select() {
        let mut bus = TraceBus::default();
        bus.fail_on_transfer = Some(1);
        let mut client = RegisterClient::new(bus);
        assert_eq!(client.read_register(0x0F), Err(Broken));
        let bus = client.release();
        assert_eq!(
            bus.events,
            [Event::Select, Event::Transfer(0x8F), Event::Deselect]
        );
    }

    #[test]
    fn client_works_through_a_borrowed_bus() {
        let mut bus = TraceBus::replying(&[0x00, 0xD4]);
        {
            let mut client = RegisterClient::new(&mut bus);
            assert_eq!(client.read_register(0x0F), Ok(0xD4));
        }
        assert_framed(&bus.events);
        assert_eq!(bus.events.len(), 4);
    }

    #[test]
    fn vec3_map_and_array() {
        let v = Vec3::new(1i16, -2, 3).map(i32::from);
        assert_eq!(v.to_array(), [1, -2, 3]);
    }
}
