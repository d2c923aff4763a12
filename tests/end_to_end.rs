use std::convert::Infallible;

use embedded_hal_mock::delay::MockNoop;
use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use embedded_hal_mock::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use ufmt::uWrite;

use gyro_console::drivers::l3gd20::{Config, DEVICE_ID};
use gyro_console::{Application, BusConfig, L3gd20, RegisterClient, SerialConsole, SpiBus};

#[derive(Default)]
struct Capture(String);

impl uWrite for Capture {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

/// Four SPI transactions of one register access: address phase, data phase
fn frame(first: u8, second: u8, reply: u8) -> [SpiTransaction; 4] {
    [
        SpiTransaction::send(first),
        SpiTransaction::read(0x00),
        SpiTransaction::send(second),
        SpiTransaction::read(reply),
    ]
}

fn read(addr: u8, value: u8) -> [SpiTransaction; 4] {
    frame(addr | 0x80, 0x00, value)
}

fn write(addr: u8, value: u8) -> [SpiTransaction; 4] {
    frame(addr, value, 0x00)
}

/// Idle level from initialization, then one select/deselect per transaction
fn chip_select(transactions: usize) -> Vec<PinTransaction> {
    let mut expected = vec![PinTransaction::set(PinState::High)];
    for _ in 0..transactions {
        expected.push(PinTransaction::set(PinState::Low));
        expected.push(PinTransaction::set(PinState::High));
    }
    expected
}

fn axes(x: i16, y: i16, z: i16) -> Vec<SpiTransaction> {
    let mut expected = Vec::new();
    for (i, value) in [x, y, z].into_iter().enumerate() {
        let [low, high] = value.to_le_bytes();
        let addr = 0x28 + 2 * i as u8;
        expected.extend(read(addr, low));
        expected.extend(read(addr + 1, high));
    }
    expected
}

#[test]
fn write_then_read_back_produces_the_documented_sequence() {
    let spi = SpiMock::new(&[
        SpiTransaction::send(0x0F),
        SpiTransaction::read(0xFF),
        SpiTransaction::send(0x0F),
        SpiTransaction::read(0xFF),
        SpiTransaction::send(0x8F),
        SpiTransaction::read(0xFF),
        SpiTransaction::send(0x00),
        SpiTransaction::read(0xD4),
    ]);
    let cs = PinMock::new(&chip_select(2));

    let bus = SpiBus::new(spi, cs, BusConfig::default()).unwrap();
    let mut client = RegisterClient::new(bus);
    client.write_register(0x0F, 0x0F).unwrap();
    assert_eq!(client.read_register(0x0F).unwrap(), 0xD4);

    let (mut spi, mut cs) = client.release().free();
    spi.done();
    cs.done();
}

#[test]
fn application_starts_and_reports() {
    let mut expected = Vec::new();
    expected.extend(read(0x0F, DEVICE_ID));
    expected.extend(write(0x20, 0x3F));
    expected.extend(write(0x23, 0x10));
    expected.extend(read(0x26, 25));
    expected.extend(axes(1000, -1000, 0));
    expected.extend(axes(57, -57, i16::MAX));

    let spi = SpiMock::new(&expected);
    let cs = PinMock::new(&chip_select(4 + 6 + 6));
    let bus = SpiBus::new(spi, cs, BusConfig::default()).unwrap();

    let mut app = Application::new(
        L3gd20::new(bus),
        SerialConsole::new(Capture::default()),
        MockNoop::new(),
    );
    app.start(Config::default()).unwrap();

    let first = app.step().unwrap();
    assert_eq!(first.x.millidps, 17_500);
    let second = app.report().unwrap();
    assert_eq!(second.x.millidps, 998);
    assert_eq!(second.z.millidps, 573_423);

    let (gyro, console, _delay) = app.free();
    assert_eq!(
        console.free().0,
        "Gyro console v0.1.0\r\n\
         [DBG] WHO_AM_I: 0xD4\r\n\
         Temperature: 25 C\r\n\
         X: 18\tY: -18\tZ: 0\r\n\
         X: 1\tY: -1\tZ: 573\r\n"
    );

    let (mut spi, mut cs) = gyro.release().free();
    spi.done();
    cs.done();
}

#[test]
fn application_warns_about_unknown_devices() {
    let mut expected = Vec::new();
    expected.extend(read(0x0F, 0x00));
    expected.extend(write(0x20, 0x3F));
    expected.extend(write(0x23, 0x10));
    expected.extend(read(0x26, 0xFB));

    let spi = SpiMock::new(&expected);
    let cs = PinMock::new(&chip_select(4));
    let bus = SpiBus::new(spi, cs, BusConfig::default()).unwrap();

    let mut app = Application::new(
        L3gd20::new(bus),
        SerialConsole::new(Capture::default()),
        MockNoop::new(),
    );
    app.start(Config::default()).unwrap();

    let (gyro, console, _delay) = app.free();
    let text = console.free().0;
    assert!(text.contains("[DBG] WHO_AM_I: 0x00\r\nMaybe this isn't a Gyroscope.\r\n"));
    assert!(text.ends_with("Temperature: -5 C\r\n"));

    let (mut spi, mut cs) = gyro.release().free();
    spi.done();
    cs.done();
}

#[test]
fn chip_select_frames_every_transaction_on_the_wire() {
    let mut expected = Vec::new();
    for addr in 0u8..=127 {
        expected.extend(read(addr, addr));
    }
    let spi = SpiMock::new(&expected);
    let cs = PinMock::new(&chip_select(128));
    let mut bus = SpiBus::new(spi, cs, BusConfig::default()).unwrap();

    for addr in 0u8..=127 {
        let mut client = RegisterClient::new(&mut bus);
        assert_eq!(client.read_register(addr).unwrap(), addr);
    }

    // every low was matched by a high
    let (mut spi, mut cs) = bus.free();
    spi.done();
    cs.done();
}
