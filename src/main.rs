#![no_std]
#![no_main]

use panic_halt as _;
use avr_device::atmega128a::Peripherals;

use gyro_console::config::UART_BAUD;
use gyro_console::drivers::l3gd20::Config;
use gyro_console::hal::{self, Delay, Uart};
use gyro_console::{Application, BusConfig, L3gd20, SerialConsole};

#[avr_device::entry]
fn main() -> ! {
    let Some(dp) = Peripherals::take() else {
        halt()
    };

    // Console first so bus problems can be reported
    let mut console = SerialConsole::new(Uart::new(dp.USART0, UART_BAUD));

    let bus = match hal::spi_bus(dp.SPI, dp.PORTB, BusConfig::default()) {
        Ok(bus) => bus,
        Err(_) => {
            console.write_line("SPI init failed!").ok();
            halt()
        }
    };

    console.debug("SPSR", bus.peripheral().status()).ok();

    let mut app = Application::new(L3gd20::new(bus), console, Delay::new(dp.TC0));

    if app.start(Config::default()).is_err() {
        // console is owned by the app; nothing left to report on
        halt()
    }

    match app.run() {
        Ok(never) => match never {},
        Err(_) => halt(),
    }
}

fn halt() -> ! {
    #[allow(clippy::empty_loop)]
    loop {}
}
