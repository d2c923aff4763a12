pub mod l3gd20;
pub mod register_client;
pub mod serial_console;

pub use l3gd20::{Config, FullScale, L3gd20, ScaledSample, Status};
pub use register_client::{RegisterAddress, RegisterClient, Vec3, READ_FLAG};
pub use serial_console::{print_decimal, SerialConsole};
