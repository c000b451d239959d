//! Host loop drivers. The runtime itself is clock-agnostic; a driver
//! supplies real time and input events.

mod cli;

pub use cli::{CliDriver, CliDriverError, DriverResult};
