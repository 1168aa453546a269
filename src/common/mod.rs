//! `enum`s, `struct`s and tables used by the driver.



mod calibration;
mod command;
mod config;
mod fields;
mod register;
mod state;



pub use calibration::*;
pub use command::*;
pub use config::*;
pub use fields::*;
pub use register::*;
pub use state::*;
