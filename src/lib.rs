//! Driver library for the Sino Wealth SH1107 monochrome OLED display controller, connected over
//! I2C.
//!
//! The driver sends the power-on command table, controls the panel, and flushes a 1 bit per pixel
//! `FrameBuffer` to the controller RAM. Drawing into the buffer goes through
//! `embedded-graphics`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate embedded_hal as hal;


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod interface;
pub mod rotation;

// Re-exports for primary API.
pub use command::{consts, AddressingWindow};
pub use config::Config;
pub use display::Sh1107;
pub use error::{ConfigError, Error, FlushError};
pub use framebuffer::FrameBuffer;
pub use interface::i2c::I2cInterface;
pub use interface::{DisplayInterface, NoResetPin};
pub use rotation::DisplayRotation;
