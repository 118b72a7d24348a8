//! Error types returned by the driver.

use core::convert::Infallible;

/// A display configuration or geometry which the SH1107 cannot be driven with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Width is zero, not a multiple of 8, or wider than the controller RAM.
    #[error("width {0} is not a multiple of 8 in 8..=128")]
    Width(u16),
    /// Height is zero, not a multiple of 8, or taller than the controller RAM.
    #[error("height {0} is not a multiple of 8 in 8..=128")]
    Height(u16),
    /// The I2C address does not fit in 7 bits.
    #[error("address {0:#04x} is not a 7-bit I2C address")]
    Address(u8),
    /// The interface writes to another address than the configured one.
    #[error("interface address {interface:#04x} differs from configured {config:#04x}")]
    AddressMismatch { interface: u8, config: u8 },
    /// The per-transfer payload ceiling is zero or larger than the interface buffer.
    #[error("wire max {0} is outside 1..=128")]
    WireMax(usize),
    /// Rotation given in degrees is not one of 0, 90, 180 or 270.
    #[error("rotation {0} is not one of 0, 90, 180, 270")]
    Rotation(u16),
    /// A frame buffer store does not hold exactly `width * height / 8` bytes.
    #[error("frame buffer holds {actual} bytes, geometry needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    /// A frame buffer was built for different dimensions than the display.
    #[error("frame buffer is {buffer:?}, display is {display:?}")]
    GeometryMismatch {
        buffer: (u16, u16),
        display: (u16, u16),
    },
}

/// A bus transfer failed while streaming image data. No chunk past `offset` was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("image transfer failed at frame buffer offset {offset}")]
pub struct FlushError<E> {
    /// Offset into the frame buffer of the first byte of the failed chunk.
    pub offset: usize,
    /// The error reported by the bus.
    pub cause: E,
}

/// Any failure of a driver operation. `BusE` is the bus error type, `PinE` the reset pin error
/// type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error<BusE, PinE = Infallible> {
    #[error("invalid configuration: {0}")]
    Config(ConfigError),
    #[error("bus transfer failed: {0:?}")]
    Bus(BusE),
    #[error("{0}")]
    Flush(FlushError<BusE>),
    #[error("reset pin failed: {0:?}")]
    Pin(PinE),
    /// The display has not completed `setup` yet.
    #[error("display is not initialized")]
    NotReady,
}

impl<BusE, PinE> From<ConfigError> for Error<BusE, PinE> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}
