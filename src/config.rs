//! The static configuration of a display: its geometry, bus address and drawing orientation.

use crate::command::consts::*;
use crate::error::ConfigError;
use crate::rotation::DisplayRotation;

/// A configuration for the display. Fields have public defaults; the builder methods offer a
/// declarative way to override them. A `Config` is checked once when the driver is constructed
/// and not changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Panel width in pixels. A multiple of 8, at most 128. Default 128.
    pub width: u16,
    /// Panel height in pixels. A multiple of 8 (one page), at most 128. Default 64.
    pub height: u16,
    /// 7-bit I2C address. Default `0x3C`.
    pub address: u8,
    /// Whether the panel is powered from an external VCC rather than the internal charge pump.
    /// Default `false`. Recorded for the host; the power-on table is the same either way.
    pub ext_vcc: bool,
    /// Orientation of the drawing surface. Default no rotation.
    pub rotation: DisplayRotation,
    /// Most image data bytes carried by one bus transfer. Default and maximum 128.
    pub wire_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 128,
            height: 64,
            address: DEFAULT_ADDRESS,
            ext_vcc: false,
            rotation: DisplayRotation::Rotate0,
            wire_max: WIRE_MAX,
        }
    }
}

impl Config {
    /// Create a new configuration for a panel of `width` x `height` pixels, with every other
    /// option at its default.
    pub fn new(width: u16, height: u16) -> Self {
        Config {
            width,
            height,
            ..Config::default()
        }
    }

    /// Extend this `Config` with a non-default I2C address.
    pub fn address(self, address: u8) -> Self {
        Self { address, ..self }
    }

    /// Extend this `Config` to mark the panel as externally powered.
    pub fn ext_vcc(self, ext_vcc: bool) -> Self {
        Self { ext_vcc, ..self }
    }

    /// Extend this `Config` with a rotated drawing surface.
    pub fn rotation(self, rotation: DisplayRotation) -> Self {
        Self { rotation, ..self }
    }

    /// Extend this `Config` with a smaller per-transfer data ceiling, for buses which cannot
    /// carry a 129 byte write.
    pub fn wire_max(self, wire_max: usize) -> Self {
        Self { wire_max, ..self }
    }

    /// Check every field is something the controller and the interface can handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_geometry(self.width, self.height)?;
        if self.address > MAX_ADDRESS {
            return Err(ConfigError::Address(self.address));
        }
        if self.wire_max == 0 || self.wire_max > WIRE_MAX {
            return Err(ConfigError::WireMax(self.wire_max));
        }
        Ok(())
    }

    /// Size of a frame buffer for this display, in bytes.
    pub fn buffer_len(&self) -> usize {
        buffer_len(self.width, self.height)
    }
}

pub(crate) fn validate_geometry(width: u16, height: u16) -> Result<(), ConfigError> {
    if width == 0 || width % 8 != 0 || width > NUM_PIXEL_COLS {
        return Err(ConfigError::Width(width));
    }
    if height == 0 || height % 8 != 0 || height > NUM_PIXEL_ROWS {
        return Err(ConfigError::Height(height));
    }
    Ok(())
}

pub(crate) fn buffer_len(width: u16, height: u16) -> usize {
    width as usize * height as usize / 8
}
