//! Display rotation, applied to logical coordinates before they are packed into the frame buffer.

use core::convert::TryFrom;

use crate::error::ConfigError;

/// Clockwise rotation of the logical drawing surface relative to the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation.
    Rotate0,
    /// Rotated 90 degrees. Logical width and height are swapped.
    Rotate90,
    /// Rotated 180 degrees. Logical (0, 0) is the opposite corner of the panel.
    Rotate180,
    /// Rotated 270 degrees. Logical width and height are swapped.
    Rotate270,
}

impl Default for DisplayRotation {
    fn default() -> Self {
        DisplayRotation::Rotate0
    }
}

impl DisplayRotation {
    /// Whether the logical surface is the panel transposed.
    pub fn is_transposed(self) -> bool {
        match self {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => false,
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => true,
        }
    }

    /// Map logical coordinate `(x, y)` onto the panel of physical size `width` x `height`. The
    /// caller guarantees `(x, y)` lies on the logical surface.
    pub fn to_physical(self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        match self {
            DisplayRotation::Rotate0 => (x, y),
            DisplayRotation::Rotate90 => (width - 1 - y, x),
            DisplayRotation::Rotate180 => (width - 1 - x, height - 1 - y),
            DisplayRotation::Rotate270 => (y, height - 1 - x),
        }
    }
}

impl TryFrom<u16> for DisplayRotation {
    type Error = ConfigError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(DisplayRotation::Rotate0),
            90 => Ok(DisplayRotation::Rotate90),
            180 => Ok(DisplayRotation::Rotate180),
            270 => Ok(DisplayRotation::Rotate270),
            _ => Err(ConfigError::Rotation(degrees)),
        }
    }
}
