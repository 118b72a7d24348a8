//! An off-device frame buffer with one bit per pixel, laid out the way the SH1107 display RAM is
//! written in page addressing mode: byte `page * width + column`, bit `row % 8` (LSB on top).
//!
//! Drawing happens in logical coordinates, which the configured `DisplayRotation` maps onto the
//! panel before packing. The buffer implements `DrawTarget`, so any `embedded-graphics` primitive
//! can be rendered into it; the driver only ever reads the packed bytes back out.

use core::convert::Infallible;

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{Dimensions, OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::primitives::Rectangle;
use embedded_graphics_core::Pixel;
use itertools::iproduct;

use crate::config::{buffer_len, validate_geometry};
use crate::error::ConfigError;
use crate::rotation::DisplayRotation;

/// A 1 bpp frame buffer holding `N` bytes, where `N` must equal `width * height / 8`.
#[derive(Clone, Debug)]
pub struct FrameBuffer<const N: usize> {
    buf: [u8; N],
    width: u16,
    height: u16,
    rotation: DisplayRotation,
}

impl<const N: usize> FrameBuffer<N> {
    /// Construct a cleared frame buffer for a panel of `width` x `height` physical pixels, drawn
    /// into with `rotation` applied.
    pub fn new(width: u16, height: u16, rotation: DisplayRotation) -> Result<Self, ConfigError> {
        validate_geometry(width, height)?;
        let expected = buffer_len(width, height);
        if expected != N {
            return Err(ConfigError::BufferSize {
                expected,
                actual: N,
            });
        }
        Ok(FrameBuffer {
            buf: [0; N],
            width,
            height,
            rotation,
        })
    }

    /// Physical panel width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Physical panel height.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// The packed store, in the order it is streamed to display RAM. Only valid until the next
    /// draw.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Turn every pixel off.
    pub fn clear_buffer(&mut self) {
        self.buf.iter_mut().for_each(|b| *b = 0);
    }

    /// Set the pixel at logical `(x, y)`. Coordinates off the drawing surface are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((idx, bit)) = self.locate(x, y) {
            if on {
                self.buf[idx] |= 1 << bit;
            } else {
                self.buf[idx] &= !(1 << bit);
            }
        }
    }

    /// Read back the pixel at logical `(x, y)`, or `None` off the drawing surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<bool> {
        self.locate(x, y)
            .map(|(idx, bit)| self.buf[idx] & (1 << bit) != 0)
    }

    /// Byte index and bit number holding logical pixel `(x, y)`.
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u32)> {
        let logical = self.size();
        if x >= logical.width || y >= logical.height {
            return None;
        }
        let (px, py) = self
            .rotation
            .to_physical(x, y, self.width as u32, self.height as u32);
        let idx = (py / 8) as usize * self.width as usize + px as usize;
        Some((idx, py % 8))
    }
}

impl<const N: usize> OriginDimensions for FrameBuffer<N> {
    /// The logical size, with width and height swapped when rotated by 90 or 270 degrees.
    fn size(&self) -> Size {
        let (w, h) = (self.width as u32, self.height as u32);
        if self.rotation.is_transposed() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }
}

impl<const N: usize> DrawTarget for FrameBuffer<N> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.x as u32, point.y as u32, color.is_on());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // Crop to the drawing surface.
        let area = area.intersection(&self.bounding_box());
        let (left, top) = (area.top_left.x as u32, area.top_left.y as u32);
        let on = color.is_on();
        for (y, x) in iproduct!(top..top + area.size.height, left..left + area.size.width) {
            self.set_pixel(x, y, on);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.buf.iter_mut().for_each(|b| *b = fill);
        Ok(())
    }
}
