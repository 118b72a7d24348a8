//! The main API to the display driver. It resets and initializes the controller, offers the few
//! runtime controls the panel has, and flushes a `FrameBuffer` into display RAM.

mod flush;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::command::consts::*;
use crate::command::{AddressingWindow, Command, INIT_COMMANDS};
use crate::config::Config;
use crate::error::{ConfigError, Error};
use crate::framebuffer::FrameBuffer;
use crate::interface::i2c::I2cInterface;
use crate::interface::{DisplayInterface, NoResetPin};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Uninitialized,
    Ready,
}

/// A driver for an SH1107 display.
///
/// One driver owns one controller. Every operation takes `&mut self`, and `flush` borrows the
/// frame buffer for its whole duration, so a flush can neither interleave with another command nor
/// observe a half-finished draw.
#[derive(Debug)]
pub struct Sh1107<DI, RST = NoResetPin> {
    iface: DI,
    reset_pin: Option<RST>,
    config: Config,
    window: AddressingWindow,
    state: State,
}

impl<DI> Sh1107<DI, NoResetPin>
where
    DI: DisplayInterface,
{
    /// Construct a new display driver for a display without a reset line, connected to the
    /// interface `iface`. Fails if `config` describes a display the SH1107 cannot drive.
    pub fn new(iface: DI, config: Config) -> Result<Self, ConfigError> {
        Self::build(iface, None, config)
    }
}

impl<I2C> Sh1107<I2cInterface<I2C>, NoResetPin>
where
    I2C: hal::blocking::i2c::Write,
{
    /// Construct a new display driver talking to `config.address` on the I2C master `i2c`.
    pub fn i2c(i2c: I2C, config: Config) -> Result<Self, ConfigError> {
        Self::new(I2cInterface::new(i2c, config.address), config)
    }
}

impl<I2C, RST> Sh1107<I2cInterface<I2C>, RST>
where
    I2C: hal::blocking::i2c::Write,
    RST: OutputPin,
{
    /// Like `i2c`, for a display whose reset line is driven by `reset_pin`.
    pub fn i2c_with_reset_pin(
        i2c: I2C,
        reset_pin: RST,
        config: Config,
    ) -> Result<Self, ConfigError> {
        Self::with_reset_pin(I2cInterface::new(i2c, config.address), reset_pin, config)
    }
}

impl<DI, RST> Sh1107<DI, RST>
where
    DI: DisplayInterface,
    RST: OutputPin,
{
    /// Construct a new display driver for a display whose reset line is driven by `reset_pin`.
    pub fn with_reset_pin(iface: DI, reset_pin: RST, config: Config) -> Result<Self, ConfigError> {
        Self::build(iface, Some(reset_pin), config)
    }

    fn build(iface: DI, reset_pin: Option<RST>, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        // The interface must write where the config says.
        if let Some(address) = iface.bus_address() {
            if address > MAX_ADDRESS {
                return Err(ConfigError::Address(address));
            }
            if address != config.address {
                return Err(ConfigError::AddressMismatch {
                    interface: address,
                    config: config.address,
                });
            }
        }
        let window = AddressingWindow::for_size(config.width, config.height)?;
        Ok(Sh1107 {
            iface,
            reset_pin,
            config,
            window,
            state: State::Uninitialized,
        })
    }

    /// Bring the controller to a known state: pulse the reset line if there is one, send the
    /// power-on command table, and wait for the panel supply to settle. Without a reset line the
    /// table alone has to do it.
    ///
    /// On failure the driver is left uninitialized; `setup` may be called again.
    pub fn setup<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error, RST::Error>>
    where
        D: DelayMs<u16>,
    {
        self.state = State::Uninitialized;
        log::debug!(
            "setup {}x{} at {:#04x}",
            self.config.width,
            self.config.height,
            self.config.address
        );
        self.reset(delay)?;
        for cmd in INIT_COMMANDS.iter() {
            cmd.send(&mut self.iface).map_err(Error::Bus)?;
        }
        delay.delay_ms(POWER_ON_DELAY_MS);
        self.state = State::Ready;
        log::debug!("display ready");
        Ok(())
    }

    /// Pulse the reset line: high, then low for the datasheet minimum, then high again. Does
    /// nothing without a reset line.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error, RST::Error>>
    where
        D: DelayMs<u16>,
    {
        let pin = match self.reset_pin.as_mut() {
            Some(pin) => pin,
            None => return Ok(()),
        };
        log::debug!("hardware reset");
        pin.set_high().map_err(Error::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        pin.set_low().map_err(Error::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        pin.set_high().map_err(Error::Pin)
    }

    /// Turn the panel on.
    pub fn on(&mut self) -> Result<(), DI::Error> {
        Command::SetDisplayOn(true).send(&mut self.iface)
    }

    /// Turn the panel off. Display RAM is kept.
    pub fn off(&mut self) -> Result<(), DI::Error> {
        Command::SetDisplayOn(false).send(&mut self.iface)
    }

    /// Control the contrast. Every value is passed through; what it looks like is up to the
    /// panel.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DI::Error> {
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// The window covering the whole configured display.
    pub fn addressing_window(&self) -> AddressingWindow {
        self.window
    }

    /// The command bytes selecting the whole display for writing.
    pub fn build_addressing_window(&self) -> [u8; 6] {
        self.addressing_window().commands()
    }

    /// Construct a cleared frame buffer matching this display and its rotation. `N` has to be
    /// `width * height / 8`.
    pub fn framebuffer<const N: usize>(&self) -> Result<FrameBuffer<N>, ConfigError> {
        FrameBuffer::new(self.config.width, self.config.height, self.config.rotation)
    }

    /// Copy `fb` into display RAM.
    ///
    /// If a transfer fails part way the panel shows a partly updated image and the error carries
    /// the offset of the failed chunk. Nothing is retried: calling `flush` again resends the
    /// window and the whole buffer.
    pub fn flush<const N: usize>(
        &mut self,
        fb: &FrameBuffer<N>,
    ) -> Result<(), Error<DI::Error, RST::Error>> {
        if self.state != State::Ready {
            return Err(Error::NotReady);
        }
        if (fb.width(), fb.height()) != (self.config.width, self.config.height) {
            return Err(ConfigError::GeometryMismatch {
                buffer: (fb.width(), fb.height()),
                display: (self.config.width, self.config.height),
            }
            .into());
        }
        log::debug!("flush {} bytes", fb.raw_bytes().len());
        flush::flush(
            &mut self.iface,
            &self.window,
            fb.raw_bytes(),
            self.config.wire_max,
        )
    }

    /// Whether `setup` has completed.
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the interface and the reset pin.
    pub fn release(self) -> (DI, Option<RST>) {
        (self.iface, self.reset_pin)
    }
}
