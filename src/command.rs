//! The command set for the SH1107.
//!
//! Note 1: The display RAM of the SH1107 is 128 columns by 16 pages, where each page is a band of
//! 8 pixel rows and each RAM byte is one column of one page (LSB on top). Anywhere there is a
//! "page" address, it refers to such a band.
//!
//! Note 2: Over I2C every byte of a command, opcode or argument alike, is sent in a transfer of
//! its own behind the command marker. See `DisplayInterface::send_commands`.

use crate::config::validate_geometry;
use crate::error::ConfigError;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Controller limits and protocol constants.

    /// Columns of display RAM.
    pub const NUM_PIXEL_COLS: u16 = 128;
    /// Rows of display RAM.
    pub const NUM_PIXEL_ROWS: u16 = 128;
    /// Pages of display RAM (Note 1).
    pub const NUM_PAGES: u8 = (NUM_PIXEL_ROWS / 8) as u8;
    /// Control byte selecting the command stream.
    pub const COMMAND_MARKER: u8 = 0x00;
    /// Control byte selecting the display data stream.
    pub const DATA_MARKER: u8 = 0x40;
    /// Largest image data payload carried by a single bus transfer.
    pub const WIRE_MAX: usize = 128;
    /// Default 7-bit I2C address of SH1107 modules.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;
    /// Highest 7-bit I2C address.
    pub const MAX_ADDRESS: u8 = 0x7F;
    /// Reset pin high time before the pulse, in ms.
    pub const RESET_SETTLE_MS: u16 = 1;
    /// Width of the low reset pulse, in ms. The datasheet minimum.
    pub const RESET_PULSE_MS: u16 = 10;
    /// Time for the charge pump and VCOM to stabilize after power on, in ms.
    pub const POWER_ON_DELAY_MS: u16 = 200;
    /// Opcode of the page range half of the addressing window.
    pub const PAGE_ADDRESS_OPCODE: u8 = 0xB0;
    /// Opcode of the column range half of the addressing window.
    pub const COLUMN_ADDRESS_OPCODE: u8 = 0x00;
}

/// The RAM address increment orientation when writing image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    /// The column address increments after each data byte, wrapping within the page.
    Page,
    /// The page address increments after each data byte, wrapping within the column.
    Vertical,
}

/// Setting of the COM output scan direction. Changing this setting flips the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM0 is scanned first.
    Normal,
    /// COM lines are scanned from the last to COM0.
    Reverse,
}

/// An opcode with up to two argument bytes, as it is sent to the controller. The order of entries
/// in a command table is significant: some commands assume mode bits set by earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandEntry {
    opcode: u8,
    arg_count: u8,
    args: [u8; 2],
}

impl CommandEntry {
    pub const fn new(opcode: u8) -> Self {
        Self {
            opcode,
            arg_count: 0,
            args: [0; 2],
        }
    }

    pub const fn with_arg(opcode: u8, arg: u8) -> Self {
        Self {
            opcode,
            arg_count: 1,
            args: [arg, 0],
        }
    }

    pub const fn with_args(opcode: u8, arg0: u8, arg1: u8) -> Self {
        Self {
            opcode,
            arg_count: 2,
            args: [arg0, arg1],
        }
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn args(&self) -> &[u8] {
        &self.args[..self.arg_count as usize]
    }

    /// Transmit the opcode and then each argument.
    pub fn send<DI>(&self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        iface.send_commands(&[self.opcode])?;
        iface.send_commands(self.args())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep (`false`). Display RAM is retained.
    SetDisplayOn(bool),
    /// Set the RAM row which is shown on the first COM line. Range is 0-127.
    SetStartLine(u8),
    /// Set the contrast (segment output current). Range 0-255; the effect of each step is
    /// defined by the panel.
    SetContrast(u8),
    /// Set the RAM address increment orientation.
    SetAddressMode(AddressMode),
    /// Mirror the segment (column) mapping.
    SetSegmentRemap(bool),
    /// Set the COM output scan direction.
    SetComScanDirection(ComScanDirection),
    /// Set the number of active COM lines. Range is 1-128.
    SetMultiplexRatio(u8),
    /// Set the COM line which shows RAM row 0. Range is 0-127.
    SetDisplayOffset(u8),
    /// Set the display clock divide ratio (low nibble) and oscillator frequency (high nibble) as
    /// one raw register value.
    SetClockDivider(u8),
    /// Set the pre-charge and dis-charge periods in DCLKs. Each range is 1-15.
    SetChargePeriods { precharge: u8, discharge: u8 },
    /// Set the VCOM deselect level register.
    SetVcomDeselectLevel(u8),
    /// Set the page which subsequent image data is written to. Range is 0-15.
    SetPageAddress(u8),
    /// Light every pixel regardless of RAM (`true`), or show RAM contents (`false`).
    SetEntireDisplayOn(bool),
    /// Invert the on/off sense of every pixel.
    SetInverted(bool),
}

macro_rules! ok_command {
    ($cmd:expr, []) => {
        CommandEntry::new($cmd)
    };
    ($cmd:expr, [$arg0:expr]) => {
        CommandEntry::with_arg($cmd, $arg0)
    };
    ($cmd:expr, [$arg0:expr, $arg1:expr]) => {
        CommandEntry::with_args($cmd, $arg0, $arg1)
    };
}

impl Command {
    /// Encode into opcode and argument bytes. Arguments outside their range are masked to the
    /// register width, like the controller itself does.
    pub fn entry(self) -> CommandEntry {
        match self {
            Command::SetDisplayOn(on) => ok_command!(if on { 0xAF } else { 0xAE }, []),
            Command::SetStartLine(line) => ok_command!(0xDC, [line & 0x7F]),
            Command::SetContrast(contrast) => ok_command!(0x81, [contrast]),
            Command::SetAddressMode(mode) => ok_command!(
                match mode {
                    AddressMode::Page => 0x20,
                    AddressMode::Vertical => 0x21,
                },
                []
            ),
            Command::SetSegmentRemap(remap) => ok_command!(0xA0 | remap as u8, []),
            Command::SetComScanDirection(dir) => ok_command!(
                match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Reverse => 0xC8,
                },
                []
            ),
            Command::SetMultiplexRatio(ratio) => {
                ok_command!(0xA8, [ratio.saturating_sub(1) & 0x7F])
            }
            Command::SetDisplayOffset(offset) => ok_command!(0xD3, [offset & 0x7F]),
            Command::SetClockDivider(raw) => ok_command!(0xD5, [raw]),
            Command::SetChargePeriods {
                precharge,
                discharge,
            } => ok_command!(0xD9, [(discharge & 0x0F) << 4 | (precharge & 0x0F)]),
            Command::SetVcomDeselectLevel(level) => ok_command!(0xDB, [level]),
            Command::SetPageAddress(page) => {
                ok_command!(consts::PAGE_ADDRESS_OPCODE | (page % consts::NUM_PAGES), [])
            }
            Command::SetEntireDisplayOn(on) => ok_command!(0xA4 | on as u8, []),
            Command::SetInverted(inverted) => ok_command!(0xA6 | inverted as u8, []),
        }
    }

    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        self.entry().send(iface)
    }
}

/// The power-on command table. The order is fixed: later commands depend on mode bits set by
/// earlier ones.
#[cfg_attr(rustfmt, rustfmt_skip)]
pub const INIT_COMMANDS: [Command; 15] = [
    Command::SetDisplayOn(false),
    Command::SetStartLine(0),
    Command::SetContrast(0x4F),
    Command::SetAddressMode(AddressMode::Page),
    Command::SetSegmentRemap(false),
    Command::SetComScanDirection(ComScanDirection::Normal),
    Command::SetMultiplexRatio(128),
    Command::SetDisplayOffset(0x60),
    Command::SetClockDivider(0x51),
    Command::SetChargePeriods { precharge: 2, discharge: 2 },
    Command::SetVcomDeselectLevel(0x35),
    Command::SetPageAddress(0),
    Command::SetEntireDisplayOn(false),
    Command::SetInverted(false),
    Command::SetDisplayOn(true),
];

/// The page and column range which the next image data stream is written into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressingWindow {
    pub page_start: u8,
    pub page_end: u8,
    pub column_start: u8,
    pub column_end: u8,
}

impl AddressingWindow {
    /// The window covering a whole `width` x `height` display. Fails for a geometry the
    /// controller RAM cannot hold.
    pub fn for_size(width: u16, height: u16) -> Result<Self, ConfigError> {
        validate_geometry(width, height)?;
        Ok(Self {
            page_start: 0,
            page_end: ((height >> 3) - 1) as u8,
            column_start: 0,
            column_end: (width - 1) as u8,
        })
    }

    /// The command bytes selecting this window.
    pub fn commands(&self) -> [u8; 6] {
        use self::consts::*;
        [
            PAGE_ADDRESS_OPCODE,
            self.page_start,
            self.page_end,
            COLUMN_ADDRESS_OPCODE,
            self.column_start,
            self.column_end,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn display_on_off() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOn(true).send(&mut di).unwrap();
        di.check(0xAF, &[]);
        di.clear();
        Command::SetDisplayOn(false).send(&mut di).unwrap();
        di.check(0xAE, &[]);
    }

    #[test]
    fn set_contrast() {
        let mut di = TestSpyInterface::new();
        Command::SetContrast(0x4F).send(&mut di).unwrap();
        di.check(0x81, &[0x4F]);
        di.clear();
        Command::SetContrast(255).send(&mut di).unwrap();
        di.check(0x81, &[0xFF]);
    }

    #[test]
    fn set_start_line() {
        let mut di = TestSpyInterface::new();
        Command::SetStartLine(23).send(&mut di).unwrap();
        di.check(0xDC, &[23]);
        di.clear();
        Command::SetStartLine(128).send(&mut di).unwrap();
        di.check(0xDC, &[0]);
    }

    #[test]
    fn set_multiplex_ratio() {
        let mut di = TestSpyInterface::new();
        Command::SetMultiplexRatio(128).send(&mut di).unwrap();
        di.check(0xA8, &[0x7F]);
        di.clear();
        Command::SetMultiplexRatio(64).send(&mut di).unwrap();
        di.check(0xA8, &[0x3F]);
    }

    #[test]
    fn single_byte_modes() {
        assert_eq!(Command::SetAddressMode(AddressMode::Page).entry().opcode(), 0x20);
        assert_eq!(Command::SetAddressMode(AddressMode::Vertical).entry().opcode(), 0x21);
        assert_eq!(Command::SetSegmentRemap(true).entry().opcode(), 0xA1);
        assert_eq!(
            Command::SetComScanDirection(ComScanDirection::Reverse).entry().opcode(),
            0xC8
        );
        assert_eq!(Command::SetPageAddress(15).entry().opcode(), 0xBF);
        assert_eq!(Command::SetPageAddress(16).entry().opcode(), 0xB0);
        assert_eq!(Command::SetPageAddress(17).entry().opcode(), 0xB1);
        assert_eq!(Command::SetEntireDisplayOn(true).entry().opcode(), 0xA5);
        assert_eq!(Command::SetInverted(true).entry().opcode(), 0xA7);
        assert!(Command::SetInverted(true).entry().args().is_empty());
    }

    #[test]
    fn set_charge_periods() {
        let entry = Command::SetChargePeriods {
            precharge: 2,
            discharge: 2,
        }
        .entry();
        assert_eq!((entry.opcode(), entry.args()), (0xD9, &[0x22][..]));
        let entry = Command::SetChargePeriods {
            precharge: 15,
            discharge: 1,
        }
        .entry();
        assert_eq!(entry.args(), &[0x1F]);
    }

    #[test]
    fn init_table_flattened() {
        let mut di = TestSpyInterface::new();
        for cmd in INIT_COMMANDS.iter() {
            cmd.send(&mut di).unwrap();
        }
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xAE, // display off
            0xDC, 0x00, // start line 0
            0x81, 0x4F, // contrast
            0x20, // page addressing
            0xA0, // segment remap off
            0xC0, // COM scan normal
            0xA8, 0x7F, // multiplex 128
            0xD3, 0x60, // display offset
            0xD5, 0x51, // clock divider
            0xD9, 0x22, // charge periods
            0xDB, 0x35, // VCOM deselect
            0xB0, // page 0
            0xA4, // show RAM
            0xA6, // not inverted
            0xAF // display on
        ));
    }

    #[test]
    fn addressing_window() {
        let window = AddressingWindow::for_size(128, 64).unwrap();
        assert_eq!(window.page_end, 7);
        assert_eq!(window.column_end, 127);
        assert_eq!(window.commands(), [0xB0, 0, 7, 0x00, 0, 127]);
        assert_eq!(
            AddressingWindow::for_size(128, 128).unwrap().commands(),
            [0xB0, 0, 15, 0x00, 0, 127]
        );
        assert_eq!(
            AddressingWindow::for_size(64, 8).unwrap().commands(),
            [0xB0, 0, 0, 0x00, 0, 63]
        );
    }

    #[test]
    fn addressing_window_rejects_bad_geometry() {
        assert_eq!(
            AddressingWindow::for_size(128, 4),
            Err(ConfigError::Height(4))
        );
        assert_eq!(
            AddressingWindow::for_size(128, 0),
            Err(ConfigError::Height(0))
        );
        assert_eq!(
            AddressingWindow::for_size(264, 64),
            Err(ConfigError::Width(264))
        );
    }
}
