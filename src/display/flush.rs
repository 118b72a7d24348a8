//! Streaming a packed frame buffer into display RAM.
//!
//! The controller has no random access once the addressing window is set: data lands at an
//! internal pointer which advances with every byte. So chunks go out strictly in buffer order,
//! and a failed chunk ends the flush. Nothing is retried; the next attempt has to start again from
//! the window.

use crate::command::consts::WIRE_MAX;
use crate::command::AddressingWindow;
use crate::error::{ConfigError, Error, FlushError};
use crate::interface::DisplayInterface;

/// Select `window`, then send `raw` in chunks of at most `wire_max` bytes, each in a bus transfer
/// of its own. A failure while selecting the window is `Error::Bus`; a failure on a chunk is
/// `Error::Flush` carrying the chunk's offset into `raw`. A `wire_max` outside `1..=WIRE_MAX`
/// is rejected before anything is sent, since the interface would split such chunks again.
pub(crate) fn flush<DI, PinE>(
    iface: &mut DI,
    window: &AddressingWindow,
    raw: &[u8],
    wire_max: usize,
) -> Result<(), Error<DI::Error, PinE>>
where
    DI: DisplayInterface,
{
    if wire_max == 0 || wire_max > WIRE_MAX {
        return Err(ConfigError::WireMax(wire_max).into());
    }
    iface.send_commands(&window.commands()).map_err(Error::Bus)?;

    for (idx, chunk) in raw.chunks(wire_max).enumerate() {
        let offset = idx * wire_max;
        log::trace!("chunk at {} ({} bytes)", offset, chunk.len());
        if let Err(cause) = iface.send_data(chunk) {
            log::warn!("flush aborted at offset {} of {}", offset, raw.len());
            return Err(Error::Flush(FlushError { offset, cause }));
        }
    }
    Ok(())
}
