/// Errors raised by the flip mount driver.
///
/// Everything except `InvalidPosition` and `Closed` is fatal to the
/// session: the caller should drop it and reconnect. There is no retry
/// logic anywhere in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serial port could not be opened or queried.
    #[error("serial port error: {0}")]
    Connection(#[from] serialport::Error),

    /// The connected hardware is not the supported MFF101 model/firmware.
    #[error("unsupported device: model {model:?}, firmware version {firmware}")]
    Handshake { model: String, firmware: u32 },

    /// A position outside {1, 2} was supplied by the caller.
    #[error("invalid flipper position {0}, must be 1 or 2")]
    InvalidPosition(u8),

    /// A response buffer was shorter than its fixed frame length.
    #[error("response frame must be {expected} bytes, got {actual}")]
    FrameLength { expected: usize, actual: usize },

    /// A decoded field fell outside its documented domain.
    #[error("field value {value:#04x} at offset {offset} is outside its domain")]
    FrameField { offset: usize, value: u8 },

    /// Unread bytes were left on the channel after an exchange.
    /// The byte stream can no longer be trusted; reconnection is required.
    #[error("protocol desynchronized: {0} unread bytes left on the channel")]
    Desync(usize),

    /// The channel did not deliver the expected bytes within the read timeout.
    #[error("serial read timed out")]
    Timeout,

    /// An operation was attempted after `close()`.
    #[error("session is closed")]
    Closed,

    /// A transport-level read or write failed.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
