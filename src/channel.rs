//! Byte-level transport behind the driver.
//!
//! The session and codec only ever see [`ByteChannel`], so they can be
//! exercised against an in-memory fake device; the real implementation
//! sits on top of a `serialport` handle.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;

use crate::error::{Error, Result};

pub const BAUD_RATE: u32 = 115200;
const READ_TIMEOUT: Duration = Duration::from_secs(1);
const READ_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Duplex byte stream with a view of how many bytes are buffered but unread.
pub trait ByteChannel {
    fn send(&mut self, data: &[u8]) -> Result<()>;
    /// Blocks until exactly `n` bytes are available, or fails with
    /// [`Error::Timeout`] after the configured read timeout.
    fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>>;
    /// Number of received bytes not yet consumed.
    fn pending(&mut self) -> Result<usize>;
}

/// Open the serial port the flipper is attached to.
pub fn open(port_name: &str) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(port_name, BAUD_RATE)
        .timeout(READ_TIMEOUT)
        .open()?;
    Ok(port)
}

impl ByteChannel for Box<dyn SerialPort> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        Write::write_all(self, data)?;
        Ok(())
    }

    fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let deadline = Instant::now() + READ_TIMEOUT;
        while self.pending()? < n {
            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
            std::thread::sleep(READ_POLL_INTERVAL);
        }
        let mut buf = vec![0u8; n];
        Read::read_exact(self, buf.as_mut_slice())?;
        Ok(buf)
    }

    fn pending(&mut self) -> Result<usize> {
        let n: u32 = self.bytes_to_read()?;
        Ok(n as usize)
    }
}
