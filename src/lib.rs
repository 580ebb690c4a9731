//! Driver for the Thorlabs MFF101 motorized filter flip mount.
//!
//! The device speaks a fixed-length binary command/response protocol over
//! a 115200 baud serial link. A move ("jog") is acknowledged only by an
//! asynchronous 20-byte completion frame, so the session tracks an explicit
//! move state and always drains a pending completion before issuing the
//! next command. The wire has no message framing beyond the fixed lengths,
//! which makes that draining the one thing that keeps the stream aligned.
//!
//! ```no_run
//! use mff101_driver::{FlipMount, Position};
//!
//! fn main() -> mff101_driver::Result<()> {
//!     let mut mount = FlipMount::open("/dev/ttyUSB0")?;
//!     mount.flip(Position::Two, true)?;
//!     assert_eq!(mount.get_position()?, Position::Two);
//!     mount.close();
//!     Ok(())
//! }
//! ```

mod channel;
mod debug;
mod device_info;
mod error;
mod frame;

use serialport::SerialPort;
use tracing::{debug, trace};

pub use channel::{open, ByteChannel, BAUD_RATE};
pub use device_info::{DeviceInfo, EXPECTED_FIRMWARE_VERSION, EXPECTED_MODEL_NUMBER};
pub use error::{Error, Result};
pub use frame::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveState {
    Idle,
    Moving,
}

/// Session owning the channel to one flipper unit.
///
/// Single-threaded, strictly request/response: one command may be
/// outstanding at a time, and the type is not meant to be shared across
/// threads without external mutual exclusion.
pub struct FlipMount<C: ByteChannel> {
    channel: Option<C>,
    device_info: DeviceInfo,
    position: Position,
    move_state: MoveState,
}

impl FlipMount<Box<dyn SerialPort>> {
    /// Open `port_name` and connect to the flipper attached to it.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = channel::open(port_name)?;
        Self::connect(port)
    }
}

impl<C: ByteChannel> FlipMount<C> {
    /// Validate the device behind `channel` and establish the baseline state.
    ///
    /// Sends the info request, checks the reported model number and firmware
    /// version against the supported constants, then queries the initial
    /// position. Fails with [`Error::Handshake`] on any other hardware; the
    /// channel is dropped in that case.
    pub fn connect(mut channel: C) -> Result<Self> {
        channel.send(&frame::GET_INFO)?;
        let response = channel.recv_exact(frame::INFO_RESPONSE_LEN)?;
        ensure_drained(&mut channel)?;
        trace!(response = %debug::to_hex(&response), "info response");

        let device_info = frame::decode_info(&response)?;
        device_info.check_supported()?;
        debug!(
            model = %device_info.model_number_str(),
            serial_number = device_info.serial_number,
            firmware_version = device_info.firmware_version,
            "connected"
        );

        let position = query_position(&mut channel)?;
        Ok(FlipMount {
            channel: Some(channel),
            device_info,
            position,
            move_state: MoveState::Idle,
        })
    }

    /// Identity decoded during the handshake.
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Last position observed on the wire.
    pub fn position(&self) -> Position {
        self.position
    }

    /// True while a jog command is outstanding.
    pub fn is_moving(&self) -> bool {
        self.move_state == MoveState::Moving
    }

    fn channel(&mut self) -> Result<&mut C> {
        self.channel.as_mut().ok_or(Error::Closed)
    }

    /// Flash the front panel LEDs to locate the unit. No response frame.
    ///
    /// The pending-byte check is skipped while a move is outstanding, since
    /// its completion frame may land at any moment.
    pub fn identify(&mut self) -> Result<()> {
        let moving = self.is_moving();
        let channel = self.channel()?;
        channel.send(&frame::IDENTIFY)?;
        if !moving {
            ensure_drained(channel)?;
        }
        debug!("identify sent");
        Ok(())
    }

    /// Query the current flip position, resolving any pending move first.
    pub fn get_position(&mut self) -> Result<Position> {
        self.finish_flip()?;
        let position = query_position(self.channel()?)?;
        self.position = position;
        Ok(position)
    }

    /// Flip to `position`. A move still outstanding from an earlier
    /// non-blocking flip is resolved before the new jog is written.
    ///
    /// With `block` set, returns only after the completion frame has been
    /// consumed and the position re-queried; otherwise returns immediately
    /// and leaves the session in the moving state.
    pub fn flip(&mut self, position: Position, block: bool) -> Result<()> {
        self.finish_flip()?;
        debug!(?position, block, "flipping");
        let channel = self.channel()?;
        channel.send(&frame::encode_move_jog(position))?;
        ensure_drained(channel)?;
        self.move_state = MoveState::Moving;
        if block {
            self.finish_flip()?;
        }
        Ok(())
    }

    /// Consume the completion frame of a pending move and re-query the
    /// position. No-op, with no channel I/O, when no move is outstanding.
    ///
    /// This is the synchronization point that realigns the byte stream
    /// before any subsequent command.
    pub fn finish_flip(&mut self) -> Result<()> {
        if self.move_state != MoveState::Moving {
            return Ok(());
        }
        let channel = self.channel()?;
        let completed = channel.recv_exact(frame::MOVE_COMPLETED_LEN)?;
        frame::decode_move_completed(&completed)?;
        let position = query_position(channel)?;
        self.position = position;
        self.move_state = MoveState::Idle;
        debug!(?position, "flip finished");
        Ok(())
    }

    /// Release the channel. Idempotent; every operation afterwards fails
    /// with [`Error::Closed`].
    pub fn close(&mut self) {
        if self.channel.take().is_some() {
            debug!("closed");
        }
    }
}

fn query_position<C: ByteChannel>(channel: &mut C) -> Result<Position> {
    channel.send(&frame::GET_STATUS)?;
    let response = channel.recv_exact(frame::STATUS_RESPONSE_LEN)?;
    ensure_drained(channel)?;
    trace!(response = %debug::to_hex(&response), "status response");
    frame::decode_status(&response)
}

fn ensure_drained<C: ByteChannel>(channel: &mut C) -> Result<()> {
    match channel.pending()? {
        0 => Ok(()),
        n => Err(Error::Desync(n)),
    }
}
