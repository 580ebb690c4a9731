//! Byte-exact codec for the APT frames used by the MFF101.
//!
//! Every command is a fixed six-byte header with no payload. Responses
//! are fixed-length buffers whose layout is keyed by the message id, so
//! the only message framing on the wire is the lengths below.

use crate::device_info::DeviceInfo;
use crate::error::{Error, Result};

/// MGMSG_HW_REQ_INFO
pub const GET_INFO: [u8; 6] = [0x05, 0x00, 0x00, 0x00, 0x50, 0x01];
/// MGMSG_MOD_IDENTIFY
pub const IDENTIFY: [u8; 6] = [0x23, 0x02, 0x00, 0x00, 0x50, 0x01];
/// MGMSG_MOT_REQ_STATUSBITS
pub const GET_STATUS: [u8; 6] = [0x29, 0x04, 0x00, 0x00, 0x50, 0x01];

pub const INFO_RESPONSE_LEN: usize = 90;
pub const STATUS_RESPONSE_LEN: usize = 12;
/// MGMSG_MOT_MOVE_COMPLETED, sent by the device once a jog settles.
pub const MOVE_COMPLETED_LEN: usize = 20;

const STATUS_POSITION_OFFSET: usize = 8;

/// One of the two physical flip states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Position {
    One = 1,
    Two = 2,
}

impl TryFrom<u8> for Position {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Position::One),
            2 => Ok(Position::Two),
            other => Err(Error::InvalidPosition(other)),
        }
    }
}

/// MGMSG_MOT_MOVE_JOG with the direction byte selecting the target position.
pub fn encode_move_jog(position: Position) -> [u8; 6] {
    [0x6A, 0x04, 0x00, position as u8, 0x50, 0x01]
}

fn check_length(buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(Error::FrameLength {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

pub fn decode_info(buf: &[u8]) -> Result<DeviceInfo> {
    check_length(buf, INFO_RESPONSE_LEN)?;
    let mut model_number = [0u8; 8];
    model_number.copy_from_slice(&buf[10..18]);
    Ok(DeviceInfo {
        model_number,
        device_type: read_u16_le(buf, 18),
        serial_number: read_u32_le(buf, 6),
        firmware_version: read_u32_le(buf, 20),
        hardware_version: read_u16_le(buf, 84),
    })
}

pub fn decode_status(buf: &[u8]) -> Result<Position> {
    check_length(buf, STATUS_RESPONSE_LEN)?;
    match buf[STATUS_POSITION_OFFSET] {
        1 => Ok(Position::One),
        2 => Ok(Position::Two),
        value => Err(Error::FrameField {
            offset: STATUS_POSITION_OFFSET,
            value,
        }),
    }
}

/// The driver only needs the completion frame drained from the stream;
/// its fields are intentionally not inspected.
pub fn decode_move_completed(buf: &[u8]) -> Result<()> {
    check_length(buf, MOVE_COMPLETED_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_fixture() -> Vec<u8> {
        let mut buf = vec![0u8; INFO_RESPONSE_LEN];
        buf[6..10].copy_from_slice(&37000001u32.to_le_bytes());
        buf[10..18].copy_from_slice(b"MFF002\x00\x00");
        buf[18..20].copy_from_slice(&16u16.to_le_bytes());
        buf[20..24].copy_from_slice(&65539u32.to_le_bytes());
        buf[84..86].copy_from_slice(&2u16.to_le_bytes());
        buf
    }

    #[test]
    fn test_command_frames() {
        assert_eq!(GET_INFO, [0x05, 0x00, 0x00, 0x00, 0x50, 0x01]);
        assert_eq!(IDENTIFY, [0x23, 0x02, 0x00, 0x00, 0x50, 0x01]);
        assert_eq!(GET_STATUS, [0x29, 0x04, 0x00, 0x00, 0x50, 0x01]);
    }

    #[test]
    fn test_encode_move_jog() {
        assert_eq!(
            encode_move_jog(Position::One),
            [0x6A, 0x04, 0x00, 0x01, 0x50, 0x01]
        );
        assert_eq!(
            encode_move_jog(Position::Two),
            [0x6A, 0x04, 0x00, 0x02, 0x50, 0x01]
        );
    }

    #[test]
    fn test_position_try_from() {
        assert_eq!(Position::try_from(1).unwrap(), Position::One);
        assert_eq!(Position::try_from(2).unwrap(), Position::Two);
        assert!(matches!(
            Position::try_from(0),
            Err(Error::InvalidPosition(0))
        ));
        assert!(matches!(
            Position::try_from(3),
            Err(Error::InvalidPosition(3))
        ));
    }

    #[test]
    fn test_decode_info() {
        let info = decode_info(&info_fixture()).unwrap();
        assert_eq!(&info.model_number, b"MFF002\x00\x00");
        assert_eq!(info.device_type, 16);
        assert_eq!(info.serial_number, 37000001);
        assert_eq!(info.firmware_version, 65539);
        assert_eq!(info.hardware_version, 2);
    }

    #[test]
    fn test_decode_info_short_buffer() {
        assert!(matches!(
            decode_info(&[0u8; 89]),
            Err(Error::FrameLength {
                expected: 90,
                actual: 89
            })
        ));
    }

    #[test]
    fn test_decode_status() {
        let mut buf = vec![0u8; STATUS_RESPONSE_LEN];
        buf[8] = 1;
        assert_eq!(decode_status(&buf).unwrap(), Position::One);
        buf[8] = 2;
        assert_eq!(decode_status(&buf).unwrap(), Position::Two);
    }

    #[test]
    fn test_decode_status_bad_position_byte() {
        let mut buf = vec![0u8; STATUS_RESPONSE_LEN];
        buf[8] = 7;
        assert!(matches!(
            decode_status(&buf),
            Err(Error::FrameField {
                offset: 8,
                value: 7
            })
        ));
    }

    #[test]
    fn test_decode_status_short_buffer() {
        assert!(matches!(
            decode_status(&[0u8; 5]),
            Err(Error::FrameLength {
                expected: 12,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_decode_move_completed() {
        assert!(decode_move_completed(&[0u8; MOVE_COMPLETED_LEN]).is_ok());
        assert!(matches!(
            decode_move_completed(&[0u8; 19]),
            Err(Error::FrameLength {
                expected: 20,
                actual: 19
            })
        ));
    }
}
