use crate::error::{Error, Result};

/// Model number reported by the MFF101 flipper unit, padded with NULs.
pub const EXPECTED_MODEL_NUMBER: [u8; 8] = *b"MFF002\x00\x00";
pub const EXPECTED_FIRMWARE_VERSION: u32 = 65539;

/// Hardware identity decoded from the 90-byte info response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model_number: [u8; 8],
    pub device_type: u16,
    pub serial_number: u32,
    pub firmware_version: u32,
    pub hardware_version: u16,
}

impl DeviceInfo {
    /// Model number as printable text, NUL padding stripped.
    pub fn model_number_str(&self) -> String {
        String::from_utf8_lossy(&self.model_number)
            .trim_end_matches('\0')
            .to_string()
    }

    /// Handshake validation against the one supported model and firmware.
    pub fn check_supported(&self) -> Result<()> {
        if self.model_number != EXPECTED_MODEL_NUMBER
            || self.firmware_version != EXPECTED_FIRMWARE_VERSION
        {
            return Err(Error::Handshake {
                model: self.model_number_str(),
                firmware: self.firmware_version,
            });
        }
        Ok(())
    }
}
