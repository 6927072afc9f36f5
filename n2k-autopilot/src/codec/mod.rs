//! NMEA2000 frame codec
//!
//! Outbound commands are built as typed [`N2kFrame`] values and rendered to the
//! comma-separated text form the transport accepts:
//!
//! ```text
//! timestamp,priority,pgn,src,dst,len,b0,b1,...
//! ```
//!
//! Inbound, already field-decoded values are normalized by [`fields`].

use crate::types::{AutopilotError, Result, Timestamp};
use chrono::SecondsFormat;
use std::fmt;

pub mod commands;
pub mod fields;

// Re-export the builders
pub use commands::{
    encode_adjust_frame, encode_heading_frame, encode_state_frame, state_frame, AdjustStep,
};

/// Proprietary command group function (state and heading commands)
pub const PGN_COMMAND_GROUP: u32 = 126208;

/// Proprietary keypad emulation
pub const PGN_SEATALK_KEYPAD: u32 = 126720;

/// Global destination address
pub const BROADCAST_ADDRESS: u8 = 255;

/// One outbound message, ready to be rendered for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct N2kFrame {
    /// Time the command was issued
    pub timestamp: Timestamp,
    /// CAN priority (0 = highest)
    pub priority: u8,
    /// Parameter group number
    pub pgn: u32,
    /// Our source address
    pub source: u8,
    /// Destination address (255 = everyone)
    pub destination: u8,
    /// Payload bytes
    pub data: Vec<u8>,
}

impl N2kFrame {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for N2kFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.priority,
            self.pgn,
            self.source,
            self.destination,
            self.data.len()
        )?;
        for byte in &self.data {
            write!(f, ",{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Parse a textual bus id ("204") into an 8-bit address
pub fn parse_address(id: &str) -> Result<u8> {
    id.trim()
        .parse::<u8>()
        .map_err(|_| AutopilotError::InvalidAddress(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_frame_rendering() {
        let frame = N2kFrame {
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            priority: 3,
            pgn: PGN_COMMAND_GROUP,
            source: 1,
            destination: 204,
            data: vec![0x01, 0x0a, 0xff],
        };

        assert_eq!(frame.len(), 3);
        assert_eq!(
            frame.to_string(),
            "2024-05-01T12:30:00.000Z,3,126208,1,204,3,01,0a,ff"
        );
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("204"), Ok(204));
        assert_eq!(parse_address("0"), Ok(0));
        assert!(matches!(parse_address("256"), Err(AutopilotError::InvalidAddress(_))));
        assert!(matches!(parse_address("can0.204"), Err(AutopilotError::InvalidAddress(_))));
    }
}
