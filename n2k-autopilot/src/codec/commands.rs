//! Outbound command frame builders
//!
//! Each command is a fixed payload template; only the timestamp, the addresses
//! and (for heading and keypad frames) a two byte field vary.

use super::{parse_address, N2kFrame, PGN_COMMAND_GROUP, PGN_SEATALK_KEYPAD};
use crate::types::{AutopilotError, AutopilotState, Result, Timestamp};
use byteorder::{ByteOrder, LittleEndian};

const COMMAND_PRIORITY: u8 = 3;
const KEYPAD_PRIORITY: u8 = 7;

/// Header shared by every state command (mode bytes follow)
const STATE_PREFIX: [u8; 12] = [
    0x01, 0x63, 0xff, 0x00, 0xf8, 0x04, 0x01, 0x3b, 0x07, 0x03, 0x04, 0x04,
];
const STATE_SUFFIX: [u8; 3] = [0x05, 0xff, 0xff];

/// Heading command header (little-endian target follows)
const HEADING_PREFIX: [u8; 12] = [
    0x01, 0x50, 0xff, 0x00, 0xf8, 0x03, 0x01, 0x3b, 0x07, 0x03, 0x04, 0x06,
];

const KEYPAD_PREFIX: [u8; 6] = [0x3b, 0x9f, 0xf0, 0x81, 0x86, 0x21];
const KEYPAD_SUFFIX: [u8; 14] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xc1, 0xc2, 0xcd, 0x66, 0x80, 0xd3, 0x42, 0xb1, 0xc8,
];

/// Scale of the heading field: 1e-4 rad per bit
const HEADING_SCALE: f64 = 10_000.0;

/// Mode bytes for each state command
fn state_mode_bytes(state: AutopilotState) -> [u8; 2] {
    match state {
        AutopilotState::Auto => [0x40, 0x00],
        AutopilotState::Wind => [0x00, 0x01],
        AutopilotState::Route => [0x80, 0x01],
        AutopilotState::Standby => [0x00, 0x00],
    }
}

/// Build the state command for a known state
pub fn state_frame(
    state: AutopilotState,
    timestamp: Timestamp,
    source: u8,
    destination: u8,
) -> N2kFrame {
    let mut data = Vec::with_capacity(STATE_PREFIX.len() + 2 + STATE_SUFFIX.len());
    data.extend_from_slice(&STATE_PREFIX);
    data.extend_from_slice(&state_mode_bytes(state));
    data.extend_from_slice(&STATE_SUFFIX);

    N2kFrame {
        timestamp,
        priority: COMMAND_PRIORITY,
        pgn: PGN_COMMAND_GROUP,
        source,
        destination,
        data,
    }
}

/// Build the state command for a host-supplied state name
///
/// # Errors
/// * `UnknownState` if the name has no template
/// * `InvalidAddress` if either id is not an 8-bit bus address
pub fn encode_state_frame(
    state_name: &str,
    timestamp: Timestamp,
    src_id: &str,
    dst_id: &str,
) -> Result<N2kFrame> {
    let state = AutopilotState::from_name(state_name)
        .ok_or_else(|| AutopilotError::UnknownState(state_name.to_string()))?;

    Ok(state_frame(
        state,
        timestamp,
        parse_address(src_id)?,
        parse_address(dst_id)?,
    ))
}

/// Scale a target angle into the 16-bit heading field
///
/// Headings in [0, 2π) use the unsigned range, wind angles down to -π the
/// signed one; both are stored as the same two bytes.
fn heading_field(target_radians: f64) -> Result<u16> {
    let scaled = (target_radians * HEADING_SCALE).trunc();
    if !scaled.is_finite() || scaled < i16::MIN as f64 || scaled > u16::MAX as f64 {
        return Err(AutopilotError::TargetOutOfRange(target_radians));
    }

    Ok(scaled as i32 as u16)
}

/// Build the heading command for a target in radians
pub fn encode_heading_frame(
    target_radians: f64,
    timestamp: Timestamp,
    src_id: &str,
    dst_id: &str,
) -> Result<N2kFrame> {
    let raw = heading_field(target_radians)?;
    let mut field = [0u8; 2];
    LittleEndian::write_u16(&mut field, raw);

    let mut data = Vec::with_capacity(HEADING_PREFIX.len() + 2);
    data.extend_from_slice(&HEADING_PREFIX);
    data.extend_from_slice(&field);

    Ok(N2kFrame {
        timestamp,
        priority: COMMAND_PRIORITY,
        pgn: PGN_COMMAND_GROUP,
        source: parse_address(src_id)?,
        destination: parse_address(dst_id)?,
        data,
    })
}

/// One press of a course-adjust key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustStep {
    PlusOne,
    MinusOne,
    PlusTen,
    MinusTen,
}

impl AdjustStep {
    /// Map a degree delta onto a key; only ±1 and ±10 exist
    pub fn from_delta(delta: f64) -> Result<Self> {
        if delta == 1.0 {
            Ok(AdjustStep::PlusOne)
        } else if delta == -1.0 {
            Ok(AdjustStep::MinusOne)
        } else if delta == 10.0 {
            Ok(AdjustStep::PlusTen)
        } else if delta == -10.0 {
            Ok(AdjustStep::MinusTen)
        } else {
            Err(AutopilotError::InvalidAdjustment(delta))
        }
    }

    /// Key code and its complement
    pub fn key_code(self) -> [u8; 2] {
        match self {
            AdjustStep::PlusOne => [0x07, 0xf8],
            AdjustStep::PlusTen => [0x08, 0xf7],
            AdjustStep::MinusOne => [0x05, 0xfa],
            AdjustStep::MinusTen => [0x06, 0xf9],
        }
    }
}

/// Build the keypad frame for a course adjustment
pub fn encode_adjust_frame(
    delta: f64,
    timestamp: Timestamp,
    src_id: &str,
    everyone_id: &str,
) -> Result<N2kFrame> {
    let step = AdjustStep::from_delta(delta)?;

    let mut data = Vec::with_capacity(KEYPAD_PREFIX.len() + 2 + KEYPAD_SUFFIX.len());
    data.extend_from_slice(&KEYPAD_PREFIX);
    data.extend_from_slice(&step.key_code());
    data.extend_from_slice(&KEYPAD_SUFFIX);

    Ok(N2kFrame {
        timestamp,
        priority: KEYPAD_PRIORITY,
        pgn: PGN_SEATALK_KEYPAD,
        source: parse_address(src_id)?,
        destination: parse_address(everyone_id)?,
        data,
    })
}
