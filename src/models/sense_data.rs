// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

use crate::error::DecodeError;

/// Fixed format needs bytes up to ASCQ (byte 13).
pub const FIXED_MIN_LEN: usize = 14;
/// Descriptor format header is 8 bytes.
pub const DESCRIPTOR_MIN_LEN: usize = 8;

pub const RESPONSE_FIXED_CURRENT: u8 = 0x70;
pub const RESPONSE_FIXED_DEFERRED: u8 = 0x71;
pub const RESPONSE_DESC_CURRENT: u8 = 0x72;
pub const RESPONSE_DESC_DEFERRED: u8 = 0x73;

/// Layout selected by the response code in byte 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SenseFormat {
    Fixed,
    Descriptor,
}

impl SenseFormat {
    pub fn from_response_code(code: u8) -> Result<Self, DecodeError> {
        match code & 0x7F {
            RESPONSE_FIXED_CURRENT | RESPONSE_FIXED_DEFERRED => Ok(Self::Fixed),
            RESPONSE_DESC_CURRENT | RESPONSE_DESC_DEFERRED => Ok(Self::Descriptor),
            other => Err(DecodeError::UnsupportedFormat(other)),
        }
    }
}

/// SPC sense keys used by the classifier.
pub mod sense_key {
    pub const NO_SENSE: u8 = 0x00;
    pub const RECOVERED_ERROR: u8 = 0x01;
    pub const ILLEGAL_REQUEST: u8 = 0x05;
    pub const DATA_PROTECT: u8 = 0x07;
    pub const ABORTED_COMMAND: u8 = 0x0B;
}

/// Normalized (SENSE KEY, ASC, ASCQ) triple.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SenseResult {
    pub key: u8,
    pub asc: u8,
    pub ascq: u8,
}

impl SenseResult {
    pub const fn new(key: u8, asc: u8, ascq: u8) -> Self {
        Self {
            key: key & 0x0F,
            asc,
            ascq,
        }
    }
}

impl fmt::Display for SenseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(SK={:#04x}, ASC={:#04x}, ASCQ={:#04x})",
            self.key, self.asc, self.ascq
        )
    }
}

impl fmt::Debug for SenseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseResult")
            .field("key", &format_args!("{:#x}", self.key))
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &asc_ascq_to_str(self.asc, self.ascq))
            .finish()
    }
}

/// Parse fixed- or descriptor-format sense data into a [`SenseResult`].
///
/// Fixed: key in byte 2, ASC/ASCQ in bytes 12/13.
/// Descriptor: key in byte 1, ASC/ASCQ in bytes 2/3.
pub fn decode_sense(buf: &[u8]) -> Result<SenseResult, DecodeError> {
    let code = *buf.first().ok_or(DecodeError::TooShort { need: 1, got: 0 })?;

    let (need, key, asc, ascq) = match SenseFormat::from_response_code(code)? {
        SenseFormat::Fixed => (FIXED_MIN_LEN, 2, 12, 13),
        SenseFormat::Descriptor => (DESCRIPTOR_MIN_LEN, 1, 2, 3),
    };
    if buf.len() < need {
        return Err(DecodeError::TooShort {
            need,
            got: buf.len(),
        });
    }

    Ok(SenseResult::new(buf[key], buf[asc], buf[ascq]))
}

/// True when the transport wrote anything into the sense buffer.
#[inline]
pub fn sense_present(buf: &[u8]) -> bool {
    buf.first().is_some_and(|b| b & 0x7F != 0)
}

/// Return the SPC description for a given ASC/ASCQ pair.
///
/// * If the pair is not present in the table, returns `"UNSPECIFIED / vendor
///   specific"`.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    hot_table(asc, ascq).unwrap_or("UNSPECIFIED / vendor specific")
}

fn hot_table(asc: u8, ascq: u8) -> Option<&'static str> {
    Some(match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x00, 0x1D) => "ATA pass through information available",
        (0x21, 0x00) => "Logical block address out of range",
        (0x21, 0x04) => "Unaligned write command",
        (0x24, 0x00) => "Invalid field in CDB",
        (0x27, 0x08) => "Zone is read only",
        (0x2C, 0x0D) => "Reset write pointer not allowed",
        (0x2C, 0x0E) => "Zone is offline",
        (0x44, 0x00) => "Internal target failure",
        _ => return None,
    })
}
