// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! ATA Status Return descriptor (SAT, descriptor code 09h) embedded in
//! descriptor-format sense data.
//!
//! Descriptor layout, relative to sense byte 8:
//!   [0]  = 0x09 (descriptor code)   [1]  = 0x0C (additional length)
//!   [2]  = EXTEND (bit 0)           [3]  = ERROR
//!   [4]  = COUNT (15:8)             [5]  = COUNT (7:0)
//!   [6]  = LBA (31:24)              [7]  = LBA (7:0)
//!   [8]  = LBA (39:32)              [9]  = LBA (15:8)
//!   [10] = LBA (47:40)              [11] = LBA (23:16)
//!   [12] = DEVICE                   [13] = STATUS

use crate::{
    error::DecodeError,
    models::sense_data::{SenseFormat, SenseResult},
};

pub const ATA_DESCRIPTOR_OFFSET: usize = 8;
pub const ATA_DESCRIPTOR_CODE: u8 = 0x09;
pub const ATA_DESCRIPTOR_ADDITIONAL_LEN: u8 = 0x0C;
pub const ATA_DESCRIPTOR_LEN: usize = 14;

/// Output registers reported by the drive. The upper byte of each 16-bit
/// field is only meaningful when `extend` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtaRegisterSnapshot {
    pub extend: bool,
    pub status: u8,
    pub error: u8,
    pub sector_count: u16,
    pub lba_low: u16,
    pub lba_mid: u16,
    pub lba_high: u16,
    pub device: u8,
}

impl AtaRegisterSnapshot {
    /// REQUEST SENSE DATA EXT convention: the sense triple is carried in
    /// LBA(23:16), LBA(15:8), LBA(7:0).
    pub fn sense_triple(&self) -> SenseResult {
        SenseResult::new(
            (self.lba_high & 0xFF) as u8,
            (self.lba_mid & 0xFF) as u8,
            (self.lba_low & 0xFF) as u8,
        )
    }
}

/// Extract the ATA Status Return descriptor from descriptor-format sense.
pub fn decode_ata_registers(buf: &[u8]) -> Result<AtaRegisterSnapshot, DecodeError> {
    let code = *buf.first().ok_or(DecodeError::TooShort { need: 1, got: 0 })?;
    if SenseFormat::from_response_code(code)? != SenseFormat::Descriptor {
        return Err(DecodeError::NotDescriptorFormat(code & 0x7F));
    }

    let need = ATA_DESCRIPTOR_OFFSET + ATA_DESCRIPTOR_LEN;
    let d = buf
        .get(ATA_DESCRIPTOR_OFFSET..need)
        .ok_or(DecodeError::TooShort {
            need,
            got: buf.len(),
        })?;

    if d[0] != ATA_DESCRIPTOR_CODE || d[1] != ATA_DESCRIPTOR_ADDITIONAL_LEN {
        return Err(DecodeError::BadDescriptorHeader {
            code: d[0],
            len: d[1],
        });
    }

    let extend = d[2] & 0x01 != 0;
    let mask = if extend { 0xFFFF } else { 0x00FF };
    let pair = |hi: usize, lo: usize| u16::from_be_bytes([d[hi], d[lo]]) & mask;

    Ok(AtaRegisterSnapshot {
        extend,
        status: d[13],
        error: d[3],
        sector_count: pair(4, 5),
        lba_low: pair(6, 7),
        lba_mid: pair(8, 9),
        lba_high: pair(10, 11),
        device: d[12],
    })
}
