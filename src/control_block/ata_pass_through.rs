// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! ATA PASS-THROUGH (16) — CDB builder.
//!
//! CDB layout (SAT):
//!   [0]      = 0x85 (ATA PASS-THROUGH 16)
//!   [1]      = PROTOCOL (bits 4..1) | EXTEND (bit 0, always set here)
//!   [2]      = OFF_LINE / CK_COND / T_TYPE / T_DIR / BYT_BLOK / T_LENGTH
//!   [3..4]   = FEATURES (15:8, 7:0)
//!   [5..6]   = COUNT (15:8, 7:0)
//!   [7..12]  = LBA, interleaved as (31:24, 7:0, 39:32, 15:8, 47:40, 23:16)
//!   [13]     = DEVICE
//!   [14]     = COMMAND
//!   [15]     = CONTROL

use std::{fmt, time::Duration};

pub const ATA_PASS_THROUGH_16: u8 = 0x85;
pub const ATA_PASS_THROUGH_16_LEN: usize = 16;

/// Largest LBA representable in a 48-bit ATA register set.
pub const LBA48_MAX: u64 = (1 << 48) - 1;

/// Device register value with bit 6 (LBA mode) set.
pub const DEVICE_LBA: u8 = 1 << 6;

/// ATA protocol field (byte 1, bits 4..1).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum AtaProtocol {
    NonData = 0x3,
    Dma = 0x6,
}

bitflags::bitflags! {
    #[derive(Default, Clone, Copy, PartialEq, Eq)]
    /// Byte 2 of the ATA PASS-THROUGH (16) CDB.
    pub struct PassThroughFlags: u8 {
        /// Return ATA registers in sense data even on success.
        const CK_COND   = 0b0010_0000;
        /// Transfer from the device.
        const T_DIR     = 0b0000_1000;
        /// Transfer length counts blocks, not bytes.
        const BYT_BLOK  = 0b0000_0100;
        /// Transfer length lives in the COUNT field.
        const TLEN_SECC = 0b0000_0010;
    }
}

impl fmt::Debug for PassThroughFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PassThroughFlags as F;

        write!(f, "PassThroughFlags(")?;
        let mut sep = "";
        for (flag, name) in [
            (F::CK_COND, "CK_COND"),
            (F::T_DIR, "T_DIR"),
            (F::BYT_BLOK, "BYT_BLOK"),
            (F::TLEN_SECC, "TLEN_SECC"),
        ] {
            if self.contains(flag) {
                write!(f, "{sep}{name}")?;
                sep = "|";
            }
        }
        write!(f, ")")
    }
}

/// Transfer direction as seen by the SCSI generic layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataDirection {
    None,
    ToDevice,
    FromDevice,
}

/// One ATA register set plus everything the transport needs to ship it.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub command: u8,
    pub features: u16,
    pub count: u16,
    pub lba: u64,
    pub device: u8,
    pub protocol: AtaProtocol,
    pub flags: PassThroughFlags,
    pub direction: DataDirection,
    pub timeout: Duration,
}

impl CommandRequest {
    /// A non-data command with CK_COND set, as used by zone management.
    pub fn non_data(command: u8, features: u16, lba: u64, timeout: Duration) -> Self {
        Self {
            command,
            features,
            count: 0,
            lba,
            device: 0,
            protocol: AtaProtocol::NonData,
            flags: PassThroughFlags::CK_COND,
            direction: DataDirection::None,
            timeout,
        }
    }

    /// A DMA read of `pages` 512-byte blocks, length carried in COUNT.
    pub fn dma_in(
        command: u8,
        features: u16,
        pages: u16,
        lba: u64,
        check_condition: bool,
        timeout: Duration,
    ) -> Self {
        let mut flags = PassThroughFlags::T_DIR
            | PassThroughFlags::BYT_BLOK
            | PassThroughFlags::TLEN_SECC;
        flags.set(PassThroughFlags::CK_COND, check_condition);
        Self {
            command,
            features,
            count: pages,
            lba,
            device: DEVICE_LBA,
            protocol: AtaProtocol::Dma,
            flags,
            direction: DataDirection::FromDevice,
            timeout,
        }
    }

    /// Bytes the device is expected to move, when the length is block counted.
    pub fn expected_transfer_len(&self) -> Option<usize> {
        let counted = PassThroughFlags::BYT_BLOK | PassThroughFlags::TLEN_SECC;
        self.flags
            .contains(counted)
            .then_some(self.count as usize * 512)
    }

    /// Encode into a 16-byte ATA PASS-THROUGH CDB.
    pub fn to_cdb(&self) -> [u8; ATA_PASS_THROUGH_16_LEN] {
        let mut cdb = [0u8; ATA_PASS_THROUGH_16_LEN];
        build_ata_pass_through16(&mut cdb, self);
        cdb
    }
}

/// Fill an ATA PASS-THROUGH (16) CDB from `req`.
///
/// The EXTEND bit is always set, and LBA bits above 47 are dropped.
#[inline]
pub fn build_ata_pass_through16(cdb: &mut [u8; 16], req: &CommandRequest) {
    cdb.fill(0);
    cdb[0] = ATA_PASS_THROUGH_16;
    cdb[1] = ((req.protocol as u8) << 1) | 0x01;
    cdb[2] = req.flags.bits();
    cdb[3..5].copy_from_slice(&req.features.to_be_bytes());
    cdb[5..7].copy_from_slice(&req.count.to_be_bytes());
    cdb[7..13].copy_from_slice(&encode_lba48(req.lba));
    cdb[13] = req.device;
    cdb[14] = req.command;
}

/// Interleave a 48-bit LBA into CDB bytes 7..12.
#[inline]
pub fn encode_lba48(lba: u64) -> [u8; 6] {
    let b = lba.to_le_bytes();
    [b[3], b[0], b[4], b[1], b[5], b[2]]
}

/// Inverse of [`encode_lba48`].
#[inline]
pub fn decode_lba48(raw: &[u8; 6]) -> u64 {
    u64::from_le_bytes([raw[1], raw[3], raw[5], raw[0], raw[2], raw[4], 0, 0])
}

/// Pull the LBA back out of a full CDB.
#[inline]
pub fn cdb_lba(cdb: &[u8; 16]) -> u64 {
    let mut raw = [0u8; 6];
    raw.copy_from_slice(&cdb[7..13]);
    decode_lba48(&raw)
}

#[inline]
pub fn cdb_features(cdb: &[u8; 16]) -> u16 {
    u16::from_be_bytes([cdb[3], cdb[4]])
}

#[inline]
pub fn cdb_count(cdb: &[u8; 16]) -> u16 {
    u16::from_be_bytes([cdb[5], cdb[6]])
}
