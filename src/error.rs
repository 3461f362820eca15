// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error taxonomy shared by the framer, decoder, walker and reset invoker.

use std::io;

use thiserror::Error;

use crate::models::sense_data::SenseResult;

/// The submit primitive failed. Always fatal for the invocation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("SG_IO submit failed: {0}")]
    Submit(#[source] io::Error),
    #[error("command timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u32 },
    #[error("host adapter error: host_status={host_status:#06x}, driver_status={driver_status:#06x}")]
    Host { host_status: u16, driver_status: u16 },
    #[error("data buffer too large for a single transfer: {0} bytes")]
    BufferTooLarge(usize),
    #[error("SCSI generic pass-through is not available on this platform")]
    Unsupported,
    #[error("LBA {lba:#x} does not fit in 48 bits")]
    LbaOutOfRange { lba: u64 },
    #[error("data buffer of {actual} bytes disagrees with COUNT ({expected} bytes)")]
    TransferLengthMismatch { expected: usize, actual: usize },
}

/// The sense buffer could not be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported sense response code {0:#04x}")]
    UnsupportedFormat(u8),
    #[error("sense buffer too small: need {need} bytes, got {got}")]
    TooShort { need: usize, got: usize },
    #[error("ATA registers require descriptor-format sense, got response code {0:#04x}")]
    NotDescriptorFormat(u8),
    #[error("unexpected ATA status return descriptor header: code={code:#04x}, len={len:#04x}")]
    BadDescriptorHeader { code: u8, len: u8 },
    #[error("zone report too short: need {need} bytes, got {got}")]
    ReportTooShort { need: usize, got: usize },
}

/// The drive refused the request for a classifiable reason, or the caller asked
/// for something the drive cannot serve.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("command was aborted, is this a ZAC drive?")]
    NotZoned,
    #[error("invalid zone offset ({offset}), device reports {total} zones")]
    InvalidOffset { offset: u32, total: u32 },
    #[error("requested {requested} zones exceeds the supported maximum of {max}")]
    TooManyZones { requested: u32, max: u32 },
    #[error("zone offset {offset} with zone length {zone_length:#x} is beyond 48-bit LBA space")]
    OffsetOutOfRange { offset: u32, zone_length: u64 },
    #[error("RESET WRITE POINTER failed because input LBA does not specify start of zone")]
    UnalignedLba,
    #[error("RESET WRITE POINTER failed because zone condition is OFFLINE")]
    ZoneOffline,
    #[error("RESET WRITE POINTER failed because zone condition is READ ONLY")]
    ZoneReadOnly,
    #[error("zone walk stalled at LBA {lba:#x}: zone has zero length")]
    WalkStalled { lba: u64 },
    #[error("command failed. Sense data: {0}")]
    CommandFailed(SenseResult),
}

#[derive(Debug, Error)]
pub enum ZacError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("internal state error: {0}")]
    Internal(&'static str),
}

impl ZacError {
    /// Returns the domain condition, if the failure was classified.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ZacError::Domain(d) => Some(d),
            _ => None,
        }
    }
}

pub type Result<T, E = ZacError> = std::result::Result<T, E>;
