// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REPORT ZONES DMA (ZAC) — request builder.
//!
//! Register usage:
//!   FEATURES = REPORTING OPTIONS (15:8) | ACTION (7:0, 0x00)
//!   COUNT    = number of 512-byte pages to return
//!   LBA      = ZONE LOCATOR (first zone to report)
//!   DEVICE   = bit 6 set
//!
//! The response is a 64-byte header followed by 64-byte zone descriptors;
//! see [`crate::models::zones`].

use std::{fmt, time::Duration};

use anyhow::anyhow;

use super::ata_pass_through::CommandRequest;

pub const ATA_REPORT_ZONES_DMA: u8 = 0x4A;
pub const REPORT_ZONES_ACTION: u8 = 0x00;

/// ATA logical sector size for the transfer length.
pub const PAGE_LEN: usize = 512;

/// Zone filter applied by the drive (FEATURES 15:8).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum ReportingOptions {
    #[default]
    All = 0x00,
    Empty = 0x01,
    ImplicitOpen = 0x02,
    ExplicitOpen = 0x03,
    Closed = 0x04,
    Full = 0x05,
    ReadOnly = 0x06,
    Offline = 0x07,
    ResetRecommended = 0x10,
    NonSequential = 0x11,
    NoWritePointer = 0x3F,
}

impl TryFrom<u8> for ReportingOptions {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::All,
            0x01 => Self::Empty,
            0x02 => Self::ImplicitOpen,
            0x03 => Self::ExplicitOpen,
            0x04 => Self::Closed,
            0x05 => Self::Full,
            0x06 => Self::ReadOnly,
            0x07 => Self::Offline,
            0x10 => Self::ResetRecommended,
            0x11 => Self::NonSequential,
            0x3F => Self::NoWritePointer,
            other => return Err(anyhow!("invalid reporting options: {other:#04x}")),
        })
    }
}

impl fmt::Display for ReportingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", *self as u8)
    }
}

/// Build a REPORT ZONES DMA request for `pages` pages starting at `lba`.
///
/// `check_condition` asks the drive to return its registers in sense data,
/// which is how the walker validates the probe.
pub fn report_zones_request(
    lba: u64,
    filter: ReportingOptions,
    pages: u16,
    check_condition: bool,
    timeout: Duration,
) -> CommandRequest {
    let features = ((filter as u16) << 8) | REPORT_ZONES_ACTION as u16;
    CommandRequest::dma_in(
        ATA_REPORT_ZONES_DMA,
        features,
        pages,
        lba,
        check_condition,
        timeout,
    )
}
