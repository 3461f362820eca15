// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! RESET WRITE POINTER (ZAC) — non-data request builder.
//!
//!   FEATURES = ALL (bit 8) | ACTION (7:0, 0x04)
//!   LBA      = start LBA of the zone, ignored when ALL is set

use std::time::Duration;

use super::ata_pass_through::CommandRequest;

pub const ATA_RESET_WRITE_POINTER: u8 = 0x9F;
pub const ACTION_RESET_WRITE_POINTER: u16 = 0x04;
pub const RESET_ALL_BIT: u16 = 1 << 8;

/// Which write pointers to reset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResetTarget {
    Zone(u64),
    All,
}

pub fn reset_write_pointer_request(target: ResetTarget, timeout: Duration) -> CommandRequest {
    let (features, lba) = match target {
        ResetTarget::Zone(lba) => (ACTION_RESET_WRITE_POINTER, lba),
        ResetTarget::All => (ACTION_RESET_WRITE_POINTER | RESET_ALL_BIT, 0),
    };
    CommandRequest::non_data(ATA_RESET_WRITE_POINTER, features, lba, timeout)
}
