// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REQUEST SENSE DATA EXT (ATA) — non-data request builder.
//!
//! On completion the drive reports the deferred sense in its output
//! registers: LBA(23:16) = SENSE KEY, LBA(15:8) = ASC, LBA(7:0) = ASCQ.

use std::time::Duration;

use super::ata_pass_through::CommandRequest;

pub const ATA_REQUEST_SENSE_DATA_EXT: u8 = 0x0B;

pub fn request_sense_ext_request(timeout: Duration) -> CommandRequest {
    CommandRequest::non_data(ATA_REQUEST_SENSE_DATA_EXT, 0, 0, timeout)
}
