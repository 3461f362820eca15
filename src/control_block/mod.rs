//! ATA commands framed as ATA PASS-THROUGH (16) CDBs.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod ata_pass_through;
pub mod report_zones;
pub mod request_sense_ext;
pub mod reset_write_pointer;
