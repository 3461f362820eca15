//! This crate lists and resets the zones of ZAC (zoned ATA) drives through
//! ATA PASS-THROUGH (16) over the SCSI generic interface.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration, command-line parsing, and logging.
pub mod cfg;
/// The transport seam, the Linux SG_IO device and the ATA command client.
pub mod client;
/// Builds ATA PASS-THROUGH (16) command blocks for the ZAC commands.
pub mod control_block;
/// Error taxonomy.
pub mod error;
/// One-call entry points for reporting and resetting zones.
pub mod handlers;
/// Sense data, ATA registers, outcome classification and zone report layouts.
pub mod models;
/// Text and CSV output of zone reports.
pub mod render;
/// Phase machines for zone directory walking and write pointer reset.
pub mod state_machine;
