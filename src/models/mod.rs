//! This module defines the sense data, ATA register and zone report models.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Decodes the ATA Status Return descriptor from descriptor-format sense.
pub mod ata_registers;
/// Maps sense triples onto ZAC-level outcomes.
pub mod outcome;
/// Decodes fixed- and descriptor-format sense data.
pub mod sense_data;
/// Defines the REPORT ZONES DMA header and zone descriptor layouts.
pub mod zones;
