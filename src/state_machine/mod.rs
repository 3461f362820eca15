//! This module contains the phase machines behind zone reporting and
//! write pointer resets.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Common structures and traits for state machines.
pub mod common;
/// Probe, offset resolution and pagination of REPORT ZONES DMA.
pub mod report_zones_states;
/// RESET WRITE POINTER followed by the REQUEST SENSE DATA EXT diagnostic.
pub mod reset_states;
