//! One-call entry points over the phase machines.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Reads the zone table.
pub mod report_zones;
/// Resets write pointers.
pub mod reset_zones;
