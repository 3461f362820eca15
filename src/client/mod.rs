//! This module manages the device transport and ATA command submission.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#![allow(clippy::module_inception)]
/// ATA PASS-THROUGH submission on top of a transport.
pub mod client;
/// The transport seam shared by real devices and test doubles.
pub mod common;
/// Linux SCSI generic device.
#[cfg(target_os = "linux")]
pub mod sg_device;
