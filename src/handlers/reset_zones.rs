// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{error, info};

use crate::{
    client::{client::AtaClient, common::ScsiTransport},
    control_block::reset_write_pointer::ResetTarget,
    error::Result,
    state_machine::{
        common::StateMachineCtx,
        reset_states::{ResetCtx, ResetReport},
    },
};

/// Reset the write pointer of one zone, or of all zones.
///
/// When the drive defers its status, the registers are read back with
/// REQUEST SENSE DATA EXT before deciding. A refused reset is returned as
/// the matching [`crate::error::DomainError`].
pub fn reset_zones<T: ScsiTransport>(
    client: &mut AtaClient<T>,
    target: ResetTarget,
) -> Result<ResetReport> {
    let report = ResetCtx::new(client, target).execute()?;

    if let Some(e) = report.outcome.into_domain_error() {
        error!(reset = ?target, sense = %report.final_sense, "{e}");
        return Err(e.into());
    }

    info!(reset = ?target, outcome = ?report.outcome, "write pointer reset");
    Ok(report)
}
