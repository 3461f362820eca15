// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{info, warn};

use crate::{
    client::{client::AtaClient, common::ScsiTransport},
    error::Result,
    state_machine::{
        common::StateMachineCtx,
        report_zones_states::{ReportZonesCtx, ReportZonesParams, ZoneReport},
    },
};

/// Probe the drive, resolve `params.offset` to an LBA and read up to
/// `params.count` filtered zones from there.
///
/// Every exchange is sequential; the first failure aborts the walk and no
/// partial table is returned.
pub fn report_zones<T: ScsiTransport>(
    client: &mut AtaClient<T>,
    params: ReportZonesParams,
) -> Result<ZoneReport> {
    let report = ReportZonesCtx::new(client, params).execute()?;

    if report.ids_are_positional() {
        warn!("Zone sizes may differ, so zone IDs may not reflect actual zone number");
    }
    info!(
        offset_lba = format_args!("{:#x}", report.offset_lba),
        listed = report.zones.len(),
        filtered = report.filtered_zones(),
        "zone report assembled"
    );
    Ok(report)
}
