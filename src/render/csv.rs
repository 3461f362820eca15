// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io::{self, Write};

use crate::state_machine::report_zones_states::ZoneReport;

pub fn write_report<W: Write>(out: &mut W, report: &ZoneReport) -> io::Result<()> {
    let h = &report.header;
    let filter = report.params.filter as u8;

    writeln!(out, "Offset LBA,Requested Zone Count,Reporting Options")?;
    writeln!(out, "{:#x},{},{:#x}", report.offset_lba, report.requested, filter)?;

    writeln!(
        out,
        "Zone List Length,Number of Zones,Offset LBA,Reporting Options,Options,\
         Maximum Number of Open Sequential Write Required Zones,Unreliable Sector Count"
    )?;
    writeln!(
        out,
        "{},{},{:#x},{:#x},{:#x},{},{}",
        h.zone_list_length,
        h.zone_count(),
        report.offset_lba,
        filter,
        h.options,
        h.max_open_seq_zones as i32,
        h.unreliable_sectors
    )?;

    writeln!(
        out,
        "Zone,Zone Start LBA,Zone Length,Write Pointer,Checkpoint,Option Flags,Zone Type,\
         Zone Condition,Reset"
    )?;
    for (i, z) in report.zones.iter().enumerate() {
        writeln!(
            out,
            "{},{:#x},{:#x},{:#x},{:#x},{:#x},{:#x},{:#x},{}",
            report.zone_id(i),
            z.zone_start_lba,
            z.zone_length,
            z.write_pointer,
            z.checkpoint,
            z.options,
            z.zone_type.raw(),
            z.condition.raw(),
            u8::from(z.reset)
        )?;
    }
    Ok(())
}
