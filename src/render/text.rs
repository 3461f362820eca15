// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io::{self, Write};

use crate::{models::zones::ZoneEntry, state_machine::report_zones_states::ZoneReport};

const RULE: &str = "------------------------------------------";
const TABLE_RULE: &str =
    "|-------------------------------------------------------------------------------------|";

pub fn write_report<W: Write>(out: &mut W, report: &ZoneReport) -> io::Result<()> {
    let h = &report.header;

    writeln!(out, "Inputs")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, " Offset LBA: {:X}h", report.offset_lba)?;
    writeln!(out, " Requested zone count: {}", report.requested)?;
    writeln!(out, " Reporting options: {:02X}h", report.params.filter as u8)?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nReport Log header")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, " Zone list length   :  {:>10} bytes", h.zone_list_length)?;
    writeln!(out, " Number of Zones    :  {:>10} zones", h.zone_count())?;
    writeln!(out, " Options            :        {:04x} h", h.options)?;
    writeln!(out, " Max open seq. req. :  {:>10} zones", h.max_open_seq_zones as i32)?;
    writeln!(out, " Unreliable sectors :  {:>10} sectors", h.unreliable_sectors)?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "\nReport Log zone Entries")?;
    writeln!(out, "{TABLE_RULE}")?;
    writeln!(
        out,
        "| Zone|  Start LBA  | Zone Length |  Write Ptr  |  Checkpoint | Type | Zone Condition |"
    )?;
    for (i, z) in report.zones.iter().enumerate() {
        write_entry(out, report.zone_id(i), z)?;
    }
    writeln!(out, "{TABLE_RULE}")
}

fn write_entry<W: Write>(out: &mut W, id: u64, z: &ZoneEntry) -> io::Result<()> {
    writeln!(
        out,
        "|{:>5}|{:>12X}h|{:>12X}h|{:>12X}h|{:>12X}h| {:>4} |{:^9}{}|",
        id,
        z.zone_start_lba,
        z.zone_length,
        z.write_pointer,
        z.checkpoint,
        z.zone_type.short_name(),
        z.condition.short_name(),
        if z.reset { " RESET " } else { "       " },
    )
}
