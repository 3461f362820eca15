//! Console presentation of zone reports.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io::{self, Write};

use crate::{cfg::enums::OutputFormat, state_machine::report_zones_states::ZoneReport};

/// Comma separated sections for spreadsheets and scripts.
pub mod csv;
/// Boxed tables for humans.
pub mod text;

/// Write `report` to `out` in the chosen format.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &ZoneReport,
    format: OutputFormat,
) -> io::Result<()> {
    if report.filtered_zones() == 0 {
        return writeln!(
            out,
            "Device reported 0 zones (with reporting options {})",
            report.params.filter
        );
    }
    match format {
        OutputFormat::Text => text::write_report(out, report),
        OutputFormat::Csv => csv::write_report(out, report),
    }
}
