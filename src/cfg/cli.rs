// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;

use crate::{
    cfg::enums::OutputFormat,
    control_block::{report_zones::ReportingOptions, reset_write_pointer::ResetTarget},
    state_machine::report_zones_states::ReportZonesParams,
};

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// Parse an unsigned number written in decimal or with a `0x` prefix.
pub fn parse_number(s: &str) -> Result<u64> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.with_context(|| format!("invalid number {s:?}"))
}

fn parse_positive_u32(s: &str) -> Result<u32> {
    let v = parse_number(s)?;
    ensure!(v > 0, "value must be greater than zero");
    u32::try_from(v).with_context(|| format!("value {v} does not fit in 32 bits"))
}

fn parse_reporting_options(s: &str) -> Result<ReportingOptions> {
    let v = parse_number(s)?;
    if v > 0x3F {
        bail!("invalid reporting options: {v:#x}");
    }
    ReportingOptions::try_from(v as u8)
}

fn parse_lba(s: &str) -> Result<u64> {
    let v = parse_number(s)?;
    ensure!(v >> 48 == 0, "LBA {v:#x} does not fit in 48 bits");
    Ok(v)
}

/// Shared by both tools.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Runtime configuration (YAML). Built-in defaults when omitted.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Logger configuration (YAML). Plain stderr logging when omitted.
    #[arg(long = "log-config", value_name = "FILE")]
    pub log_config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "reportzones",
    version,
    about = "List the zones of a ZAC drive with REPORT ZONES DMA."
)]
pub struct ReportZonesArgs {
    #[arg(
        short = 'o',
        value_name = "OFFSET",
        default_value = "1",
        value_parser = parse_positive_u32,
        help = "Offset of first zone to list"
    )]
    pub offset: u32,
    #[arg(
        short = 'n',
        value_name = "MAXZONES",
        value_parser = parse_positive_u32,
        help = "Number of zones to list (default: to last zone)"
    )]
    pub count: Option<u32>,
    #[arg(
        short = 'r',
        value_name = "OPTIONS",
        default_value = "0",
        value_parser = parse_reporting_options,
        help = "Reporting options, 0x00 to 0x07, 0x10, 0x11 or 0x3F"
    )]
    pub reporting_options: ReportingOptions,
    #[arg(short = 'c', help = "Print raw zone table in CSV format")]
    pub csv: bool,
    #[command(flatten)]
    pub common: CommonArgs,
    /// The device handle to open (e.g. /dev/sg2).
    pub device: PathBuf,
}

impl ReportZonesArgs {
    pub fn params(&self) -> ReportZonesParams {
        ReportZonesParams {
            offset: self.offset,
            count: self.count.unwrap_or(0),
            filter: self.reporting_options,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.csv)
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "resetzones",
    version,
    about = "Reset zone write pointers of a ZAC drive."
)]
pub struct ResetZonesArgs {
    #[arg(
        short = 'l',
        value_name = "LBA",
        value_parser = parse_lba,
        help = "First LBA of zone to reset. If omitted, will reset ALL zones"
    )]
    pub lba: Option<u64>,
    #[command(flatten)]
    pub common: CommonArgs,
    /// The device handle to open (e.g. /dev/sg2).
    pub device: PathBuf,
}

impl ResetZonesArgs {
    pub fn target(&self) -> ResetTarget {
        self.lba.map_or(ResetTarget::All, ResetTarget::Zone)
    }
}
