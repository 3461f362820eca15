// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use zac_utils_rs::cfg::{cli::ReportZonesArgs, logger::init_logging};

fn main() -> ExitCode {
    let args = match ReportZonesArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        },
    };

    let _guard = match init_logging(args.common.log_config.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(target_os = "linux")]
fn run(args: &ReportZonesArgs) -> Result<()> {
    use std::io::{self, Write};

    use anyhow::Context;
    use zac_utils_rs::{
        cfg::config::Config,
        client::{client::AtaClient, sg_device::SgDevice},
        handlers::report_zones::report_zones,
        render::write_report,
    };

    let config = Config::load_or_default(args.common.config.as_deref())
        .context("failed to load config")?;

    let device = SgDevice::open(&args.device)?;
    let mut client = AtaClient::new(device, config);
    let report = report_zones(&mut client, args.params())?;
    client.into_inner().close();

    let mut out = io::stdout().lock();
    write_report(&mut out, &report, args.output_format())?;
    out.flush()?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_args: &ReportZonesArgs) -> Result<()> {
    Err(zac_utils_rs::error::TransportError::Unsupported.into())
}
