// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Hardware tests run against the device named by `ZAC_TEST_DEVICE`
//! (e.g. `/dev/sg2`) and are skipped when it is unset.

use std::path::PathBuf;

use anyhow::{Context, Result};
use zac_utils_rs::{
    cfg::{config::Config, logger::init_logger},
    client::{client::AtaClient, sg_device::SgDevice},
};

pub fn test_path() -> String {
    std::env::var("TEST_CONFIG").unwrap_or_else(|_| "tests/config.yaml".into())
}

pub fn load_config() -> Result<Config> {
    let pb = PathBuf::from(test_path());
    Config::load_from_file(&pb).with_context(|| format!("failed to load {pb:?}"))
}

pub fn test_device() -> Option<PathBuf> {
    std::env::var_os("ZAC_TEST_DEVICE").map(PathBuf::from)
}

/// Opens the test device, or `None` when hardware tests are disabled.
pub fn open_client() -> Result<Option<AtaClient<SgDevice>>> {
    let Some(dev) = test_device() else {
        eprintln!("ZAC_TEST_DEVICE not set, skipping");
        return Ok(None);
    };
    let _ = init_logger("tests/config_logger.yaml");

    let cfg = load_config()?;
    let device = SgDevice::open(&dev)?;
    Ok(Some(AtaClient::new(device, cfg)))
}
