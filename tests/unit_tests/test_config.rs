// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use anyhow::{Context, Result};
use zac_utils_rs::{
    cfg::{cli::resolve_config_path, config::Config},
    models::zones::ZoneOptionsLayout,
};

#[test]
fn test_load_config_file() -> Result<()> {
    let cfg = resolve_config_path("tests/config.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    assert_eq!(cfg.transport.report_timeout, Duration::from_millis(10_000));
    assert_eq!(cfg.transport.reset_timeout, Duration::from_millis(15_000));
    assert_eq!(cfg.transport.sense_buffer_len, 32);
    assert_eq!(cfg.transport.chunk_pages, 256);
    assert_eq!(cfg.transport.chunk_entries(), 2047);
    assert_eq!(cfg.zones.entry_layout, ZoneOptionsLayout::Legacy);
    Ok(())
}

#[test]
fn test_missing_sections_take_defaults() -> Result<()> {
    let mut cfg: Config = serde_yaml::from_str("Zones:\n  EntryLayout: standard\n")?;
    cfg.validate_and_normalize()?;

    assert_eq!(cfg.zones.entry_layout, ZoneOptionsLayout::Standard);
    assert_eq!(cfg.transport.report_timeout, Duration::from_secs(10));
    assert_eq!(cfg.transport.chunk_pages, 256);

    let none = Config::load_or_default(None::<&str>)?;
    assert_eq!(none.transport.reset_timeout, Duration::from_secs(15));
    Ok(())
}

#[test]
fn test_legacy_layout_alias() -> Result<()> {
    let cfg: Config = serde_yaml::from_str("Zones:\n  EntryLayout: \"0.8n\"\n")?;
    assert_eq!(cfg.zones.entry_layout, ZoneOptionsLayout::Legacy);
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<()> {
    for yaml in [
        "Transport:\n  SenseBufferLen: 18\n",
        "Transport:\n  ChunkPages: 0\n",
        "Transport:\n  ChunkPages: 257\n",
        "Transport:\n  ReportTimeoutMs: 0\n",
        "Transport:\n  ResetTimeoutMs: 5000000000\n",
    ] {
        let mut cfg: Config = serde_yaml::from_str(yaml)?;
        assert!(cfg.validate_and_normalize().is_err(), "{yaml}");
    }
    Ok(())
}
