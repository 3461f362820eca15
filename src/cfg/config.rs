// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::models::{ata_registers::ATA_DESCRIPTOR_OFFSET, zones::ZoneOptionsLayout};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    /// How commands are shipped to the device.
    #[serde(default, rename = "Transport")]
    pub transport: TransportConfig,
    /// How zone reports are interpreted.
    #[serde(default, rename = "Zones")]
    pub zones: ZonesConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// SG_IO level knobs.
pub struct TransportConfig {
    #[serde(
        default = "default_report_timeout",
        rename = "ReportTimeoutMs",
        with = "serde_millis"
    )]
    /// Timeout of each REPORT ZONES DMA exchange.
    pub report_timeout: Duration,

    #[serde(
        default = "default_reset_timeout",
        rename = "ResetTimeoutMs",
        with = "serde_millis"
    )]
    /// Timeout of RESET WRITE POINTER and the diagnostic read that follows it.
    pub reset_timeout: Duration,

    #[serde(default = "default_sense_len", rename = "SenseBufferLen")]
    /// Size of the sense buffer handed to every command.
    pub sense_buffer_len: u8,

    #[serde(default = "default_chunk_pages", rename = "ChunkPages")]
    /// 512-byte pages per paginated REPORT ZONES transfer.
    pub chunk_pages: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ZonesConfig {
    #[serde(default, rename = "EntryLayout")]
    /// Bit packing of the zone descriptor OPTIONS word.
    pub entry_layout: ZoneOptionsLayout,
}

/// Longest single transfer: 256 pages (128 KiB), 2047 descriptors.
pub const MAX_CHUNK_PAGES: u16 = 256;

fn default_report_timeout() -> Duration {
    Duration::from_millis(10_000)
}

fn default_reset_timeout() -> Duration {
    Duration::from_millis(15_000)
}

fn default_sense_len() -> u8 {
    32
}

fn default_chunk_pages() -> u16 {
    MAX_CHUNK_PAGES
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            report_timeout: default_report_timeout(),
            reset_timeout: default_reset_timeout(),
            sense_buffer_len: default_sense_len(),
            chunk_pages: default_chunk_pages(),
        }
    }
}

impl TransportConfig {
    /// Descriptors that fit in one chunk after the 64-byte header.
    pub fn chunk_entries(&self) -> usize {
        self.chunk_pages as usize * 512 / 64 - 1
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Loads from `path` if given, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        let t = &mut self.transport;

        // The ATA status return descriptor ends at byte 22 of the sense data.
        ensure!(
            t.sense_buffer_len as usize >= ATA_DESCRIPTOR_OFFSET + 14,
            "SenseBufferLen must be >= 22, got {}",
            t.sense_buffer_len
        );
        ensure!(
            (1..=MAX_CHUNK_PAGES).contains(&t.chunk_pages),
            "ChunkPages must be within 1..={MAX_CHUNK_PAGES}, got {}",
            t.chunk_pages
        );
        ensure!(
            !t.report_timeout.is_zero() && !t.reset_timeout.is_zero(),
            "timeouts must be non-zero"
        );
        ensure!(
            t.report_timeout.as_millis() <= u32::MAX as u128
                && t.reset_timeout.as_millis() <= u32::MAX as u128,
            "timeouts must fit in 32-bit milliseconds"
        );

        Ok(())
    }
}

mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}
