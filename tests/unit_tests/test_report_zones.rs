// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use zac_utils_rs::{
    control_block::report_zones::{ATA_REPORT_ZONES_DMA, ReportingOptions},
    error::{DomainError, ZacError},
    handlers::report_zones::report_zones,
    models::zones::{MAX_ZONES, Uniformity, ZoneCondition, ZoneOptionsLayout, ZoneType},
    state_machine::report_zones_states::ReportZonesParams,
};

use crate::unit_tests::common::{
    MockZacDrive, MockZone, client, client_with_chunk_pages, uniform_zones, varied_zones,
};

const ZONE_LEN: u64 = 0x8_0000;
const ALL_DIFFER: u8 = 0x0;
const FIRST_SAME: u8 = 0x1;

fn params(offset: u32, count: u32) -> ReportZonesParams {
    ReportZonesParams {
        offset,
        count,
        filter: ReportingOptions::All,
    }
}

#[test]
fn test_two_zone_drive_lists_everything() -> Result<()> {
    let mut c = client(MockZacDrive::new(uniform_zones(2, ZONE_LEN, 1), FIRST_SAME));
    let report = report_zones(&mut c, ReportZonesParams::default())?;

    assert_eq!(report.header.zone_list_length, 128);
    assert_eq!(report.probe.total_zones, 2);
    assert_eq!(report.probe.uniformity, Uniformity::FirstSame);
    assert_eq!(report.probe.first_zone_length, ZONE_LEN);
    assert_eq!(report.offset_lba, 0);
    assert_eq!(report.requested, 2);
    assert_eq!(report.zones.len(), 2);
    assert_eq!(report.zones[0].zone_start_lba, 0);
    assert_eq!(report.zones[0].zone_type, ZoneType::Conventional);
    assert_eq!(report.zones[0].condition, ZoneCondition::NoWritePointer);
    assert_eq!(report.zones[1].zone_start_lba, ZONE_LEN);
    assert_eq!(report.zones[1].zone_type, ZoneType::SequentialWriteRequired);
    assert_eq!(report.zone_id(0), 1);
    assert_eq!(report.zone_id(1), 2);
    assert!(!report.ids_are_positional());

    // probe, re-probe, one chunk
    assert_eq!(c.transport().report_lbas(), vec![0, 0, 0]);
    Ok(())
}

#[test]
fn test_uniform_offset_is_arithmetic() -> Result<()> {
    let total = 20u32;
    for same in [0x1u8, 0x2, 0x3] {
        for k in 1..=total {
            let mut c = client(MockZacDrive::new(
                uniform_zones(total as usize, ZONE_LEN, 0),
                same,
            ));
            let report = report_zones(&mut c, params(k, 1))?;

            let expected = (k as u64 - 1) * ZONE_LEN;
            assert_eq!(report.offset_lba, expected, "same={same} k={k}");
            assert_eq!(report.zones.len(), 1);
            assert_eq!(report.zones[0].zone_start_lba, expected);
            assert_eq!(report.zone_id(0), k as u64);

            // no walking: probe, re-probe at the offset, one chunk
            assert_eq!(c.transport().report_lbas(), vec![0, expected, expected]);
        }
    }
    Ok(())
}

#[test]
fn test_all_differ_offset_matches_positional_walk() -> Result<()> {
    let zones = varied_zones(40, &[0x1000, 0x3000, 0x800, 0x2000, 0x1800]);
    for k in 1..=zones.len() as u32 {
        let mut c = client_with_chunk_pages(MockZacDrive::new(zones.clone(), ALL_DIFFER), 1);
        let report = report_zones(&mut c, params(k, 1))?;

        let truth = zones[k as usize - 1].start;
        assert_eq!(report.offset_lba, truth, "k={k}");
        assert_eq!(report.zones[0].zone_start_lba, truth, "k={k}");
        assert!(!report.ids_are_positional());
        assert_eq!(report.zone_id(0), k as u64);
    }
    Ok(())
}

#[test]
fn test_unknown_same_value_walks_like_all_differ() -> Result<()> {
    let zones = varied_zones(12, &[0x100, 0x300]);
    let mut c = client_with_chunk_pages(MockZacDrive::new(zones.clone(), 0x7), 1);
    let report = report_zones(&mut c, params(9, 0))?;

    assert_eq!(report.probe.uniformity, Uniformity::Reserved(0x7));
    assert_eq!(report.offset_lba, zones[8].start);
    assert_eq!(report.zones.len(), 4);
    Ok(())
}

#[test]
fn test_pagination_spans_chunks_in_order() -> Result<()> {
    // one page per chunk: 7 descriptors
    let zones = uniform_zones(50, ZONE_LEN, 2);
    let mut c = client_with_chunk_pages(MockZacDrive::new(zones.clone(), FIRST_SAME), 1);
    let report = report_zones(&mut c, params(3, 20))?;

    assert_eq!(report.requested, 20);
    assert_eq!(report.zones.len(), 20);
    for (i, z) in report.zones.iter().enumerate() {
        assert_eq!(z.zone_start_lba, zones[i + 2].start);
        assert_eq!(report.zone_id(i), i as u64 + 3);
    }
    assert!(report.zones.windows(2).all(|w| w[0].zone_start_lba < w[1].zone_start_lba));

    // probe, re-probe, then chunks of 7 starting where the last one ended
    let lbas = c.transport().report_lbas();
    assert_eq!(
        &lbas[2..],
        &[2 * ZONE_LEN, 9 * ZONE_LEN, 16 * ZONE_LEN][..]
    );
    Ok(())
}

#[test]
fn test_count_zero_reads_to_the_end() -> Result<()> {
    let zones = varied_zones(30, &[0x10, 0x20, 0x30]);
    let mut c = client_with_chunk_pages(MockZacDrive::new(zones.clone(), ALL_DIFFER), 1);
    let report = report_zones(&mut c, params(5, 0))?;

    assert_eq!(report.requested, 26);
    let starts: Vec<u64> = report.zones.iter().map(|z| z.zone_start_lba).collect();
    let truth: Vec<u64> = zones[4..].iter().map(|z| z.start).collect();
    assert_eq!(starts, truth);
    Ok(())
}

#[test]
fn test_requested_count_is_clamped() -> Result<()> {
    let mut c = client(MockZacDrive::new(uniform_zones(10, ZONE_LEN, 0), FIRST_SAME));
    let report = report_zones(&mut c, params(4, 100))?;

    assert_eq!(report.filtered_zones(), 7);
    assert_eq!(report.requested, 7);
    assert_eq!(report.zones.len(), 7);
    Ok(())
}

#[test]
fn test_empty_filter_result_is_not_an_error() -> Result<()> {
    let mut c = client(MockZacDrive::new(uniform_zones(10, ZONE_LEN, 0), FIRST_SAME));
    let report = report_zones(
        &mut c,
        ReportZonesParams {
            filter: ReportingOptions::Offline,
            ..ReportZonesParams::default()
        },
    )?;

    assert_eq!(report.filtered_zones(), 0);
    assert_eq!(report.requested, 0);
    assert!(report.zones.is_empty());
    // nothing fetched past the re-probe
    assert_eq!(c.transport().report_lbas().len(), 2);
    Ok(())
}

#[test]
fn test_filter_is_applied_from_offset() -> Result<()> {
    let mut zones = uniform_zones(10, ZONE_LEN, 0);
    for i in [1, 4, 6, 9] {
        zones[i].condition = ZoneCondition::Full;
    }
    let mut c = client(MockZacDrive::new(zones, FIRST_SAME));
    let report = report_zones(
        &mut c,
        ReportZonesParams {
            offset: 3,
            count: 0,
            filter: ReportingOptions::Full,
        },
    )?;

    // the probe is unfiltered
    assert_eq!(report.probe.total_zones, 10);
    assert_eq!(report.filtered_zones(), 3);
    let ids: Vec<u64> = (0..report.zones.len()).map(|i| report.zone_id(i)).collect();
    assert_eq!(ids, vec![5, 7, 10]);
    assert!(report.zones.iter().all(|z| z.condition == ZoneCondition::Full));

    let features: Vec<u16> = c
        .transport()
        .cdbs
        .iter()
        .filter(|cdb| cdb[14] == ATA_REPORT_ZONES_DMA)
        .map(|cdb| u16::from_be_bytes([cdb[3], cdb[4]]))
        .collect();
    assert_eq!(features, vec![0x0000, 0x0500, 0x0500]);
    Ok(())
}

#[test]
fn test_offset_beyond_total_is_rejected() {
    let mut c = client(MockZacDrive::new(uniform_zones(10, ZONE_LEN, 0), FIRST_SAME));
    let err = report_zones(&mut c, params(11, 0)).err();

    assert_eq!(
        err.as_ref().and_then(ZacError::domain),
        Some(&DomainError::InvalidOffset {
            offset: 11,
            total: 10
        })
    );
    assert_eq!(c.transport().report_lbas().len(), 1);
}

#[test]
fn test_aborted_probe_means_not_zoned() {
    let mut drive = MockZacDrive::new(Vec::new(), ALL_DIFFER);
    drive.zoned = false;
    let mut c = client(drive);

    let err = report_zones(&mut c, ReportZonesParams::default()).err();
    assert_eq!(
        err.as_ref().and_then(ZacError::domain),
        Some(&DomainError::NotZoned)
    );
    assert_eq!(c.transport().commands(), vec![ATA_REPORT_ZONES_DMA]);
}

#[test]
fn test_transport_failure_aborts_walk() {
    let zones = varied_zones(30, &[0x10, 0x20]);
    let mut drive = MockZacDrive::new(zones, ALL_DIFFER);
    drive.fail_at = Some(2);
    let mut c = client_with_chunk_pages(drive, 1);

    let err = report_zones(&mut c, params(25, 0)).err();
    assert!(matches!(err, Some(ZacError::Transport(_))), "{err:?}");
    assert_eq!(c.transport().cdbs.len(), 3);
}

#[test]
fn test_standard_entry_layout_from_config() -> Result<()> {
    let mut zones = uniform_zones(4, ZONE_LEN, 1);
    zones[2].condition = ZoneCondition::Closed;
    zones[3].reset = true;
    let mut drive = MockZacDrive::new(zones, FIRST_SAME);
    drive.layout = ZoneOptionsLayout::Standard;

    let mut c = client(drive);
    c.cfg.zones.entry_layout = ZoneOptionsLayout::Standard;
    let report = report_zones(&mut c, ReportZonesParams::default())?;

    assert_eq!(report.zones[0].zone_type, ZoneType::Conventional);
    assert_eq!(report.zones[2].condition, ZoneCondition::Closed);
    assert!(report.zones[3].reset);
    assert!(!report.zones[2].reset);
    Ok(())
}

#[test]
fn test_filtered_all_differ_ids_are_positional() -> Result<()> {
    let mut zones = varied_zones(10, &[0x100, 0x200]);
    zones[6].condition = ZoneCondition::Full;
    zones[8].condition = ZoneCondition::Full;
    let mut c = client(MockZacDrive::new(zones, ALL_DIFFER));
    let report = report_zones(
        &mut c,
        ReportZonesParams {
            offset: 4,
            count: 0,
            filter: ReportingOptions::Full,
        },
    )?;

    assert!(report.ids_are_positional());
    assert_eq!(report.zone_id(0), 1);
    assert_eq!(report.zone_id(1), 2);
    Ok(())
}

#[test]
fn test_uniform_offset_past_lba48_is_rejected() {
    // (5 - 1) * 2^62 overflows u64; (3 - 1) * 2^47 lands just past 48 bits
    for (zone_len, offset) in [(1u64 << 62, 5u32), (1u64 << 47, 3u32)] {
        let mut zones: Vec<MockZone> = (1..5)
            .map(|i| MockZone::smr(zone_len + i * 0x1000, 0x1000))
            .collect();
        zones.insert(0, MockZone::smr(0, zone_len));
        let mut c = client(MockZacDrive::new(zones, FIRST_SAME));

        let err = report_zones(&mut c, params(offset, 1)).err();
        assert_eq!(
            err.as_ref().and_then(ZacError::domain),
            Some(&DomainError::OffsetOutOfRange {
                offset,
                zone_length: zone_len
            }),
            "zone_len={zone_len:#x}"
        );
        // nothing sent past the probe
        assert_eq!(c.transport().report_lbas(), vec![0]);
    }
}

#[test]
fn test_zero_first_zone_length_falls_back_to_walk() -> Result<()> {
    let mut zones = uniform_zones(6, ZONE_LEN, 0);
    zones.insert(0, MockZone::smr(0, 0));
    let mut c = client(MockZacDrive::new(zones.clone(), FIRST_SAME));
    let report = report_zones(&mut c, params(5, 1))?;

    assert_eq!(report.probe.first_zone_length, 0);
    let truth = zones[4].start;
    assert_eq!(report.offset_lba, truth);
    assert_eq!(report.zones[0].zone_start_lba, truth);
    // probe, one walk chunk, re-probe, chunk
    assert_eq!(c.transport().report_lbas(), vec![0, 0, truth, truth]);
    Ok(())
}

#[test]
fn test_count_above_maximum_is_rejected() {
    let mut c = client(MockZacDrive::new(uniform_zones(10, ZONE_LEN, 0), FIRST_SAME));
    let err = report_zones(&mut c, params(1, MAX_ZONES + 1)).err();

    assert_eq!(
        err.as_ref().and_then(ZacError::domain),
        Some(&DomainError::TooManyZones {
            requested: MAX_ZONES + 1,
            max: MAX_ZONES
        })
    );
}
