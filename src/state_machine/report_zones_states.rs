// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{debug, info, warn};

use crate::{
    client::{client::AtaClient, common::ScsiTransport},
    control_block::{
        ata_pass_through::LBA48_MAX,
        report_zones::{PAGE_LEN, ReportingOptions, report_zones_request},
    },
    error::{DomainError, Result, ZacError},
    models::{
        outcome::{Outcome, classify},
        sense_data::{decode_sense, sense_present},
        zones::{MAX_ZONES, Uniformity, ZoneEntry, ZoneListHeader, ZoneReportPage},
    },
    state_machine::common::{StateMachine, StateMachineCtx, Transition},
};

/// What the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportZonesParams {
    /// 1-based position of the first zone to list, counted over all zones.
    pub offset: u32,
    /// Zones to list, `0` meaning up to the last reported zone.
    pub count: u32,
    pub filter: ReportingOptions,
}

impl Default for ReportZonesParams {
    fn default() -> Self {
        Self {
            offset: 1,
            count: 0,
            filter: ReportingOptions::All,
        }
    }
}

/// Findings of the unfiltered probe at LBA 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeInfo {
    pub total_zones: u32,
    pub uniformity: Uniformity,
    pub first_zone_length: u64,
}

/// The assembled zone table.
#[derive(Debug, Clone)]
pub struct ZoneReport {
    pub params: ReportZonesParams,
    pub probe: ProbeInfo,
    /// Start LBA of the zone at `params.offset`.
    pub offset_lba: u64,
    /// Header of the filtered report at `offset_lba`.
    pub header: ZoneListHeader,
    /// Zone count after clamping.
    pub requested: u32,
    pub zones: Vec<ZoneEntry>,
}

impl ZoneReport {
    /// Zones matching the filter from `offset_lba` on.
    pub fn filtered_zones(&self) -> u32 {
        self.header.zone_count()
    }

    fn ids_from_lba(&self) -> bool {
        self.probe.uniformity.has_uniform_length() && self.probe.first_zone_length != 0
    }

    /// 1-based zone identifier of the entry at `position`.
    ///
    /// Derived from the start LBA when zone lengths are uniform. An unfiltered
    /// table counts on from `params.offset`; a filtered one only by position.
    pub fn zone_id(&self, position: usize) -> u64 {
        match self.zones.get(position) {
            Some(z) if self.ids_from_lba() => {
                z.zone_start_lba / self.probe.first_zone_length + 1
            },
            _ if self.params.filter == ReportingOptions::All => {
                u64::from(self.params.offset) + position as u64
            },
            _ => position as u64 + 1,
        }
    }

    /// Whether [`ZoneReport::zone_id`] is only positional.
    pub fn ids_are_positional(&self) -> bool {
        !self.ids_from_lba() && self.params.filter != ReportingOptions::All
    }
}

#[derive(Debug)]
pub struct ReportZonesCtx<'c, T> {
    client: &'c mut AtaClient<T>,
    pub params: ReportZonesParams,

    probe: Option<ProbeInfo>,
    offset_lba: u64,
    report: Option<ZoneReport>,
    state: Option<ReportZonesStates>,
}

impl<'c, T: ScsiTransport> ReportZonesCtx<'c, T> {
    pub fn new(client: &'c mut AtaClient<T>, params: ReportZonesParams) -> Self {
        Self {
            client,
            params,
            probe: None,
            offset_lba: 0,
            report: None,
            state: Some(ReportZonesStates::Probe(Probe)),
        }
    }

    fn chunk_pages(&self) -> u16 {
        self.client.cfg.transport.chunk_pages
    }

    /// One REPORT ZONES DMA exchange; returns the data and sense buffers.
    fn fetch(
        &mut self,
        lba: u64,
        filter: ReportingOptions,
        pages: u16,
        check_condition: bool,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let req = report_zones_request(
            lba,
            filter,
            pages,
            check_condition,
            self.client.cfg.transport.report_timeout,
        );
        let mut buf = vec![0u8; pages as usize * PAGE_LEN];
        let done = self.client.submit_ata_command(&req, &mut buf)?;
        if done.transferred < buf.len() {
            debug!(
                transferred = done.transferred,
                expected = buf.len(),
                "short REPORT ZONES transfer"
            );
        }
        Ok((buf, done.sense))
    }

    /// Sense of follow-up transfers is only inspected when the drive wrote
    /// some.
    fn check_follow_up_sense(sense: &[u8]) -> Result<()> {
        if !sense_present(sense) {
            return Ok(());
        }
        let s = decode_sense(sense)?;
        let outcome = classify(s);
        debug!(?s, ?outcome, "REPORT ZONES sense");
        if outcome.is_success() {
            return Ok(());
        }
        Err(DomainError::CommandFailed(s).into())
    }

    /// Fetch one chunk of descriptors starting at `lba`.
    fn fetch_chunk(&mut self, lba: u64, filter: ReportingOptions) -> Result<Vec<ZoneEntry>> {
        let pages = self.chunk_pages();
        let (buf, sense) = self.fetch(lba, filter, pages, false)?;
        Self::check_follow_up_sense(&sense)?;

        let layout = self.client.cfg.zones.entry_layout;
        let page = ZoneReportPage::parse(&buf)?;
        debug!(
            lba = format_args!("{lba:#x}"),
            reported = page.header.zone_count(),
            in_chunk = page.len(),
            "fetched zone chunk"
        );
        Ok(page.entries(layout).collect())
    }

    fn probe(&mut self) -> Result<()> {
        let (buf, sense) = self.fetch(0, ReportingOptions::All, 1, true)?;

        let s = decode_sense(&sense)?;
        match classify(s) {
            Outcome::Aborted => return Err(DomainError::NotZoned.into()),
            o if !o.is_success() => return Err(DomainError::CommandFailed(s).into()),
            o => debug!(?s, outcome = ?o, "probe sense"),
        }

        let page = ZoneReportPage::parse(&buf)?;
        let info = ProbeInfo {
            total_zones: page.header.zone_count(),
            uniformity: page.header.uniformity,
            first_zone_length: ZoneReportPage::first_zone_length(&buf),
        };
        info!(
            total_zones = info.total_zones,
            uniformity = ?info.uniformity,
            first_zone_length = info.first_zone_length,
            "probed zone directory"
        );

        let offset = self.params.offset;
        if offset == 0 || offset > info.total_zones {
            return Err(DomainError::InvalidOffset {
                offset,
                total: info.total_zones,
            }
            .into());
        }

        self.probe = Some(info);
        Ok(())
    }

    fn resolve_offset(&mut self) -> Result<()> {
        let info = self.probe.ok_or(ZacError::Internal("probe phase did not run"))?;
        let offset = self.params.offset;

        self.offset_lba = if offset == 1 {
            0
        } else if info.uniformity.has_uniform_length() && info.first_zone_length != 0 {
            (u64::from(offset) - 1)
                .checked_mul(info.first_zone_length)
                .filter(|lba| *lba <= LBA48_MAX)
                .ok_or(DomainError::OffsetOutOfRange {
                    offset,
                    zone_length: info.first_zone_length,
                })?
        } else {
            match info.uniformity {
                Uniformity::Reserved(v) => {
                    warn!("unrecognized 'same' option in REPORT ZONES DMA header ({v})")
                },
                u if u.has_uniform_length() => {
                    warn!("drive reports uniform zones but the first has zero length")
                },
                _ => {},
            }
            self.walk_to(offset as usize - 1)?
        };

        debug!(offset, lba = format_args!("{:#x}", self.offset_lba), "resolved zone offset");
        Ok(())
    }

    /// Walk unfiltered chunks from LBA 0 until the zone at 0-based `target`
    /// is known.
    fn walk_to(&mut self, target: usize) -> Result<u64> {
        let mut lba = 0u64;
        let mut base = 0usize;

        loop {
            let chunk = self.fetch_chunk(lba, ReportingOptions::All)?;
            let Some(last) = chunk.last() else {
                return Err(DomainError::InvalidOffset {
                    offset: self.params.offset,
                    total: base as u32,
                }
                .into());
            };

            if target < base + chunk.len() {
                return Ok(chunk[target - base].zone_start_lba);
            }
            if target == base + chunk.len() {
                return Ok(last.end_lba());
            }

            let next = last.end_lba();
            if next <= lba {
                return Err(DomainError::WalkStalled { lba }.into());
            }
            base += chunk.len();
            lba = next;
        }
    }

    fn paginate(&mut self) -> Result<()> {
        let probe = self.probe.ok_or(ZacError::Internal("probe phase did not run"))?;
        let filter = self.params.filter;
        let offset_lba = self.offset_lba;

        let (buf, sense) = self.fetch(offset_lba, filter, 1, true)?;
        Self::check_follow_up_sense(&sense)?;
        let header = ZoneReportPage::parse(&buf)?.header;
        let available = header.zone_count();

        let mut report = ZoneReport {
            params: self.params,
            probe,
            offset_lba,
            header,
            requested: 0,
            zones: Vec::new(),
        };

        if available == 0 {
            info!("Device reported 0 zones (with reporting options {filter})");
            self.report = Some(report);
            return Ok(());
        }

        let mut requested = self.params.count;
        if requested > MAX_ZONES {
            return Err(DomainError::TooManyZones {
                requested,
                max: MAX_ZONES,
            }
            .into());
        }
        if requested > available {
            warn!(
                "Requested number of zones ({requested}) exceeds number of reported zones \
                 ({available}), with reporting options {filter}"
            );
            requested = available;
        }
        if requested == 0 {
            requested = available;
        }
        report.requested = requested;

        let wanted = requested as usize;
        let chunk_entries = self.client.cfg.transport.chunk_entries();
        let mut zones = Vec::with_capacity(wanted.min(chunk_entries));
        let mut lba = offset_lba;
        while zones.len() < wanted {
            let chunk = self.fetch_chunk(lba, filter)?;
            let Some(last) = chunk.last().copied() else {
                warn!(
                    got = zones.len(),
                    wanted, "drive returned fewer zones than it reported"
                );
                break;
            };

            let take = (wanted - zones.len()).min(chunk.len());
            zones.extend_from_slice(&chunk[..take]);

            let next = last.end_lba();
            if zones.len() < wanted && next <= lba {
                return Err(DomainError::WalkStalled { lba }.into());
            }
            lba = next;
        }

        report.zones = zones;
        self.report = Some(report);
        Ok(())
    }
}

#[derive(Debug)]
pub struct Probe;
#[derive(Debug)]
pub struct ResolveOffset;
#[derive(Debug)]
pub struct Paginate;

#[derive(Debug)]
pub enum ReportZonesStates {
    Probe(Probe),
    ResolveOffset(ResolveOffset),
    Paginate(Paginate),
}

type ReportStepOut = Transition<ReportZonesStates, Result<()>>;

impl<T: ScsiTransport> StateMachine<ReportZonesCtx<'_, T>, ReportStepOut> for Probe {
    fn step(&self, ctx: &mut ReportZonesCtx<'_, T>) -> ReportStepOut {
        match ctx.probe() {
            Ok(()) => Transition::Next(ReportZonesStates::ResolveOffset(ResolveOffset), Ok(())),
            Err(e) => Transition::Done(Err(e)),
        }
    }
}

impl<T: ScsiTransport> StateMachine<ReportZonesCtx<'_, T>, ReportStepOut> for ResolveOffset {
    fn step(&self, ctx: &mut ReportZonesCtx<'_, T>) -> ReportStepOut {
        match ctx.resolve_offset() {
            Ok(()) => Transition::Next(ReportZonesStates::Paginate(Paginate), Ok(())),
            Err(e) => Transition::Done(Err(e)),
        }
    }
}

impl<T: ScsiTransport> StateMachine<ReportZonesCtx<'_, T>, ReportStepOut> for Paginate {
    fn step(&self, ctx: &mut ReportZonesCtx<'_, T>) -> ReportStepOut {
        Transition::Done(ctx.paginate())
    }
}

impl<T: ScsiTransport> StateMachineCtx<ReportZonesCtx<'_, T>, ZoneReport>
    for ReportZonesCtx<'_, T>
{
    fn execute(&mut self) -> Result<ZoneReport> {
        debug!(params = ?self.params, "Loop REPORT ZONES");

        loop {
            let state = self
                .state
                .take()
                .ok_or(ZacError::Internal("state must be set ReportZonesCtx"))?;
            let tr = match state {
                ReportZonesStates::Probe(s) => s.step(self),
                ReportZonesStates::ResolveOffset(s) => s.step(self),
                ReportZonesStates::Paginate(s) => s.step(self),
            };

            match tr {
                Transition::Next(next, r) => {
                    r?;
                    self.state = Some(next);
                },
                Transition::Done(r) => {
                    r?;
                    return self
                        .report
                        .take()
                        .ok_or(ZacError::Internal("no report in ctx"));
                },
            }
        }
    }
}
