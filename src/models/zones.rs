// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REPORT ZONES DMA parameter data.
//!
//! Header (64 bytes, little-endian):
//!   [0..4]   ZONE LIST LENGTH (bytes of descriptors that follow)
//!   [4..6]   OPTIONS, bits 3..0 = SAME
//!   [6..8]   reserved
//!   [8..12]  MAXIMUM NUMBER OF OPEN SEQUENTIAL WRITE REQUIRED ZONES
//!   [12..16] UNRELIABLE SECTOR COUNT
//!   [16..64] reserved
//!
//! Zone descriptor (64 bytes, little-endian):
//!   [0..2]   OPTIONS (type / condition / reset, see [`ZoneOptionsLayout`])
//!   [2..8]   reserved
//!   [8..16]  ZONE LENGTH
//!   [16..24] ZONE START LBA
//!   [24..32] WRITE POINTER LBA
//!   [32..40] CHECKPOINT
//!   [40..64] reserved

use std::fmt;

use serde::{Deserialize, Serialize};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U32, U64},
};

use crate::error::DecodeError;

pub const ZONE_HEADER_LEN: usize = 64;
pub const ZONE_DESCRIPTOR_LEN: usize = 64;

/// u32::MAX / 64: the most descriptors a ZONE LIST LENGTH can describe.
pub const MAX_ZONES: u32 = 0x3FF_FFFF;

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
pub struct RawZoneListHeader {
    pub zone_list_length: U32<LittleEndian>,
    pub options: U16<LittleEndian>,
    pub _reserved1: [u8; 2],
    pub max_open_seq_zones: U32<LittleEndian>,
    pub unreliable_sectors: U32<LittleEndian>,
    pub _reserved2: [u8; 48],
}

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
pub struct RawZoneDescriptor {
    pub options: U16<LittleEndian>,
    pub _reserved1: [u8; 6],
    pub zone_length: U64<LittleEndian>,
    pub zone_start_lba: U64<LittleEndian>,
    pub write_pointer: U64<LittleEndian>,
    pub checkpoint: U64<LittleEndian>,
    pub _reserved2: [u8; 24],
}

/// SAME field of the header: how far zone lengths and types agree.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Uniformity {
    /// Lengths and types may all differ.
    AllDiffer,
    /// Every zone matches the first.
    FirstSame,
    /// Every zone matches the first, except the last zone's length.
    LastDiffers,
    /// Lengths match the first zone, types differ.
    TypeDiffers,
    Reserved(u8),
}

impl From<u8> for Uniformity {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0x0 => Self::AllDiffer,
            0x1 => Self::FirstSame,
            0x2 => Self::LastDiffers,
            0x3 => Self::TypeDiffers,
            other => Self::Reserved(other),
        }
    }
}

impl Uniformity {
    /// Zone start LBAs can be projected from the first zone length.
    pub fn has_uniform_length(&self) -> bool {
        matches!(self, Self::FirstSame | Self::LastDiffers | Self::TypeDiffers)
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::AllDiffer => 0x0,
            Self::FirstSame => 0x1,
            Self::LastDiffers => 0x2,
            Self::TypeDiffers => 0x3,
            Self::Reserved(v) => v,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ZoneType {
    Conventional,
    SequentialWriteRequired,
    SequentialWritePreferred,
    Reserved(u8),
}

impl From<u8> for ZoneType {
    fn from(value: u8) -> Self {
        match value {
            0x1 => Self::Conventional,
            0x2 => Self::SequentialWriteRequired,
            0x3 => Self::SequentialWritePreferred,
            other => Self::Reserved(other),
        }
    }
}

impl ZoneType {
    pub fn raw(&self) -> u8 {
        match *self {
            Self::Conventional => 0x1,
            Self::SequentialWriteRequired => 0x2,
            Self::SequentialWritePreferred => 0x3,
            Self::Reserved(v) => v,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Conventional => "CMR",
            Self::SequentialWriteRequired => "SMR",
            Self::SequentialWritePreferred => "SWP",
            Self::Reserved(_) => "????",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ZoneCondition {
    NoWritePointer,
    Empty,
    ImplicitOpen,
    ExplicitOpen,
    Closed,
    ReadOnly,
    Full,
    Offline,
    Reserved(u8),
}

impl From<u8> for ZoneCondition {
    fn from(value: u8) -> Self {
        match value {
            0x0 => Self::NoWritePointer,
            0x1 => Self::Empty,
            0x2 => Self::ImplicitOpen,
            0x3 => Self::ExplicitOpen,
            0x4 => Self::Closed,
            0xD => Self::ReadOnly,
            0xE => Self::Full,
            0xF => Self::Offline,
            other => Self::Reserved(other),
        }
    }
}

impl ZoneCondition {
    pub fn raw(&self) -> u8 {
        match *self {
            Self::NoWritePointer => 0x0,
            Self::Empty => 0x1,
            Self::ImplicitOpen => 0x2,
            Self::ExplicitOpen => 0x3,
            Self::Closed => 0x4,
            Self::ReadOnly => 0xD,
            Self::Full => 0xE,
            Self::Offline => 0xF,
            Self::Reserved(v) => v,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::NoWritePointer => "NO_WP",
            Self::Empty => "EMPTY",
            Self::ImplicitOpen => "IMP OPEN",
            Self::ExplicitOpen => "EXP OPEN",
            Self::Closed => "CLOSED",
            Self::ReadOnly => "RDONLY",
            Self::Full => "FULL",
            Self::Offline => "OFFLINE",
            Self::Reserved(_) => "???????",
        }
    }
}

/// Bit packing of the descriptor OPTIONS word.
///
/// Drafts of the command set disagree on where type, condition and reset
/// live, so the layout is selected by configuration instead of being fixed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneOptionsLayout {
    /// Type in bits 11..8, condition in bits 7..4, RESET in bit 0.
    #[default]
    #[serde(rename = "Legacy", alias = "legacy", alias = "0.8n")]
    Legacy,
    /// Type in bits 3..0, condition in bits 15..12, RESET in bit 8,
    /// NON_SEQ in bit 9.
    #[serde(rename = "Standard", alias = "standard")]
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OptionsBits {
    type_shift: u16,
    condition_shift: u16,
    reset_bit: u16,
    non_seq_bit: Option<u16>,
}

impl ZoneOptionsLayout {
    const fn bits(self) -> OptionsBits {
        match self {
            Self::Legacy => OptionsBits {
                type_shift: 8,
                condition_shift: 4,
                reset_bit: 0,
                non_seq_bit: None,
            },
            Self::Standard => OptionsBits {
                type_shift: 0,
                condition_shift: 12,
                reset_bit: 8,
                non_seq_bit: Some(9),
            },
        }
    }

    pub fn zone_type(self, options: u16) -> ZoneType {
        ZoneType::from(((options >> self.bits().type_shift) & 0xF) as u8)
    }

    pub fn zone_condition(self, options: u16) -> ZoneCondition {
        ZoneCondition::from(((options >> self.bits().condition_shift) & 0xF) as u8)
    }

    pub fn reset(self, options: u16) -> bool {
        options & (1 << self.bits().reset_bit) != 0
    }

    pub fn non_sequential(self, options: u16) -> bool {
        self.bits()
            .non_seq_bit
            .is_some_and(|bit| options & (1 << bit) != 0)
    }
}

/// Decoded report header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneListHeader {
    pub zone_list_length: u32,
    pub options: u16,
    pub uniformity: Uniformity,
    pub max_open_seq_zones: u32,
    pub unreliable_sectors: u32,
}

impl ZoneListHeader {
    /// Zones the drive reports from the requested LBA on.
    pub fn zone_count(&self) -> u32 {
        self.zone_list_length / ZONE_DESCRIPTOR_LEN as u32
    }
}

impl From<&RawZoneListHeader> for ZoneListHeader {
    fn from(raw: &RawZoneListHeader) -> Self {
        let options = raw.options.get();
        Self {
            zone_list_length: raw.zone_list_length.get(),
            options,
            uniformity: Uniformity::from((options & 0x0F) as u8),
            max_open_seq_zones: raw.max_open_seq_zones.get(),
            unreliable_sectors: raw.unreliable_sectors.get(),
        }
    }
}

/// One decoded zone descriptor.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntry {
    pub options: u16,
    pub zone_type: ZoneType,
    pub condition: ZoneCondition,
    pub reset: bool,
    pub non_sequential: bool,
    pub zone_length: u64,
    pub zone_start_lba: u64,
    pub write_pointer: u64,
    pub checkpoint: u64,
}

impl ZoneEntry {
    pub fn decode(raw: &RawZoneDescriptor, layout: ZoneOptionsLayout) -> Self {
        let options = raw.options.get();
        Self {
            options,
            zone_type: layout.zone_type(options),
            condition: layout.zone_condition(options),
            reset: layout.reset(options),
            non_sequential: layout.non_sequential(options),
            zone_length: raw.zone_length.get(),
            zone_start_lba: raw.zone_start_lba.get(),
            write_pointer: raw.write_pointer.get(),
            checkpoint: raw.checkpoint.get(),
        }
    }

    /// First LBA past this zone.
    #[inline]
    pub fn end_lba(&self) -> u64 {
        self.zone_start_lba.saturating_add(self.zone_length)
    }
}

impl fmt::Debug for ZoneEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneEntry")
            .field("options", &format_args!("{:#06x}", self.options))
            .field("zone_type", &self.zone_type)
            .field("condition", &self.condition)
            .field("reset", &self.reset)
            .field("zone_length", &format_args!("{:#x}", self.zone_length))
            .field("zone_start_lba", &format_args!("{:#x}", self.zone_start_lba))
            .field("write_pointer", &format_args!("{:#x}", self.write_pointer))
            .field("checkpoint", &format_args!("{:#x}", self.checkpoint))
            .finish()
    }
}

/// One REPORT ZONES DMA response, borrowed from the transfer buffer.
#[derive(Debug)]
pub struct ZoneReportPage<'a> {
    pub header: ZoneListHeader,
    descriptors: &'a [RawZoneDescriptor],
}

impl<'a> ZoneReportPage<'a> {
    /// Parse a response buffer (header plus as many descriptors as fit).
    pub fn parse(buf: &'a [u8]) -> Result<Self, DecodeError> {
        let (raw, rest) =
            RawZoneListHeader::ref_from_prefix(buf).map_err(|_| DecodeError::ReportTooShort {
                need: ZONE_HEADER_LEN,
                got: buf.len(),
            })?;
        let header = ZoneListHeader::from(raw);

        let fits = rest.len() / ZONE_DESCRIPTOR_LEN;
        let valid = fits.min(header.zone_count() as usize);
        let (descriptors, _) = <[RawZoneDescriptor]>::ref_from_prefix_with_elems(rest, valid)
            .map_err(|_| DecodeError::ReportTooShort {
                need: ZONE_HEADER_LEN + valid * ZONE_DESCRIPTOR_LEN,
                got: buf.len(),
            })?;

        Ok(Self {
            header,
            descriptors,
        })
    }

    /// Descriptors actually present in this page.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn entry(&self, idx: usize, layout: ZoneOptionsLayout) -> Option<ZoneEntry> {
        self.descriptors
            .get(idx)
            .map(|raw| ZoneEntry::decode(raw, layout))
    }

    pub fn last(&self, layout: ZoneOptionsLayout) -> Option<ZoneEntry> {
        self.descriptors
            .last()
            .map(|raw| ZoneEntry::decode(raw, layout))
    }

    pub fn entries(
        &self,
        layout: ZoneOptionsLayout,
    ) -> impl Iterator<Item = ZoneEntry> + '_ {
        self.descriptors
            .iter()
            .map(move |raw| ZoneEntry::decode(raw, layout))
    }

    /// ZONE LENGTH of the first descriptor slot, read regardless of whether
    /// the header counts it (an empty report leaves it zero).
    pub fn first_zone_length(buf: &[u8]) -> u64 {
        buf.get(ZONE_HEADER_LEN..ZONE_HEADER_LEN + ZONE_DESCRIPTOR_LEN)
            .and_then(|slot| RawZoneDescriptor::ref_from_bytes(slot).ok())
            .map_or(0, |raw| raw.zone_length.get())
    }
}
