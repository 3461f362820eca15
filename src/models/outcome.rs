// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Mapping of sense triples onto ZAC-level conditions.

use crate::{
    error::DomainError,
    models::sense_data::{SenseResult, sense_key},
};

pub const ABORTED_NO_INFO: SenseResult = SenseResult::new(sense_key::ABORTED_COMMAND, 0x00, 0x00);
pub const INVALID_FIELD_IN_CDB: SenseResult =
    SenseResult::new(sense_key::ILLEGAL_REQUEST, 0x24, 0x00);
pub const RESET_WP_NOT_ALLOWED: SenseResult =
    SenseResult::new(sense_key::ILLEGAL_REQUEST, 0x2C, 0x0D);
pub const ZONE_IS_READ_ONLY: SenseResult = SenseResult::new(sense_key::DATA_PROTECT, 0x27, 0x08);
pub const ATA_INFO_AVAILABLE: SenseResult =
    SenseResult::new(sense_key::RECOVERED_ERROR, 0x00, 0x1D);

/// Result of classifying one sense triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// NO SENSE.
    Success,
    /// RECOVERED ERROR / ATA PASS THROUGH INFORMATION AVAILABLE; the real
    /// status has to be read back from the drive.
    AtaInfoAvailable,
    /// Any other RECOVERED ERROR.
    Recovered(SenseResult),
    /// ABORTED COMMAND without additional info; likely not a ZAC drive.
    Aborted,
    /// INVALID FIELD IN CDB.
    InvalidField,
    /// RESET WRITE POINTER NOT ALLOWED; the zone is offline.
    ZoneOffline,
    /// ZONE IS READ ONLY.
    ZoneReadOnly,
    Failure(SenseResult),
}

pub fn classify(sense: SenseResult) -> Outcome {
    match sense {
        ATA_INFO_AVAILABLE => Outcome::AtaInfoAvailable,
        ABORTED_NO_INFO => Outcome::Aborted,
        INVALID_FIELD_IN_CDB => Outcome::InvalidField,
        RESET_WP_NOT_ALLOWED => Outcome::ZoneOffline,
        ZONE_IS_READ_ONLY => Outcome::ZoneReadOnly,
        s if s.key == sense_key::NO_SENSE => Outcome::Success,
        s if s.key == sense_key::RECOVERED_ERROR => Outcome::Recovered(s),
        s => Outcome::Failure(s),
    }
}

impl Outcome {
    /// Whether the command itself completed without a drive-level refusal.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Success | Outcome::AtaInfoAvailable | Outcome::Recovered(_)
        )
    }

    /// Map a terminal outcome to the caller-facing error, `None` on success.
    pub fn into_domain_error(self) -> Option<DomainError> {
        match self {
            Outcome::Success | Outcome::AtaInfoAvailable | Outcome::Recovered(_) => None,
            Outcome::Aborted => Some(DomainError::NotZoned),
            Outcome::InvalidField => Some(DomainError::UnalignedLba),
            Outcome::ZoneOffline => Some(DomainError::ZoneOffline),
            Outcome::ZoneReadOnly => Some(DomainError::ZoneReadOnly),
            Outcome::Failure(s) => Some(DomainError::CommandFailed(s)),
        }
    }
}
