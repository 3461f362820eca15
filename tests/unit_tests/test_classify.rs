// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zac_utils_rs::{
    error::DomainError,
    models::{
        outcome::{Outcome, classify},
        sense_data::SenseResult,
    },
};

#[test]
fn test_recovered_errors_count_as_success() {
    let info = classify(SenseResult::new(0x01, 0x00, 0x1D));
    assert_eq!(info, Outcome::AtaInfoAvailable);
    assert!(info.is_success());

    let other = SenseResult::new(0x01, 0x17, 0x01);
    assert_eq!(classify(other), Outcome::Recovered(other));
    assert!(classify(other).is_success());
    assert_eq!(classify(other).into_domain_error(), None);

    // ASC/ASCQ are irrelevant once the key says NO SENSE
    assert_eq!(classify(SenseResult::new(0x00, 0x00, 0x1D)), Outcome::Success);
}

#[test]
fn test_conditions_map_to_distinct_errors() {
    let cases = [
        (SenseResult::new(0x0B, 0x00, 0x00), DomainError::NotZoned),
        (SenseResult::new(0x05, 0x24, 0x00), DomainError::UnalignedLba),
        (SenseResult::new(0x05, 0x2C, 0x0D), DomainError::ZoneOffline),
        (SenseResult::new(0x07, 0x27, 0x08), DomainError::ZoneReadOnly),
    ];
    for (sense, expected) in cases {
        let outcome = classify(sense);
        assert!(!outcome.is_success(), "{sense}");
        assert_eq!(outcome.into_domain_error(), Some(expected));
    }
    assert_ne!(
        classify(SenseResult::new(0x05, 0x2C, 0x0D)),
        classify(SenseResult::new(0x07, 0x27, 0x08))
    );
}

#[test]
fn test_near_misses_fall_through_to_failure() {
    for sense in [
        SenseResult::new(0x05, 0x24, 0x01),
        SenseResult::new(0x05, 0x2C, 0x0C),
        SenseResult::new(0x07, 0x27, 0x00),
        SenseResult::new(0x03, 0x11, 0x00),
    ] {
        assert_eq!(classify(sense), Outcome::Failure(sense));
        assert_eq!(
            classify(sense).into_domain_error(),
            Some(DomainError::CommandFailed(sense))
        );
    }
}

#[test]
fn test_failure_message_carries_raw_triple() {
    let e = DomainError::CommandFailed(SenseResult::new(0x03, 0x11, 0x00));
    assert_eq!(
        e.to_string(),
        "command failed. Sense data: (SK=0x03, ASC=0x11, ASCQ=0x00)"
    );
    assert_eq!(
        DomainError::ZoneOffline.to_string(),
        "RESET WRITE POINTER failed because zone condition is OFFLINE"
    );
}
