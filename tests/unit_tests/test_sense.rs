// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use hex_literal::hex;
use zac_utils_rs::{
    error::DecodeError,
    models::{
        ata_registers::decode_ata_registers,
        sense_data::{SenseResult, asc_ascq_to_str, decode_sense, sense_present},
    },
};

use crate::unit_tests::common::{descriptor_sense, load_fixture};

#[test]
fn test_descriptor_sense_decode() -> Result<()> {
    let buf = load_fixture("tests/unit_tests/fixtures/sense_reset_offline_desc.hex")?;
    assert_eq!(buf.len(), 32);

    let s = decode_sense(&buf)?;
    assert_eq!(s, SenseResult::new(0x05, 0x2C, 0x0D));
    assert_eq!(s.to_string(), "(SK=0x05, ASC=0x2c, ASCQ=0x0d)");
    Ok(())
}

#[test]
fn test_fixed_sense_decode() -> Result<()> {
    let buf = load_fixture("tests/unit_tests/fixtures/sense_read_only_fixed.hex")?;
    let s = decode_sense(&buf)?;
    assert_eq!(s, SenseResult::new(0x07, 0x27, 0x08));
    assert_eq!(asc_ascq_to_str(s.asc, s.ascq), "Zone is read only");

    // deferred error flavour, VALID bit set, key with FILEMARK/EOM/ILI noise
    let mut deferred = buf.clone();
    deferred[0] = 0xF1;
    deferred[2] = 0xE7;
    assert_eq!(decode_sense(&deferred)?, s);
    Ok(())
}

#[test]
fn test_sense_unsupported_codes_fail_cleanly() {
    for code in 0u8..=0xFF {
        let mut buf = [0u8; 32];
        buf[0] = code;
        let r = decode_sense(&buf);
        match code & 0x7F {
            0x70..=0x73 => assert!(r.is_ok(), "{code:#x}"),
            other => assert_eq!(r, Err(DecodeError::UnsupportedFormat(other))),
        }
    }
}

#[test]
fn test_sense_too_short() {
    assert_eq!(decode_sense(&[]), Err(DecodeError::TooShort { need: 1, got: 0 }));
    assert_eq!(
        decode_sense(&hex!("70 00 05 00 00 00 00 0a 00 00 00 00 24")),
        Err(DecodeError::TooShort { need: 14, got: 13 })
    );
    assert_eq!(
        decode_sense(&hex!("72 05 24")),
        Err(DecodeError::TooShort { need: 8, got: 3 })
    );
}

#[test]
fn test_sense_present() {
    assert!(!sense_present(&[0u8; 32]));
    assert!(!sense_present(&[]));
    assert!(sense_present(&hex!("72 01 00 1d")));
}

#[test]
fn test_ata_registers_extend_keeps_upper_bytes() -> Result<()> {
    let buf = load_fixture("tests/unit_tests/fixtures/sense_ext_registers.hex")?;
    let regs = decode_ata_registers(&buf)?;

    assert!(regs.extend);
    assert_eq!(regs.sector_count, 0x1201);
    assert_eq!(regs.lba_low, 0x7F00);
    assert_eq!(regs.lba_mid, 0x0124);
    assert_eq!(regs.lba_high, 0x0205);
    assert_eq!(regs.device, 0x40);
    assert_eq!(regs.status, 0x50);
    assert_eq!(regs.sense_triple(), SenseResult::new(0x05, 0x24, 0x00));
    Ok(())
}

#[test]
fn test_ata_registers_mask_without_extend() -> Result<()> {
    let triple = SenseResult::new(0x07, 0x27, 0x08);
    let buf = descriptor_sense(SenseResult::default(), triple, false);
    let regs = decode_ata_registers(&buf)?;

    assert!(!regs.extend);
    for v in [regs.sector_count, regs.lba_low, regs.lba_mid, regs.lba_high] {
        assert_eq!(v >> 8, 0, "upper byte must be dropped: {v:#06x}");
    }
    assert_eq!(regs.sense_triple(), triple);

    let mut noisy = buf;
    noisy[8 + 4..8 + 12].fill(0xFF);
    let regs = decode_ata_registers(&noisy)?;
    assert_eq!(regs.sector_count, 0x00FF);
    assert_eq!(regs.lba_high, 0x00FF);
    Ok(())
}

#[test]
fn test_ata_registers_reject_fixed_and_bad_headers() -> Result<()> {
    let fixed = load_fixture("tests/unit_tests/fixtures/sense_read_only_fixed.hex")?;
    assert_eq!(
        decode_ata_registers(&fixed),
        Err(DecodeError::NotDescriptorFormat(0x70))
    );

    let mut buf = descriptor_sense(SenseResult::default(), SenseResult::default(), false);
    buf[8] = 0x0A;
    assert_eq!(
        decode_ata_registers(&buf),
        Err(DecodeError::BadDescriptorHeader { code: 0x0A, len: 0x0C })
    );

    buf[8] = 0x09;
    buf[9] = 0x0D;
    assert_eq!(
        decode_ata_registers(&buf),
        Err(DecodeError::BadDescriptorHeader { code: 0x09, len: 0x0D })
    );

    assert_eq!(
        decode_ata_registers(&buf[..20]),
        Err(DecodeError::TooShort { need: 22, got: 20 })
    );
    Ok(())
}
