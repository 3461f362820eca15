// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    cfg::config::Config,
    client::common::{ScsiRequest, ScsiTransport},
    control_block::ata_pass_through::{CommandRequest, LBA48_MAX},
    error::TransportError,
};

/// Data and sense returned by one pass-through exchange.
#[derive(Debug)]
pub struct AtaCompletion {
    pub transferred: usize,
    pub sense: Vec<u8>,
}

/// Issues ATA commands over an exclusively owned [`ScsiTransport`].
#[derive(Debug)]
pub struct AtaClient<T> {
    transport: T,
    pub cfg: Config,
}

impl<T: ScsiTransport> AtaClient<T> {
    pub fn new(transport: T, cfg: Config) -> Self {
        Self { transport, cfg }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give the transport back, e.g. to close the device.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Frame `req` as ATA PASS-THROUGH (16) and submit it once.
    ///
    /// A sense buffer of `Transport.SenseBufferLen` bytes is always attached.
    /// `data` must match the direction of `req` (empty for non-data). An LBA
    /// beyond 48 bits or a buffer that disagrees with a block-counted COUNT is
    /// rejected without touching the device.
    pub fn submit_ata_command(
        &mut self,
        req: &CommandRequest,
        data: &mut [u8],
    ) -> Result<AtaCompletion, TransportError> {
        if req.lba > LBA48_MAX {
            return Err(TransportError::LbaOutOfRange { lba: req.lba });
        }
        if let Some(expected) = req.expected_transfer_len()
            && expected != data.len()
        {
            return Err(TransportError::TransferLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        let cdb = req.to_cdb();
        debug!(
            command = format_args!("{:#04x}", req.command),
            features = format_args!("{:#06x}", req.features),
            count = req.count,
            lba = format_args!("{:#x}", req.lba),
            cdb = %hex::encode(cdb),
            "submit ATA PASS-THROUGH(16)"
        );

        let mut sense = vec![0u8; self.cfg.transport.sense_buffer_len as usize];
        let mut io = ScsiRequest {
            cdb,
            direction: req.direction,
            data,
            sense: &mut sense,
            timeout: req.timeout,
        };
        let transferred = self.transport.submit(&mut io)?;

        debug!(transferred, sense = %hex::encode(&sense), "ATA command completed");
        Ok(AtaCompletion { transferred, sense })
    }
}
