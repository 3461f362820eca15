// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use crate::{control_block::ata_pass_through::DataDirection, error::TransportError};

/// Everything the SCSI generic layer needs for one exchange.
#[derive(Debug)]
pub struct ScsiRequest<'a> {
    pub cdb: [u8; 16],
    pub direction: DataDirection,
    pub data: &'a mut [u8],
    pub sense: &'a mut [u8],
    pub timeout: Duration,
}

/// Blocking command submission; the only I/O seam of the crate.
///
/// Implementations fill `data` (for reads) and `sense`, then return the number
/// of data bytes actually moved.
pub trait ScsiTransport {
    fn submit(&mut self, req: &mut ScsiRequest<'_>) -> Result<usize, TransportError>;
}

impl<T: ScsiTransport + ?Sized> ScsiTransport for &mut T {
    fn submit(&mut self, req: &mut ScsiRequest<'_>) -> Result<usize, TransportError> {
        (**self).submit(req)
    }
}

impl<T: ScsiTransport + ?Sized> ScsiTransport for Box<T> {
    fn submit(&mut self, req: &mut ScsiRequest<'_>) -> Result<usize, TransportError> {
        (**self).submit(req)
    }
}
