// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Linux SCSI generic (`SG_IO`) transport.

use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::AsRawFd,
    path::{Path, PathBuf},
    ptr,
};

use tracing::{debug, trace};

use crate::{
    client::common::{ScsiRequest, ScsiTransport},
    control_block::ata_pass_through::DataDirection,
    error::TransportError,
};

const SG_IO: u32 = 0x2285;
const SG_INTERFACE_ID: i32 = b'S' as i32;

const SG_DXFER_NONE: i32 = -1;
const SG_DXFER_TO_DEV: i32 = -2;
const SG_DXFER_FROM_DEV: i32 = -3;

const DID_TIME_OUT: u16 = 0x03;

/// Mirror of `struct sg_io_hdr` from `<scsi/sg.h>`.
#[repr(C)]
#[derive(Debug)]
struct SgIoHdr {
    interface_id: libc::c_int,
    dxfer_direction: libc::c_int,
    cmd_len: libc::c_uchar,
    mx_sb_len: libc::c_uchar,
    iovec_count: libc::c_ushort,
    dxfer_len: libc::c_uint,
    dxferp: *mut libc::c_void,
    cmdp: *mut libc::c_uchar,
    sbp: *mut libc::c_uchar,
    timeout: libc::c_uint,
    flags: libc::c_uint,
    pack_id: libc::c_int,
    usr_ptr: *mut libc::c_void,
    status: libc::c_uchar,
    masked_status: libc::c_uchar,
    msg_status: libc::c_uchar,
    sb_len_wr: libc::c_uchar,
    host_status: libc::c_ushort,
    driver_status: libc::c_ushort,
    resid: libc::c_int,
    duration: libc::c_uint,
    info: libc::c_uint,
}

/// An exclusively owned SCSI generic device handle.
///
/// The descriptor is closed on [`SgDevice::close`] or when dropped.
#[derive(Debug)]
pub struct SgDevice {
    file: File,
    path: PathBuf,
}

impl SgDevice {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TransportError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.display().to_string(),
                source,
            })?;
        debug!(device = %path.display(), "opened SCSI generic device");
        Ok(Self { file, path })
    }

    pub fn close(self) {
        debug!(device = %self.path.display(), "closing SCSI generic device");
        drop(self.file);
    }
}

impl ScsiTransport for SgDevice {
    fn submit(&mut self, req: &mut ScsiRequest<'_>) -> Result<usize, TransportError> {
        let dxfer_len = u32::try_from(req.data.len())
            .map_err(|_| TransportError::BufferTooLarge(req.data.len()))?;
        let timeout_ms = u32::try_from(req.timeout.as_millis()).unwrap_or(u32::MAX);

        let dxfer_direction = match req.direction {
            DataDirection::None => SG_DXFER_NONE,
            DataDirection::ToDevice => SG_DXFER_TO_DEV,
            DataDirection::FromDevice => SG_DXFER_FROM_DEV,
        };
        let (dxferp, dxfer_len) = if dxfer_len == 0 {
            (ptr::null_mut(), 0)
        } else {
            (req.data.as_mut_ptr().cast::<libc::c_void>(), dxfer_len)
        };

        let mut hdr = SgIoHdr {
            interface_id: SG_INTERFACE_ID,
            dxfer_direction,
            cmd_len: req.cdb.len() as libc::c_uchar,
            mx_sb_len: req.sense.len().min(u8::MAX as usize) as libc::c_uchar,
            iovec_count: 0,
            dxfer_len,
            dxferp,
            cmdp: req.cdb.as_mut_ptr(),
            sbp: req.sense.as_mut_ptr(),
            timeout: timeout_ms,
            flags: 0,
            pack_id: 0,
            usr_ptr: ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        };

        // SAFETY: every pointer in `hdr` borrows from `req`, which outlives the
        // ioctl, and each length matches the buffer it describes.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), SG_IO as _, &mut hdr) };
        if rc < 0 {
            return Err(TransportError::Submit(io::Error::last_os_error()));
        }

        trace!(
            status = hdr.status,
            host_status = hdr.host_status,
            driver_status = hdr.driver_status,
            sb_len_wr = hdr.sb_len_wr,
            resid = hdr.resid,
            duration_ms = hdr.duration,
            "SG_IO completed"
        );

        match hdr.host_status {
            0 => {},
            DID_TIME_OUT => return Err(TransportError::Timeout { timeout_ms }),
            host_status => {
                return Err(TransportError::Host {
                    host_status,
                    driver_status: hdr.driver_status,
                });
            },
        }

        let resid = usize::try_from(hdr.resid).unwrap_or(0);
        Ok((dxfer_len as usize).saturating_sub(resid))
    }
}
