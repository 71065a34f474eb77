//! Berkeley Packet Filter capture device (`/dev/bpfN`).

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::path::PathBuf;

use libc::{c_uint, c_ulong};
use tracing::{debug, info};

use crate::acquire::{acquire, AcquirePolicy};
use crate::error::{DeviceError, Result};
use crate::filter::{BpfInsn, FilterProgram};
use crate::traits::CaptureDevice;

const IOC_OUT: c_ulong = 0x4000_0000;
const IOC_IN: c_ulong = 0x8000_0000;
const IOCPARM_MASK: c_ulong = 0x1fff;

const fn ioc(inout: c_ulong, group: u8, num: u8, len: usize) -> c_ulong {
    inout | (((len as c_ulong) & IOCPARM_MASK) << 16) | ((group as c_ulong) << 8) | num as c_ulong
}

#[repr(C)]
struct BpfProgram {
    bf_len: c_uint,
    bf_insns: *const BpfInsn,
}

#[repr(C)]
struct IfReq {
    ifr_name: [libc::c_char; libc::IFNAMSIZ],
    ifr_ifru: [u8; 16],
}

const BIOCGBLEN: c_ulong = ioc(IOC_OUT, b'B', 102, std::mem::size_of::<c_uint>());
const BIOCSETF: c_ulong = ioc(IOC_IN, b'B', 103, std::mem::size_of::<BpfProgram>());
const BIOCSETIF: c_ulong = ioc(IOC_IN, b'B', 108, std::mem::size_of::<IfReq>());
const BIOCIMMEDIATE: c_ulong = ioc(IOC_IN, b'B', 112, std::mem::size_of::<c_uint>());

/// An open, configured BPF device bound to one interface.
///
/// The underlying descriptor is closed exactly once when this value drops.
#[derive(Debug)]
pub struct BpfDevice {
    file: File,
    path: PathBuf,
    buffer_len: usize,
}

impl BpfDevice {
    /// Acquire a free `/dev/bpfN`, bind it to `interface`, and install `filter`.
    ///
    /// With `immediate` set, reads return as soon as a frame is queued
    /// instead of waiting for the kernel buffer to fill.
    pub fn open(
        interface: &str,
        policy: &AcquirePolicy,
        immediate: bool,
        filter: &FilterProgram,
    ) -> Result<Self> {
        let ifreq = interface_request(interface)?;

        let (file, path) = acquire(policy, |index| {
            let path = PathBuf::from(format!("/dev/bpf{index}"));
            match OpenOptions::new().read(true).write(true).open(&path) {
                Ok(file) => Ok((file, path)),
                Err(source) => Err(DeviceError::Open { path, source }),
            }
        })?;
        let fd = file.as_raw_fd();

        ioctl(
            fd,
            "BIOCSETIF",
            BIOCSETIF,
            &ifreq as *const IfReq as *mut libc::c_void,
        )?;

        let mut value: c_uint = c_uint::from(immediate);
        ioctl(
            fd,
            "BIOCIMMEDIATE",
            BIOCIMMEDIATE,
            &mut value as *mut c_uint as *mut libc::c_void,
        )?;

        let mut buffer_len: c_uint = 0;
        ioctl(
            fd,
            "BIOCGBLEN",
            BIOCGBLEN,
            &mut buffer_len as *mut c_uint as *mut libc::c_void,
        )?;
        debug!(buffer_len, "ioctl(BIOCGBLEN)");

        let program = BpfProgram {
            bf_len: filter.len() as c_uint,
            bf_insns: filter.instructions().as_ptr(),
        };
        ioctl(
            fd,
            "BIOCSETF",
            BIOCSETF,
            &program as *const BpfProgram as *mut libc::c_void,
        )?;

        set_nonblocking(fd)?;

        info!(interface, path = ?path, "capture device bound");

        Ok(Self {
            file,
            path,
            buffer_len: buffer_len as usize,
        })
    }

    /// Device node this handle was opened from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

fn interface_request(interface: &str) -> Result<IfReq> {
    let bytes = interface.as_bytes();
    if bytes.len() >= libc::IFNAMSIZ {
        return Err(DeviceError::InterfaceNameTooLong {
            name: interface.to_string(),
            len: bytes.len(),
            max: libc::IFNAMSIZ - 1,
        });
    }
    let mut req = IfReq {
        ifr_name: [0; libc::IFNAMSIZ],
        ifr_ifru: [0; 16],
    };
    for (dst, src) in req.ifr_name.iter_mut().zip(bytes) {
        *dst = *src as libc::c_char;
    }
    Ok(req)
}

fn ioctl(fd: RawFd, request: &'static str, code: c_ulong, arg: *mut libc::c_void) -> Result<()> {
    // SAFETY: every call site passes an argument of the size encoded in `code`.
    let rc = unsafe { libc::ioctl(fd, code, arg) };
    if rc == -1 {
        return Err(DeviceError::Ioctl {
            request,
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}

fn set_nonblocking(fd: RawFd) -> Result<()> {
    // SAFETY: `fd` is an open descriptor owned by the caller.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags == -1 {
        return Err(DeviceError::Io(std::io::Error::last_os_error()));
    }
    // SAFETY: as above; only the O_NONBLOCK bit is added.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc == -1 {
        return Err(DeviceError::Io(std::io::Error::last_os_error()));
    }
    Ok(())
}

impl Read for BpfDevice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for BpfDevice {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl AsRawFd for BpfDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl CaptureDevice for BpfDevice {
    fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    fn backend_name(&self) -> &'static str {
        "bpf"
    }
}
