// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use std::os::unix::io::{RawFd, AsRawFd};

use libc;
use super::{Errno, FdResult, IoLenResult, LibcResult, ifreq};
use super::linux::{NetdeviceMtu, TunSetIf};

use crate::layer::{Error, Result};
use crate::nic::Device;

/// A static descriptor for interacting with a tap interface.
///
/// Contains the file descriptor and a pre-filled `ifreq` structure with the interface name that is
/// required for `ioctl` calls. This offers the raw methods for reading and writing but does not
/// encapsulate an actual `nic::Device`. Wrap it in a [`TapInterface`] for this.
///
/// [`TapInterface`]: struct.TapInterface.html
#[derive(Debug)]
pub struct TapInterfaceDesc {
    lower: libc::c_int,
    ifreq: ifreq
}

/// A tap interface usable as a network device.
///
/// Sending writes the frame immediately and may block. Receiving never blocks, use [`sys_wait`]
/// on the raw descriptor to sleep until a frame arrives.
///
/// [`sys_wait`]: fn.sys_wait.html
#[derive(Debug)]
pub struct TapInterface {
    inner: TapInterfaceDesc,
    last_err: Option<Errno>,
}

impl AsRawFd for TapInterfaceDesc {
    fn as_raw_fd(&self) -> RawFd {
        self.lower
    }
}

impl AsRawFd for TapInterface {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

static TAP_PATH: &'static [u8] = b"/dev/net/tun\0";

impl TapInterfaceDesc {
    /// Try to open a socket for the named interface.
    ///
    /// Note that this does *not* yet set the interface for the file descriptor, it only creates
    /// the necessary structures involved in doing so. Call [`attach_interface`] afterwards.
    ///
    /// [`attach_interface`]: #method.attach_interface
    pub fn new(name: &str) -> core::result::Result<TapInterfaceDesc, Errno> {
        let lower = unsafe {
            libc::open(
                TAP_PATH.as_ptr() as *const libc::c_char,
                libc::O_RDWR | libc::O_NONBLOCK)
        };

        FdResult(lower).errno()?;

        Ok(TapInterfaceDesc {
            lower,
            ifreq: ifreq::new(name),
        })
    }

    /// Update the file descriptor to the named interface.
    ///
    /// See `ioctl` with `TUNSETIFF` for details on errors.
    pub fn attach_interface(&mut self) -> core::result::Result<(), Errno> {
        self.ifreq.tun_set_tap(self.lower)
    }

    /// Try to find the mtu of the tap.
    ///
    /// Works by opening an `AF_INET/PROTO_IP` socket and querying the mtu of the named interface
    /// through it.
    pub fn interface_mtu(&mut self) -> core::result::Result<usize, Errno> {
        let socket = unsafe {
            libc::socket(libc::AF_INET, libc::SOCK_DGRAM, libc::IPPROTO_IP)
        };

        FdResult(socket).errno()?;

        let mtu = self.ifreq.get_mtu(socket)
            .map(|mtu| mtu as usize);

        unsafe { libc::close(socket); }

        mtu
    }

    /// Receive a single message on the tap into the buffer.
    pub fn recv(&mut self, buffer: &mut [u8]) -> core::result::Result<usize, Errno> {
        let len = unsafe {
            libc::read(
                self.lower,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Send a single message onto the tap from the buffer.
    pub fn send(&mut self, buffer: &[u8]) -> core::result::Result<usize, Errno> {
        let len = unsafe {
            libc::write(
                self.lower,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }
}

impl TapInterface {
    /// Open a tap interface by name.
    pub fn new(name: &str) -> core::result::Result<Self, Errno> {
        let inner = TapInterfaceDesc::new(name)?;
        Self::with_descriptor(inner)
    }

    /// Wrap an existing descriptor into a device.
    pub fn with_descriptor(mut inner: TapInterfaceDesc) -> core::result::Result<Self, Errno> {
        inner.attach_interface()?;
        Ok(TapInterface {
            inner,
            last_err: None,
        })
    }

    /// Query the mtu of the underlying interface.
    pub fn mtu(&mut self) -> core::result::Result<usize, Errno> {
        self.inner.interface_mtu()
    }

    /// Take the last io error returned by the OS.
    pub fn last_err(&mut self) -> Option<Errno> {
        self.last_err.take()
    }

    fn store_err(&mut self, err: Errno) -> Error {
        self.last_err = Some(err);
        io_error_to_layer(&err)
    }
}

impl Drop for TapInterfaceDesc {
    fn drop(&mut self) {
        unsafe { libc::close(self.lower); }
    }
}

impl Device for TapInterface {
    fn tx(&mut self, frame: &[u8]) -> Result<()> {
        match self.inner.send(frame) {
            Ok(len) if len == frame.len() => Ok(()),
            Ok(_) => Err(Error::Exhausted),
            Err(err) => Err(self.store_err(err)),
        }
    }

    fn rx(&mut self, buffer: &mut [u8]) -> Result<Option<usize>> {
        match self.inner.recv(buffer) {
            Ok(len) => Ok(Some(len)),
            Err(ref err) if err.would_block() => Ok(None),
            Err(err) => Err(self.store_err(err)),
        }
    }
}

fn io_error_to_layer(err: &Errno) -> Error {
    match err.0 {
        libc::ENOBUFS | libc::ENOMEM => Error::Exhausted,
        libc::EMSGSIZE => Error::BadSize,
        _ => Error::Illegal,
    }
}
