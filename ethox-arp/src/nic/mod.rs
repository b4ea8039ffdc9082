//! Encapsulates a network interface card.
//!
//! Also permits software emulation or implementation of one as well, of course. A device moves
//! whole Ethernet frames; it knows nothing about their content. The ethernet layer drives it by
//! polling: one call to [`rx`] hands over at most one frame and never blocks.
//!
//! [`rx`]: trait.Device.html#tymethod.rx
pub mod external;
#[cfg(all(feature = "std", target_os = "linux"))]
pub mod sys;

pub use crate::layer::{Error, Result};

pub use self::external::External;
#[cfg(all(feature = "std", target_os = "linux"))]
pub use self::sys::exports::*;

/// A device sending and receiving raw frames.
pub trait Device {
    /// Queue a complete frame to be sent.
    ///
    /// The frame is copied by the device, the buffer may be reused as soon as this returns. A
    /// failure is reported to the caller and not retried.
    fn tx(&mut self, frame: &[u8]) -> Result<()>;

    /// Receive the next frame into `buffer`, if there is one.
    ///
    /// Returns the length of the received frame or `None` if no frame was pending. A frame that
    /// does not fit into `buffer` is discarded with `Error::BadSize`.
    fn rx(&mut self, buffer: &mut [u8]) -> Result<Option<usize>>;
}

impl<D: Device + ?Sized> Device for &'_ mut D {
    fn tx(&mut self, frame: &[u8]) -> Result<()> {
        (**self).tx(frame)
    }

    fn rx(&mut self, buffer: &mut [u8]) -> Result<Option<usize>> {
        (**self).rx(buffer)
    }
}
