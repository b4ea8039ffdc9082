//! The process logic of protocol layers.
//!
//! ## Layering
//!
//! Each protocol layer is split into two parts; the packet logic contained in `wire` and the
//! processing part in this module. An endpoint represents the local state of a protocol. This
//! state can be used to process packets of that layer. The state is open to modifications as part
//! of a user program while processing does not take place, similar to reconfiguration on the OS
//! level with utilities such as `arp`, `ifconfig`, etc.
//!
//! ## Receiving
//!
//! The ethernet layer polls one frame at a time from a device, strips the framing and hands the
//! payload to the receiver registered for its EtherType. Receivers are borrowed for the duration
//! of a single poll only, so that the endpoints behind them stay accessible to the program in
//! between.
//!
//! ## Sending
//!
//! Upper layers never touch frames. They hand a payload, a destination hardware address and the
//! EtherType to a [`Transport`], which takes care of the framing. The arp endpoint sits between an
//! upper layer that only knows protocol addresses and that transport.
//!
//! [`Transport`]: eth/trait.Transport.html

pub mod arp;
pub mod eth;

use core::fmt;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// An error while processing or emitting a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted.
    ///
    /// Returned when the device, endpoint, receiver or sender does not allow or implement an
    /// operation. Devices also report their own failures to transmit this way.
    Illegal,

    /// Not enough space for the requested packet.
    ///
    /// Returned when a payload does not fit into a single frame or a receive buffer.
    BadSize,

    /// The action could not be completed because there were not enough resources.
    ///
    /// The main difference towards `Illegal` is that implies that it would have been legal with
    /// more resources, e.g. a device with a full transmit queue.
    Exhausted,
}

/// A standard wrapper for a function implementing receive traits.
///
/// Keeps the type alias overhead low by providing a single wrapper type that implements the
/// receive traits for all layers, where applicable.
pub struct FnHandler<F>(pub F);

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Illegal => write!(f, "operation not permitted"),
            Error::BadSize => write!(f, "packet does not fit the buffer"),
            Error::Exhausted => write!(f, "resources exhausted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error { }
