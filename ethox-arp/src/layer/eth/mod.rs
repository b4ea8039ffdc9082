//! The ethernet layer.
//!
//! This is tasked with decoding the framed ethernet data that the physical device deals with, and
//! putting upper layer data into an ethernet framing. This is conceptually and practically simply
//! an implementation of the ideas outlined in the [generic layer documentation][layer]. The state
//! and logic within the ethernet endpoint is tiny compared to other layers.
//!
//! Upper layers are connected in two directions. Outgoing payloads are handed to a [`Transport`]
//! together with their destination and EtherType. Incoming frames are dispatched by EtherType to
//! the [`Recv`] implementations registered in a [`Protocols`] table, which also get a transport
//! to answer through.
//!
//! [layer]: ../index.html
//! [`Transport`]: trait.Transport.html
//! [`Recv`]: trait.Recv.html
//! [`Protocols`]: struct.Protocols.html
use alloc::vec::Vec;

use crate::layer::{FnHandler, Result};
use crate::time::Instant;
use crate::wire::{EthernetAddress, EthernetProtocol};

mod endpoint;

pub use endpoint::{
    Endpoint,
    Sender,
};

/// A sender of upper layer payloads.
///
/// Takes care of all framing, the caller only provides the payload bytes.
pub trait Transport {
    /// The hardware address of the sending interface.
    fn src_addr(&self) -> EthernetAddress;

    /// Send `payload` as one frame to `dst_addr`, tagged with `ethertype`.
    ///
    /// A failure is not retried.
    fn send(&mut self, payload: &[u8], dst_addr: EthernetAddress, ethertype: EthernetProtocol)
        -> Result<()>;
}

/// One received frame, stripped of its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InPacket<'a> {
    /// The hardware address of the sender.
    pub src_addr: EthernetAddress,
    /// The hardware address the frame was sent to.
    pub dst_addr: EthernetAddress,
    /// The EtherType selecting the receiver.
    pub ethertype: EthernetProtocol,
    /// The frame payload, possibly including padding.
    pub payload: &'a [u8],
    /// When the frame was received.
    pub timestamp: Instant,
}

/// A ethernet receiver.
///
/// Processes the payload of incoming frames of one EtherType and may answer through the
/// transport.
pub trait Recv {
    /// Inspect one incoming frame.
    ///
    /// Errors are those of the transport while answering. Invalid packets are simply ignored.
    fn receive(&mut self, packet: InPacket, tx: &mut dyn Transport) -> Result<()>;
}

/// Receivers registered by EtherType.
///
/// The receivers are borrowed, a table is usually assembled right before polling.
#[derive(Default)]
pub struct Protocols<'a> {
    handlers: Vec<(EthernetProtocol, &'a mut dyn Recv)>,
}

impl<'a> Protocols<'a> {
    /// An empty table, dropping all frames.
    pub fn new() -> Self {
        Protocols { handlers: Vec::new() }
    }

    /// Register the receiver for an EtherType.
    ///
    /// Returns the receiver previously registered for the same type.
    pub fn register(&mut self, ethertype: EthernetProtocol, handler: &'a mut dyn Recv)
        -> Option<&'a mut dyn Recv>
    {
        match self.handlers.iter_mut().find(|(registered, _)| *registered == ethertype) {
            Some(entry) => Some(core::mem::replace(&mut entry.1, handler)),
            None => {
                self.handlers.push((ethertype, handler));
                None
            },
        }
    }

    /// Builder style variant of `register`.
    pub fn with(mut self, ethertype: EthernetProtocol, handler: &'a mut dyn Recv) -> Self {
        self.register(ethertype, handler);
        self
    }

    /// Check if a receiver exists for the EtherType.
    pub fn contains(&self, ethertype: EthernetProtocol) -> bool {
        self.handlers.iter().any(|(registered, _)| *registered == ethertype)
    }

    /// Hand the packet to its receiver.
    ///
    /// Returns `Ok(false)` if no receiver is registered for its type.
    pub fn dispatch(&mut self, packet: InPacket, tx: &mut dyn Transport) -> Result<bool> {
        let handler = self.handlers.iter_mut()
            .find(|(registered, _)| *registered == packet.ethertype);
        match handler {
            Some((_, handler)) => handler.receive(packet, tx).map(|()| true),
            None => Ok(false),
        }
    }
}

impl<T: Transport + ?Sized> Transport for &'_ mut T {
    fn src_addr(&self) -> EthernetAddress {
        (**self).src_addr()
    }

    fn send(&mut self, payload: &[u8], dst_addr: EthernetAddress, ethertype: EthernetProtocol)
        -> Result<()>
    {
        (**self).send(payload, dst_addr, ethertype)
    }
}

impl<E: Recv + ?Sized> Recv for &'_ mut E {
    fn receive(&mut self, packet: InPacket, tx: &mut dyn Transport) -> Result<()> {
        (**self).receive(packet, tx)
    }
}

impl<F> Recv for FnHandler<F>
    where F: FnMut(InPacket, &mut dyn Transport) -> Result<()>
{
    fn receive(&mut self, packet: InPacket, tx: &mut dyn Transport) -> Result<()> {
        self.0(packet, tx)
    }
}
