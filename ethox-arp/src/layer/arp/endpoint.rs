//! As noted in RFC 826, arp assumes that at least the mapping and identities of the own host are
//! fully known to the resolver. Furthermore, we are expected to only keep a very small cache of
//! immediate communication hosts. To make the requests themselves we thus need to be informed
//! about missing addresses, which happens implicitly when a packet to an unknown host is sent.
use alloc::vec::Vec;

use crate::layer::{eth, Result};
use crate::layer::eth::Transport;
use crate::time::Instant;
use crate::wire::{arp_packet, ArpOperation, ArpRepr, EthernetAddress, EthernetProtocol, Ipv4Address};

use super::{Config, Invalid, NeighborCache, NeighborTable, Pending};

/// An arp traffic handler.
///
/// Owns the neighbor cache and the packets waiting for resolution of one interface.
#[derive(Debug, Clone)]
pub struct Endpoint {
    hardware_addr: EthernetAddress,
    protocol_addr: Ipv4Address,
    neighbors: NeighborCache,
    pending: Pending,
}

/// What happened to an outgoing packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outgoing {
    /// The destination was known and the packet has been sent.
    Sent,

    /// The packet waits for resolution, a request has been sent.
    Queued,

    /// Another packet already waits for the same destination or the store of waiting packets is
    /// full. This one was dropped and no request has been sent.
    Suppressed,
}

/// What an incoming arp packet caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Incoming {
    /// The packet was malformed and ignored.
    Rejected(Invalid),

    /// The sender was waited for and its pending packet has been sent.
    Flushed,

    /// The packet was a request for our address and has been answered.
    Answered,

    /// Only the mapping of the sender has been recorded.
    Learned,
}

impl Endpoint {
    /// Create an endpoint with empty stores.
    pub fn new(config: Config) -> Self {
        Endpoint {
            hardware_addr: config.hardware_addr,
            protocol_addr: config.protocol_addr,
            neighbors: NeighborCache::new(config.cache_capacity, config.entry_lifetime),
            pending: Pending::new(config.pending_capacity, config.silent_time),
        }
    }

    /// The hardware address announced as our own.
    pub fn hardware_addr(&self) -> EthernetAddress {
        self.hardware_addr
    }

    /// The protocol address we answer requests for.
    pub fn protocol_addr(&self) -> Ipv4Address {
        self.protocol_addr
    }

    /// Find the hardware address of a neighbor without sending anything.
    pub fn lookup(&self, protocol_addr: Ipv4Address, now: Instant) -> Option<EthernetAddress> {
        self.neighbors.lookup(protocol_addr, now)
    }

    /// Check if a packet is waiting for the resolution of `protocol_addr`.
    pub fn has_pending(&self, protocol_addr: Ipv4Address, now: Instant) -> bool {
        self.pending.has_pending(protocol_addr, now)
    }

    /// The neighbor cache.
    pub fn neighbors(&self) -> &NeighborCache {
        &self.neighbors
    }

    /// Mutable access to the neighbor cache, for example to add static entries.
    pub fn cache_mut(&mut self) -> &mut NeighborCache {
        &mut self.neighbors
    }

    /// A printable dump of all live mappings.
    pub fn table(&self, now: Instant) -> NeighborTable<'_> {
        self.neighbors.table(now)
    }

    /// Announce our presence with a request for our own address.
    ///
    /// Sent unconditionally, even when the cache already contains our mapping. Hosts that listen
    /// learn our mapping from it.
    pub fn announce<T>(&mut self, tx: &mut T, now: Instant) -> Result<()>
        where T: Transport + ?Sized,
    {
        self.request(self.protocol_addr, tx, now)
    }

    /// Broadcast a request for the hardware address of `target`.
    pub fn request<T>(&mut self, target: Ipv4Address, tx: &mut T, now: Instant) -> Result<()>
        where T: Transport + ?Sized,
    {
        let repr = ArpRepr {
            operation: ArpOperation::Request,
            source_hardware_addr: self.hardware_addr,
            source_protocol_addr: self.protocol_addr,
            target_hardware_addr: EthernetAddress::UNSPECIFIED,
            target_protocol_addr: target,
        };

        net_trace!("arp: {} requesting {} at {}", self.protocol_addr, target, now);
        send_arp(repr, EthernetAddress::BROADCAST, tx)
    }

    /// Send an IPv4 packet to a host on the local link.
    ///
    /// If the hardware address of `dst_addr` is known the packet is sent immediately. Otherwise
    /// the packet is kept until the address has been resolved and a request is broadcast. While a
    /// packet waits, other packets to the same destination are dropped without a new request. The
    /// same happens to packets for new destinations while the store of waiting packets is full.
    ///
    /// When the request can not be sent the packet remains buffered and the error is returned.
    pub fn resolve_and_send<T>(
        &mut self,
        packet: Vec<u8>,
        dst_addr: Ipv4Address,
        tx: &mut T,
        now: Instant,
    ) -> Result<Outgoing>
        where T: Transport + ?Sized,
    {
        if let Some(hardware_addr) = self.neighbors.lookup(dst_addr, now) {
            tx.send(&packet, hardware_addr, EthernetProtocol::Ipv4)?;
            return Ok(Outgoing::Sent);
        }

        if !self.pending.buffer(dst_addr, packet, now) {
            net_debug!("arp: not resolving {} now, dropped packet", dst_addr);
            return Ok(Outgoing::Suppressed);
        }

        self.request(dst_addr, tx, now)?;
        Ok(Outgoing::Queued)
    }

    /// Process the payload of an arp frame.
    ///
    /// `src_addr` is the source of the ethernet frame carrying the packet. The mapping of the
    /// packet's sender is always recorded. Then either the packet waiting for the sender is
    /// flushed or, if the packet is a request for our address, an answer is sent.
    ///
    /// Malformed packets are ignored and reported as `Incoming::Rejected`. Errors only come from
    /// the transport.
    pub fn handle_inbound<T>(
        &mut self,
        payload: &[u8],
        src_addr: EthernetAddress,
        tx: &mut T,
        now: Instant,
    ) -> Result<Incoming>
        where T: Transport + ?Sized,
    {
        let repr = match ArpRepr::validate(arp_packet::new_unchecked(payload)) {
            Ok(repr) => repr,
            Err(invalid) => {
                net_debug!("arp: dropped packet from {}: {}", src_addr, invalid);
                return Ok(Incoming::Rejected(invalid));
            },
        };

        // Learn from any valid packet, solicited or not.
        self.neighbors.update(repr.source_protocol_addr, src_addr, now);

        if let Some(packet) = self.pending.take(repr.source_protocol_addr, now) {
            net_trace!("arp: {} resolved, flushing {} bytes", repr.source_protocol_addr, packet.len());
            tx.send(&packet, repr.source_hardware_addr, EthernetProtocol::Ipv4)?;
            return Ok(Incoming::Flushed);
        }

        if repr.operation == ArpOperation::Request && repr.target_protocol_addr == self.protocol_addr {
            let reply = self.reply_to(&repr);
            net_trace!("arp: answering {}", repr);
            send_arp(reply, repr.source_hardware_addr, tx)?;
            return Ok(Incoming::Answered);
        }

        Ok(Incoming::Learned)
    }

    /// Construct the answer to a request for our address.
    fn reply_to(&self, request: &ArpRepr) -> ArpRepr {
        ArpRepr {
            operation: ArpOperation::Reply,
            source_hardware_addr: self.hardware_addr,
            source_protocol_addr: self.protocol_addr,
            target_hardware_addr: request.source_hardware_addr,
            target_protocol_addr: request.source_protocol_addr,
        }
    }
}

impl eth::Recv for Endpoint {
    fn receive(&mut self, packet: eth::InPacket, tx: &mut dyn Transport) -> Result<()> {
        self.handle_inbound(packet.payload, packet.src_addr, tx, packet.timestamp)
            .map(|_| ())
    }
}

fn send_arp<T>(repr: ArpRepr, dst_addr: EthernetAddress, tx: &mut T) -> Result<()>
    where T: Transport + ?Sized,
{
    let mut buffer = [0; crate::wire::arp::HEADER_LEN];
    repr.emit(arp_packet::new_unchecked_mut(&mut buffer[..]));
    tx.send(&buffer, dst_addr, EthernetProtocol::Arp)
}
