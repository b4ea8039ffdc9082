use alloc::vec::Vec;

use crate::storage::ExpiringMap;
use crate::time::{Duration, Instant};
use crate::wire::Ipv4Address;

/// Packets waiting for the resolution of their destination.
///
/// Holds at most one packet per destination. An entry ages out after the configured silent time,
/// after which the destination is treated as never having had a packet buffered. The presence of
/// an entry thus doubles as the marker that a request is outstanding.
#[derive(Debug, Clone)]
pub struct Pending {
    storage: ExpiringMap<Ipv4Address, Vec<u8>>,
}

impl Pending {
    /// Create an empty store.
    ///
    /// A `capacity` of `0` chooses a default size.
    pub fn new(capacity: usize, silent_time: Duration) -> Self {
        Pending {
            storage: ExpiringMap::new(capacity, silent_time),
        }
    }

    /// Check if a packet is waiting for `addr`.
    pub fn has_pending(&self, addr: Ipv4Address, now: Instant) -> bool {
        self.storage.contains(&addr, now)
    }

    /// Hold back `packet` until `addr` is resolved.
    ///
    /// Returns `false` if another packet is already waiting for the same address or if the store
    /// is full of packets still waiting, in which case `packet` is dropped. A waiting packet is
    /// never displaced since it marks its request as outstanding.
    pub fn buffer(&mut self, addr: Ipv4Address, packet: Vec<u8>, now: Instant) -> bool {
        if self.has_pending(addr, now) {
            return false;
        }

        match self.storage.try_set(addr, packet, now) {
            Ok(()) => true,
            Err(_) => {
                net_debug!("arp: pending store full, dropped packet for {}", addr);
                false
            },
        }
    }

    /// Remove the packet waiting for `addr`.
    pub fn take(&mut self, addr: Ipv4Address, now: Instant) -> Option<Vec<u8>> {
        self.storage.take(&addr, now)
    }

    /// Number of stored packets, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no packets are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop all packets whose resolution timed out.
    pub fn purge(&mut self, now: Instant) -> usize {
        self.storage.purge(now)
    }
}
