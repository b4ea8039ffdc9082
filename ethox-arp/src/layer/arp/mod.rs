//! Receiving and sending ARP messages.
//!
//! Resolves IPv4 addresses of hosts on the local link to their hardware addresses. Upper layers
//! hand their packets to [`Endpoint::resolve_and_send`] with a protocol address instead of a
//! hardware address. If the mapping is not yet known, a request is broadcast and the packet is
//! held back until the answer arrives or a short timeout passes.
//!
//! There is a deliberate limit of one held packet per destination. As long as one is waiting,
//! further packets to the same host are dropped and no new request is sent. This also rate limits
//! the requests themselves. Once the waiting packet has aged out the next packet triggers a fresh
//! request.
//!
//! Every validated request or reply updates the cache with the mapping of its sender, whether or
//! not we asked for it. See [RFC826] for the general algorithm.
//!
//! [`Endpoint::resolve_and_send`]: struct.Endpoint.html#method.resolve_and_send
//! [RFC826]: https://tools.ietf.org/html/rfc826
mod endpoint;
mod neighbor;
mod pending;
#[cfg(test)]
mod tests;

use crate::time::Duration;
use crate::wire::{EthernetAddress, Ipv4Address};

pub use endpoint::{Endpoint, Incoming, Outgoing};

pub use neighbor::{
    Cache as NeighborCache,
    Table as NeighborTable,
};

pub use pending::Pending;

pub use crate::wire::ArpInvalid as Invalid;

/// The static configuration of an arp endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The hardware address of the local interface.
    pub hardware_addr: EthernetAddress,

    /// The protocol address of the local interface.
    pub protocol_addr: Ipv4Address,

    /// How long a learned mapping stays valid after its last update.
    pub entry_lifetime: Duration,

    /// How long a packet waits for resolution.
    ///
    /// This is also the minimum interval between two requests for the same address.
    pub silent_time: Duration,

    /// Maximum number of cached mappings, `0` for the default.
    pub cache_capacity: usize,

    /// Maximum number of destinations with a waiting packet, `0` for the default.
    pub pending_capacity: usize,
}

impl Config {
    /// The default lifetime of cache entries.
    pub const ENTRY_LIFETIME: Duration = Duration::from_secs(60);

    /// The default minimum delay between requests.
    pub const SILENT_TIME: Duration = Duration::from_millis(1_000);

    /// A configuration for the given local addresses with default timings and sizes.
    pub fn new(hardware_addr: EthernetAddress, protocol_addr: Ipv4Address) -> Self {
        Config {
            hardware_addr,
            protocol_addr,
            entry_lifetime: Self::ENTRY_LIFETIME,
            silent_time: Self::SILENT_TIME,
            cache_capacity: 0,
            pending_capacity: 0,
        }
    }
}
