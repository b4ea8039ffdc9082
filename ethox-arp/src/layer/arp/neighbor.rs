// Heads up! Before working on this file you should read, at least,
// the parts of RFC 1122 that discuss ARP.
use core::fmt;

use crate::storage::{ExpiringMap, Iter};
use crate::time::{Duration, Instant};
use crate::wire::{EthernetAddress, Ipv4Address};

/// A neighbor cache backed by an expiring map.
///
/// A neighbor mapping translates from a protocol address to a hardware address. Each mapping is
/// valid for the configured lifetime after its last update and is absent afterwards. There is no
/// explicit invalidation, an address is simply forgotten if it is not refreshed in time.
///
/// # Examples
///
/// ```rust
/// use ethox_arp::layer::arp::NeighborCache;
/// use ethox_arp::time::{Duration, Instant};
/// use ethox_arp::wire::{EthernetAddress, Ipv4Address};
///
/// let mut cache = NeighborCache::new(0, Duration::from_secs(60));
/// let ip = Ipv4Address::new(10, 0, 0, 2);
/// let mac = EthernetAddress([0x02, 0, 0, 0, 0, 0xbb]);
///
/// cache.update(ip, mac, Instant::from_secs(0));
/// assert_eq!(cache.lookup(ip, Instant::from_secs(59)), Some(mac));
/// assert_eq!(cache.lookup(ip, Instant::from_secs(60)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    storage: ExpiringMap<Ipv4Address, EthernetAddress>,
}

/// A printable snapshot of the live neighbor mappings.
///
/// Formats as a table with one line per mapping, with the time of its last update.
pub struct Table<'a> {
    cache: &'a Cache,
    now: Instant,
}

impl Cache {
    /// Create an empty cache.
    ///
    /// A `capacity` of `0` chooses a default size.
    pub fn new(capacity: usize, lifetime: Duration) -> Self {
        Cache {
            storage: ExpiringMap::new(capacity, lifetime),
        }
    }

    /// Find the hardware address of a neighbor, if it is known and still valid.
    pub fn lookup(&self, protocol_addr: Ipv4Address, now: Instant) -> Option<EthernetAddress> {
        self.storage.get(&protocol_addr, now).cloned()
    }

    /// Insert or refresh a mapping.
    ///
    /// The lifetime of the mapping starts anew. If the cache is full another mapping is dropped.
    pub fn update(
        &mut self,
        protocol_addr: Ipv4Address,
        hardware_addr: EthernetAddress,
        now: Instant,
    ) {
        net_trace!("arp: neighbor {} is at {}", protocol_addr, hardware_addr);
        if let Some((evicted, _)) = self.storage.set(protocol_addr, hardware_addr, now) {
            net_debug!("arp: cache full, evicted neighbor {}", evicted);
        }
    }

    /// Forget a mapping.
    pub fn remove(&mut self, protocol_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.storage.remove(&protocol_addr)
    }

    /// Drop all mappings that have expired.
    pub fn purge(&mut self, now: Instant) -> usize {
        self.storage.purge(now)
    }

    /// Number of stored mappings, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no mappings are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The lifetime of a mapping after its last update.
    pub fn lifetime(&self) -> Duration {
        self.storage.lifetime()
    }

    /// Iterate the live mappings with the time of their last update.
    pub fn iter(&self, now: Instant) -> Iter<'_, Ipv4Address, EthernetAddress> {
        self.storage.iter(now)
    }

    /// Snapshot the live mappings for printing.
    pub fn table(&self, now: Instant) -> Table<'_> {
        Table { cache: self, now }
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "===ARP TABLE BEGIN===")?;
        for (protocol_addr, hardware_addr, updated) in self.cache.iter(self.now) {
            writeln!(f, "{} | {} | {}", protocol_addr, hardware_addr, updated)?;
        }
        writeln!(f, "===ARP TABLE  END ===")
    }
}

impl fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.cache.iter(self.now).map(|(ip, mac, _)| (ip, mac)))
            .finish()
    }
}
