use alloc::collections::btree_map::{self, BTreeMap};

use crate::time::{Duration, Expiration, Instant};

/// A bounded map whose entries silently age out.
///
/// Every entry remembers the instant of its last write. It is considered live for exactly
/// `lifetime` after that instant, after which all reading accessors treat it as absent. Stale
/// entries are not removed eagerly; they are purged when room is needed for a new key or when
/// they are touched through [`take`].
///
/// When a new key is inserted into a full map, expired entries are purged first and then the
/// entry with the oldest write is evicted. Such an insertion never fails but may silently drop
/// an unrelated entry. [`try_set`] instead refuses the new key while all entries are live.
///
/// The same structure serves as the resolution cache (long lifetime, copyable values) and the
/// pending packet store (short lifetime, owned buffers). Values are moved in and out, there is no
/// copy hook.
///
/// [`take`]: #method.take
/// [`try_set`]: #method.try_set
#[derive(Debug, Clone)]
pub struct ExpiringMap<K, V> {
    entries: BTreeMap<K, Entry<V>>,
    capacity: usize,
    lifetime: Duration,
}

/// One stored value with its write timestamp.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    updated: Instant,
}

/// Iterator over the live entries of an `ExpiringMap`.
pub struct Iter<'a, K, V> {
    inner: btree_map::Iter<'a, K, Entry<V>>,
    lifetime: Duration,
    now: Instant,
}

impl<K: Ord + Copy, V> ExpiringMap<K, V> {
    /// The capacity chosen when a capacity of `0` is requested.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Create an empty map.
    ///
    /// A `capacity` of `0` selects [`DEFAULT_CAPACITY`].
    ///
    /// [`DEFAULT_CAPACITY`]: #associatedconstant.DEFAULT_CAPACITY
    pub fn new(capacity: usize, lifetime: Duration) -> Self {
        let capacity = if capacity == 0 {
            Self::DEFAULT_CAPACITY
        } else {
            capacity
        };

        ExpiringMap {
            entries: BTreeMap::new(),
            capacity,
            lifetime,
        }
    }

    /// The maximum number of entries held at any time.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The duration an entry stays live after its last write.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The number of stored entries, including stale ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry is stored at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite the value for `key`, resetting its age.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn set(&mut self, key: K, value: V, now: Instant) -> Option<(K, V)> {
        let entry = Entry { value, updated: now };

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = entry;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.make_room(now)
        } else {
            None
        };

        self.entries.insert(key, entry);
        evicted
    }

    /// Insert or overwrite the value for `key` without evicting any live entry.
    ///
    /// When a new key finds the map full even after purging stale entries, the value is handed
    /// back unchanged.
    pub fn try_set(&mut self, key: K, value: V, now: Instant) -> Result<(), V> {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.purge(now);
            if self.entries.len() >= self.capacity {
                return Err(value);
            }
        }

        self.entries.insert(key, Entry { value, updated: now });
        Ok(())
    }

    /// Look up the live value for `key`.
    pub fn get(&self, key: &K, now: Instant) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if self.is_expired(entry, now) {
            return None;
        }
        Some(&entry.value)
    }

    /// The instant of the last write to `key`, if it is still live.
    pub fn updated(&self, key: &K, now: Instant) -> Option<Instant> {
        let entry = self.entries.get(key)?;
        if self.is_expired(entry, now) {
            return None;
        }
        Some(entry.updated)
    }

    /// Check if a live value for `key` exists.
    pub fn contains(&self, key: &K, now: Instant) -> bool {
        self.get(key, now).is_some()
    }

    /// Remove the entry for `key` regardless of its age.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove the entry for `key`, returning its value only if it was still live.
    ///
    /// A stale entry is dropped.
    pub fn take(&mut self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.remove(key)?;
        if self.is_expired(&entry, now) {
            return None;
        }
        Some(entry.value)
    }

    /// Drop all entries that are expired at `now`.
    ///
    /// Returns the number of removed entries.
    pub fn purge(&mut self, now: Instant) -> usize {
        let lifetime = self.lifetime;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !Self::expiration(entry, lifetime).is_reached(now));
        before - self.entries.len()
    }

    /// Iterate over all live entries, in key order.
    pub fn iter(&self, now: Instant) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
            lifetime: self.lifetime,
            now,
        }
    }

    /// Call `visitor` on each live entry with its key, value and time of last write.
    pub fn for_each<F>(&self, now: Instant, mut visitor: F)
        where F: FnMut(&K, &V, Instant),
    {
        for (key, value, updated) in self.iter(now) {
            visitor(key, value, updated)
        }
    }

    fn is_expired(&self, entry: &Entry<V>, now: Instant) -> bool {
        Self::expiration(entry, self.lifetime).is_reached(now)
    }

    fn expiration(entry: &Entry<V>, lifetime: Duration) -> Expiration {
        Expiration::When(entry.updated + lifetime)
    }

    /// Free one slot, preferring stale entries over the oldest live one.
    fn make_room(&mut self, now: Instant) -> Option<(K, V)> {
        if self.purge(now) > 0 {
            return None;
        }

        let oldest = self.entries.iter()
            .min_by_key(|(_, entry)| entry.updated)
            .map(|(key, _)| *key)?;

        self.entries.remove(&oldest)
            .map(|entry| (oldest, entry.value))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V, Instant);

    fn next(&mut self) -> Option<Self::Item> {
        let (lifetime, now) = (self.lifetime, self.now);
        self.inner.by_ref()
            .find(|(_, entry)| !Expiration::When(entry.updated + lifetime).is_reached(now))
            .map(|(key, entry)| (key, &entry.value, entry.updated))
    }
}
