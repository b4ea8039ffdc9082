//! Containers holding protocol state.
//!
//! These own their memory, in contrast to the borrowed containers that the rest of a stack can be
//! built on. The only state of address resolution is keyed by protocol address and aged by time,
//! which is what the [`ExpiringMap`] models.
//!
//! [`ExpiringMap`]: struct.ExpiringMap.html
mod expiring;

pub use self::expiring::{ExpiringMap, Iter};
