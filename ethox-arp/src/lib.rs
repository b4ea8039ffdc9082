//! Address resolution for user-space networking on an Ethernet link.
//!
//! ## Table of contents
//!
//! This is also a recommended reading order but feel free to skip ahead, each chapter tries to be
//! somewhat self-contained.
//!
//! 1. [Highlights](#highlights)
//! 2. [Design](#design-and-relevant-core-concepts)
//! 3. [The wire module](wire/index.html)
//!    1. [Overview of packet representations](wire/index.html#an-overview-over-packet-representations)
//! 4. [The layers](layer/index.html)
//!    1. [Receiving](layer/index.html#receiving)
//!    1. [Sending](layer/index.html#sending)
//!    1. [The eth layer](layer/eth/index.html)
//!    1. [The arp layer](layer/arp/index.html)
//! 5. [Network interfaces](nic/index.html)
//! 6. Internals
//!    1. [The storage module](storage/index.html)
//!
//! ## Highlights
//!
//! * Resolution of IPv4 neighbors with a bounded, self-expiring cache
//! * Packets to unresolved hosts are held back and sent as soon as the answer arrives
//! * No hidden clock, all aging is driven by the timestamps passed in
//! * Optional tap adapter on Linux
//!
//! Also, I'm very grateful for @whitequark's [`smoltcp`]. The overall structure may be quite
//! different but the large portions of the `wire` module wouldn't have been possible without and
//! lessons learned from studying it were integral to the design.
//!
//! [`smoltcp`]: https://github.com/m-labs/smoltcp
//!
//! ## Design and relevant core concepts
//!
//! A device is polled for one frame at a time. The ethernet layer strips the framing and hands
//! the payload to the receiver registered for its EtherType, together with a transport through
//! which it can answer. The arp endpoint is such a receiver. Upper layers send through the same
//! endpoint by protocol address, it decides whether the packet can go out immediately or has to
//! wait for a reply.
//!
//! All state of one interface lives in explicit endpoint values. Nothing is global, several
//! interfaces can be driven side by side and each test builds its own. There is no concurrency
//! inside the crate; an endpoint is driven by a single poll loop and borrowed mutably for every
//! operation.
//!
//! The crate is `no_std` without the default `std` feature but requires `alloc` for the packets
//! buffered while waiting for resolution.
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

extern crate alloc;

#[macro_use] mod macros;
pub mod layer;
pub mod nic;
pub mod storage;
pub mod time;
pub mod wire;
