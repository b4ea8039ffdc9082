/*! Low-level packet access and construction.

# An overview over packet representations

The `wire` module deals with the packet *representation*. It provides two levels of
functionality.

 * First, it provides functions to extract fields from sequences of octets, and to insert fields
   into sequences of octets. This happens in the lowercase structures e.g. [`ethernet_frame`] or
   [`arp_packet`].
 * Second, it provides a compact, high-level representation of header data that can be created from
   parsing and emitted into a sequence of octets. This happens through the `Repr` family of structs,
   e.g. [`ArpRepr`] or [`EthernetRepr`].

[`ethernet_frame`]: struct.ethernet_frame.html
[`arp_packet`]: struct.arp_packet.html
[`ArpRepr`]: struct.ArpRepr.html
[`EthernetRepr`]: struct.EthernetRepr.html

The `packet` family of data structures guarantees that, if the `packet::check_len()` method
returned `Ok(())`, then no field accessor or setter method will panic.

The `packet::new_checked` method is a shorthand for combining `new_unchecked` and `check_len`.
When parsing untrusted input, it is *necessary* to use the checked method; so long as the buffer
is not modified, no accessor will fail. When emitting output, the buffer length is calculated by
the `Repr` struct.

In the `Repr` family of data structures, the `Repr::parse()` method never panics and the
`Repr::emit()` method never panics as long as the underlying buffer is at least
`Repr::buffer_len()` octets long.

# Examples

To emit an ARP request into an octet buffer, and then parse it back:

```rust
use ethox_arp::wire::*;
let repr = ArpRepr {
    operation: ArpOperation::Request,
    source_hardware_addr: EthernetAddress([0x02, 0, 0, 0, 0, 1]),
    source_protocol_addr: Ipv4Address::new(10, 0, 0, 1),
    target_hardware_addr: EthernetAddress::UNSPECIFIED,
    target_protocol_addr: Ipv4Address::new(10, 0, 0, 2),
};
let mut buffer = vec![0; repr.buffer_len()];
{ // emission
    let packet = arp_packet::new_unchecked_mut(&mut buffer);
    repr.emit(packet);
}
{ // parsing
    let packet = arp_packet::new_checked(&buffer)
        .expect("truncated packet");
    let parsed = ArpRepr::parse(packet)
        .expect("malformed packet");
    assert_eq!(repr, parsed);
}
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `arp.rs`
// * `error.rs`
// * `ethernet.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)

// FIXME: Most fields should be self-explanatory and there is the general guide but enable once the
// other issues have been resolved.
#![allow(missing_docs)]

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

pub mod arp;
pub mod ethernet;
mod error;
mod ipv4;

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    ParseAddressError as ParseEthernetAddressError,
    Repr as EthernetRepr};

pub use self::error::{
    Error,
    Result};

pub use self::arp::{
    arp as arp_packet,
    Hardware as ArpHardware,
    Invalid as ArpInvalid,
    Operation as ArpOperation,
    Repr as ArpRepr};

pub use self::ipv4::{
    Address as Ipv4Address,
    ParseAddressError as ParseIpv4AddressError};
