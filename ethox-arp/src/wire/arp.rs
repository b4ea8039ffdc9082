use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::{Error, Result};

pub use super::EthernetProtocol as Protocol;
pub use super::EthernetAddress as Address;
pub use super::Ipv4Address as IpAddress;

enum_with_unknown! {
    /// ARP hardware type.
    pub enum Hardware(u16) {
        Ethernet = 1
    }
}

enum_with_unknown! {
    /// ARP operation type.
    pub enum Operation(u16) {
        Request = 1,
        Reply = 2
    }
}

byte_wrapper!{
    /// A byte sequence representing an ARP packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct arp([u8]);
}

/// The reason an ARP packet is not a valid Ethernet/IPv4 request or reply.
///
/// Each variant corresponds to one header check, in the order they are performed. The checks
/// stop at the first failure so exactly one reason is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalid {
    /// The buffer is shorter than the fixed header, contains the actual length.
    Truncated(usize),
    /// The hardware type is not Ethernet.
    HardwareType(Hardware),
    /// The protocol type is not IPv4.
    ProtocolType(Protocol),
    /// The hardware address length is not 6.
    HardwareLen(u8),
    /// The protocol address length is not 4.
    ProtocolLen(u8),
    /// The operation is neither request nor reply.
    Operation(Operation),
}

mod field {
    #![allow(non_snake_case)]

    use crate::wire::field::*;

    pub const HTYPE: Field = 0..2;
    pub const PTYPE: Field = 2..4;
    pub const HLEN: usize = 4;
    pub const PLEN: usize = 5;
    pub const OPER: Field = 6..8;

    // The address fields assume a hardware length of 6 and protocol length of 4, the only
    // combination that passes header validation.
    pub const SHA: Field = 8..14;
    pub const SPA: Field = 14..18;
    pub const THA: Field = 18..24;
    pub const TPA: Field = 24..28;
}

/// The length of an Ethernet/IPv4 ARP packet.
pub const HEADER_LEN: usize = field::TPA.end;

impl arp {
    /// Imbue a raw octet buffer with ARP packet structure.
    pub fn new_unchecked(buffer: &[u8]) -> &arp {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// Imbue a mutable octet buffer with ARP packet structure.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut arp {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(data: &[u8]) -> Result<&arp> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// Unwrap the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap the packet as a mutable raw byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error::Truncated)` if the buffer is too short.
    ///
    /// Trailing bytes, such as the padding of a minimum size Ethernet frame, are permitted.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Validate the header fields for an Ethernet/IPv4 request or reply.
    ///
    /// Checks, in order: length, hardware type, protocol type, hardware and protocol address
    /// lengths, and the operation. Reports the first failing check.
    pub fn check_header(&self) -> core::result::Result<(), Invalid> {
        if self.check_len().is_err() {
            return Err(Invalid::Truncated(self.0.len()));
        }

        match self.hardware_type() {
            Hardware::Ethernet => (),
            other => return Err(Invalid::HardwareType(other)),
        }

        match self.protocol_type() {
            Protocol::Ipv4 => (),
            other => return Err(Invalid::ProtocolType(other)),
        }

        match self.hardware_len() {
            6 => (),
            other => return Err(Invalid::HardwareLen(other)),
        }

        match self.protocol_len() {
            4 => (),
            other => return Err(Invalid::ProtocolLen(other)),
        }

        match self.operation() {
            Operation::Request | Operation::Reply => Ok(()),
            other => Err(Invalid::Operation(other)),
        }
    }

    /// Return the hardware type field.
    #[inline]
    pub fn hardware_type(&self) -> Hardware {
        let raw = NetworkEndian::read_u16(&self.0[field::HTYPE]);
        Hardware::from(raw)
    }

    /// Return the protocol type field.
    #[inline]
    pub fn protocol_type(&self) -> Protocol {
        let raw = NetworkEndian::read_u16(&self.0[field::PTYPE]);
        Protocol::from(raw)
    }

    /// Return the hardware length field.
    #[inline]
    pub fn hardware_len(&self) -> u8 {
        self.0[field::HLEN]
    }

    /// Return the protocol length field.
    #[inline]
    pub fn protocol_len(&self) -> u8 {
        self.0[field::PLEN]
    }

    /// Return the operation field.
    #[inline]
    pub fn operation(&self) -> Operation {
        let raw = NetworkEndian::read_u16(&self.0[field::OPER]);
        Operation::from(raw)
    }

    /// Return the source hardware address field.
    pub fn source_hardware_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::SHA])
    }

    /// Return the source protocol address field.
    pub fn source_protocol_addr(&self) -> IpAddress {
        IpAddress::from_bytes(&self.0[field::SPA])
    }

    /// Return the target hardware address field.
    pub fn target_hardware_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::THA])
    }

    /// Return the target protocol address field.
    pub fn target_protocol_addr(&self) -> IpAddress {
        IpAddress::from_bytes(&self.0[field::TPA])
    }

    /// Set the hardware type field.
    #[inline]
    pub fn set_hardware_type(&mut self, value: Hardware) {
        NetworkEndian::write_u16(&mut self.0[field::HTYPE], value.into())
    }

    /// Set the protocol type field.
    #[inline]
    pub fn set_protocol_type(&mut self, value: Protocol) {
        NetworkEndian::write_u16(&mut self.0[field::PTYPE], value.into())
    }

    /// Set the hardware length field.
    #[inline]
    pub fn set_hardware_len(&mut self, value: u8) {
        self.0[field::HLEN] = value
    }

    /// Set the protocol length field.
    #[inline]
    pub fn set_protocol_len(&mut self, value: u8) {
        self.0[field::PLEN] = value
    }

    /// Set the operation field.
    #[inline]
    pub fn set_operation(&mut self, value: Operation) {
        NetworkEndian::write_u16(&mut self.0[field::OPER], value.into())
    }

    /// Set the source hardware address field.
    pub fn set_source_hardware_addr(&mut self, value: Address) {
        self.0[field::SHA].copy_from_slice(value.as_bytes())
    }

    /// Set the source protocol address field.
    pub fn set_source_protocol_addr(&mut self, value: IpAddress) {
        self.0[field::SPA].copy_from_slice(value.as_bytes())
    }

    /// Set the target hardware address field.
    pub fn set_target_hardware_addr(&mut self, value: Address) {
        self.0[field::THA].copy_from_slice(value.as_bytes())
    }

    /// Set the target protocol address field.
    pub fn set_target_protocol_addr(&mut self, value: IpAddress) {
        self.0[field::TPA].copy_from_slice(value.as_bytes())
    }
}

impl AsRef<[u8]> for arp {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for arp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// A high-level representation of an Ethernet/IPv4 Address Resolution Protocol packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    pub operation: Operation,
    pub source_hardware_addr: Address,
    pub source_protocol_addr: IpAddress,
    pub target_hardware_addr: Address,
    pub target_protocol_addr: IpAddress,
}

impl Repr {
    /// Parse an Address Resolution Protocol packet and return a high-level representation.
    ///
    /// Returns `Err(Error::Truncated)` for short buffers, `Err(Error::Unrecognized)` for other
    /// hardware, protocol or operation types and `Err(Error::Malformed)` for address lengths that
    /// contradict the types.
    pub fn parse(packet: &arp) -> Result<Repr> {
        Ok(Self::validate(packet)?)
    }

    /// Parse the packet, reporting precisely which header check failed.
    pub fn validate(packet: &arp) -> core::result::Result<Repr, Invalid> {
        packet.check_header()?;
        Ok(Repr {
            operation: packet.operation(),
            source_hardware_addr: packet.source_hardware_addr(),
            source_protocol_addr: packet.source_protocol_addr(),
            target_hardware_addr: packet.target_hardware_addr(),
            target_protocol_addr: packet.target_protocol_addr(),
        })
    }

    /// Return the length of a packet that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        HEADER_LEN
    }

    /// Emit a high-level representation into an Address Resolution Protocol packet.
    ///
    /// Type and length fields are always written with their canonical Ethernet/IPv4 values.
    pub fn emit(&self, packet: &mut arp) {
        packet.set_hardware_type(Hardware::Ethernet);
        packet.set_protocol_type(Protocol::Ipv4);
        packet.set_hardware_len(6);
        packet.set_protocol_len(4);
        packet.set_operation(self.operation);
        packet.set_source_hardware_addr(self.source_hardware_addr);
        packet.set_source_protocol_addr(self.source_protocol_addr);
        packet.set_target_hardware_addr(self.target_hardware_addr);
        packet.set_target_protocol_addr(self.target_protocol_addr);
    }
}

impl From<Invalid> for Error {
    fn from(invalid: Invalid) -> Error {
        match invalid {
            Invalid::Truncated(_) => Error::Truncated,
            Invalid::HardwareType(_)
            | Invalid::ProtocolType(_)
            | Invalid::Operation(_) => Error::Unrecognized,
            Invalid::HardwareLen(_)
            | Invalid::ProtocolLen(_) => Error::Malformed,
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ARP type=Ethernet+IPv4 src={}/{} tgt={}/{} op={:?}",
            self.source_hardware_addr,
            self.source_protocol_addr,
            self.target_hardware_addr,
            self.target_protocol_addr,
            self.operation,
        )
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Invalid::Truncated(len) => write!(f, "packet of {} bytes shorter than header", len),
            Invalid::HardwareType(hw) => write!(f, "unsupported hardware type {:?}", hw),
            Invalid::ProtocolType(proto) => write!(f, "unsupported protocol type {}", proto),
            Invalid::HardwareLen(len) => write!(f, "invalid hardware address length {}", len),
            Invalid::ProtocolLen(len) => write!(f, "invalid protocol address length {}", len),
            Invalid::Operation(op) => write!(f, "unsupported operation {:?}", op),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[rustfmt::skip]
    static PACKET_BYTES: [u8; 28] = [
        0x00, 0x01,
        0x08, 0x00,
        0x06,
        0x04,
        0x00, 0x01,
        0x11, 0x12, 0x13, 0x14, 0x15, 0x16,
        0x21, 0x22, 0x23, 0x24,
        0x31, 0x32, 0x33, 0x34, 0x35, 0x36,
        0x41, 0x42, 0x43, 0x44,
    ];

    #[test]
    fn test_deconstruct() {
        let packet = arp::new_unchecked(&PACKET_BYTES[..]);
        assert_eq!(packet.hardware_type(), Hardware::Ethernet);
        assert_eq!(packet.protocol_type(), Protocol::Ipv4);
        assert_eq!(packet.hardware_len(), 6);
        assert_eq!(packet.protocol_len(), 4);
        assert_eq!(packet.operation(), Operation::Request);
        assert_eq!(
            packet.source_hardware_addr(),
            Address::from_bytes(&[0x11, 0x12, 0x13, 0x14, 0x15, 0x16])
        );
        assert_eq!(packet.source_protocol_addr(), IpAddress::from_bytes(&[0x21, 0x22, 0x23, 0x24]));
        assert_eq!(
            packet.target_hardware_addr(),
            Address::from_bytes(&[0x31, 0x32, 0x33, 0x34, 0x35, 0x36])
        );
        assert_eq!(packet.target_protocol_addr(), IpAddress::from_bytes(&[0x41, 0x42, 0x43, 0x44]));
    }

    fn packet_repr() -> Repr {
        Repr {
            operation: Operation::Request,
            source_hardware_addr: Address::from_bytes(&[
                0x11, 0x12, 0x13, 0x14, 0x15, 0x16,
            ]),
            source_protocol_addr: IpAddress::from_bytes(&[0x21, 0x22, 0x23, 0x24]),
            target_hardware_addr: Address::from_bytes(&[
                0x31, 0x32, 0x33, 0x34, 0x35, 0x36,
            ]),
            target_protocol_addr: IpAddress::from_bytes(&[0x41, 0x42, 0x43, 0x44]),
        }
    }

    #[test]
    fn test_parse() {
        let packet = arp::new_checked(&PACKET_BYTES[..]).unwrap();
        let repr = Repr::parse(packet).unwrap();
        assert_eq!(repr, packet_repr());
    }

    #[test]
    fn test_parse_padded() {
        let mut bytes = PACKET_BYTES.to_vec();
        bytes.resize(46, 0);
        let packet = arp::new_checked(&bytes).unwrap();
        assert_eq!(Repr::parse(packet), Ok(packet_repr()));
    }

    #[test]
    fn test_emit() {
        let mut bytes = vec![0xa5; 28];
        let packet = arp::new_unchecked_mut(&mut bytes);
        packet_repr().emit(packet);
        assert_eq!(packet.as_bytes(), &PACKET_BYTES[..]);
    }

    #[test]
    fn test_rejects_in_order() {
        let short = arp::new_unchecked(&PACKET_BYTES[..27]);
        assert_eq!(short.check_header(), Err(Invalid::Truncated(27)));
        assert_eq!(Repr::parse(short), Err(Error::Truncated));

        let mut bytes = PACKET_BYTES;
        // Both the hardware type and the operation are wrong, the first check wins.
        bytes[1] = 6;
        bytes[7] = 9;
        let packet = arp::new_unchecked(&bytes[..]);
        assert_eq!(packet.check_header(), Err(Invalid::HardwareType(Hardware::Unknown(6))));
        assert_eq!(Repr::parse(packet), Err(Error::Unrecognized));

        let mut bytes = PACKET_BYTES;
        bytes[2] = 0x86;
        bytes[3] = 0xdd;
        let packet = arp::new_unchecked(&bytes[..]);
        assert_eq!(packet.check_header(), Err(Invalid::ProtocolType(Protocol::Ipv6)));

        let mut bytes = PACKET_BYTES;
        bytes[4] = 8;
        let packet = arp::new_unchecked(&bytes[..]);
        assert_eq!(packet.check_header(), Err(Invalid::HardwareLen(8)));
        assert_eq!(Repr::parse(packet), Err(Error::Malformed));

        let mut bytes = PACKET_BYTES;
        bytes[5] = 16;
        let packet = arp::new_unchecked(&bytes[..]);
        assert_eq!(packet.check_header(), Err(Invalid::ProtocolLen(16)));

        let mut bytes = PACKET_BYTES;
        bytes[7] = 3;
        let packet = arp::new_unchecked(&bytes[..]);
        assert_eq!(packet.check_header(), Err(Invalid::Operation(Operation::Unknown(3))));
    }
}
