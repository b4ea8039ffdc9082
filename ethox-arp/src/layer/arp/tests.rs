use crate::layer::{eth, arp as arp_layer, Error, Result};
use crate::layer::eth::Transport;
use crate::nic::External;
use crate::time::{Duration, Instant};
use crate::wire::{arp, ethernet, ArpInvalid, ArpRepr, EthernetAddress, EthernetProtocol, Ipv4Address};

use arp_layer::{Config, Endpoint, Incoming, Outgoing};

const MAC_ADDR_HOST: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0xaa]);
const IP_ADDR_HOST: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
const MAC_ADDR_OTHER: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 0xbb]);
const IP_ADDR_OTHER: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);
const IP_ADDR_THIRD: Ipv4Address = Ipv4Address::new(10, 0, 0, 3);

const PACKET: &[u8] = b"\x45\x00\x00\x14 an ipv4 packet";

/// A transport recording every payload.
#[derive(Default)]
struct Recorder {
    sent: Vec<(Vec<u8>, EthernetAddress, EthernetProtocol)>,
    fail: Option<Error>,
}

impl Transport for Recorder {
    fn src_addr(&self) -> EthernetAddress {
        MAC_ADDR_HOST
    }

    fn send(&mut self, payload: &[u8], dst_addr: EthernetAddress, ethertype: EthernetProtocol)
        -> Result<()>
    {
        if let Some(err) = self.fail {
            return Err(err);
        }
        self.sent.push((payload.to_vec(), dst_addr, ethertype));
        Ok(())
    }
}

impl Recorder {
    fn take(&mut self) -> Vec<(Vec<u8>, EthernetAddress, EthernetProtocol)> {
        core::mem::replace(&mut self.sent, Vec::new())
    }
}

fn endpoint() -> Endpoint {
    Endpoint::new(Config::new(MAC_ADDR_HOST, IP_ADDR_HOST))
}

fn at(millis: i64) -> Instant {
    Instant::from_millis(millis)
}

fn packet(
    operation: arp::Operation,
    source: (EthernetAddress, Ipv4Address),
    target: (EthernetAddress, Ipv4Address),
) -> Vec<u8> {
    let repr = ArpRepr {
        operation,
        source_hardware_addr: source.0,
        source_protocol_addr: source.1,
        target_hardware_addr: target.0,
        target_protocol_addr: target.1,
    };
    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(arp::arp::new_unchecked_mut(&mut buffer));
    buffer
}

fn reply_from_other() -> Vec<u8> {
    packet(
        arp::Operation::Reply,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (MAC_ADDR_HOST, IP_ADDR_HOST))
}

fn request_from_other(target: Ipv4Address) -> Vec<u8> {
    packet(
        arp::Operation::Request,
        (MAC_ADDR_OTHER, IP_ADDR_OTHER),
        (EthernetAddress::UNSPECIFIED, target))
}

fn parse(payload: &[u8]) -> ArpRepr {
    ArpRepr::parse(arp::arp::new_checked(payload).unwrap()).unwrap()
}

fn assert_request(sent: &(Vec<u8>, EthernetAddress, EthernetProtocol), target: Ipv4Address) {
    assert_eq!(sent.1, EthernetAddress::BROADCAST);
    assert_eq!(sent.2, EthernetProtocol::Arp);
    assert_eq!(parse(&sent.0), ArpRepr {
        operation: arp::Operation::Request,
        source_hardware_addr: MAC_ADDR_HOST,
        source_protocol_addr: IP_ADDR_HOST,
        target_hardware_addr: EthernetAddress::UNSPECIFIED,
        target_protocol_addr: target,
    });
}

#[test]
fn resolve_and_flush() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    let sent = arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0));
    assert_eq!(sent, Ok(Outgoing::Queued));
    assert!(arp.has_pending(IP_ADDR_OTHER, at(0)));
    let requests = tx.take();
    assert_eq!(requests.len(), 1);
    assert_request(&requests[0], IP_ADDR_OTHER);

    let incoming = arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(100));
    assert_eq!(incoming, Ok(Incoming::Flushed));
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(100)), Some(MAC_ADDR_OTHER));
    assert!(!arp.has_pending(IP_ADDR_OTHER, at(100)));
    assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);

    // Now resolved, no further requests.
    let sent = arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(200));
    assert_eq!(sent, Ok(Outgoing::Sent));
    assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
}

#[test]
fn at_most_one_pending() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)),
        Ok(Outgoing::Queued));
    assert_eq!(
        arp.resolve_and_send(b"second".to_vec(), IP_ADDR_OTHER, &mut tx, at(500)),
        Ok(Outgoing::Suppressed));
    assert_eq!(
        arp.resolve_and_send(b"third".to_vec(), IP_ADDR_OTHER, &mut tx, at(999)),
        Ok(Outgoing::Suppressed));
    assert_eq!(tx.take().len(), 1);

    // Only the first packet is flushed.
    assert_eq!(
        arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(999)),
        Ok(Incoming::Flushed));
    assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
}

#[test]
fn retry_after_silent_time() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
    assert!(!arp.has_pending(IP_ADDR_OTHER, at(1_000)));

    assert_eq!(
        arp.resolve_and_send(b"second".to_vec(), IP_ADDR_OTHER, &mut tx, at(1_000)),
        Ok(Outgoing::Queued));
    let requests = tx.take();
    assert_eq!(requests.len(), 2);
    assert_request(&requests[1], IP_ADDR_OTHER);

    assert_eq!(
        arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(1_500)),
        Ok(Incoming::Flushed));
    assert_eq!(tx.take(), vec![(b"second".to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
}

#[test]
fn late_reply_is_learned() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
    tx.take();

    // The packet has expired, nothing to flush.
    assert_eq!(
        arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(2_000)),
        Ok(Incoming::Learned));
    assert!(tx.take().is_empty());
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(2_000)), Some(MAC_ADDR_OTHER));
}

#[test]
fn answer_request() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    let incoming = arp.handle_inbound(
        &request_from_other(IP_ADDR_HOST), MAC_ADDR_OTHER, &mut tx, at(0));
    assert_eq!(incoming, Ok(Incoming::Answered));

    let sent = tx.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, MAC_ADDR_OTHER);
    assert_eq!(sent[0].2, EthernetProtocol::Arp);
    assert_eq!(parse(&sent[0].0), ArpRepr {
        operation: arp::Operation::Reply,
        source_hardware_addr: MAC_ADDR_HOST,
        source_protocol_addr: IP_ADDR_HOST,
        target_hardware_addr: MAC_ADDR_OTHER,
        target_protocol_addr: IP_ADDR_OTHER,
    });

    // The requester is learned as well.
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(0)), Some(MAC_ADDR_OTHER));
}

#[test]
fn reply_resets_type_fields() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    // Trailing padding of a minimum size frame.
    let mut request = request_from_other(IP_ADDR_HOST);
    request.resize(46, 0);

    assert_eq!(
        arp.handle_inbound(&request, MAC_ADDR_OTHER, &mut tx, at(0)),
        Ok(Incoming::Answered));
    let sent = tx.take();
    let reply = arp::arp::new_checked(&sent[0].0).unwrap();
    assert_eq!(reply.as_bytes().len(), arp::HEADER_LEN);
    assert_eq!(reply.hardware_type(), arp::Hardware::Ethernet);
    assert_eq!(reply.protocol_type(), EthernetProtocol::Ipv4);
    assert_eq!(reply.hardware_len(), 6);
    assert_eq!(reply.protocol_len(), 4);
}

#[test]
fn ignore_request_for_other_host() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    let incoming = arp.handle_inbound(
        &request_from_other(IP_ADDR_THIRD), MAC_ADDR_OTHER, &mut tx, at(0));
    assert_eq!(incoming, Ok(Incoming::Learned));
    assert!(tx.take().is_empty());
    // Learned regardless of whom the request was for.
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(0)), Some(MAC_ADDR_OTHER));
}

#[test]
fn request_flushes_pending() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
    tx.take();

    // A request by the awaited host flushes and is not answered.
    let incoming = arp.handle_inbound(
        &request_from_other(IP_ADDR_HOST), MAC_ADDR_OTHER, &mut tx, at(10));
    assert_eq!(incoming, Ok(Incoming::Flushed));
    assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
}

#[test]
fn flush_to_sender_hardware_addr() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();
    let relay = EthernetAddress([0x02, 0, 0, 0, 0, 0xcc]);

    arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
    tx.take();

    // The frame source and the sender field disagree.
    assert_eq!(
        arp.handle_inbound(&reply_from_other(), relay, &mut tx, at(10)),
        Ok(Incoming::Flushed));
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(10)), Some(relay));
    assert_eq!(tx.take()[0].1, MAC_ADDR_OTHER);
}

#[test]
fn drop_malformed() {
    let valid = request_from_other(IP_ADDR_HOST);

    let mut cases: Vec<(Vec<u8>, ArpInvalid)> = Vec::new();
    cases.push((valid[..27].to_vec(), ArpInvalid::Truncated(27)));

    let mut bytes = valid.clone();
    bytes[1] = 6;
    cases.push((bytes, ArpInvalid::HardwareType(arp::Hardware::Unknown(6))));

    let mut bytes = valid.clone();
    bytes[2] = 0x86;
    bytes[3] = 0xdd;
    cases.push((bytes, ArpInvalid::ProtocolType(EthernetProtocol::Ipv6)));

    let mut bytes = valid.clone();
    bytes[4] = 8;
    cases.push((bytes, ArpInvalid::HardwareLen(8)));

    let mut bytes = valid.clone();
    bytes[5] = 16;
    cases.push((bytes, ArpInvalid::ProtocolLen(16)));

    let mut bytes = valid.clone();
    bytes[7] = 3;
    cases.push((bytes, ArpInvalid::Operation(arp::Operation::Unknown(3))));

    for (bytes, invalid) in cases {
        let mut arp = endpoint();
        let mut tx = Recorder::default();
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
        tx.take();

        let incoming = arp.handle_inbound(&bytes, MAC_ADDR_OTHER, &mut tx, at(10));
        assert_eq!(incoming, Ok(Incoming::Rejected(invalid)));
        assert!(tx.take().is_empty(), "sent something for {:?}", invalid);
        assert!(arp.neighbors().is_empty(), "learned from {:?}", invalid);
        assert!(arp.has_pending(IP_ADDR_OTHER, at(10)), "flushed on {:?}", invalid);
    }
}

#[test]
fn cache_expires() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();

    arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(0)).unwrap();
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(59_999)), Some(MAC_ADDR_OTHER));
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(60_000)), None);

    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(60_000)),
        Ok(Outgoing::Queued));

    // A refresh restarts the lifetime.
    arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(60_500)).unwrap();
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(120_000)), Some(MAC_ADDR_OTHER));
}

#[test]
fn custom_lifetimes() {
    let mut config = Config::new(MAC_ADDR_HOST, IP_ADDR_HOST);
    config.entry_lifetime = Duration::from_secs(5);
    config.silent_time = Duration::from_millis(100);
    let mut arp = Endpoint::new(config);
    let mut tx = Recorder::default();

    arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)).unwrap();
    assert!(!arp.has_pending(IP_ADDR_OTHER, at(100)));

    arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(0)).unwrap();
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(5_000)), None);
}

#[test]
fn unbounded_lifetime() {
    for &secs in &[u64::max_value(), u64::max_value() / 2000] {
        let mut config = Config::new(MAC_ADDR_HOST, IP_ADDR_HOST);
        config.entry_lifetime = Duration::from_secs(secs);
        let mut arp = Endpoint::new(config);
        let mut tx = Recorder::default();

        arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(0)).unwrap();
        assert_eq!(arp.lookup(IP_ADDR_OTHER, at(0)), Some(MAC_ADDR_OTHER));
        assert_eq!(arp.lookup(IP_ADDR_OTHER, at(i64::max_value() / 2)), Some(MAC_ADDR_OTHER));

        assert_eq!(
            arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(3_600_000)),
            Ok(Outgoing::Sent));
        assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
    }
}

#[test]
fn full_pending_store() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();
    let addr = |last: u8| Ipv4Address::new(10, 0, 1, last);

    for last in 0..16u8 {
        assert_eq!(
            arp.resolve_and_send(PACKET.to_vec(), addr(last), &mut tx, at(last.into())),
            Ok(Outgoing::Queued));
    }
    assert_eq!(tx.take().len(), 16);

    // No room left, the new destination is neither buffered nor requested.
    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), addr(16), &mut tx, at(16)),
        Ok(Outgoing::Suppressed));
    assert!(!arp.has_pending(addr(16), at(16)));

    // The oldest destination is still marked as being resolved.
    assert!(arp.has_pending(addr(0), at(100)));
    assert_eq!(
        arp.resolve_and_send(b"second".to_vec(), addr(0), &mut tx, at(100)),
        Ok(Outgoing::Suppressed));
    assert!(tx.take().is_empty());

    // Once the first request timed out its slot is free again.
    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), addr(16), &mut tx, at(1_000)),
        Ok(Outgoing::Queued));
    let requests = tx.take();
    assert_eq!(requests.len(), 1);
    assert_request(&requests[0], addr(16));
}

#[test]
fn transport_failure() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();
    tx.fail = Some(Error::Exhausted);

    // The request fails but the packet stays buffered.
    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(0)),
        Err(Error::Exhausted));
    assert!(arp.has_pending(IP_ADDR_OTHER, at(0)));

    // Flushing fails, the packet is gone but the mapping learned.
    assert_eq!(
        arp.handle_inbound(&reply_from_other(), MAC_ADDR_OTHER, &mut tx, at(10)),
        Err(Error::Exhausted));
    assert!(!arp.has_pending(IP_ADDR_OTHER, at(10)));
    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(10)), Some(MAC_ADDR_OTHER));

    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, &mut tx, at(20)),
        Err(Error::Exhausted));

    assert_eq!(
        arp.handle_inbound(&request_from_other(IP_ADDR_HOST), MAC_ADDR_OTHER, &mut tx, at(30)),
        Err(Error::Exhausted));
    assert!(tx.take().is_empty());
}

#[test]
fn announce_self() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();
    arp.cache_mut().update(IP_ADDR_HOST, MAC_ADDR_HOST, at(0));

    assert_eq!(arp.announce(&mut tx, at(0)), Ok(()));
    assert_eq!(arp.announce(&mut tx, at(1)), Ok(()));
    let sent = tx.take();
    assert_eq!(sent.len(), 2);
    assert_request(&sent[0], IP_ADDR_HOST);
    assert_request(&sent[1], IP_ADDR_HOST);
    // Announcing does not hold anything back.
    assert!(!arp.has_pending(IP_ADDR_HOST, at(1)));
}

#[test]
fn static_entry() {
    let mut arp = endpoint();
    let mut tx = Recorder::default();
    arp.cache_mut().update(IP_ADDR_THIRD, MAC_ADDR_OTHER, at(0));

    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_THIRD, &mut tx, at(10)),
        Ok(Outgoing::Sent));
    assert_eq!(tx.take(), vec![(PACKET.to_vec(), MAC_ADDR_OTHER, EthernetProtocol::Ipv4)]);
}

#[test]
fn table_dump() {
    let mut arp = endpoint();
    arp.cache_mut().update(IP_ADDR_THIRD, MAC_ADDR_HOST, at(1_000));
    arp.cache_mut().update(IP_ADDR_OTHER, MAC_ADDR_OTHER, at(2_500));

    let dump = arp.table(at(3_000)).to_string();
    assert_eq!(dump, "\
===ARP TABLE BEGIN===
10.0.0.2 | 02:00:00:00:00:bb | 2.500s
10.0.0.3 | 02:00:00:00:00:aa | 1.000s
===ARP TABLE  END ===
");

    // Expired entries are not shown.
    let dump = arp.table(at(61_000)).to_string();
    assert_eq!(dump, "\
===ARP TABLE BEGIN===
10.0.0.2 | 02:00:00:00:00:bb | 2.500s
===ARP TABLE  END ===
");
}

#[test]
fn through_ethernet() {
    let mut eth = eth::Endpoint::new(MAC_ADDR_HOST, External::new());
    let mut arp = endpoint();

    {
        // Initialize the request.
        let payload = request_from_other(IP_ADDR_HOST);
        let mut buffer = vec![0; ethernet::ethernet::buffer_len(payload.len())];
        let frame = ethernet::ethernet::new_unchecked_mut(&mut buffer);
        ethernet::Repr {
            src_addr: MAC_ADDR_OTHER,
            dst_addr: EthernetAddress::BROADCAST,
            ethertype: ethernet::EtherType::Arp,
        }.emit(frame);
        frame.payload_mut_slice()[..payload.len()].copy_from_slice(&payload);
        eth.nic_mut().inject(buffer);
    }

    {
        let mut protocols = eth::Protocols::new().with(EthernetProtocol::Arp, &mut arp);
        assert_eq!(eth.poll(&mut protocols, at(0)), Ok(true));
        assert_eq!(eth.poll(&mut protocols, at(0)), Ok(false));
    }

    let sent = eth.nic_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let frame = ethernet::ethernet::new_checked(&sent[0]).unwrap();
    assert_eq!(frame.dst_addr(), MAC_ADDR_OTHER);
    assert_eq!(frame.src_addr(), MAC_ADDR_HOST);
    assert_eq!(frame.ethertype(), ethernet::EtherType::Arp);

    let reply = arp::arp::new_checked(frame.payload_slice()).unwrap();
    assert_eq!(reply.operation(), arp::Operation::Reply);
    assert_eq!(reply.source_hardware_addr(), MAC_ADDR_HOST);
    assert_eq!(reply.source_protocol_addr(), IP_ADDR_HOST);
    assert_eq!(reply.target_hardware_addr(), MAC_ADDR_OTHER);
    assert_eq!(reply.target_protocol_addr(), IP_ADDR_OTHER);

    assert_eq!(arp.lookup(IP_ADDR_OTHER, at(0)), Some(MAC_ADDR_OTHER));

    // Resolved packets are framed as IPv4.
    assert_eq!(
        arp.resolve_and_send(PACKET.to_vec(), IP_ADDR_OTHER, eth.transport(), at(1)),
        Ok(Outgoing::Sent));
    let sent = eth.nic_mut().take_sent();
    let frame = ethernet::ethernet::new_checked(&sent[0]).unwrap();
    assert_eq!(frame.ethertype(), ethernet::EtherType::Ipv4);
    assert_eq!(&frame.payload_slice()[..PACKET.len()], PACKET);
}
