use alloc::vec::Vec;

use crate::layer::{Error, Result};
use crate::nic::Device;
use crate::time::Instant;
use crate::wire::{ethernet_frame, EthernetAddress, EthernetProtocol, EthernetRepr};
use crate::wire::ethernet::MAX_PAYLOAD_LEN;

use super::{InPacket, Protocols, Transport};

/// The ethernet state of one device.
///
/// Owns the device and a receive buffer large enough for any frame of standard size.
pub struct Endpoint<D> {
    sender: Sender<D>,

    /// Holds the frame currently being dispatched.
    buffer: Vec<u8>,
}

/// The sending half of an endpoint.
///
/// Frames every payload and hands it to the device immediately.
pub struct Sender<D> {
    nic: D,

    /// Our own address.
    ///
    /// Used as the source of all frames.
    addr: EthernetAddress,

    /// Reused for assembling outgoing frames.
    frame: Vec<u8>,
}

impl<D: Device> Endpoint<D> {
    /// Wrap a device, sending with `addr` as source.
    pub fn new(addr: EthernetAddress, nic: D) -> Self {
        Endpoint {
            sender: Sender {
                nic,
                addr,
                frame: Vec::new(),
            },
            buffer: alloc::vec![0; ethernet_frame::header_len() + MAX_PAYLOAD_LEN],
        }
    }

    /// The hardware address of this endpoint.
    pub fn src_addr(&self) -> EthernetAddress {
        self.sender.addr
    }

    /// Get the underlying device.
    pub fn nic(&self) -> &D {
        &self.sender.nic
    }

    /// Get the underlying device mutably.
    pub fn nic_mut(&mut self) -> &mut D {
        &mut self.sender.nic
    }

    /// Access the transport, to send payloads outside of a poll.
    pub fn transport(&mut self) -> &mut Sender<D> {
        &mut self.sender
    }

    /// Receive at most one frame and dispatch it.
    ///
    /// Returns `Ok(true)` if the device had a frame, regardless of whether any receiver was
    /// interested in it. Errors are those of the device or of the transport while a receiver
    /// was answering.
    pub fn poll(&mut self, protocols: &mut Protocols, now: Instant) -> Result<bool> {
        let len = match self.sender.nic.rx(&mut self.buffer)? {
            Some(len) => len,
            None => return Ok(false),
        };

        let frame = match ethernet_frame::new_checked(&self.buffer[..len]) {
            Ok(frame) => frame,
            Err(err) => {
                net_debug!("eth: dropped frame of {} bytes: {}", len, err);
                return Ok(true);
            },
        };

        let repr = EthernetRepr::parse(frame)?;
        let packet = InPacket {
            src_addr: repr.src_addr,
            dst_addr: repr.dst_addr,
            ethertype: repr.ethertype,
            payload: frame.payload_slice(),
            timestamp: now,
        };

        if !protocols.dispatch(packet, &mut self.sender)? {
            net_trace!("eth: no receiver for {}", repr);
        }

        Ok(true)
    }
}

impl<D: Device> Transport for Sender<D> {
    fn src_addr(&self) -> EthernetAddress {
        self.addr
    }

    fn send(&mut self, payload: &[u8], dst_addr: EthernetAddress, ethertype: EthernetProtocol)
        -> Result<()>
    {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::BadSize);
        }

        self.frame.clear();
        self.frame.resize(ethernet_frame::buffer_len(payload.len()), 0);

        let repr = EthernetRepr {
            src_addr: self.addr,
            dst_addr,
            ethertype,
        };

        let frame = ethernet_frame::new_unchecked_mut(&mut self.frame);
        repr.emit(frame);
        frame.payload_mut_slice()[..payload.len()].copy_from_slice(payload);

        match self.nic.tx(&self.frame) {
            Ok(()) => Ok(()),
            Err(err) => {
                net_warn!("eth: failed to send {}: {}", repr, err);
                Err(err)
            },
        }
    }
}
