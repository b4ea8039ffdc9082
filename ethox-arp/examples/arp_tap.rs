//! Resolves and answers arp on a tap interface.
//!
//! # Usage
//!
//! The example will try to open a tap as a network device, announce its own address and then
//! answer all incoming arp requests for it. Optionally it sends one empty datagram to another
//! address on the link, resolving it first.
//! The table of learned neighbors is printed periodically.
//!
//! The following steps are necessary to set the example up (likey requires root or sudo):
//!
//! 1. Setup the tap interface, named `tap0` here:
//!
//!   > $ ip tuntap add mode tap name tap0
//! 2. Assign an address on the host system
//!
//!   > $ ip addr add 10.0.0.2/24 dev tap0
//! 3. Bring up the interface on the host
//!
//!   > $ ip link set up dev tap0
//! 4. You no longer require root. Start the arp_tap example, resolving the host.
//!
//!   > $ RUST_LOG=trace cargo run --example arp_tap -- tap0 10.0.0.1 ab:ff:ff:ff:ff:ff --query 10.0.0.2
//! 5. Look at the entry of the example from the host.
//!
//!   > $ arping -I tap0 10.0.0.1
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use structopt::StructOpt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ethox_arp::layer::{arp, eth};
use ethox_arp::nic::{sys_now, sys_wait, TapInterface};
use ethox_arp::time::Instant;
use ethox_arp::wire::{EthernetAddress, EthernetProtocol, Ipv4Address};

const TABLE_INTERVAL: Duration = Duration::from_secs(10);
const POLL_WAIT: Duration = Duration::from_millis(100);

fn main() {
    let Config {
        name,
        host,
        hostmac,
        query,
        lifetime,
        verbose,
    } = Config::from_args();

    let fallback = if verbose { "trace" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .ok();

    let interface = TapInterface::new(&name)
        .expect("Couldn't initialize interface");
    let mut eth = eth::Endpoint::new(hostmac, interface);

    let mut config = arp::Config::new(hostmac, host);
    config.entry_lifetime = Duration::from_secs(lifetime);
    let mut arp = arp::Endpoint::new(config);

    let now = sys_now().expect("No monotonic clock");
    if let Err(err) = arp.announce(eth.transport(), now) {
        log::warn!("Failed to announce {}: {}", host, err);
    }

    let mut resolving = query;
    let mut last_table = now;

    loop {
        let now = sys_now().expect("No monotonic clock");

        if let Some(target) = resolving {
            if resolve(&mut arp, &mut eth, target, now) {
                resolving = None;
            }
        }

        let received = {
            let mut protocols = eth::Protocols::new()
                .with(EthernetProtocol::Arp, &mut arp);
            eth.poll(&mut protocols, now)
        };

        match received {
            Ok(true) => continue,
            Ok(false) => (),
            Err(err) => log::warn!("Error during receive {} {:?}", err, eth.nic_mut().last_err()),
        }

        if now - last_table >= TABLE_INTERVAL {
            print!("{}", arp.table(now));
            last_table = now;
        }

        if let Err(err) = sys_wait(eth.nic().as_raw_fd(), Some(POLL_WAIT)) {
            log::warn!("Waiting on the interface failed: {}", err);
        }
    }
}

/// Send a datagram to the target, returns `true` once it is resolved.
///
/// While unresolved the datagram waits in the arp endpoint and leaves as soon as the reply has
/// been received. Further calls are suppressed until the request times out and is repeated.
fn resolve(
    arp: &mut arp::Endpoint,
    eth: &mut eth::Endpoint<TapInterface>,
    target: Ipv4Address,
    now: Instant,
) -> bool {
    if let Some(hwaddr) = arp.lookup(target, now) {
        println!("{} is at {}", target, hwaddr);
        return true;
    }

    let datagram = datagram(arp.protocol_addr(), target);
    match arp.resolve_and_send(datagram, target, eth.transport(), now) {
        Ok(arp::Outgoing::Queued) => log::info!("Resolving {}", target),
        Ok(_) => (),
        Err(err) => log::warn!("Failed to send to {}: {}", target, err),
    }

    false
}

/// A bare IPv4 header without payload, the checksum is left empty.
fn datagram(src: Ipv4Address, dst: Ipv4Address) -> Vec<u8> {
    let mut header = vec![0x45, 0, 0, 20, 0, 0, 0x40, 0, 64, 253, 0, 0];
    header.extend_from_slice(&src.0);
    header.extend_from_slice(&dst.0);
    header
}

#[derive(StructOpt)]
struct Config {
    /// Name of the tap interface.
    name: String,
    /// Our own IPv4 address.
    host: Ipv4Address,
    /// Our own hardware address.
    hostmac: EthernetAddress,
    /// Resolve this address and send it an empty datagram.
    #[structopt(long = "query")]
    query: Option<Ipv4Address>,
    /// Lifetime of learned mappings, in seconds.
    #[structopt(long = "lifetime", default_value = "60")]
    lifetime: u64,
    /// Log everything unless RUST_LOG is set.
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}
