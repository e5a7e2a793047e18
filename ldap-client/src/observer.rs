//! Packet observers
//!
//! An observer sees every envelope the connection sends and every envelope it
//! receives, as decoded trees. Observers run on the sending task and on the
//! reader task respectively, so they must not block.

use ldap_asn1::Packet;

/// Receives a copy of every packet crossing the connection
pub trait PacketObserver: Send + Sync {
    fn on_packet_sent(&self, _packet: &Packet) {}

    fn on_packet_received(&self, _packet: &Packet) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PacketObserver for NoopObserver {}

/// Observer that writes one `trace` line per packet
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PacketObserver for LogObserver {
    fn on_packet_sent(&self, packet: &Packet) {
        log::trace!("--> {}", packet);
    }

    fn on_packet_received(&self, packet: &Packet) {
        log::trace!("<-- {}", packet);
    }
}
