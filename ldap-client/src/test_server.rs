//! In-process directory server used by the connection tests

use crate::protocol::{Control, LdapMessage, LdapResultEnvelope, MessageId};
use ldap_asn1::Packet;
use ldap_transport::{
    BerFrameReader, BerFrameWriter, FrameReader, FrameWriter, StreamTransport, TransportLayer,
};
use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

/// Server end of an in-memory pipe
pub(crate) struct FakeServer {
    reader: BerFrameReader<ReadHalf<DuplexStream>>,
    writer: BerFrameWriter<WriteHalf<DuplexStream>>,
}

/// Client transport connected to a fresh fake server
pub(crate) fn pipe() -> (Box<dyn TransportLayer>, FakeServer) {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (read_half, write_half) = tokio::io::split(server);
    (
        Box::new(StreamTransport::new(client)),
        FakeServer {
            reader: BerFrameReader::new(read_half),
            writer: BerFrameWriter::new(write_half),
        },
    )
}

impl FakeServer {
    /// Next request envelope, or `None` once the client has gone
    pub(crate) async fn recv(&mut self) -> Option<LdapMessage> {
        let frame = self.reader.read_frame().await.ok()??;
        let packet = Packet::from_bytes(&frame).ok()?;
        LdapMessage::decode(&packet).ok()
    }

    pub(crate) async fn reply(
        &mut self,
        message_id: MessageId,
        response_tag: u32,
        result: LdapResultEnvelope,
        controls: Vec<Control>,
    ) {
        let message =
            LdapMessage::new(message_id, result.encode(response_tag)).with_controls(controls);
        self.send_raw(&message.encode().encode()).await;
    }

    pub(crate) async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_frame(bytes).await.unwrap();
    }
}
