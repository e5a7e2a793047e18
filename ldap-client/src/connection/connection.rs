//! Multiplexed LDAP connection and the write operations
//!
//! # Architecture
//!
//! The connection layer stacks three pieces:
//! - **Transport Layer**: any [`TransportLayer`], split into frame halves
//! - **Dispatcher**: message ids, pending table and the reader task
//! - **Operations**: Add, Delete, Modify and ModifyDN share one request template
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ldap_client::{AddRequest, ConnectionBuilder};
//!
//! # async fn demo() -> ldap_core::LdapResult<()> {
//! let conn = ConnectionBuilder::new().tcp("127.0.0.1:389").connect().await?;
//!
//! let add = AddRequest::new("cn=test,cn=raft").add("objectClass", ["raftGeneralObject"]);
//! conn.add(&add).await?;
//!
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

use super::dispatcher::Dispatcher;
use super::state::ConnectionState;
use crate::observer::PacketObserver;
use crate::protocol::{
    application_tag_name, AddRequest, DeleteRequest, LdapMessage, LdapResultEnvelope,
    ModifyDnRequest, ModifyRequest, WriteOperation, WriteResponse,
};
use ldap_asn1::BerTagClass;
use ldap_core::LdapResult;
use ldap_transport::TransportLayer;
use std::sync::Arc;

/// One connection shared by any number of concurrent requests
///
/// All operations take `&self`; share the connection between tasks with an
/// `Arc`.
pub struct LdapConnection {
    dispatcher: Dispatcher,
}

impl LdapConnection {
    /// Build a connection on top of a transport
    ///
    /// The transport is opened first if needed, then split; the reader task
    /// starts immediately.
    pub async fn from_transport(
        mut transport: Box<dyn TransportLayer>,
        observer: Arc<dyn PacketObserver>,
    ) -> LdapResult<Self> {
        if !transport.is_open() {
            transport.open().await?;
        }
        let (reader, writer) = transport.into_split()?;
        Ok(Self {
            dispatcher: Dispatcher::start(reader, writer, observer),
        })
    }

    /// Create a new entry
    pub async fn add(&self, request: &AddRequest) -> LdapResult<WriteResponse> {
        self.execute(request).await
    }

    /// Remove a leaf entry
    pub async fn delete(&self, request: &DeleteRequest) -> LdapResult<WriteResponse> {
        self.execute(request).await
    }

    /// Change attributes of an entry
    pub async fn modify(&self, request: &ModifyRequest) -> LdapResult<WriteResponse> {
        self.execute(request).await
    }

    /// Rename and optionally move an entry
    pub async fn modify_dn(&self, request: &ModifyDnRequest) -> LdapResult<WriteResponse> {
        self.execute(request).await
    }

    /// Run one write operation through the request template
    ///
    /// # Errors
    /// - `InvalidData` if the request fails validation (nothing is sent)
    /// - `Network` if the connection is closed or closes before the response
    /// - `Asn1Decoding` if the response has no readable result envelope;
    ///   malformed response controls are logged and dropped
    /// - `Protocol` if the server answers with a non-zero result code
    pub async fn execute<O: WriteOperation>(&self, operation: &O) -> LdapResult<WriteResponse> {
        operation.validate()?;

        let mut request = self.dispatcher.allocate_request()?;
        let message_id = request.message_id();
        let message = LdapMessage::new(message_id, operation.encode_operation())
            .with_controls(operation.controls().to_vec());

        log::debug!("{}: sending {} request for {}", message_id, operation.name(), operation.dn());
        self.dispatcher.send(&message).await?;

        log::debug!("{}: waiting for response", message_id);
        let packet = self.dispatcher.await_response(&mut request).await?;
        log::debug!("{}: got response", message_id);

        let response = LdapMessage::operation_of(&packet)?;
        let tag = response.tag();
        if !tag.matches(BerTagClass::Application, operation.response_tag()) {
            log::warn!(
                "{}: unexpected response to {}: {:?} {} ({})",
                message_id,
                operation.name(),
                tag.class(),
                tag.number(),
                application_tag_name(tag.number())
            );
        }

        LdapResultEnvelope::decode(response)?.into_result()?;

        let controls = LdapMessage::controls_of(&packet).unwrap_or_else(|e| {
            log::warn!("{}: ignoring undecodable response controls: {}", message_id, e);
            Vec::new()
        });

        log::debug!("{}: returning", message_id);
        Ok(WriteResponse { controls })
    }

    /// Close the connection, failing every pending request
    pub async fn close(&self) -> LdapResult<()> {
        self.dispatcher.close().await
    }

    pub fn state(&self) -> ConnectionState {
        self.dispatcher.state()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Number of requests waiting for a response
    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{LogObserver, NoopObserver};
    use crate::protocol::{
        Control, APPLICATION_ADD_RESPONSE, APPLICATION_DEL_RESPONSE, APPLICATION_MODIFY_DN_REQUEST,
        APPLICATION_MODIFY_DN_RESPONSE, APPLICATION_MODIFY_RESPONSE,
    };
    use crate::test_server::pipe;
    use ldap_asn1::{BerTag, Packet};
    use ldap_core::LdapError;

    async fn connect() -> (LdapConnection, crate::test_server::FakeServer) {
        let (transport, server) = pipe();
        let conn = LdapConnection::from_transport(transport, Arc::new(NoopObserver))
            .await
            .unwrap();
        (conn, server)
    }

    #[tokio::test]
    async fn test_add_success() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let add = AddRequest::decode(&request.operation).unwrap();
            assert_eq!(add.dn, "cn=x,dc=ex");
            assert_eq!(add.attributes[0].attr_type, "cn");
            server
                .reply(
                    request.message_id,
                    APPLICATION_ADD_RESPONSE,
                    LdapResultEnvelope::success(),
                    vec![],
                )
                .await;
            server
        });

        let response = conn
            .add(&AddRequest::new("cn=x,dc=ex").add("cn", ["x"]))
            .await
            .unwrap();
        assert!(response.controls.is_empty());
        assert_eq!(conn.pending_requests(), 0);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_add_no_such_object() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            server
                .reply(
                    request.message_id,
                    APPLICATION_ADD_RESPONSE,
                    LdapResultEnvelope::new(32, "dc=ex", "no such parent"),
                    vec![],
                )
                .await;
            server
        });

        let err = conn
            .add(&AddRequest::new("cn=x,ou=missing,dc=ex").add("cn", ["x"]))
            .await
            .unwrap_err();
        assert_eq!(err.result_code(), 32);
        assert_eq!(err.matched_dn(), Some("dc=ex"));
        assert!(err.to_string().contains("no such parent"));
        assert_eq!(conn.pending_requests(), 0);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_requests_answered_out_of_order() {
        const REQUESTS: usize = 8;
        let (conn, mut server) = connect().await;
        let conn = Arc::new(conn);

        let server_task = tokio::spawn(async move {
            let mut received = Vec::new();
            for _ in 0..REQUESTS {
                received.push(server.recv().await.unwrap());
            }
            for request in received.into_iter().rev() {
                let dn = DeleteRequest::decode(&request.operation).unwrap().dn;
                server
                    .reply(
                        request.message_id,
                        APPLICATION_DEL_RESPONSE,
                        LdapResultEnvelope::new(32, "", dn),
                        vec![],
                    )
                    .await;
            }
            server
        });

        let mut callers = Vec::new();
        for i in 0..REQUESTS {
            let conn = Arc::clone(&conn);
            callers.push(tokio::spawn(async move {
                let dn = format!("cn=entry{},dc=ex", i);
                let err = conn.delete(&DeleteRequest::new(dn.clone())).await.unwrap_err();
                match err {
                    LdapError::Protocol { message, .. } => assert_eq!(message, dn),
                    other => panic!("unexpected error: {:?}", other),
                }
            }));
        }
        for caller in callers {
            caller.await.unwrap();
        }
        assert_eq!(conn.pending_requests(), 0);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_dn_is_rejected_before_sending() {
        let (conn, mut server) = connect().await;

        let err = conn.delete(&DeleteRequest::new("")).await.unwrap_err();
        assert!(matches!(err, LdapError::InvalidData(_)));
        assert!(!err.is_network());
        assert_eq!(err.result_code(), ldap_core::RESULT_CODE_INVALID_REQUEST);
        assert_eq!(conn.pending_requests(), 0);

        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let first = DeleteRequest::decode(&request.operation).unwrap();
            server
                .reply(
                    request.message_id,
                    APPLICATION_DEL_RESPONSE,
                    LdapResultEnvelope::success(),
                    vec![],
                )
                .await;
            first.dn
        });
        conn.delete(&DeleteRequest::new("cn=real")).await.unwrap();
        assert_eq!(handle.await.unwrap(), "cn=real");
    }

    #[tokio::test]
    async fn test_modify_dn_with_new_superior_and_controls() {
        let (transport, mut server) = pipe();
        let conn = LdapConnection::from_transport(transport, Arc::new(LogObserver))
            .await
            .unwrap();

        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            assert_eq!(request.operation_tag(), APPLICATION_MODIFY_DN_REQUEST);
            assert_eq!(request.operation.children().len(), 4);
            assert_eq!(request.controls, vec![Control::new("1.3.6.1.1.13.2").critical(true)]);
            server
                .reply(
                    request.message_id,
                    APPLICATION_MODIFY_DN_RESPONSE,
                    LdapResultEnvelope::success(),
                    vec![Control::new("1.3.6.1.1.13.2").with_value(vec![0x30u8, 0x00])],
                )
                .await;
            server
        });

        let request = ModifyDnRequest::new("cn=a,dc=x", "cn=b", true)
            .new_superior("dc=y")
            .with_control(Control::new("1.3.6.1.1.13.2").critical(true));
        let response = conn.modify_dn(&request).await.unwrap();
        assert_eq!(response.controls.len(), 1);
        assert_eq!(response.controls[0].value.as_deref(), Some(&[0x30, 0x00][..]));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_unexpected_response_tag_still_decodes_result() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            server
                .reply(
                    request.message_id,
                    APPLICATION_MODIFY_RESPONSE,
                    LdapResultEnvelope::new(50, "", "insufficient access"),
                    vec![],
                )
                .await;
            server
        });

        let err = conn.delete(&DeleteRequest::new("cn=x")).await.unwrap_err();
        assert_eq!(err.result_code(), 50);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_modify_success_then_close() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let modify = ModifyRequest::decode(&request.operation).unwrap();
            assert_eq!(modify.changes.len(), 2);
            server
                .reply(
                    request.message_id,
                    APPLICATION_MODIFY_RESPONSE,
                    LdapResultEnvelope::success(),
                    vec![],
                )
                .await;
            server
        });

        let request = ModifyRequest::new("cn=test,cn=raft")
            .replace("term", ["101"])
            .delete("vote", Vec::<String>::new());
        conn.modify(&request).await.unwrap();
        let _server = handle.await.unwrap();

        conn.close().await.unwrap();
        assert!(!conn.is_open());
        let err = conn.modify(&request).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_close_while_waiting_fails_request() {
        let (conn, mut server) = connect().await;
        let conn = Arc::new(conn);

        let waiting = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.delete(&DeleteRequest::new("cn=x")).await })
        };
        // Once the server sees the request, it is registered and in flight
        server.recv().await.unwrap();
        conn.close().await.unwrap();

        let err = waiting.await.unwrap().unwrap_err();
        assert!(matches!(err, LdapError::Network(_)));
        assert_eq!(conn.pending_requests(), 0);
    }

    fn reply_with_bad_controls(message_id: i32, result: LdapResultEnvelope) -> Vec<u8> {
        Packet::sequence(vec![
            Packet::integer(message_id as i64),
            result.encode(APPLICATION_DEL_RESPONSE),
            Packet::constructed(
                BerTag::context_specific(true, 0),
                vec![Packet::sequence(vec![Packet::octet_string([0xFFu8, 0xFE])])],
            ),
        ])
        .encode()
    }

    #[tokio::test]
    async fn test_bad_response_controls_keep_result_code() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let reply = reply_with_bad_controls(
                request.message_id,
                LdapResultEnvelope::new(32, "dc=ex", "no such object"),
            );
            server.send_raw(&reply).await;
            server
        });

        let err = conn.delete(&DeleteRequest::new("cn=x,dc=ex")).await.unwrap_err();
        match err {
            LdapError::Protocol {
                code,
                ref message,
                ref matched_dn,
            } => {
                assert_eq!(code, 32);
                assert_eq!(message, "no such object");
                assert_eq!(matched_dn, "dc=ex");
            }
            _ => panic!("unexpected error: {:?}", err),
        }
        assert!(conn.is_open());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_response_controls_on_success_are_dropped() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let reply = reply_with_bad_controls(request.message_id, LdapResultEnvelope::success());
            server.send_raw(&reply).await;
            server
        });

        let response = conn.delete(&DeleteRequest::new("cn=x,dc=ex")).await.unwrap();
        assert!(response.controls.is_empty());
        assert_eq!(conn.pending_requests(), 0);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_utf8_diagnostic_keeps_result_code() {
        let (conn, mut server) = connect().await;
        let handle = tokio::spawn(async move {
            let request = server.recv().await.unwrap();
            let reply = LdapMessage::new(
                request.message_id,
                Packet::constructed(
                    BerTag::application(true, APPLICATION_DEL_RESPONSE),
                    vec![
                        Packet::enumerated(66),
                        Packet::octet_string(""),
                        Packet::octet_string([0xC3u8, 0x28]),
                    ],
                ),
            );
            server.send_raw(&reply.encode().encode()).await;
            server
        });

        let err = conn.delete(&DeleteRequest::new("cn=x,dc=ex")).await.unwrap_err();
        assert_eq!(err.result_code(), 66);
        handle.await.unwrap();
    }
}
