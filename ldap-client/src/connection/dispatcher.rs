//! Message dispatcher for one multiplexed connection
//!
//! Many requests share one transport. Each request owns a message id and a
//! single-use delivery slot in the pending table; one reader task routes every
//! incoming envelope to the slot registered under its id.
//!
//! # Locking
//! - The pending table and the id counter sit behind one `std::sync::Mutex`
//!   that is never held across an `.await`.
//! - The writer sits behind a `tokio::sync::Mutex` so that concurrent sends
//!   never interleave bytes.
//!
//! # Shutdown
//! A read error, an undecodable message, end of stream or [`Dispatcher::close`]
//! all run the same path: the state moves to `Closing`, every pending slot is
//! woken once with a network error, the table is emptied and the state moves
//! to `Closed`.

use super::state::ConnectionState;
use crate::observer::PacketObserver;
use crate::protocol::{LdapMessage, MessageId};
use ldap_asn1::Packet;
use ldap_core::{LdapError, LdapResult};
use ldap_transport::{FrameReader, FrameWriter};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type ResponseSender = oneshot::Sender<LdapResult<Packet>>;
type ResponseReceiver = oneshot::Receiver<LdapResult<Packet>>;

/// First id handed out; 0 is never used for requests
const FIRST_MESSAGE_ID: MessageId = 1;

struct Slot {
    generation: u64,
    sender: ResponseSender,
}

struct Table {
    state: ConnectionState,
    next_id: MessageId,
    next_generation: u64,
    pending: HashMap<MessageId, Slot>,
}

impl Table {
    fn new() -> Self {
        Self {
            state: ConnectionState::Open,
            next_id: FIRST_MESSAGE_ID,
            next_generation: 0,
            pending: HashMap::new(),
        }
    }

    fn set_state(&mut self, new_state: ConnectionState) -> LdapResult<()> {
        self.state.validate_transition(new_state)?;
        log::debug!("Connection state {} -> {}", self.state, new_state);
        self.state = new_state;
        Ok(())
    }

    /// Next free id in `1..=i32::MAX`, wrapping to 1 and skipping pending ids
    fn take_next_id(&mut self) -> LdapResult<MessageId> {
        if self.pending.len() >= MessageId::MAX as usize {
            return Err(LdapError::Network(
                "No free message id: too many requests in flight".to_string(),
            ));
        }
        loop {
            let id = self.next_id;
            self.next_id = if id == MessageId::MAX {
                FIRST_MESSAGE_ID
            } else {
                id + 1
            };
            if !self.pending.contains_key(&id) {
                return Ok(id);
            }
        }
    }
}

/// State shared between callers and the reader task
struct Shared {
    table: Mutex<Table>,
    observer: Arc<dyn PacketObserver>,
}

impl Shared {
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Remove a slot if it still belongs to the given allocation
    fn release(&self, message_id: MessageId, generation: u64) {
        let mut table = self.table();
        if table
            .pending
            .get(&message_id)
            .is_some_and(|slot| slot.generation == generation)
        {
            table.pending.remove(&message_id);
        }
    }

    /// Route a received envelope to its slot
    fn deliver(&self, packet: Packet) -> LdapResult<()> {
        self.observer.on_packet_received(&packet);
        let message_id = LdapMessage::message_id_of(&packet)?;

        let slot = self.table().pending.remove(&message_id);
        match slot {
            Some(slot) => {
                if slot.sender.send(Ok(packet)).is_err() {
                    log::debug!("{}: requester went away before the response", message_id);
                }
            }
            None => {
                log::warn!("Dropping response for unknown message id {}", message_id);
            }
        }
        Ok(())
    }

    /// Fail every pending request and close the table
    ///
    /// Returns `false` if the table was already closed.
    fn shutdown(&self, reason: &str) -> bool {
        let mut table = self.table();
        if table.state == ConnectionState::Closed {
            return false;
        }
        if let Err(e) = table.set_state(ConnectionState::Closing) {
            log::error!("{}", e);
        }

        let pending = std::mem::take(&mut table.pending);
        if !pending.is_empty() {
            log::info!(
                "Failing {} pending request(s): {}",
                pending.len(),
                reason
            );
        }
        for (message_id, slot) in pending {
            let _ = slot.sender.send(Err(LdapError::Network(format!(
                "Connection closed before response to message {}: {}",
                message_id, reason
            ))));
        }

        if let Err(e) = table.set_state(ConnectionState::Closed) {
            log::error!("{}", e);
        }
        true
    }
}

/// A request's claim on a message id and its delivery slot
///
/// Dropping it releases the slot if it is still registered, so every exit
/// path of a request cleans up.
pub struct PendingRequest {
    message_id: MessageId,
    generation: u64,
    receiver: Option<ResponseReceiver>,
    shared: Arc<Shared>,
}

impl PendingRequest {
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.shared.release(self.message_id, self.generation);
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("message_id", &self.message_id)
            .field("answered", &self.receiver.is_none())
            .finish()
    }
}

/// Multiplexes requests over one split transport
pub struct Dispatcher {
    shared: Arc<Shared>,
    writer: tokio::sync::Mutex<Box<dyn FrameWriter>>,
    reader_task: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Start dispatching over the given transport halves
    ///
    /// Spawns the reader task, so it must be called inside a Tokio runtime.
    pub fn start(
        reader: Box<dyn FrameReader>,
        writer: Box<dyn FrameWriter>,
        observer: Arc<dyn PacketObserver>,
    ) -> Self {
        let shared = Arc::new(Shared {
            table: Mutex::new(Table::new()),
            observer,
        });
        let reader_task = tokio::spawn(read_loop(Arc::clone(&shared), reader));
        Self {
            shared,
            writer: tokio::sync::Mutex::new(writer),
            reader_task: Mutex::new(Some(reader_task)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.table().state
    }

    /// Number of requests waiting for a response
    pub fn pending_count(&self) -> usize {
        self.shared.table().pending.len()
    }

    /// Claim a fresh message id and register its delivery slot
    ///
    /// # Errors
    /// Returns a network error if the connection is not open.
    pub fn allocate_request(&self) -> LdapResult<PendingRequest> {
        let mut table = self.shared.table();
        if !table.state.is_open() {
            return Err(LdapError::Network(format!(
                "Connection is not open ({})",
                table.state
            )));
        }

        let message_id = table.take_next_id()?;
        let generation = table.next_generation;
        table.next_generation += 1;

        let (sender, receiver) = oneshot::channel();
        table.pending.insert(message_id, Slot { generation, sender });

        Ok(PendingRequest {
            message_id,
            generation,
            receiver: Some(receiver),
            shared: Arc::clone(&self.shared),
        })
    }

    /// Encode and write one envelope
    ///
    /// On failure the slot stays registered; the caller's guard releases it.
    pub async fn send(&self, message: &LdapMessage) -> LdapResult<()> {
        if !self.state().is_open() {
            return Err(LdapError::Network(format!(
                "Could not send message {}: connection is not open",
                message.message_id
            )));
        }

        let packet = message.encode();
        self.shared.observer.on_packet_sent(&packet);
        let bytes = packet.encode();

        let mut writer = self.writer.lock().await;
        writer.write_frame(&bytes).await.map_err(|e| {
            LdapError::Network(format!(
                "Could not send message {}: {}",
                message.message_id, e
            ))
        })
    }

    /// Wait until the response for `request` arrives or the connection shuts down
    pub async fn await_response(&self, request: &mut PendingRequest) -> LdapResult<Packet> {
        let receiver = request.receiver.take().ok_or_else(|| {
            LdapError::Network(format!(
                "Response to message {} was already taken",
                request.message_id
            ))
        })?;
        match receiver.await {
            Ok(result) => result,
            Err(_) => Err(LdapError::Network(format!(
                "Could not retrieve response to message {}",
                request.message_id
            ))),
        }
    }

    /// Remove the slot of `request` if it is still registered
    ///
    /// Safe to call more than once; dropping the request does the same.
    pub fn release_request(&self, request: &PendingRequest) {
        self.shared.release(request.message_id, request.generation);
    }

    /// Fail all pending requests, stop the reader and shut the writer down
    ///
    /// Calling it again is a no-op apart from the writer shutdown, which is
    /// itself idempotent.
    pub async fn close(&self) -> LdapResult<()> {
        if self.shared.shutdown("connection closed by client") {
            log::info!("Closing connection");
        }
        let reader_task = self
            .reader_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(task) = reader_task {
            task.abort();
        }
        self.writer.lock().await.close().await
    }

    #[cfg(test)]
    fn set_next_id(&self, next_id: MessageId) {
        self.shared.table().next_id = next_id;
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shared.shutdown("connection dropped");
        if let Some(task) = self
            .reader_task
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            task.abort();
        }
    }
}

async fn read_loop(shared: Arc<Shared>, mut reader: Box<dyn FrameReader>) {
    let reason = loop {
        match reader.read_frame().await {
            Ok(Some(frame)) => {
                let delivered = Packet::from_bytes(&frame).and_then(|packet| shared.deliver(packet));
                if let Err(e) = delivered {
                    log::error!("Undecodable message from server: {}", e);
                    break format!("undecodable message: {}", e);
                }
            }
            Ok(None) => {
                log::info!("Server closed the connection");
                break "connection closed by server".to_string();
            }
            Err(e) => {
                log::error!("Read from server failed: {}", e);
                break format!("read failed: {}", e);
            }
        }
    };
    shared.shutdown(&reason);
}
