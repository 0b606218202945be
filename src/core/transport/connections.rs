//! Connection Manager - per-client outbound queues for event streams.
//!
//! Each open stream owns the receiving half of an unbounded FIFO queue; the
//! manager keeps the sending half under the client id. Registration is a
//! scoped resource: dropping the [`ClientConnection`] releases it, whatever
//! way the stream ends.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::events::StreamMessage;

static CLIENT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A fresh client id: current timestamp plus a process-wide sequence number.
pub fn generate_client_id() -> String {
    let seq = CLIENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", chrono::Utc::now().timestamp_micros(), seq)
}

struct ClientSlot {
    generation: u64,
    sender: mpsc::UnboundedSender<StreamMessage>,
}

/// Registry of open client streams.
#[derive(Default)]
pub struct ConnectionManager {
    clients: DashMap<String, ClientSlot>,
    next_generation: AtomicU64,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("clients", &self.clients.len())
            .finish()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a queue for `client_id`. An existing registration under the same
    /// id is replaced; its stream sees the queue close.
    pub fn register(self: &Arc<Self>, client_id: impl Into<String>) -> ClientConnection {
        let client_id = client_id.into();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        let replaced = self
            .clients
            .insert(client_id.clone(), ClientSlot { generation, sender })
            .is_some();
        if replaced {
            info!("Client {} re-registered, previous stream replaced", client_id);
        } else {
            info!("Client {} registered ({} open)", client_id, self.clients.len());
        }

        ClientConnection {
            client_id,
            generation,
            receiver,
            manager: Arc::clone(self),
        }
    }

    /// Queue `message` for `client_id`. Returns whether a live queue took
    /// it; unknown or closed clients are silently skipped.
    pub fn enqueue(&self, client_id: &str, message: StreamMessage) -> bool {
        match self.clients.get(client_id) {
            Some(slot) => slot.sender.send(message).is_ok(),
            None => {
                debug!("No open stream for client {}, message dropped", client_id);
                false
            }
        }
    }

    /// Remove `client_id`, closing its stream. Removing an absent id is a
    /// no-op.
    pub fn deregister(&self, client_id: &str) {
        if self.clients.remove(client_id).is_some() {
            info!("Client {} deregistered", client_id);
        }
    }

    /// Remove `client_id` only if it still belongs to `generation`.
    fn release(&self, client_id: &str, generation: u64) {
        let removed = self
            .clients
            .remove_if(client_id, |_, slot| slot.generation == generation)
            .is_some();
        if removed {
            info!("Connection closed for client {}", client_id);
        }
    }

    pub fn is_registered(&self, client_id: &str) -> bool {
        self.clients.contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// What a stream should emit next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Message(StreamMessage),
    KeepAlive,
    Closed,
}

/// The receiving side of one client's queue.
pub struct ClientConnection {
    client_id: String,
    generation: u64,
    receiver: mpsc::UnboundedReceiver<StreamMessage>,
    manager: Arc<ConnectionManager>,
}

impl std::fmt::Debug for ClientConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConnection")
            .field("client_id", &self.client_id)
            .field("generation", &self.generation)
            .finish()
    }
}

impl ClientConnection {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Next queued message, `None` once the queue is closed.
    pub async fn recv(&mut self) -> Option<StreamMessage> {
        self.receiver.recv().await
    }

    /// Wait up to `keep_alive` for a message.
    pub async fn next_event(&mut self, keep_alive: Duration) -> StreamEvent {
        match tokio::time::timeout(keep_alive, self.receiver.recv()).await {
            Ok(Some(message)) => StreamEvent::Message(message),
            Ok(None) => StreamEvent::Closed,
            Err(_) => StreamEvent::KeepAlive,
        }
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        self.manager.release(&self.client_id, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn message(n: u32) -> StreamMessage {
        StreamMessage::new("function_call_result", format!("{{\"n\":{}}}", n))
    }

    #[tokio::test]
    async fn test_fifo_per_client() {
        let manager = Arc::new(ConnectionManager::new());
        let mut conn = manager.register("abc");

        for n in 1..=3 {
            assert!(manager.enqueue("abc", message(n)));
        }

        for n in 1..=3 {
            assert_eq!(conn.recv().await, Some(message(n)));
        }
    }

    #[tokio::test]
    async fn test_drop_releases_registration() {
        let manager = Arc::new(ConnectionManager::new());
        let conn = manager.register("abc");
        assert!(manager.is_registered("abc"));

        drop(conn);
        assert!(!manager.is_registered("abc"));
        assert!(!manager.enqueue("abc", message(1)));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_enqueue_unknown_client_is_noop() {
        let manager = ConnectionManager::new();
        assert!(!manager.enqueue("ghost", message(1)));
        manager.deregister("ghost");
        manager.deregister("ghost");
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_replaces_previous() {
        let manager = Arc::new(ConnectionManager::new());
        let mut first = manager.register("abc");
        let mut second = manager.register("abc");
        assert_eq!(manager.len(), 1);

        // the replaced queue is closed
        assert_eq!(first.recv().await, None);

        // dropping the old connection leaves the new registration alone
        drop(first);
        assert!(manager.is_registered("abc"));

        assert!(manager.enqueue("abc", message(7)));
        assert_eq!(second.recv().await, Some(message(7)));
    }

    #[tokio::test]
    async fn test_deregister_closes_stream() {
        let manager = Arc::new(ConnectionManager::new());
        let mut conn = manager.register("abc");
        manager.deregister("abc");
        assert_eq!(conn.next_event(Duration::from_secs(1)).await, StreamEvent::Closed);
    }

    #[tokio::test]
    async fn test_idle_queue_yields_keep_alive() {
        let manager = Arc::new(ConnectionManager::new());
        let mut conn = manager.register("abc");

        assert_eq!(
            conn.next_event(Duration::from_millis(20)).await,
            StreamEvent::KeepAlive
        );
        // still open after a keep-alive
        assert!(manager.enqueue("abc", message(2)));
        assert_eq!(
            conn.next_event(Duration::from_millis(20)).await,
            StreamEvent::Message(message(2))
        );
    }

    #[tokio::test]
    async fn test_recv_waits_for_message() {
        let manager = Arc::new(ConnectionManager::new());
        let mut conn = manager.register("abc");

        let mut recv = task::spawn(conn.recv());
        assert_pending!(recv.poll());

        manager.enqueue("abc", message(1));
        assert!(recv.is_woken());
        assert_ready_eq!(recv.poll(), Some(message(1)));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_client_id();
        let b = generate_client_id();
        assert_ne!(a, b);
    }
}
