//! Connection registry
//!
//! Tracks every accepted connection so shutdown can reach the active
//! handlers. Handlers never remove their own entry; the handle lingers
//! until the responder terminates, which keeps the shutdown path a plain
//! sweep over everything ever accepted.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

/// Identifier for one accepted connection, assigned in accept order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Per-connection state shared between the registry and the handler task
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub peer: SocketAddr,
    cancel: CancellationToken,
}

impl ConnectionHandle {
    /// Token the handler watches between reads
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Tell the handler to stop before its next read
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// All connections accepted since startup
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Admit a new connection under a child of `parent`, so cancelling the
    /// parent reaches every handler in one step
    pub fn register(&self, peer: SocketAddr, parent: &CancellationToken) -> Arc<ConnectionHandle> {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = Arc::new(ConnectionHandle {
            id,
            peer,
            cancel: parent.child_token(),
        });
        self.connections.insert(id, Arc::clone(&handle));
        handle
    }

    /// Signal every registered connection to close, oldest first
    pub fn close_all(&self) {
        let mut handles: Vec<Arc<ConnectionHandle>> = self
            .connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        handles.sort_by_key(|handle| handle.id);

        for handle in handles {
            handle.close();
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
