//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::DbPool;

/// Backing store for the repositories.
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL through the Diesel adapters.
    Database(DbPool),
    /// Process-local store; state is lost on restart.
    Memory(InMemoryStore),
}

impl Storage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
}

impl ServerConfig {
    /// Construct a configuration backed by a fresh in-memory store.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory(InMemoryStore::new()),
        }
    }

    /// Replace the backing store.
    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "read by the server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
