//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers, session handling and the health probes live under [`http`].

pub mod http;
