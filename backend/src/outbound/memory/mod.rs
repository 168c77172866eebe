//! Process-local adapters backed by a single mutex-guarded state.
//!
//! Used when no database URL is configured and by integration tests. All
//! ports share one lock, so each lifecycle operation observes and mutates
//! bikes, rentals and reviews atomically.

mod store;

pub use store::InMemoryStore;
