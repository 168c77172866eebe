//! Cache-control policies shared by HTTP handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Per-user responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Probe responses must never be cached.
pub const NO_STORE: &str = "no-store";

/// Header tuple for per-user responses such as the rider profile.
pub const fn private_no_cache_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header tuple for health probes.
pub const fn no_store_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}
