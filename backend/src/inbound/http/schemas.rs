//! OpenAPI schemas for domain types.
//!
//! Domain types do not derive `ToSchema`; these mirrors live in the adapter
//! layer and are registered with utoipa under the domain type names.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    /// The database or another backing service is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Unexpected failure; the message is always redacted.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error envelope returned by every JSON endpoint.
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "rating must be between 1 and 5, got 7")]
    message: String,
    /// Correlates the response with server logs.
    #[schema(example = "6f1c2a9e-8d57-4b0e-9a51-3c7e2d4f8b10")]
    trace_id: Option<String>,
    /// Field-level context for validation failures.
    details: Option<serde_json::Value>,
}
