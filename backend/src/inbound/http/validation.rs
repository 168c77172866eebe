//! Request validation helpers shared by the HTTP handlers.
//!
//! Failures become `invalid_request` errors whose `details` name the field,
//! the rejected value and a stable code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    CatalogueSort, Error, ReviewValidationError, SortDirection, SortKey, SortParseError,
};

/// Machine-readable validation codes placed in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    UnknownSortKey,
    UnknownSortOrder,
    RatingOutOfRange,
    EmptyComment,
    CommentTooLong,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownSortKey => "unknown_sort_key",
            Self::UnknownSortOrder => "unknown_sort_order",
            Self::RatingOutOfRange => "rating_out_of_range",
            Self::EmptyComment => "empty_comment",
            Self::CommentTooLong => "comment_too_long",
        }
    }
}

/// Request field name, as the client spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
    value: Option<String>,
) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        ValidationCode::InvalidUuid,
        format!("{} must be a valid UUID", field.as_str()),
        Some(value.to_owned()),
    )
}

/// Parse a path or body UUID, rejecting malformed input with `400`.
pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Build the catalogue ordering from optional `sort` and `order` parameters.
///
/// Missing parameters fall back to category ascending.
pub(crate) fn parse_catalogue_sort(
    sort: Option<&str>,
    order: Option<&str>,
) -> Result<CatalogueSort, Error> {
    let key = sort
        .filter(|raw| !raw.trim().is_empty())
        .map(str::parse::<SortKey>)
        .transpose()
        .map_err(sort_parse_error)?
        .unwrap_or_default();
    let direction = order
        .filter(|raw| !raw.trim().is_empty())
        .map(str::parse::<SortDirection>)
        .transpose()
        .map_err(sort_parse_error)?
        .unwrap_or_default();
    Ok(CatalogueSort::new(key, direction))
}

fn sort_parse_error(error: SortParseError) -> Error {
    let message = error.to_string();
    match error {
        SortParseError::UnknownKey(value) => field_error(
            FieldName::new("sort"),
            ValidationCode::UnknownSortKey,
            message,
            Some(value),
        ),
        SortParseError::UnknownDirection(value) => field_error(
            FieldName::new("order"),
            ValidationCode::UnknownSortOrder,
            message,
            Some(value),
        ),
    }
}

/// Map review input rejections onto the request fields they concern.
pub(crate) fn review_validation_error(error: ReviewValidationError) -> Error {
    let message = error.to_string();
    match error {
        ReviewValidationError::RatingOutOfRange { value } => field_error(
            FieldName::new("rating"),
            ValidationCode::RatingOutOfRange,
            message,
            Some(value.to_string()),
        ),
        ReviewValidationError::EmptyComment => field_error(
            FieldName::new("comment"),
            ValidationCode::EmptyComment,
            message,
            None,
        ),
        ReviewValidationError::CommentTooLong { .. } => field_error(
            FieldName::new("comment"),
            ValidationCode::CommentTooLong,
            message,
            None,
        ),
    }
}
