//! Bike reviews written by riders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BikeId, UserId};

/// Maximum length of a review comment in characters.
pub const REVIEW_COMMENT_MAX: usize = 2000;

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for review input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between 1 and 5, got {value}")]
    RatingOutOfRange { value: i64 },
    #[error("comment must not be empty")]
    EmptyComment,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Star rating between one and five inclusive.
///
/// # Examples
/// ```
/// use backend::domain::Rating;
///
/// assert_eq!(Rating::new(4).unwrap().value(), 4);
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a rating value.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (Self::MIN..=Self::MAX).contains(rating))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange { value })
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Review text, trimmed and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Trim and validate a comment.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ReviewValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        if trimmed.chars().count() > REVIEW_COMMENT_MAX {
            return Err(ReviewValidationError::CommentTooLong {
                max: REVIEW_COMMENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validated rating and comment submitted by a rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: Rating,
    pub comment: ReviewComment,
}

impl ReviewDraft {
    /// Validate raw form input.
    pub fn parse(rating: i64, comment: &str) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            rating: Rating::new(rating)?,
            comment: ReviewComment::new(comment)?,
        })
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub bike_id: BikeId,
    pub author_id: UserId,
    pub rating: Rating,
    pub comment: ReviewComment,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Whether `user` wrote this review.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Replace rating and comment, keeping identity and creation time.
    pub fn revise(&self, draft: ReviewDraft) -> Self {
        Self {
            rating: draft.rating,
            comment: draft.comment,
            ..self.clone()
        }
    }
}

/// Order reviews newest first, ties broken by id.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}
