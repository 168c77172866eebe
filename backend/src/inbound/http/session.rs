//! Session helpers so handlers deal in user ids and flash messages rather
//! than raw cookie keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flash_messages";

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// One-shot notice shown on the next profile read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub level: FlashLevel,
    #[schema(example = "Sorry, this bike is no longer available.")]
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

fn session_error(action: &str, error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to {action} session: {error}"))
}

/// Newtype wrapper exposing the session operations handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated user's id, rotating the session key first.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| session_error("persist", error))
    }

    /// Current user id, if any. A tampered value is treated as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| session_error("read", error))?
        else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user or fail with `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Append a flash message to the pending list.
    pub fn push_flash(&self, flash: FlashMessage) -> Result<(), Error> {
        let mut pending = self.pending_flashes()?;
        pending.push(flash);
        self.0
            .insert(FLASH_KEY, pending)
            .map_err(|error| session_error("store flash in", error))
    }

    /// Remove and return every pending flash message, oldest first.
    pub fn take_flashes(&self) -> Result<Vec<FlashMessage>, Error> {
        let pending = self.pending_flashes()?;
        self.0.remove(FLASH_KEY);
        Ok(pending)
    }

    /// Drop the whole session, including the user id.
    pub fn purge(&self) {
        self.0.purge();
    }

    fn pending_flashes(&self) -> Result<Vec<FlashMessage>, Error> {
        match self.0.get::<Vec<FlashMessage>>(FLASH_KEY) {
            Ok(pending) => Ok(pending.unwrap_or_default()),
            Err(error) => {
                warn!(%error, "discarding unreadable flash messages");
                Ok(Vec::new())
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
