//! Driving port for rider authentication.
//!
//! Handlers call this port with validated credentials and store the returned
//! user id in the session.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, LoginCredentials, UserId};

/// Authenticates riders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Fixture rider accepted by [`FixtureLoginService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureRider {
    pub id: Uuid,
    pub username: &'static str,
    pub display_name: &'static str,
    password: &'static str,
}

/// Demonstration riders. The `users` migration seeds the same ids.
pub const FIXTURE_RIDERS: [FixtureRider; 2] = [
    FixtureRider {
        id: Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000),
        username: "admin",
        display_name: "Admin",
        password: "password",
    },
    FixtureRider {
        id: Uuid::from_u128(0x5b0d7c6e_2f1a_4c3b_9e8d_7a6f5e4d3c2b),
        username: "rider",
        display_name: "Demo Rider",
        password: "password",
    },
];

/// Roster-backed authenticator used until an identity provider is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        FIXTURE_RIDERS
            .iter()
            .find(|rider| {
                rider.username == credentials.username() && rider.password == credentials.password()
            })
            .map(|rider| UserId::from_uuid(rider.id))
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", Some("123e4567-e89b-12d3-a456-426614174000"))]
    #[case("rider", "password", Some("5b0d7c6e-2f1a-4c3b-9e8d-7a6f5e4d3c2b"))]
    #[case("admin", "wrong", None)]
    #[case("nobody", "password", None)]
    #[tokio::test]
    async fn roster_authenticates_known_riders(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Option<&str>,
    ) {
        let creds = LoginCredentials::try_from_parts(username, password).expect("credentials");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (expected, result) {
            (Some(id), Ok(user)) => assert_eq!(user.as_ref(), id),
            (None, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (expected, other) => panic!("expected {expected:?}, got {other:?}"),
        }
    }
}
