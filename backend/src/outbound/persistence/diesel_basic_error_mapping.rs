//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constraint violations the adapters translate into domain rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation<'a> {
    Unique(&'a str),
    ForeignKey(&'a str),
}

/// Name the violated constraint, if `error` is a unique or foreign-key
/// violation reported with a constraint name.
pub fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation<'_>> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name().map(ConstraintViolation::Unique)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            info.constraint_name().map(ConstraintViolation::ForeignKey)
        }
        _ => None,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Closed connections are connection errors; everything else is a query
/// error. Database messages are logged, never returned.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::BrokenTransactionManager => connection("database transaction broken"),
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[derive(Debug)]
    struct Info(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let mapped = map_basic_diesel_error(
            database_error(DatabaseErrorKind::ClosedConnection, None),
            Mapped::Query,
            Mapped::Connection,
        );
        assert_eq!(mapped, Mapped::Connection("database connection error"));
    }

    #[rstest]
    fn other_errors_map_to_query_errors() {
        let mapped = map_basic_diesel_error(DieselError::NotFound, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Query("record not found"));
    }

    #[rstest]
    #[case(
        DatabaseErrorKind::UniqueViolation,
        Some("rentals_one_active_per_user"),
        Some(ConstraintViolation::Unique("rentals_one_active_per_user"))
    )]
    #[case(
        DatabaseErrorKind::ForeignKeyViolation,
        Some("reviews_bike_id_fkey"),
        Some(ConstraintViolation::ForeignKey("reviews_bike_id_fkey"))
    )]
    #[case(DatabaseErrorKind::UniqueViolation, None, None)]
    #[case(DatabaseErrorKind::CheckViolation, Some("rentals_closed_together"), None)]
    fn constraint_names_are_extracted(
        #[case] kind: DatabaseErrorKind,
        #[case] constraint: Option<&'static str>,
        #[case] expected: Option<ConstraintViolation<'static>>,
    ) {
        let error = database_error(kind, constraint);
        assert_eq!(constraint_violation(&error), expected);
    }
}
