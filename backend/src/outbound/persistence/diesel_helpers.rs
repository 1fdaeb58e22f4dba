//! Shared helpers for Diesel repository implementations.
//!
//! Each adapter owns its port error type, so the helpers here only classify
//! and stringify failures; the adapters wrap the message into the right
//! variant.

use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Whether a Diesel error indicates a lost connection rather than a bad
/// query.
pub(crate) fn is_connection_error(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Extract a readable message from a Diesel error and emit debug context.
pub(crate) fn diesel_error_message(error: &diesel::result::Error, operation: &str) -> String {
    use diesel::result::Error as DieselError;

    let message = match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
            info.message().to_owned()
        }
        other => {
            debug!(error = %other, %operation, "diesel operation failed");
            other.to_string()
        }
    };
    format!("{operation}: {message}")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_messages_pass_through() {
        assert_eq!(
            pool_error_message(PoolError::checkout("refused")),
            "refused"
        );
        assert_eq!(pool_error_message(PoolError::build("bad url")), "bad url");
    }

    #[rstest]
    fn not_found_is_not_a_connection_error() {
        assert!(!is_connection_error(&diesel::result::Error::NotFound));
    }

    #[rstest]
    fn messages_carry_the_operation() {
        let message = diesel_error_message(&diesel::result::Error::NotFound, "load slot");
        assert!(message.starts_with("load slot:"));
    }
}
