//! PostgreSQL-backed `RoleResolver` implementation using Diesel ORM.
//!
//! The role registry is maintained by the external user administration; this
//! adapter only reads it. A missing row, like an unparseable label, resolves
//! to `None` so the booking policy can deny on its own terms.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::actor::{Role, UserId};
use crate::domain::ports::{RoleResolver, RoleResolverError};

use super::diesel_helpers::{diesel_error_message, is_connection_error, pool_error_message};
use super::models::UserRoleRow;
use super::pool::DbPool;
use super::schema::user_roles;

/// Diesel-backed implementation of the `RoleResolver` port.
#[derive(Clone)]
pub struct DieselRoleResolver {
    pool: DbPool,
}

impl DieselRoleResolver {
    /// Create a new resolver with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleResolver for DieselRoleResolver {
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Role>, RoleResolverError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| RoleResolverError::connection(pool_error_message(err)))?;

        let row: Option<UserRoleRow> = user_roles::table
            .filter(user_roles::user_id.eq(user_id.as_uuid()))
            .select(UserRoleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                let message = diesel_error_message(&err, "resolve role");
                if is_connection_error(&err) {
                    RoleResolverError::connection(message)
                } else {
                    RoleResolverError::query(message)
                }
            })?;

        Ok(row.and_then(|row| match row.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                warn!(user_id = %user_id, %err, "role registry carries unknown label");
                None
            }
        }))
    }
}
