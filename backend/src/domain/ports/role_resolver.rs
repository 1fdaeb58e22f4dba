//! Port resolving actor identities to roles.
//!
//! Role storage belongs to an external collaborator; the booking core only
//! asks "what role does this user hold right now". A lookup that finds no
//! role answers `None` — the rule engine turns that into a policy denial,
//! never a transport failure.

use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::actor::{Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by role resolver adapters.
    pub enum RoleResolverError {
        /// Resolver connection could not be established.
        Connection { message: String } =>
            "role resolver connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "role lookup failed: {message}",
    }
}

/// Port mapping a user identity onto their role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// The user's role, or `None` when no role is on record.
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Role>, RoleResolverError>;
}

/// Resolver over a fixed role table, for tests and database-less runs.
#[derive(Debug, Default, Clone)]
pub struct StaticRoleResolver {
    roles: HashMap<Uuid, Role>,
}

impl StaticRoleResolver {
    /// Create an empty resolver that knows no roles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `role` for `user_id`.
    #[must_use]
    pub fn with_role(mut self, user_id: &UserId, role: Role) -> Self {
        self.roles.insert(*user_id.as_uuid(), role);
        self
    }
}

#[async_trait]
impl RoleResolver for StaticRoleResolver {
    async fn resolve(&self, user_id: &UserId) -> Result<Option<Role>, RoleResolverError> {
        Ok(self.roles.get(user_id.as_uuid()).copied())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn unknown_user_resolves_to_none() {
        let resolver = StaticRoleResolver::new();
        let role = resolver
            .resolve(&UserId::random())
            .await
            .expect("lookup succeeds");
        assert!(role.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn recorded_role_is_returned() {
        let user = UserId::random();
        let resolver = StaticRoleResolver::new().with_role(&user, Role::Teacher);

        let role = resolver.resolve(&user).await.expect("lookup succeeds");
        assert_eq!(role, Some(Role::Teacher));
    }
}
