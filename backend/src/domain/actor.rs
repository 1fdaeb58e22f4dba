//! Actor identity and role primitives.
//!
//! Roles are resolved by an external collaborator and passed into the domain;
//! the booking core never stores or mutates them. An [`Actor`] may arrive
//! without a resolvable role, which the rule engine turns into a denial
//! rather than a transport failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when constructing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a valid UUID.
    InvalidId,
}

impl fmt::Display for ActorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for ActorValidationError {}

/// Stable actor identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ActorValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(ActorValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| ActorValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = ActorValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a role label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleParseError {
    label: String,
}

impl fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.label)
    }
}

impl std::error::Error for RoleParseError {}

/// Role carried by an actor, distinguishing override privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Students book free slots but never displace an existing booking.
    Student,
    /// Teachers may take over student-held slots.
    Teacher,
}

impl Role {
    /// Stable label used in storage and session payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(RoleParseError {
                label: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity performing a booking operation.
///
/// The role is optional by design: role resolution can fail upstream, and the
/// booking policy denies such actors instead of the transport layer guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Authenticated identity.
    pub id: UserId,
    /// Resolved role, absent when lookup failed.
    pub role: Option<Role>,
}

impl Actor {
    /// Construct an actor with a resolved role.
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role: Some(role),
        }
    }

    /// Construct an actor whose role could not be resolved.
    pub fn without_role(id: UserId) -> Self {
        Self { id, role: None }
    }
}
