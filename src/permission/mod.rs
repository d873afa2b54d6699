pub mod role;

pub use role::Role;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::Operation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("Invalid permission entry: {0}")]
    InvalidEntry(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// One `resource:operation` grant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    pub resource: String,
    pub operation: Operation,
}

impl Permission {
    pub fn new(resource: impl Into<String>, operation: Operation) -> Self {
        Self { resource: resource.into(), operation }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.operation)
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource, operation) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| PermissionError::InvalidEntry(s.to_string()))?;
        if resource.is_empty() {
            return Err(PermissionError::InvalidEntry(s.to_string()));
        }
        let operation = operation
            .parse::<Operation>()
            .map_err(|_| PermissionError::UnsupportedOperation(operation.to_string()))?;
        Ok(Self::new(resource, operation))
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The explicit grants held by a sub-admin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I, S>(entries: I) -> Result<Self, PermissionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .map(|entry| entry.as_ref().parse::<Permission>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn grant(&mut self, resource: impl Into<String>, operation: Operation) {
        self.0.insert(Permission::new(resource, operation));
    }

    pub fn contains(&self, resource: &str, operation: Operation) -> bool {
        self.0
            .iter()
            .any(|p| p.resource == resource && p.operation == operation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

/// The actor whose access is being decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            role,
            permissions: PermissionSet::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }
}

/// Whether `user` may perform `operation` on the admin resource `resource`.
///
/// Admins hold every permission implicitly. Sub-admins hold exactly their
/// granted entries. Every other role is denied admin operations.
pub fn can(user: &User, resource: &str, operation: Operation) -> bool {
    match user.role {
        Role::Admin => true,
        Role::SubAdmin => user.permissions.contains(resource, operation),
        _ => false,
    }
}

pub fn has_role(user: &User, role: Role) -> bool {
    user.role == role
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_admin(grants: &[&str]) -> User {
        User::new("u-2", "Sam", Role::SubAdmin).with_permissions(PermissionSet::parse(grants).unwrap())
    }

    #[test]
    fn admin_can_do_everything() {
        let admin = User::new("u-1", "Ada", Role::Admin);
        for op in Operation::ALL {
            assert!(can(&admin, "jobs", op));
            assert!(can(&admin, "anything-at-all", op));
        }
    }

    #[test]
    fn sub_admin_needs_exact_grant() {
        let user = sub_admin(&["jobs:delete", "coupons:read"]);
        assert!(can(&user, "jobs", Operation::Delete));
        assert!(!can(&user, "jobs", Operation::Update));
        assert!(can(&user, "coupons", Operation::Read));
        assert!(!can(&user, "users", Operation::Read));
    }

    #[test]
    fn other_roles_are_denied() {
        let mut employer = User::new("u-3", "Acme", Role::Employer);
        employer.permissions.grant("jobs", Operation::Read);
        assert!(!can(&employer, "jobs", Operation::Read));
    }

    #[test]
    fn has_role_is_equality() {
        let user = sub_admin(&[]);
        assert!(has_role(&user, Role::SubAdmin));
        assert!(!has_role(&user, Role::Admin));
    }

    #[test]
    fn permission_entries_parse_and_reject() {
        let perm: Permission = "sub-admins:update".parse().unwrap();
        assert_eq!(perm, Permission::new("sub-admins", Operation::Update));
        assert_eq!(perm.to_string(), "sub-admins:update");
        assert!(matches!("jobs".parse::<Permission>(), Err(PermissionError::InvalidEntry(_))));
        assert!(matches!("jobs:publish".parse::<Permission>(), Err(PermissionError::UnsupportedOperation(_))));
        assert!(matches!(":read".parse::<Permission>(), Err(PermissionError::InvalidEntry(_))));
    }

    #[test]
    fn permission_set_round_trips_as_strings() {
        let set = PermissionSet::parse(["jobs:read", "jobs:delete"]).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!(["jobs:read", "jobs:delete"]));
        let back: PermissionSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
