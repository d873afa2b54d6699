use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::auth;
use crate::entities::{Coupon, Job, PortalUser, Resource};
use crate::permission::{Role, User};

const SEED: &str = include_str!("../../fixtures/seed.yaml");

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML fixtures: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON fixtures: {0}")]
    Json(#[from] serde_json::Error),
}

/// A staff login known to the mock backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    /// Hex SHA-256 of the password
    pub password_sha256: String,
    pub user: User,
}

impl Account {
    fn matches_login(&self, login: &str) -> bool {
        let login = login.trim();
        self.username.eq_ignore_ascii_case(login)
            || (!self.user.email.is_empty() && self.user.email.eq_ignore_ascii_case(login))
    }
}

/// Everything the mock backend serves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSet {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub users: Vec<PortalUser>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

impl FixtureSet {
    pub fn seed() -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(SEED)?)
    }

    /// Load a fixture file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(serde_yaml::from_str(&raw)?)
        }
    }

    /// Users narrowed to the role an account resource implies
    pub fn users_for(&self, resource: Resource) -> Vec<PortalUser> {
        match resource.implied_role() {
            Some(role) => self.users.iter().filter(|u| u.role == role).cloned().collect(),
            None => self.users.clone(),
        }
    }
}

/// Shared, lock-protected fixture data
#[derive(Debug, Default)]
pub struct FixtureStore {
    data: RwLock<FixtureSet>,
}

impl FixtureStore {
    pub fn new(set: FixtureSet) -> Self {
        Self { data: RwLock::new(set) }
    }

    /// Use `path` when given, otherwise the built-in seed
    pub fn from_path(path: Option<&str>) -> Result<Self, FixtureError> {
        let set = match path {
            Some(path) => {
                tracing::info!("Loading fixtures from {}", path);
                FixtureSet::load(path)?
            }
            None => FixtureSet::seed()?,
        };
        tracing::info!(
            "Fixtures ready: {} accounts, {} jobs, {} users, {} coupons",
            set.accounts.len(),
            set.jobs.len(),
            set.users.len(),
            set.coupons.len()
        );
        Ok(Self::new(set))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, FixtureSet> {
        self.data.read().await
    }

    /// Check a username (or email) and password against the staff accounts
    pub async fn authenticate(&self, login: &str, password: &str) -> Option<User> {
        let data = self.data.read().await;
        data.accounts
            .iter()
            .find(|account| account.matches_login(login))
            .filter(|account| auth::verify_password(password, &account.password_sha256))
            .map(|account| account.user.clone())
    }

    /// Remove one record. Account resources only remove users of their role.
    pub async fn remove(&self, resource: Resource, id: &str) -> bool {
        let mut data = self.data.write().await;
        match resource {
            Resource::Jobs => remove_by(&mut data.jobs, |j| j.id == id),
            Resource::Coupons => remove_by(&mut data.coupons, |c| c.id == id),
            Resource::Users => remove_by(&mut data.users, |u| u.id == id),
            other => {
                let role: Option<Role> = other.implied_role();
                remove_by(&mut data.users, |u| u.id == id && Some(u.role) == role)
            }
        }
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;

    #[test]
    fn seed_parses() {
        let set = FixtureSet::seed().unwrap();
        assert!(set.accounts.iter().any(|a| a.user.role == Role::Admin));
        assert!(!set.jobs.is_empty());
        assert!(!set.coupons.is_empty());

        let moderator = set.accounts.iter().find(|a| a.username == "moderator").unwrap();
        assert!(moderator.user.permissions.contains("jobs", Operation::Read));
        assert!(!moderator.user.permissions.contains("users", Operation::Read));
    }

    #[test]
    fn account_resources_narrow_by_role() {
        let set = FixtureSet::seed().unwrap();
        let employers = set.users_for(Resource::Employers);
        assert!(!employers.is_empty());
        assert!(employers.iter().all(|u| u.role == Role::Employer));
        assert_eq!(set.users_for(Resource::Users).len(), set.users.len());
    }

    #[tokio::test]
    async fn authenticate_by_username_or_email() {
        let store = FixtureStore::new(FixtureSet::seed().unwrap());
        let admin = store.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(store.authenticate("ADMIN@portal.example", "admin123").await.is_some());
        assert!(store.authenticate("admin", "wrong").await.is_none());
        assert!(store.authenticate("nobody", "admin123").await.is_none());
    }

    #[tokio::test]
    async fn remove_respects_implied_role() {
        let store = FixtureStore::new(FixtureSet::seed().unwrap());
        // user-1 is a job seeker, not an employer
        assert!(!store.remove(Resource::Employers, "user-1").await);
        assert!(store.remove(Resource::JobSeekers, "user-1").await);
        assert!(!store.remove(Resource::JobSeekers, "user-1").await);
        assert!(store.read().await.users.iter().all(|u| u.id != "user-1"));
    }

    #[test]
    fn json_fixture_files_load() {
        let dir = std::env::temp_dir().join(format!("portal-fixtures-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("data.json");
        std::fs::write(
            &path,
            r#"{"coupons":[{"id":"c1","code":"X","discount":"5","status":"Active"}]}"#,
        )
        .unwrap();
        let set = FixtureSet::load(&path).unwrap();
        assert_eq!(set.coupons.len(), 1);
        assert!(set.jobs.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
