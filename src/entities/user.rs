use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permission::Role;
use crate::record::{FieldTable, FieldValue, ListRecord};

/// An account on the portal: job seeker, employer, university, business or staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

static USER_FIELDS: FieldTable<PortalUser> = FieldTable::new(&[
    ("id", |u: &PortalUser| FieldValue::from(&u.id)),
    ("name", |u: &PortalUser| FieldValue::from(&u.name)),
    ("email", |u: &PortalUser| FieldValue::from(&u.email)),
    ("role", |u: &PortalUser| FieldValue::from(u.role.as_str())),
    ("status", |u: &PortalUser| FieldValue::from(&u.status)),
    ("verified", |u: &PortalUser| FieldValue::from(u.verified)),
    ("joined_at", |u: &PortalUser| FieldValue::from(u.joined_at)),
]);

const USER_SEARCH_FIELDS: &[&str] = &["name", "email"];

impl PortalUser {
    /// Names accepted as filter and sort keys
    pub fn field_names() -> Vec<&'static str> {
        USER_FIELDS.names().collect()
    }
}

impl ListRecord for PortalUser {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        USER_FIELDS.get(self, name)
    }

    fn searchable_fields(&self) -> &'static [&'static str] {
        USER_SEARCH_FIELDS
    }

    fn columns(&self) -> Vec<String> {
        USER_FIELDS.names().map(str::to_string).collect()
    }
}
