use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{FieldTable, FieldValue, ListRecord};

/// A job posting as listed in the admin jobs table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub job_type: String,
    pub status: String,
    #[serde(default)]
    pub salary: Option<Decimal>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

static JOB_FIELDS: FieldTable<Job> = FieldTable::new(&[
    ("id", |j: &Job| FieldValue::from(&j.id)),
    ("title", |j: &Job| FieldValue::from(&j.title)),
    ("company", |j: &Job| FieldValue::from(&j.company)),
    ("location", |j: &Job| FieldValue::from(&j.location)),
    ("category", |j: &Job| FieldValue::from(&j.category)),
    ("job_type", |j: &Job| FieldValue::from(&j.job_type)),
    ("status", |j: &Job| FieldValue::from(&j.status)),
    ("salary", |j: &Job| FieldValue::from(j.salary)),
    ("skills", |j: &Job| FieldValue::from(&j.skills)),
    ("posted_at", |j: &Job| FieldValue::from(j.posted_at)),
]);

const JOB_SEARCH_FIELDS: &[&str] = &["title", "company", "location"];

impl Job {
    /// Names accepted as filter and sort keys
    pub fn field_names() -> Vec<&'static str> {
        JOB_FIELDS.names().collect()
    }
}

impl ListRecord for Job {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        JOB_FIELDS.get(self, name)
    }

    fn searchable_fields(&self) -> &'static [&'static str] {
        JOB_SEARCH_FIELDS
    }

    fn columns(&self) -> Vec<String> {
        JOB_FIELDS.names().map(str::to_string).collect()
    }
}
