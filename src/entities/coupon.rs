use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{FieldTable, FieldValue, ListRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount: Decimal,
    pub status: String,
    #[serde(default)]
    pub usage_count: i64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

static COUPON_FIELDS: FieldTable<Coupon> = FieldTable::new(&[
    ("id", |c: &Coupon| FieldValue::from(&c.id)),
    ("code", |c: &Coupon| FieldValue::from(&c.code)),
    ("description", |c: &Coupon| FieldValue::from(&c.description)),
    ("discount", |c: &Coupon| FieldValue::from(c.discount)),
    ("status", |c: &Coupon| FieldValue::from(&c.status)),
    ("usage_count", |c: &Coupon| FieldValue::from(c.usage_count)),
    ("expires_at", |c: &Coupon| FieldValue::from(c.expires_at)),
]);

impl Coupon {
    /// Names accepted as filter and sort keys
    pub fn field_names() -> Vec<&'static str> {
        COUPON_FIELDS.names().collect()
    }
}

impl ListRecord for Coupon {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        COUPON_FIELDS.get(self, name)
    }

    fn searchable_fields(&self) -> &'static [&'static str] {
        &["code", "description"]
    }

    fn columns(&self) -> Vec<String> {
        COUPON_FIELDS.names().map(str::to_string).collect()
    }
}
