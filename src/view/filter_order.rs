use std::cmp::Ordering;

use super::types::{SortDirection, SortSpec};
use crate::record::{FieldValue, ListRecord};

pub struct FilterOrder;

impl FilterOrder {
    /// Stable sort by `spec.key`.
    ///
    /// Descending inverts the comparator so equal keys keep their input
    /// order in both directions. Records without a value for the key go last
    /// either way.
    pub fn sort<'a, T: ListRecord>(records: Vec<&'a T>, spec: &SortSpec) -> Vec<&'a T> {
        let mut keyed: Vec<(Option<FieldValue>, &'a T)> = records
            .into_iter()
            .map(|record| (record.field(&spec.key).filter(|v| !v.is_null()), record))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| Self::compare(a.as_ref(), b.as_ref(), spec.direction));
        keyed.into_iter().map(|(_, record)| record).collect()
    }

    pub fn compare(a: Option<&FieldValue>, b: Option<&FieldValue>, direction: SortDirection) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match direction {
                SortDirection::Asc => a.compare(b),
                SortDirection::Desc => b.compare(a),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DynamicRecord;
    use serde_json::json;

    fn names(rows: &[&DynamicRecord]) -> Vec<String> {
        rows.iter().map(|r| r.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string()).collect()
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let records = vec![
            DynamicRecord::from_json(json!({"name": "a", "salary": 20})).unwrap(),
            DynamicRecord::from_json(json!({"name": "b"})).unwrap(),
            DynamicRecord::from_json(json!({"name": "c", "salary": 10})).unwrap(),
            DynamicRecord::from_json(json!({"name": "d", "salary": null})).unwrap(),
        ];
        let refs: Vec<&DynamicRecord> = records.iter().collect();

        let asc = FilterOrder::sort(refs.clone(), &SortSpec::asc("salary"));
        assert_eq!(names(&asc), vec!["c", "a", "b", "d"]);

        let desc = FilterOrder::sort(refs, &SortSpec::desc("salary"));
        assert_eq!(names(&desc), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn ties_keep_input_order_when_descending() {
        let records = vec![
            DynamicRecord::from_json(json!({"name": "first", "status": "Active"})).unwrap(),
            DynamicRecord::from_json(json!({"name": "second", "status": "Active"})).unwrap(),
            DynamicRecord::from_json(json!({"name": "third", "status": "Banned"})).unwrap(),
        ];
        let sorted = FilterOrder::sort(records.iter().collect(), &SortSpec::desc("status"));
        assert_eq!(names(&sorted), vec!["third", "first", "second"]);
    }
}
