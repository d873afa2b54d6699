use super::types::FilterSpec;
use crate::record::ListRecord;

/// Filter and search predicates over a single record
pub struct FilterWhere;

impl FilterWhere {
    /// Every active filter must hold. A filter on an absent field fails.
    pub fn matches_filters<T: ListRecord>(record: &T, spec: &FilterSpec) -> bool {
        spec.active().all(|(name, expected)| {
            record
                .field(name)
                .map(|value| value.matches(expected))
                .unwrap_or(false)
        })
    }

    /// At least one searchable field contains the term, ignoring case.
    /// Only the empty term matches everything; whitespace is part of the term.
    pub fn matches_search<T: ListRecord>(record: &T, search: &str) -> bool {
        let needle = search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        Self::matches_needle(record, &needle)
    }

    fn matches_needle<T: ListRecord>(record: &T, needle: &str) -> bool {
        record
            .searchable_fields()
            .iter()
            .filter_map(|name| record.field(name))
            .any(|value| value.contains_lowercase(needle))
    }

    /// Filter stage followed by search stage, preserving input order
    pub fn retain<'a, T: ListRecord>(records: &'a [T], spec: &FilterSpec) -> Vec<&'a T> {
        let needle = spec.search.to_lowercase();
        records
            .iter()
            .filter(|record| Self::matches_filters(*record, spec))
            .filter(|record| needle.is_empty() || Self::matches_needle(*record, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DynamicRecord, FieldValue};
    use serde_json::json;

    fn record(value: serde_json::Value) -> DynamicRecord {
        DynamicRecord::from_json(value).unwrap()
    }

    #[test]
    fn filters_combine_with_and() {
        let r = record(json!({"name": "Bob", "status": "Active", "role": "employer"}));
        let both = FilterSpec::new().with_filter("status", "Active").with_filter("role", "employer");
        let one_wrong = FilterSpec::new().with_filter("status", "Active").with_filter("role", "admin");
        assert!(FilterWhere::matches_filters(&r, &both));
        assert!(!FilterWhere::matches_filters(&r, &one_wrong));
    }

    #[test]
    fn missing_field_fails_an_active_filter() {
        let r = record(json!({"name": "Bob"}));
        assert!(!FilterWhere::matches_filters(&r, &FilterSpec::new().with_filter("status", "Active")));
        assert!(FilterWhere::matches_filters(&r, &FilterSpec::new().with_filter("status", "all")));
    }

    #[test]
    fn search_is_case_insensitive_over_searchable_fields() {
        let r = record(json!({"name": "Alice", "status": "Inactive"}));
        assert!(FilterWhere::matches_search(&r, "ALI"));
        assert!(FilterWhere::matches_search(&r, ""));
        // status is not a searchable field
        assert!(!FilterWhere::matches_search(&r, "inactive"));
    }

    #[test]
    fn search_whitespace_is_significant() {
        let bob = record(json!({"name": "Bob"}));
        let mary = record(json!({"name": "Mary Ann"}));
        assert!(!FilterWhere::matches_search(&bob, "ob "));
        assert!(!FilterWhere::matches_search(&bob, " "));
        assert!(FilterWhere::matches_search(&mary, " "));
        assert!(FilterWhere::matches_search(&mary, "y a"));

        let rows = [bob, mary];
        let kept = FilterWhere::retain(&rows, &FilterSpec::new().with_search(" "));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].field("name"), Some(FieldValue::from("Mary Ann")));
    }

    #[test]
    fn padded_filter_values_match_like_trimmed_ones() {
        let r = record(json!({"name": "Bob", "status": "Active"}));
        assert!(FilterWhere::matches_filters(&r, &FilterSpec::new().with_filter("status", " Active")));
        assert!(FilterWhere::matches_filters(&r, &FilterSpec::new().with_filter("status", "Active  ")));
        assert!(!FilterWhere::matches_filters(&r, &FilterSpec::new().with_filter("status", " Inactive")));
    }
}
