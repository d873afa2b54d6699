use serde_json::json;

use portal_admin::fixtures::FixtureSet;
use portal_admin::record::{DynamicRecord, ListRecord};
use portal_admin::view::{compute_view, FilterSpec, ListViewState, Pagination, SortSpec, ViewQuery};

fn person(name: &str, status: &str) -> DynamicRecord {
    DynamicRecord::from_json(json!({ "id": name.to_lowercase(), "name": name, "status": status })).unwrap()
}

fn bob_alice_eve() -> Vec<DynamicRecord> {
    vec![person("Bob", "Active"), person("Alice", "Inactive"), person("Eve", "Active")]
}

/// Twenty rows with repeated statuses and categories so sort keys tie
fn crowd() -> Vec<DynamicRecord> {
    let statuses = ["Active", "Inactive", "Pending"];
    let categories = ["IT", "HR", "Sales", "IT"];
    (0..20)
        .map(|i| {
            DynamicRecord::from_json(json!({
                "id": format!("r{i:02}"),
                "name": format!("Person {}", (i * 7) % 20),
                "status": statuses[i % statuses.len()],
                "category": categories[i % categories.len()],
                "score": (i * 13) % 5,
            }))
            .unwrap()
        })
        .collect()
}

fn names(rows: &[DynamicRecord]) -> Vec<String> {
    rows.iter().map(|r| r.field("name").map(|v| v.to_text()).unwrap_or_default()).collect()
}

fn ids<T: ListRecord>(rows: &[T]) -> Vec<String> {
    rows.iter().map(ListRecord::id).collect()
}

fn query(filters: FilterSpec, sort: Option<SortSpec>, page: usize, rows: usize) -> ViewQuery {
    ViewQuery { filters, sort, pagination: Pagination::new(page, rows) }
}

#[test]
fn retained_count_never_exceeds_input() {
    let records = crowd();
    let filter_values = ["all", "", "Active", "Inactive", "Pending", "Missing"];
    let searches = ["", "person", "PERSON 1", "zzz"];

    for status in filter_values {
        for category in ["all", "IT", "HR"] {
            for search in searches {
                let filters = FilterSpec::new()
                    .with_filter("status", status)
                    .with_filter("category", category)
                    .with_search(search);
                let neutral = filters.is_neutral();
                let out = compute_view(&records, &query(filters, None, 1, 5));
                assert!(out.total_count <= records.len());
                if neutral {
                    assert_eq!(out.total_count, records.len());
                }
            }
        }
    }
}

#[test]
fn compute_view_is_idempotent() {
    let records = crowd();
    let q = query(
        FilterSpec::new().with_filter("category", "IT").with_search("person"),
        Some(SortSpec::desc("score")),
        2,
        3,
    );
    assert_eq!(compute_view(&records, &q), compute_view(&records, &q));
}

#[test]
fn ties_keep_filtered_input_order_in_both_directions() {
    let records = crowd();
    for sort in [SortSpec::asc("status"), SortSpec::desc("status"), SortSpec::asc("score"), SortSpec::desc("score")] {
        let out = compute_view(&records, &query(FilterSpec::new(), Some(sort.clone()), 1, 100));
        for pair in out.rows.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.field(&sort.key) == b.field(&sort.key) {
                // ids encode input position
                assert!(a.id() < b.id(), "tie broke input order for {sort}: {} before {}", a.id(), b.id());
            }
        }
    }
}

#[test]
fn concatenated_pages_reconstruct_the_result() {
    let records = crowd();
    let filters = FilterSpec::new().with_filter("status", "Active");
    let sort = Some(SortSpec::asc("name"));
    let everything = compute_view(&records, &query(filters.clone(), sort.clone(), 1, records.len()));

    for rows_per_page in 1..=8 {
        let first = compute_view(&records, &query(filters.clone(), sort.clone(), 1, rows_per_page));
        let mut joined = Vec::new();
        for page in 1..=first.total_pages {
            let out = compute_view(&records, &query(filters.clone(), sort.clone(), page, rows_per_page));
            assert_eq!(out.current_page, page);
            joined.extend(out.rows);
        }
        assert_eq!(ids(&joined), ids(&everything.rows), "rows_per_page={rows_per_page}");
    }
}

#[test]
fn filter_and_search_changes_return_to_the_first_page() {
    let records = crowd();
    let mut state = ListViewState::new(2);
    state.compute(&records);
    state.set_page(4);
    assert_eq!(state.compute(&records).current_page, 4);

    state.set_search("person");
    assert_eq!(state.compute(&records).current_page, 1);

    state.set_page(3);
    state.set_filter("status", "Active");
    assert_eq!(state.compute(&records).current_page, 1);

    state.set_page(2);
    state.clear_filter("status");
    assert_eq!(state.current_page(), 1);
}

#[test]
fn active_filter_with_name_sort() {
    let out = compute_view(
        &bob_alice_eve(),
        &query(FilterSpec::new().with_filter("status", "Active"), Some(SortSpec::asc("name")), 1, 10),
    );
    assert_eq!(names(&out.rows), vec!["Bob", "Eve"]);
    assert_eq!(out.total_count, 2);
    assert_eq!(out.total_pages, 1);
}

#[test]
fn search_matches_case_insensitively() {
    let out = compute_view(&bob_alice_eve(), &query(FilterSpec::new().with_search("ali"), None, 1, 10));
    assert_eq!(names(&out.rows), vec!["Alice"]);
}

#[test]
fn one_row_per_page_walks_the_sorted_names() {
    let records = bob_alice_eve();
    let pages: Vec<Vec<String>> = (1..=3)
        .map(|page| {
            let out = compute_view(&records, &query(FilterSpec::new(), Some(SortSpec::asc("name")), page, 1));
            assert_eq!(out.total_pages, 3);
            names(&out.rows)
        })
        .collect();
    assert_eq!(pages, vec![vec!["Alice"], vec!["Bob"], vec!["Eve"]]);
}

#[test]
fn typed_entities_run_through_the_same_engine() {
    let seed = FixtureSet::seed().unwrap();

    let out = compute_view(
        &seed.jobs,
        &query(FilterSpec::new().with_filter("skills", "rust"), Some(SortSpec::asc("title")), 1, 10),
    );
    assert_eq!(ids(&out.rows), vec!["job-1"]);

    // jobs without a salary sort last either way
    for sort in [SortSpec::asc("salary"), SortSpec::desc("salary")] {
        let out = compute_view(&seed.jobs, &query(FilterSpec::new(), Some(sort), 1, 10));
        assert_eq!(out.rows.last().map(|j| j.id.as_str()), Some("job-3"));
    }

    let out = compute_view(
        &seed.coupons,
        &query(FilterSpec::new().with_filter("discount", "10.0"), None, 1, 10),
    );
    assert_eq!(ids(&out.rows), vec!["coupon-2"]);
}
