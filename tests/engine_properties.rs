mod common;

use std::collections::HashSet;

use common::{demo_repository, scenario_dataset, setup};
use safedesk::engine::{list_filter_options, query};
use safedesk::models::{
    ColumnFilter, IncidentQuery, IncidentType, Severity, SortDescriptor, Status,
};

fn filtered_query() -> IncidentQuery {
    IncidentQuery::default()
        .with_filter(ColumnFilter::values("severity", ["High", "Critical"]))
        .with_filter(ColumnFilter::values("status", ["Pending", "In Progress"]))
        .with_global_filter("dock")
}

#[test]
fn conjunction_of_filters() {
    setup();
    let repository = demo_repository(1000);
    let spec = filtered_query().with_pagination(0, 1010);

    let page = query(repository.incidents(), &spec).unwrap();
    assert!(!page.data.is_empty(), "seeded dataset should contain matching rows");

    for incident in &page.data {
        assert!(matches!(incident.severity, Severity::High | Severity::Critical));
        assert!(matches!(incident.status, Status::Pending | Status::InProgress));
        assert!(
            incident.location.to_lowercase().contains("dock")
                || incident.id.to_lowercase().contains("dock")
        );
    }

    let expected = repository
        .incidents()
        .iter()
        .filter(|i| matches!(i.severity, Severity::High | Severity::Critical))
        .filter(|i| matches!(i.status, Status::Pending | Status::InProgress))
        .filter(|i| i.location.to_lowercase().contains("dock"))
        .count();
    assert_eq!(page.total_count, expected);
}

#[test]
fn pages_cover_the_filtered_set_exactly_once() {
    setup();
    let repository = demo_repository(250);
    let base = IncidentQuery::default()
        .with_filter(ColumnFilter::values("type", ["Fire Alarm", "Barrier Breach"]))
        .with_sort(SortDescriptor::asc("location"));

    let first = query(repository.incidents(), &base.clone().with_pagination(0, 7)).unwrap();
    let mut seen = Vec::new();
    for page_index in 0..first.page_count {
        let page = query(
            repository.incidents(),
            &base.clone().with_pagination(page_index, 7),
        )
        .unwrap();
        assert!(page.data.len() <= 7);
        assert_eq!(page.total_count, first.total_count);
        seen.extend(page.data.into_iter().map(|i| i.id));
    }

    let unique: HashSet<&String> = seen.iter().collect();
    assert_eq!(seen.len(), first.total_count);
    assert_eq!(unique.len(), seen.len());
    assert_eq!(first.page_count, first.total_count.div_ceil(7));

    let past_end = query(
        repository.incidents(),
        &base.with_pagination(first.page_count, 7),
    )
    .unwrap();
    assert!(past_end.data.is_empty());
}

#[test]
fn date_descending_is_non_increasing() {
    setup();
    let repository = demo_repository(300);
    let spec = IncidentQuery::default()
        .with_sort(SortDescriptor::desc("date"))
        .with_pagination(0, 310);

    let page = query(repository.incidents(), &spec).unwrap();
    assert_eq!(page.data.len(), 310);
    assert!(page.data.windows(2).all(|pair| pair[0].date >= pair[1].date));
}

#[test]
fn query_is_idempotent_and_leaves_dataset_untouched() {
    let repository = demo_repository(120);
    let before = repository.incidents().to_vec();
    let spec = filtered_query().with_sort(SortDescriptor::desc("severity"));

    let first = query(repository.incidents(), &spec).unwrap();
    let second = query(repository.incidents(), &spec).unwrap();

    assert_eq!(first, second);
    assert_eq!(repository.incidents(), before.as_slice());
}

#[test]
fn filter_options_are_unique_members_of_their_enumerations() {
    let repository = demo_repository(500);
    let options = list_filter_options(repository.incidents());

    let severities: HashSet<_> = options.severities.iter().collect();
    let statuses: HashSet<_> = options.statuses.iter().collect();
    let types: HashSet<_> = options.types.iter().collect();
    assert_eq!(severities.len(), options.severities.len());
    assert_eq!(statuses.len(), options.statuses.len());
    assert_eq!(types.len(), options.types.len());

    assert!(options.severities.iter().all(|s| Severity::ALL.contains(s)));
    assert!(options.statuses.iter().all(|s| Status::ALL.contains(s)));
    assert!(options.types.iter().all(|t| IncidentType::ALL.contains(t)));
}

#[test]
fn scenario_basic_pagination() {
    let dataset = scenario_dataset();
    let page = query(&dataset, &IncidentQuery::default().with_pagination(0, 2)).unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].id, "INC-0001");
    assert_eq!(page.page_count, 2);
    assert_eq!(page.total_count, 3);
}

#[test]
fn scenario_categorical_filter() {
    let dataset = scenario_dataset();
    let spec = IncidentQuery::default().with_filter(ColumnFilter::values("severity", ["High"]));
    let page = query(&dataset, &spec).unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].id, "INC-0001");
}

#[test]
fn scenario_global_search_is_case_insensitive() {
    let dataset = scenario_dataset();
    let page = query(&dataset, &IncidentQuery::default().with_global_filter("warehouse")).unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].location, "Warehouse A");
}

#[test]
fn scenario_date_sort_descending() {
    let dataset = scenario_dataset();
    let page = query(
        &dataset,
        &IncidentQuery::default().with_sort(SortDescriptor::desc("date")),
    )
    .unwrap();

    let ids: Vec<&str> = page.data.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["INC-0002", "INC-0001", "INC-0003"]);
    assert_eq!(page.data[0].date.to_string(), "2023-07-20");
    assert_eq!(page.data[2].date.to_string(), "2023-05-10");
}

#[test]
fn categorical_filter_shapes_follow_the_table_ui() {
    let dataset = scenario_dataset();
    let total = |value: serde_json::Value| {
        let spec: IncidentQuery = serde_json::from_value(serde_json::json!({
            "columnFilters": [{ "id": "severity", "value": value }]
        }))
        .unwrap();
        query(&dataset, &spec).unwrap().total_count
    };

    assert_eq!(total(serde_json::json!("hi")), 0);
    assert_eq!(total(serde_json::json!("High,Critical")), 1);
    assert_eq!(total(serde_json::json!("Low Medium High")), 3);
    assert_eq!(total(serde_json::json!("")), 3);
    assert_eq!(total(serde_json::json!(["Low", null])), 1);
    assert_eq!(total(serde_json::json!([null])), 0);
}

#[test]
fn unknown_columns_fail_open() {
    let dataset = scenario_dataset();
    let spec: IncidentQuery = serde_json::from_value(serde_json::json!({
        "columnFilters": [
            { "id": "priority", "value": ["P1"] },
            { "id": "severity", "value": 3 }
        ],
        "sorting": [{ "id": "assignee", "desc": true }]
    }))
    .unwrap();

    let page = query(&dataset, &spec).unwrap();
    let ids: Vec<&str> = page.data.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["INC-0001", "INC-0002", "INC-0003"]);
}
