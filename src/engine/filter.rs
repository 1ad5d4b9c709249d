//! Row predicates for column filters and the global search box.

use crate::models::{Column, ColumnFilter, FilterValue, Incident};

/// Case-insensitive substring containment.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Evaluate a single column filter against an incident.
///
/// On a categorical column a list is an exact membership test, and a non-empty
/// string passes when it contains the record's value (case-sensitive). On other
/// columns a string is a case-insensitive substring test on the column's text;
/// unknown columns have empty text. Every other combination passes the row.
pub fn matches_column_filter(incident: &Incident, filter: &ColumnFilter) -> bool {
    let column = Column::from_id(&filter.id);

    match (&filter.value, column) {
        (FilterValue::Values(allowed), Some(column)) if column.is_categorical() => {
            let value = incident.column_value(column);
            allowed
                .iter()
                .any(|candidate| candidate.as_str() == Some(&*value))
        }
        (FilterValue::Pattern(text), Some(column))
            if column.is_categorical() && !text.is_empty() =>
        {
            let value = incident.column_value(column);
            text.contains(&*value)
        }
        (FilterValue::Pattern(pattern), column) => {
            let text = column
                .map(|column| incident.column_value(column))
                .unwrap_or_default();
            contains_ignore_case(&text, pattern)
        }
        _ => true,
    }
}

/// All filters must pass.
pub fn matches_column_filters(incident: &Incident, filters: &[ColumnFilter]) -> bool {
    filters
        .iter()
        .all(|filter| matches_column_filter(incident, filter))
}

/// Whether any searchable column contains `needle_lower`, which must already be lowercase.
pub fn matches_global_filter(incident: &Incident, needle_lower: &str) -> bool {
    Column::ALL.iter().any(|column| {
        incident
            .column_value(*column)
            .to_lowercase()
            .contains(needle_lower)
    })
}
