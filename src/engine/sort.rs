//! Single-column ordering.

use std::cmp::Ordering;

use tracing::debug;

use crate::models::{Column, Incident, SortDescriptor};

/// Ascending comparison on one column.
///
/// Dates compare as calendar values; every other column compares its text
/// lexicographically, so severities order as Critical < High < Low < Medium.
pub fn compare(a: &Incident, b: &Incident, column: Column) -> Ordering {
    match column {
        Column::Date => a.date.cmp(&b.date),
        other => a.column_value(other).cmp(&b.column_value(other)),
    }
}

/// Stable sort by one descriptor. An unknown column leaves the order untouched.
pub fn sort_by_descriptor(rows: &mut [&Incident], descriptor: &SortDescriptor) {
    let Some(column) = Column::from_id(&descriptor.id) else {
        debug!(column = %descriptor.id, "Ignoring sort on unknown column");
        return;
    };

    rows.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        if descriptor.desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
