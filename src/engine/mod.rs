//! Incident query engine.
//!
//! [`query`] turns a dataset snapshot and an [`IncidentQuery`] into one page:
//!
//! 1. column filters, conjunctive
//! 2. global filter over every searchable column
//! 3. `totalCount` taken from the filtered set
//! 4. stable sort on the first sort descriptor only; further descriptors are ignored
//! 5. slice the requested page; a start past the end yields an empty page
//!
//! The dataset is only borrowed. Filters the engine does not understand let rows through.

pub mod filter;
pub mod sort;

use tracing::debug;
use validator::Validate;

use crate::models::{FilterOptions, Incident, IncidentPage, IncidentQuery};
use crate::{SafedeskError, SafedeskResult};

/// Run a query against a dataset snapshot.
///
/// Fails only when `pagination.pageSize` is zero.
pub fn query(dataset: &[Incident], spec: &IncidentQuery) -> SafedeskResult<IncidentPage> {
    spec.pagination
        .validate()
        .map_err(|e| SafedeskError::invalid_query(format!("pagination: {}", e)))?;

    let needle = spec.global_filter.to_lowercase();
    let mut rows: Vec<&Incident> = dataset
        .iter()
        .filter(|incident| filter::matches_column_filters(incident, &spec.column_filters))
        .filter(|incident| needle.is_empty() || filter::matches_global_filter(incident, &needle))
        .collect();

    let total_count = rows.len();

    if let Some(descriptor) = spec.sorting.first() {
        if spec.sorting.len() > 1 {
            debug!(
                ignored = spec.sorting.len() - 1,
                "Only the first sort descriptor is applied"
            );
        }
        sort::sort_by_descriptor(&mut rows, descriptor);
    }

    let page_size = spec.pagination.page_size;
    let data: Vec<Incident> = rows
        .into_iter()
        .skip(spec.pagination.start())
        .take(page_size)
        .cloned()
        .collect();
    let page_count = total_count.div_ceil(page_size);

    debug!(
        dataset = dataset.len(),
        total_count,
        page_count,
        page_index = spec.pagination.page_index,
        returned = data.len(),
        "Incident query evaluated"
    );

    Ok(IncidentPage {
        data,
        page_count,
        total_count,
    })
}

/// Distinct severities, statuses and types present in the dataset, in first-seen order.
pub fn list_filter_options(dataset: &[Incident]) -> FilterOptions {
    let mut options = FilterOptions::default();

    for incident in dataset {
        push_unique(&mut options.severities, incident.severity);
        push_unique(&mut options.statuses, incident.status);
        push_unique(&mut options.types, incident.incident_type);
    }

    options
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}
