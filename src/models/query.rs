use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Incident, IncidentType, Severity, Status};

/// Columns of the incident table, addressed by their JSON field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Location,
    Type,
    Severity,
    Status,
    Date,
}

impl Column {
    /// Columns searched by the global filter, in match order.
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::Location,
        Column::Type,
        Column::Severity,
        Column::Status,
        Column::Date,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "id" => Some(Column::Id),
            "location" => Some(Column::Location),
            "type" => Some(Column::Type),
            "severity" => Some(Column::Severity),
            "status" => Some(Column::Status),
            "date" => Some(Column::Date),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Location => "location",
            Column::Type => "type",
            Column::Severity => "severity",
            Column::Status => "status",
            Column::Date => "date",
        }
    }

    /// Categorical columns filter by membership in a list of allowed values.
    pub fn is_categorical(&self) -> bool {
        matches!(self, Column::Severity | Column::Status | Column::Type)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    #[validate(range(min = 1, message = "pageSize must be greater than 0"))]
    pub page_size: usize,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Offset of the first row on this page
    pub fn start(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortDescriptor {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortDescriptor {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Value of a column filter as sent by the table UI.
///
/// List elements are kept as raw JSON; only string elements can ever match a
/// record. Any shape other than a list or a string is kept verbatim so it
/// round-trips, and is ignored when filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Values(Vec<serde_json::Value>),
    Pattern(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn values<I, S>(id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            value: FilterValue::Values(
                values
                    .into_iter()
                    .map(|value| serde_json::Value::String(value.into()))
                    .collect(),
            ),
        }
    }

    pub fn pattern(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: FilterValue::Pattern(pattern.into()),
        }
    }
}

/// One requested view of the incident table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQuery {
    #[serde(default)]
    pub pagination: Pagination,
    /// Only the first descriptor is applied.
    #[serde(default)]
    pub sorting: Vec<SortDescriptor>,
    #[serde(default)]
    pub column_filters: Vec<ColumnFilter>,
    #[serde(default)]
    pub global_filter: String,
}

impl IncidentQuery {
    pub fn with_pagination(mut self, page_index: usize, page_size: usize) -> Self {
        self.pagination = Pagination::new(page_index, page_size);
        self
    }

    pub fn with_sort(mut self, descriptor: SortDescriptor) -> Self {
        self.sorting = vec![descriptor];
        self
    }

    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.column_filters.push(filter);
        self
    }

    pub fn with_global_filter(mut self, needle: impl Into<String>) -> Self {
        self.global_filter = needle.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPage {
    pub data: Vec<Incident>,
    pub page_count: usize,
    /// Matching rows after filtering, before pagination.
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub severities: Vec<Severity>,
    pub statuses: Vec<Status>,
    pub types: Vec<IncidentType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_deserializes_table_state() {
        let raw = serde_json::json!({
            "pagination": { "pageIndex": 1, "pageSize": 25 },
            "sorting": [{ "id": "date", "desc": true }],
            "columnFilters": [
                { "id": "severity", "value": ["High", "Critical"] },
                { "id": "location", "value": "ware" },
                { "id": "date", "value": { "from": "2023-01-01" } }
            ],
            "globalFilter": "gate"
        });

        let query: IncidentQuery = serde_json::from_value(raw).unwrap();
        assert_eq!(query.pagination, Pagination::new(1, 25));
        assert_eq!(query.sorting, vec![SortDescriptor::desc("date")]);
        assert_eq!(
            query.column_filters[0],
            ColumnFilter::values("severity", ["High", "Critical"])
        );
        assert_eq!(query.column_filters[1], ColumnFilter::pattern("location", "ware"));
        assert!(matches!(query.column_filters[2].value, FilterValue::Other(_)));
        assert_eq!(query.global_filter, "gate");
    }

    #[test]
    fn test_mixed_list_stays_a_list() {
        let filter: ColumnFilter =
            serde_json::from_value(serde_json::json!({ "id": "severity", "value": ["Low", null] }))
                .unwrap();
        assert_eq!(
            filter.value,
            FilterValue::Values(vec![serde_json::json!("Low"), serde_json::Value::Null])
        );
    }

    #[test]
    fn test_query_defaults() {
        let query: IncidentQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.pagination, Pagination::new(0, 10));
        assert!(query.sorting.is_empty());
        assert!(query.column_filters.is_empty());
        assert!(query.global_filter.is_empty());
    }

    #[test]
    fn test_zero_page_size_fails_validation() {
        assert!(Pagination::new(0, 0).validate().is_err());
        assert!(Pagination::new(3, 1).validate().is_ok());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let value = serde_json::to_value(IncidentPage::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "data": [], "pageCount": 0, "totalCount": 0 })
        );
    }

    #[test]
    fn test_pagination_start_saturates() {
        assert_eq!(Pagination::new(2, 10).start(), 20);
        assert_eq!(Pagination::new(usize::MAX, 2).start(), usize::MAX);
    }

    #[test]
    fn test_column_lookup() {
        for column in Column::ALL {
            assert_eq!(Column::from_id(column.id()), Some(column));
        }
        assert_eq!(Column::from_id("priority"), None);
        assert!(Column::Severity.is_categorical());
        assert!(!Column::Location.is_categorical());
    }
}
