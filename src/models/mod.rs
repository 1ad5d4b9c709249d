// Public exports for data models

pub mod incident;
pub mod query;

pub use incident::{Incident, IncidentType, Severity, Status};
pub use query::{
    Column, ColumnFilter, FilterOptions, FilterValue, IncidentPage, IncidentQuery, Pagination,
    SortDescriptor,
};
