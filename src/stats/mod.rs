//! Aggregates behind the dashboard charts and metric cards.

use serde::{Deserialize, Serialize};

use crate::models::{Incident, Severity, Status};

pub const TOP_LOCATIONS: usize = 5;
pub const RECENT_INCIDENTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCount {
    pub severity: Severity,
    pub incidents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: Status,
    pub incidents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationCount {
    pub location: String,
    pub incidents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub severity_distribution: Vec<SeverityCount>,
    pub status_breakdown: Vec<StatusCount>,
    pub top_locations: Vec<LocationCount>,
    pub recent: Vec<Incident>,
}

/// Count per severity, in enumeration order, zeros included.
pub fn severity_distribution(incidents: &[Incident]) -> Vec<SeverityCount> {
    Severity::ALL
        .iter()
        .map(|severity| SeverityCount {
            severity: *severity,
            incidents: incidents.iter().filter(|i| i.severity == *severity).count(),
        })
        .collect()
}

pub fn status_breakdown(incidents: &[Incident]) -> Vec<StatusCount> {
    Status::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            incidents: incidents.iter().filter(|i| i.status == *status).count(),
        })
        .collect()
}

/// Location group key: the first word of a multi-word location.
fn location_group(location: &str) -> &str {
    location.split(' ').next().unwrap_or(location)
}

/// Busiest location groups, most incidents first; ties keep first-seen order.
pub fn top_locations(incidents: &[Incident], limit: usize) -> Vec<LocationCount> {
    let mut groups: Vec<LocationCount> = Vec::new();

    for incident in incidents {
        let key = location_group(&incident.location);
        match groups.iter_mut().find(|group| group.location == key) {
            Some(group) => group.incidents += 1,
            None => groups.push(LocationCount {
                location: key.to_string(),
                incidents: 1,
            }),
        }
    }

    groups.sort_by(|a, b| b.incidents.cmp(&a.incidents));
    groups.truncate(limit);
    groups
}

pub fn recent_incidents(incidents: &[Incident], limit: usize) -> Vec<Incident> {
    incidents.iter().take(limit).cloned().collect()
}

pub fn dashboard_stats(incidents: &[Incident]) -> DashboardStats {
    DashboardStats {
        total: incidents.len(),
        severity_distribution: severity_distribution(incidents),
        status_breakdown: status_breakdown(incidents),
        top_locations: top_locations(incidents, TOP_LOCATIONS),
        recent: recent_incidents(incidents, RECENT_INCIDENTS),
    }
}
