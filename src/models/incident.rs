use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Column;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    Resolved,
    #[serde(rename = "In Progress")]
    InProgress,
    Pending,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Resolved, Status::InProgress, Status::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Resolved => "Resolved",
            Status::InProgress => "In Progress",
            Status::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IncidentType {
    #[serde(rename = "Impact Detection")]
    ImpactDetection,
    #[serde(rename = "Barrier Breach")]
    BarrierBreach,
    #[serde(rename = "System Offline")]
    SystemOffline,
    #[serde(rename = "Unauthorized Access")]
    UnauthorizedAccess,
    #[serde(rename = "Fire Alarm")]
    FireAlarm,
    #[serde(rename = "Equipment Failure")]
    EquipmentFailure,
}

impl IncidentType {
    pub const ALL: [IncidentType; 6] = [
        IncidentType::ImpactDetection,
        IncidentType::BarrierBreach,
        IncidentType::SystemOffline,
        IncidentType::UnauthorizedAccess,
        IncidentType::FireAlarm,
        IncidentType::EquipmentFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::ImpactDetection => "Impact Detection",
            IncidentType::BarrierBreach => "Barrier Breach",
            IncidentType::SystemOffline => "System Offline",
            IncidentType::UnauthorizedAccess => "Unauthorized Access",
            IncidentType::FireAlarm => "Fire Alarm",
            IncidentType::EquipmentFailure => "Equipment Failure",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

display_as_str!(Severity, Status, IncidentType);

/// A workplace safety event.
///
/// `date` is a calendar date and serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct Incident {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub status: Status,
    pub date: NaiveDate,
}

impl Incident {
    pub fn new(
        id: impl Into<String>,
        location: impl Into<String>,
        incident_type: IncidentType,
        severity: Severity,
        status: Status,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            incident_type,
            severity,
            status,
            date,
        }
    }

    /// String representation of a column, as used by text matching and sorting.
    pub fn column_value(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::Id => Cow::Borrowed(&self.id),
            Column::Location => Cow::Borrowed(&self.location),
            Column::Type => Cow::Borrowed(self.incident_type.as_str()),
            Column::Severity => Cow::Borrowed(self.severity.as_str()),
            Column::Status => Cow::Borrowed(self.status.as_str()),
            Column::Date => Cow::Owned(self.date.format("%Y-%m-%d").to_string()),
        }
    }
}

impl std::fmt::Display for Incident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} - {} at {} ({}, {})",
            self.severity, self.id, self.incident_type, self.location, self.status, self.date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Incident {
        Incident::new(
            "INC-0001",
            "Warehouse A",
            IncidentType::ImpactDetection,
            Severity::High,
            Status::InProgress,
            NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
        )
    }

    #[test]
    fn test_incident_serialization_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "INC-0001",
                "location": "Warehouse A",
                "type": "Impact Detection",
                "severity": "High",
                "status": "In Progress",
                "date": "2023-06-15",
            })
        );
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let raw = r#"{"id":"INC-9","location":"Dock","type":"Flood","severity":"High","status":"Pending","date":"2023-01-01"}"#;
        assert!(serde_json::from_str::<Incident>(raw).is_err());
    }

    #[test]
    fn test_column_value() {
        let incident = sample();
        assert_eq!(incident.column_value(Column::Status), "In Progress");
        assert_eq!(incident.column_value(Column::Type), "Impact Detection");
        assert_eq!(incident.column_value(Column::Date), "2023-06-15");
    }

    #[test]
    fn test_empty_id_fails_validation() {
        let mut incident = sample();
        incident.id.clear();
        assert!(incident.validate().is_err());
    }

    #[test]
    fn test_incident_display() {
        assert_eq!(
            sample().to_string(),
            "[High] INC-0001 - Impact Detection at Warehouse A (In Progress, 2023-06-15)"
        );
    }
}
