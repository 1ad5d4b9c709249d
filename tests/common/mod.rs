#![allow(dead_code)]

use chrono::NaiveDate;
use safedesk::config::init_test_logging;
use safedesk::models::{Incident, IncidentType, Severity, Status};
use safedesk::service::LocalIncidentService;
use safedesk::store::IncidentRepository;

pub fn setup() {
    let _ = init_test_logging();
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// The three-incident dataset used by the worked scenarios
pub fn scenario_dataset() -> Vec<Incident> {
    vec![
        Incident::new(
            "INC-0001",
            "Warehouse A",
            IncidentType::ImpactDetection,
            Severity::High,
            Status::InProgress,
            date("2023-06-15"),
        ),
        Incident::new(
            "INC-0002",
            "Loading Bay 3",
            IncidentType::SystemOffline,
            Severity::Low,
            Status::Resolved,
            date("2023-07-20"),
        ),
        Incident::new(
            "INC-0003",
            "Storage Area B",
            IncidentType::FireAlarm,
            Severity::Medium,
            Status::Pending,
            date("2023-05-10"),
        ),
    ]
}

/// Reproducible generated dataset, samples included
pub fn demo_repository(count: usize) -> IncidentRepository {
    IncidentRepository::demo(count, true, Some(42)).unwrap()
}

pub fn immediate_service(incidents: Vec<Incident>) -> LocalIncidentService {
    LocalIncidentService::immediate(IncidentRepository::new(incidents).unwrap())
}
