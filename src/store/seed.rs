//! Demo dataset: ten fixed sample incidents plus randomly generated ones.

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::models::{Incident, IncidentType, Severity, Status};
use crate::{SafedeskError, SafedeskResult};

pub const LOCATIONS: [&str; 20] = [
    "Warehouse A",
    "Loading Bay 3",
    "Storage Area B",
    "Dispatch Zone",
    "Main Office",
    "Security Booth",
    "Loading Dock 2",
    "Warehouse B",
    "Storage Area C",
    "Entrance Gate",
    "North Wing",
    "South Wing",
    "East Wing",
    "West Wing",
    "Parking Lot",
    "Admin Building",
    "Maintenance Room",
    "Server Room",
    "Control Center",
    "Meeting Room",
];

/// Generated dates fall within this many days before `today`.
pub const DATE_WINDOW_DAYS: u64 = 365;

const SAMPLES: [(&str, IncidentType, Severity, Status); 10] = [
    ("Warehouse A", IncidentType::ImpactDetection, Severity::Medium, Status::Resolved),
    ("Loading Bay 3", IncidentType::BarrierBreach, Severity::High, Status::InProgress),
    ("Storage Area B", IncidentType::SystemOffline, Severity::Low, Status::Resolved),
    ("Dispatch Zone", IncidentType::ImpactDetection, Severity::Medium, Status::Pending),
    ("Entrance Gate", IncidentType::UnauthorizedAccess, Severity::High, Status::Resolved),
    ("Storage Area C", IncidentType::FireAlarm, Severity::Critical, Status::InProgress),
    ("Loading Dock 2", IncidentType::EquipmentFailure, Severity::Medium, Status::Resolved),
    ("Warehouse B", IncidentType::ImpactDetection, Severity::Low, Status::Pending),
    ("Main Office", IncidentType::SystemOffline, Severity::High, Status::Resolved),
    ("Security Booth", IncidentType::UnauthorizedAccess, Severity::Critical, Status::Resolved),
];

/// The fixed sample incidents `INC-001` to `INC-010`, one per day back from 2024-03-20.
pub fn sample_incidents() -> SafedeskResult<Vec<Incident>> {
    let first = NaiveDate::from_ymd_opt(2024, 3, 20)
        .ok_or_else(|| SafedeskError::Internal("invalid sample base date".to_string()))?;

    SAMPLES
        .iter()
        .enumerate()
        .map(|(offset, (location, incident_type, severity, status))| {
            let date = first.checked_sub_days(Days::new(offset as u64)).ok_or_else(|| {
                SafedeskError::Internal("sample date out of range".to_string())
            })?;
            Ok(Incident::new(
                format!("INC-{:03}", offset + 1),
                *location,
                *incident_type,
                *severity,
                *status,
                date,
            ))
        })
        .collect()
}

/// Random incidents numbered `INC-{first_number:04}` upward.
pub fn generate_incidents<R: Rng>(
    rng: &mut R,
    count: usize,
    first_number: usize,
    today: NaiveDate,
) -> Vec<Incident> {
    (first_number..first_number + count)
        .map(|number| {
            let days_back = rng.gen_range(0..DATE_WINDOW_DAYS);
            let date = today
                .checked_sub_days(Days::new(days_back))
                .unwrap_or(today);

            Incident::new(
                format!("INC-{:04}", number),
                LOCATIONS[rng.gen_range(0..LOCATIONS.len())],
                IncidentType::ALL[rng.gen_range(0..IncidentType::ALL.len())],
                Severity::ALL[rng.gen_range(0..Severity::ALL.len())],
                Status::ALL[rng.gen_range(0..Status::ALL.len())],
                date,
            )
        })
        .collect()
}

/// Samples followed by `count` generated incidents starting at `INC-0011`,
/// or generated incidents only, starting at `INC-0001`.
pub fn demo_dataset<R: Rng>(
    rng: &mut R,
    count: usize,
    include_samples: bool,
    today: NaiveDate,
) -> SafedeskResult<Vec<Incident>> {
    if include_samples {
        let mut incidents = sample_incidents()?;
        let first_number = incidents.len() + 1;
        incidents.extend(generate_incidents(rng, count, first_number, today));
        Ok(incidents)
    } else {
        Ok(generate_incidents(rng, count, 1, today))
    }
}
