use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{AppointmentId, ClientId, UserId};

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parses a zero-padded 24-hour time of day (`HH:MM` or `HH:MM:SS`).
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<UserId>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl Appointment {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_time_of_day(&self.start_time).map(|time| self.date.and_time(time))
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        parse_time_of_day(&self.end_time).map(|time| self.date.and_time(time))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
}

impl ClientRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}
