//! Wire schemas for API requests and responses. Every list response is
//! deserialized against an explicit shape so a malformed body fails at the
//! boundary instead of leaking into the view layer.

use serde::{Deserialize, Serialize};

use crate::model::{Availability, Doctor, Pagination, Qualification, Schedule};

/// Confirmation body returned by mutation endpoints.
#[derive(Debug, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

impl Confirmation {
    pub fn text(&self, fallback: &'static str) -> String {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub(super) user: LoginUser<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginUser<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) role: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub contact_number: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DoctorPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub contact_number: String,

    /// Qualification ids selected for the new doctor.
    pub qualifications: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DayPlan {
    pub day: String,
    pub time: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoctorsPage {
    pub doctors: Vec<Doctor>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct QualificationsPage {
    pub qualifications: Vec<Qualification>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct SchedulesPage {
    pub schedules: Vec<Schedule>,
    pub pagination: Pagination,
}

/// `GET /schedules/:id/availabilities` nests the slots under the schedule.
#[derive(Debug, Deserialize)]
pub struct AvailabilitiesPage {
    pub schedule: ScheduleSlots,

    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleSlots {
    pub availabilities: Vec<Availability>,
}
