//! Schedules, availabilities, and appointment booking.

use super::*;

impl ApiClient {
    pub fn create_schedule(&self, doctor_id: &str, days: &[DayPlan]) -> Result<Confirmation, ApiError> {
        let rb = self.authed(self.post("/schedules"))?.json(&serde_json::json!({
            "schedule": { "doctor": doctor_id, "days": days }
        }));
        self.send_json(rb, "create schedule")
    }

    pub fn list_doctor_schedules(
        &self,
        doctor_id: &str,
        page: u32,
    ) -> Result<SchedulesPage, ApiError> {
        let rb = self.authed(self.get(&format!(
            "/doctors/{}/schedules?page={}",
            doctor_id, page
        )))?;
        self.send_json(rb, "list schedules")
    }

    /// `PATCH /doctors/:id/schedules/:sid` toggling the holiday flag.
    pub fn set_schedule_holiday(
        &self,
        doctor_id: &str,
        schedule_id: &str,
        is_holiday: bool,
    ) -> Result<Confirmation, ApiError> {
        let rb = self
            .authed(
                self.client
                    .patch(self.url(&format!("/doctors/{}/schedules/{}", doctor_id, schedule_id))),
            )?
            .json(&serde_json::json!({ "schedule": { "is_holiday": is_holiday } }));
        self.send_json(rb, "update schedule")
    }

    pub fn create_availabilities(
        &self,
        schedule_id: &str,
        times: &[String],
    ) -> Result<Confirmation, ApiError> {
        let rb = self.authed(self.post("/availabilities"))?.json(&serde_json::json!({
            "availabilities": { "time": times, "schedule_id": schedule_id }
        }));
        self.send_json(rb, "create availabilities")
    }

    pub fn list_availabilities(
        &self,
        schedule_id: &str,
        page: u32,
    ) -> Result<AvailabilitiesPage, ApiError> {
        let rb = self.authed(self.get(&format!(
            "/schedules/{}/availabilities?page={}",
            schedule_id, page
        )))?;
        self.send_json(rb, "list availabilities")
    }

    pub fn book_appointment(
        &self,
        doctor_id: &str,
        schedule_id: &str,
        availability_id: &str,
    ) -> Result<Confirmation, ApiError> {
        let rb = self.authed(self.post("/appointments"))?.json(&serde_json::json!({
            "appointment": {
                "doctor_id": doctor_id,
                "schedule_id": schedule_id,
                "availability_id": availability_id,
            }
        }));
        self.send_json(rb, "book appointment")
    }
}
