//! Doctor roster and qualification catalog operations.

use super::*;

impl ApiClient {
    pub fn list_doctors(&self, page: u32) -> Result<DoctorsPage, ApiError> {
        let rb = self.authed(self.get(&format!("/doctors?page={}", page)))?;
        self.send_json(rb, "list doctors")
    }

    pub fn create_doctor(&self, doctor: &DoctorPayload) -> Result<Confirmation, ApiError> {
        let rb = self
            .authed(self.post("/doctors"))?
            .json(&serde_json::json!({ "doctor": doctor }));
        self.send_json(rb, "create doctor")
    }

    pub fn list_qualifications(&self, page: u32) -> Result<QualificationsPage, ApiError> {
        let rb = self.authed(self.get(&format!("/qualifications?page={}", page)))?;
        self.send_json(rb, "list qualifications")
    }

    pub fn create_qualification(
        &self,
        degree: &str,
        description: &str,
    ) -> Result<Confirmation, ApiError> {
        let rb = self.authed(self.post("/qualifications"))?.json(&serde_json::json!({
            "qualification": { "degree": degree, "description": description }
        }));
        self.send_json(rb, "create qualification")
    }
}
