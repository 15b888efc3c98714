//! Session lifecycle and patient self-registration.

use super::*;

impl ApiClient {
    /// `POST /session`. Succeeds with the full session entity; the caller
    /// persists it.
    pub fn login(&self, email: &str, password: &str, role: &str) -> Result<Session, ApiError> {
        let rb = self.post("/session").json(&LoginRequest {
            user: LoginUser {
                email,
                password,
                role,
            },
        });
        self.send_json(rb, "login")
    }

    /// `DELETE /session`. The caller clears the local store regardless of
    /// the outcome; a token the server no longer accepts is just as logged
    /// out.
    pub fn logout(&self) -> Result<(), ApiError> {
        let rb = self.authed(self.client.delete(self.url("/session")))?;
        let _: Confirmation = self.send_json(rb, "logout")?;
        Ok(())
    }

    /// `POST /patients`. The one unauthenticated mutation.
    pub fn register_patient(&self, patient: &PatientPayload) -> Result<Confirmation, ApiError> {
        let rb = self
            .post("/patients")
            .json(&serde_json::json!({ "patient": patient }));
        self.send_json(rb, "register patient")
    }
}
