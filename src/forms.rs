//! Client-side form validation, run in full before any request is issued.
//!
//! Each form declares its fields against the shared rule set in [`rules`];
//! a submission with any field error never reaches the network.

mod rules;

pub use rules::{Field, FieldErrors, Rule, validate};

use crate::remote::{DoctorPayload, PatientPayload};

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate(&[
            Field::new("email", &self.email, &[Rule::Required, Rule::Email]),
            Field::new("password", &self.password, &[Rule::Required]),
            Field::new("role", &self.role, &[Rule::Required]),
        ])
    }
}

#[derive(Clone, Debug, Default)]
pub struct PatientRegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub contact_number: String,
}

impl PatientRegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate(&[
            Field::new("first_name", &self.first_name, &[Rule::Required]),
            Field::new("last_name", &self.last_name, &[Rule::Required]),
            Field::new("email", &self.email, &[Rule::Required, Rule::Email]),
            Field::new("password", &self.password, &[Rule::Required]),
            Field::new(
                "password_confirmation",
                &self.password_confirmation,
                &[Rule::Required, Rule::Matches("password")],
            ),
            Field::new("contact_number", &self.contact_number, &[Rule::Required]),
        ])
    }

    pub fn payload(&self) -> PatientPayload {
        PatientPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            contact_number: self.contact_number.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DoctorForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub contact_number: String,
    pub qualifications: Vec<String>,
}

impl DoctorForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate(&[
            Field::new("first_name", &self.first_name, &[Rule::Required, Rule::Alpha]),
            Field::new("last_name", &self.last_name, &[Rule::Required, Rule::Alpha]),
            Field::new("email", &self.email, &[Rule::Required, Rule::Email]),
            Field::new("password", &self.password, &[Rule::Required, Rule::MinLen(8)]),
            Field::new(
                "password_confirmation",
                &self.password_confirmation,
                &[Rule::Required, Rule::Matches("password")],
            ),
            Field::new(
                "contact_number",
                &self.contact_number,
                &[Rule::Required, Rule::Digits(10)],
            ),
        ])
    }

    pub fn payload(&self) -> DoctorPayload {
        DoctorPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            contact_number: self.contact_number.clone(),
            qualifications: self.qualifications.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QualificationForm {
    pub degree: String,
    pub description: String,
}

impl QualificationForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate(&[
            Field::new("degree", &self.degree, &[Rule::Required, Rule::AlphaSpace]),
            Field::new(
                "description",
                &self.description,
                &[Rule::Required, Rule::AlphaSpace],
            ),
        ])
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScheduleForm {
    pub doctor_id: String,
    pub day: String,
    pub times: Vec<String>,
}

impl ScheduleForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errs = validate(&[
            Field::new("doctor", &self.doctor_id, &[Rule::Required]),
            Field::new("day", &self.day, &[Rule::Required]),
        ])
        .err()
        .unwrap_or_default();
        rules::validate_times(&mut errs, &self.times);
        errs.into_result()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AvailabilityForm {
    pub schedule_id: String,
    pub times: Vec<String>,
}

impl AvailabilityForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errs = validate(&[Field::new("schedule", &self.schedule_id, &[Rule::Required])])
            .err()
            .unwrap_or_default();
        if self.times.is_empty() {
            errs.push("time", "At least one time slot is required");
        }
        rules::validate_times(&mut errs, &self.times);
        errs.into_result()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppointmentForm {
    pub schedule_id: String,
    pub availability_id: String,
}

impl AppointmentForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate(&[
            Field::new("schedule", &self.schedule_id, &[Rule::Required]),
            Field::new("availability", &self.availability_id, &[Rule::Required]),
        ])
    }
}
