//! Resource records mirrored verbatim from server responses.
//!
//! The client enforces nothing on these beyond what a selection control
//! needs (an id plus a display label); the server owns their rules.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(default)]
    pub contact_number: Option<String>,

    #[serde(default)]
    pub qualifications: Vec<QualificationRef>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

/// Qualification as embedded in a doctor record (degree only).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualificationRef {
    #[serde(default)]
    pub id: Option<String>,
    pub degree: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Qualification {
    pub id: String,
    pub degree: String,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub date: String,

    #[serde(default)]
    pub is_holiday: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Availability {
    pub id: String,
    pub time: String,
}
