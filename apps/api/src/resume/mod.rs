//! HTTP surface of the resume document, plus the creation checks the editor
//! forms apply before an entry reaches the store.

pub mod handlers;

use crate::errors::FieldErrors;
use crate::models::resume::{NewEducation, NewExperience};

pub fn validate_new_education(entry: &NewEducation) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "school", &entry.school, "School is required");
    require(&mut errors, "degree", &entry.degree, "Degree is required");
    errors
}

pub fn validate_new_experience(entry: &NewExperience) -> FieldErrors {
    let mut errors = FieldErrors::new();
    require(&mut errors, "company", &entry.company, "Company is required");
    require(&mut errors, "position", &entry.position, "Position is required");
    errors
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message.to_string());
    }
}
