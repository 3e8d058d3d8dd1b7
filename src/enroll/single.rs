use log::error;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    BatchError,
    config::EnrollMode,
    course_key::CourseKey,
    national_id,
    notification::NotificationPayload,
    platform::{CourseCatalog, IdentityRecord, IdentityStore},
};

use super::{row::EnrollmentRow, status::EnrollStatus};

fn blank(field: &str) -> String {
    format!("{}: This field may not be blank.", field)
}

/// The course must parse and exist.
fn existing_course(catalog: &dyn CourseCatalog, raw: &str) -> Result<CourseKey, String> {
    raw.parse::<CourseKey>()
        .ok()
        .filter(|course| catalog.course_exists(course))
        .ok_or_else(|| format!("course: Course key not valid or dont exists: {}", raw))
}

/// Enrollment of one person, as submitted through the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollRequest {
    pub email: String,
    /// Paternal last name
    pub lastname_1: String,
    /// Maternal last name, may be blank
    pub lastname_2: String,
    pub names: String,
    pub rut: String,
    pub birthday: String,
    pub phone: String,
    pub course: String,
    pub mode: String,
}

impl EnrollRequest {
    /// Checks every field and reports all problems at once.
    ///
    /// # Errors
    /// `BatchError::Validation` with one message per faulty field.
    pub fn validate(
        &self,
        catalog: &dyn CourseCatalog,
        email_regex: &Regex,
    ) -> Result<EnrollMode, BatchError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("email", &self.email),
            ("lastname_1", &self.lastname_1),
            ("names", &self.names),
            ("rut", &self.rut),
            ("course", &self.course),
        ] {
            if value.trim().is_empty() {
                errors.push(blank(field));
            }
        }

        if !self.email.trim().is_empty() && !email_regex.is_match(&self.email) {
            errors.push(format!("email: 'Email invalid': {}", self.email));
        }
        if !self.rut.trim().is_empty() && !national_id::is_valid(&self.rut) {
            errors.push(format!("rut: 'Rut/Passport invalid': {}", self.rut));
        }
        if !self.course.trim().is_empty() {
            errors.extend(existing_course(catalog, &self.course).err());
        }

        let mode = match self.mode.parse::<EnrollMode>() {
            Ok(mode) => Some(mode),
            Err(BatchError::Validation(messages)) => {
                errors.extend(messages.into_iter().map(|message| format!("mode: {}", message)));
                None
            }
            Err(other) => return Err(other),
        };

        match mode {
            Some(mode) if errors.is_empty() => Ok(mode),
            _ => {
                error!("Enroll request rejected: {}", errors.join(", "));
                Err(BatchError::Validation(errors))
            }
        }
    }

    /// The request laid out as an enrollment file row.
    pub fn to_row(&self) -> EnrollmentRow {
        EnrollmentRow::from(vec![
            self.email.clone(),
            self.lastname_1.clone(),
            self.lastname_2.clone(),
            self.names.clone(),
            self.rut.clone(),
            self.birthday.clone(),
            self.phone.clone(),
            self.course.clone(),
        ])
    }
}

/// Result of a single enrollment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleEnrollment {
    pub status: EnrollStatus,
    pub username: String,
    pub notification: Option<NotificationPayload>,
}

/// Removal of the enrollment of a registered national ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnenrollRequest {
    pub rut: String,
    pub course: String,
}

impl UnenrollRequest {
    /// Resolves the identity record and the course, reporting all problems
    /// at once.
    pub fn validate(
        &self,
        identities: &dyn IdentityStore,
        catalog: &dyn CourseCatalog,
    ) -> Result<(IdentityRecord, CourseKey), BatchError> {
        let mut errors = Vec::new();

        let record = if national_id::is_valid(&self.rut) {
            let canonical = national_id::canonicalize(&self.rut);
            let record = identities.find_by_national_id(&canonical)?;
            if record.is_none() {
                errors.push(format!("rut: 'Rut/Passport is not registered': {}", canonical));
            }
            record
        } else {
            errors.push(format!("rut: 'Rut/Passport invalid': {}", self.rut));
            None
        };

        let course = match existing_course(catalog, &self.course) {
            Ok(course) => Some(course),
            Err(message) => {
                errors.push(message);
                None
            }
        };

        match (record, course) {
            (Some(record), Some(course)) => Ok((record, course)),
            _ => {
                error!("Unenroll request rejected: {}", errors.join(", "));
                Err(BatchError::Validation(errors))
            }
        }
    }
}
