use std::{cell::RefCell, collections::HashMap};

use log::{debug, info, warn};
use rand::distr::{Alphanumeric, SampleString};
use regex::Regex;

use crate::{
    BatchError,
    config::{BatchConfig, EnrollMode},
    core::item::{ItemProcessor, ItemProcessorResult},
    course_key::CourseKey,
    national_id,
    notification::NotificationPayload,
    platform::{Account, CourseCatalog, IdentityFields, IdentityStore, NewAccount, UserDirectory},
    username::{NameParts, UsernameGenerator},
};

use super::{
    row::{ENROLL_COLUMNS, EnrollmentRow},
    status::EnrollStatus,
};

/// Result of one enrollment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    /// The eight named input columns, padded, or a wide row as echoed
    pub fields: Vec<String>,
    /// Empty unless the row was enrolled
    pub username: String,
    pub status: EnrollStatus,
    pub notification: Option<NotificationPayload>,
}

impl EnrollmentOutcome {
    fn rejected(row: &EnrollmentRow, status: EnrollStatus) -> Self {
        EnrollmentOutcome {
            fields: row.padded(),
            username: String::new(),
            status,
            notification: None,
        }
    }

    /// The row as it appears in the result table.
    ///
    /// Rows wider than the table keep their own columns: a username, when
    /// there is one, overwrites the ninth.
    pub fn output_row(&self) -> Vec<String> {
        let mut output = self.fields.clone();
        if output.len() > ENROLL_COLUMNS {
            if !self.username.is_empty() {
                output[ENROLL_COLUMNS] = self.username.clone();
            }
        } else {
            output.push(self.username.clone());
        }
        output.push(self.status.to_string());
        output
    }
}

/// Resolves, creates and enrolls the account behind each row.
///
/// Checks are applied in a fixed order and the first failing one decides the
/// row status. Collaborator failures are not statuses: they stop the batch.
pub struct EnrollmentProcessor<'a> {
    users: &'a dyn UserDirectory,
    identities: &'a dyn IdentityStore,
    catalog: &'a dyn CourseCatalog,
    mode: EnrollMode,
    email_regex: Regex,
    generator: UsernameGenerator,
    password_length: usize,
    /// Display names already fetched during this batch
    course_names: RefCell<HashMap<CourseKey, String>>,
}

impl<'a> EnrollmentProcessor<'a> {
    pub fn new(
        users: &'a dyn UserDirectory,
        identities: &'a dyn IdentityStore,
        catalog: &'a dyn CourseCatalog,
        mode: EnrollMode,
        config: &BatchConfig,
    ) -> Result<Self, BatchError> {
        Ok(EnrollmentProcessor {
            users,
            identities,
            catalog,
            mode,
            email_regex: config.email_regex()?,
            generator: UsernameGenerator::new(
                config.username_max_length,
                config.username_suffix_headroom,
                config.username_max_suffix,
            ),
            password_length: config.password_length,
            course_names: RefCell::new(HashMap::new()),
        })
    }

    /// A malformed key is treated like a course that does not exist.
    fn resolve_course(&self, raw: &str) -> Option<CourseKey> {
        raw.trim()
            .parse::<CourseKey>()
            .ok()
            .filter(|course| self.catalog.course_exists(course))
    }

    fn course_name(&self, course: &CourseKey) -> Result<String, BatchError> {
        if let Some(name) = self.course_names.borrow().get(course) {
            return Ok(name.clone());
        }

        let name = self.catalog.display_name(course)?;
        self.course_names
            .borrow_mut()
            .insert(course.clone(), name.clone());
        Ok(name)
    }

    fn generate_password(&self) -> String {
        Alphanumeric
            .sample_string(&mut rand::rng(), self.password_length)
            .to_lowercase()
    }

    fn create_account(
        &self,
        row: &EnrollmentRow,
        email: &str,
        password: &str,
    ) -> Result<Account, BatchError> {
        let parts = NameParts::new(
            row.first_names(),
            &format!("{} {}", row.last_name_p(), row.last_name_m()),
        );
        let username = self
            .generator
            .generate(&parts, |candidate| self.users.username_exists(candidate))?;

        let full_name = [row.first_names(), row.last_name_p(), row.last_name_m()]
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        self.users.create_account(NewAccount {
            username,
            email: email.to_string(),
            full_name,
            password: password.to_string(),
        })
    }
}

fn identity_fields(row: &EnrollmentRow, national_id: &str) -> IdentityFields {
    IdentityFields {
        national_id: national_id.to_string(),
        first_names: row.first_names().trim().to_string(),
        last_name_p: row.last_name_p().trim().to_string(),
        last_name_m: row.last_name_m().trim().to_string(),
        birth_date: row.birth_date().trim().to_string(),
        phone: row.phone().trim().to_string(),
    }
}

impl ItemProcessor<EnrollmentRow, EnrollmentOutcome> for EnrollmentProcessor<'_> {
    fn process(&self, row: &EnrollmentRow) -> ItemProcessorResult<EnrollmentOutcome> {
        if !row.is_complete() {
            debug!("Row with {} columns skipped", row.raw_fields.len());
            return Ok(EnrollmentOutcome::rejected(row, EnrollStatus::MissingData));
        }

        if !national_id::is_valid(row.national_id()) {
            debug!("Invalid national id: {}", row.national_id());
            return Ok(EnrollmentOutcome::rejected(row, EnrollStatus::InvalidNationalId));
        }

        let Some(course) = self.resolve_course(row.course_id()) else {
            debug!("Unknown course: {}", row.course_id());
            return Ok(EnrollmentOutcome::rejected(row, EnrollStatus::InvalidCourse));
        };

        let national_id = national_id::canonicalize(row.national_id());
        let email = row.email().trim().to_lowercase();

        let (account, password, status) = match self.identities.find_by_national_id(&national_id)? {
            Some(record) => (record.account, String::new(), EnrollStatus::Enrolled),
            None => match self.users.find_by_email(&email)? {
                Some(account) => {
                    if self.identities.find_by_account(&account)?.is_some() {
                        warn!(
                            "Email {} already belongs to another national id, {} skipped",
                            email, national_id
                        );
                        return Ok(EnrollmentOutcome::rejected(
                            row,
                            EnrollStatus::EmailLinkedToOtherId,
                        ));
                    }
                    self.identities
                        .create(identity_fields(row, &national_id), &account)?;
                    (account, String::new(), EnrollStatus::Enrolled)
                }
                None => {
                    if !self.email_regex.is_match(&email) {
                        debug!("Malformed email: {}", email);
                        return Ok(EnrollmentOutcome::rejected(row, EnrollStatus::InvalidEmail));
                    }
                    let password = self.generate_password();
                    let account = self.create_account(row, &email, &password)?;
                    self.identities
                        .create(identity_fields(row, &national_id), &account)?;
                    info!("Account {} created for {}", account.username, national_id);
                    (account, password, EnrollStatus::CreatedAndEnrolled)
                }
            },
        };

        self.catalog.enroll(&account, &course, self.mode)?;
        let course_name = self.course_name(&course)?;
        info!("{} enrolled in {} as {}", account.username, course, self.mode);

        Ok(EnrollmentOutcome {
            fields: row.padded(),
            username: account.username.clone(),
            status,
            notification: Some(NotificationPayload {
                email: account.email.clone(),
                user_name: account.full_name.trim().to_string(),
                password,
                course_name,
            }),
        })
    }
}
