//! Collaborators owned by the host learning platform.
//!
//! The batches never persist anything themselves: accounts, identity records,
//! enrollments and course reruns all go through these traits. Implementations
//! are expected to take part in the transaction opened by the
//! [`TransactionManager`](crate::core::transaction::TransactionManager).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BatchError, config::EnrollMode, course_key::CourseKey};

pub type AccountId = u64;

/// A user account of the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    /// Profile display name
    pub full_name: String,
}

/// Data needed to register a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Personal data stored next to a national ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFields {
    /// Canonical form, see [`crate::national_id::canonicalize`]
    pub national_id: String,
    pub first_names: String,
    pub last_name_p: String,
    pub last_name_m: String,
    pub birth_date: String,
    pub phone: String,
}

/// Association between a national ID and an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub fields: IdentityFields,
    pub account: Account,
}

pub trait UserDirectory {
    fn username_exists(&self, username: &str) -> bool;

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, BatchError>;

    /// Registers and activates a new account.
    fn create_account(&self, account: NewAccount) -> Result<Account, BatchError>;
}

/// Storage of identity records, an optional companion of the host.
pub trait IdentityStore {
    fn find_by_national_id(&self, national_id: &str) -> Result<Option<IdentityRecord>, BatchError>;

    fn find_by_account(&self, account: &Account) -> Result<Option<IdentityRecord>, BatchError>;

    fn create(&self, fields: IdentityFields, account: &Account) -> Result<IdentityRecord, BatchError>;
}

pub trait CourseCatalog {
    fn course_exists(&self, course: &CourseKey) -> bool;

    fn display_name(&self, course: &CourseKey) -> Result<String, BatchError>;

    fn enroll(&self, account: &Account, course: &CourseKey, mode: EnrollMode) -> Result<(), BatchError>;

    fn unenroll(&self, account: &Account, course: &CourseKey) -> Result<(), BatchError>;
}

/// Settings of the course created by a rerun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerunFields {
    pub display_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub wiki_slug: String,
}

/// A rerun the authoring side is still working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerunState {
    pub source_course: CourseKey,
    pub new_course: CourseKey,
    pub display_name: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseSchedule {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

pub trait CourseAuthoring {
    /// Staff, instructor or course staff access to `course`.
    fn has_permission(&self, user: &Account, course: &CourseKey) -> bool;

    /// Starts a rerun of `source` into `target`. `Ok(None)` when the authoring
    /// side accepted the request but produced no course.
    fn rerun_course(
        &self,
        user: &Account,
        source: &CourseKey,
        target: &CourseKey,
        fields: &RerunFields,
    ) -> Result<Option<CourseKey>, BatchError>;

    fn in_process_reruns(&self) -> Result<Vec<RerunState>, BatchError>;

    fn update_schedule(
        &self,
        user: &Account,
        course: &CourseKey,
        schedule: &CourseSchedule,
    ) -> Result<(), BatchError>;
}
