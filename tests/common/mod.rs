#![allow(dead_code)]

pub mod mocks;

pub use mocks::{MockAuthoring, MockFile};

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use bulk_enroll_rs::{
    BatchError,
    config::EnrollMode,
    core::transaction::TransactionManager,
    course_key::CourseKey,
    platform::{
        Account, CourseCatalog, IdentityFields, IdentityRecord, IdentityStore, NewAccount,
        UserDirectory,
    },
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Default)]
struct State {
    accounts: Vec<Account>,
    identities: Vec<IdentityRecord>,
    enrollments: Vec<(String, CourseKey, EnrollMode)>,
}

/// Host platform kept in memory. Transactions snapshot the whole state and
/// restore it on rollback.
#[derive(Default)]
pub struct InMemoryPlatform {
    state: RefCell<State>,
    snapshot: RefCell<Option<State>>,
    courses: RefCell<HashMap<CourseKey, String>>,
    failing_course: RefCell<Option<CourseKey>>,
    /// Calls made to the account, identity and course traits
    pub calls: Cell<usize>,
    pub display_name_lookups: Cell<usize>,
    /// `begin`, `commit` and `rollback`, in call order
    pub journal: RefCell<Vec<&'static str>>,
}

impl InMemoryPlatform {
    fn count(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    pub fn add_course(&self, id: &str, name: &str) -> CourseKey {
        let key: CourseKey = id.parse().unwrap();
        self.courses.borrow_mut().insert(key.clone(), name.to_string());
        key
    }

    /// `enroll` fails for this course.
    pub fn fail_enrollments_in(&self, course: &CourseKey) {
        *self.failing_course.borrow_mut() = Some(course.clone());
    }

    pub fn add_account(&self, username: &str, email: &str, full_name: &str) -> Account {
        let mut state = self.state.borrow_mut();
        let account = Account {
            id: state.accounts.len() as u64 + 1,
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
        };
        state.accounts.push(account.clone());
        account
    }

    pub fn link_identity(&self, national_id: &str, account: &Account) {
        self.state.borrow_mut().identities.push(IdentityRecord {
            fields: IdentityFields {
                national_id: national_id.to_string(),
                first_names: String::new(),
                last_name_p: String::new(),
                last_name_m: String::new(),
                birth_date: String::new(),
                phone: String::new(),
            },
            account: account.clone(),
        });
    }

    pub fn enroll_directly(&self, account: &Account, course: &CourseKey) {
        self.state
            .borrow_mut()
            .enrollments
            .push((account.username.clone(), course.clone(), EnrollMode::Honor));
    }

    pub fn account_by_email(&self, email: &str) -> Option<Account> {
        self.state
            .borrow()
            .accounts
            .iter()
            .find(|account| account.email == email)
            .cloned()
    }

    pub fn account_count(&self) -> usize {
        self.state.borrow().accounts.len()
    }

    pub fn identity(&self, national_id: &str) -> Option<IdentityRecord> {
        self.state
            .borrow()
            .identities
            .iter()
            .find(|record| record.fields.national_id == national_id)
            .cloned()
    }

    pub fn identity_count(&self) -> usize {
        self.state.borrow().identities.len()
    }

    pub fn enrollment_count(&self) -> usize {
        self.state.borrow().enrollments.len()
    }

    pub fn is_enrolled(&self, username: &str, course: &CourseKey) -> bool {
        self.state
            .borrow()
            .enrollments
            .iter()
            .any(|(enrolled, key, _)| enrolled == username && key == course)
    }

    pub fn mode_of(&self, username: &str, course: &CourseKey) -> Option<EnrollMode> {
        self.state
            .borrow()
            .enrollments
            .iter()
            .find(|(enrolled, key, _)| enrolled == username && key == course)
            .map(|(_, _, mode)| *mode)
    }
}

impl UserDirectory for InMemoryPlatform {
    fn username_exists(&self, username: &str) -> bool {
        self.count();
        self.state
            .borrow()
            .accounts
            .iter()
            .any(|account| account.username == username)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, BatchError> {
        self.count();
        Ok(self.account_by_email(email))
    }

    fn create_account(&self, account: NewAccount) -> Result<Account, BatchError> {
        self.count();
        if self.account_by_email(&account.email).is_some() {
            return Err(BatchError::Platform(format!(
                "duplicate email {}",
                account.email
            )));
        }
        assert_eq!(account.password.len(), 12);
        Ok(self.add_account(&account.username, &account.email, &account.full_name))
    }
}

impl IdentityStore for InMemoryPlatform {
    fn find_by_national_id(&self, national_id: &str) -> Result<Option<IdentityRecord>, BatchError> {
        self.count();
        Ok(self.identity(national_id))
    }

    fn find_by_account(&self, account: &Account) -> Result<Option<IdentityRecord>, BatchError> {
        self.count();
        Ok(self
            .state
            .borrow()
            .identities
            .iter()
            .find(|record| record.account.id == account.id)
            .cloned())
    }

    fn create(&self, fields: IdentityFields, account: &Account) -> Result<IdentityRecord, BatchError> {
        self.count();
        let record = IdentityRecord {
            fields,
            account: account.clone(),
        };
        self.state.borrow_mut().identities.push(record.clone());
        Ok(record)
    }
}

impl CourseCatalog for InMemoryPlatform {
    fn course_exists(&self, course: &CourseKey) -> bool {
        self.count();
        self.courses.borrow().contains_key(course)
    }

    fn display_name(&self, course: &CourseKey) -> Result<String, BatchError> {
        self.count();
        self.display_name_lookups
            .set(self.display_name_lookups.get() + 1);
        self.courses
            .borrow()
            .get(course)
            .cloned()
            .ok_or_else(|| BatchError::Platform(format!("no course {}", course)))
    }

    fn enroll(&self, account: &Account, course: &CourseKey, mode: EnrollMode) -> Result<(), BatchError> {
        self.count();
        if self.failing_course.borrow().as_ref() == Some(course) {
            return Err(BatchError::Platform(format!("enrollment in {} refused", course)));
        }
        self.state
            .borrow_mut()
            .enrollments
            .push((account.username.clone(), course.clone(), mode));
        Ok(())
    }

    fn unenroll(&self, account: &Account, course: &CourseKey) -> Result<(), BatchError> {
        self.count();
        self.state
            .borrow_mut()
            .enrollments
            .retain(|(enrolled, key, _)| !(enrolled == &account.username && key == course));
        Ok(())
    }
}

impl TransactionManager for InMemoryPlatform {
    fn begin(&self) -> Result<(), BatchError> {
        self.journal.borrow_mut().push("begin");
        *self.snapshot.borrow_mut() = Some(self.state.borrow().clone());
        Ok(())
    }

    fn commit(&self) -> Result<(), BatchError> {
        self.journal.borrow_mut().push("commit");
        self.snapshot.borrow_mut().take();
        Ok(())
    }

    fn rollback(&self) -> Result<(), BatchError> {
        self.journal.borrow_mut().push("rollback");
        if let Some(snapshot) = self.snapshot.borrow_mut().take() {
            *self.state.borrow_mut() = snapshot;
        }
        Ok(())
    }
}
