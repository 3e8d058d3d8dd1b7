#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # bulk-enroll-rs

 Batch core for enrolling people in courses of a learning platform from
 operator-supplied files, and for rerunning courses in bulk.

 ## Core Concepts

- **Step:** reads rows one at a time, processes them and hands the results to
  a writer in chunks. The enrollment and rerun batches are single steps.
- **ItemReader:** the source of rows, a CSV upload or an in-memory list.
- **ItemProcessor:** the per-row rules. A row that fails a check gets a status,
  only unexpected failures stop the step.
- **ItemWriter:** collects the result table, one row out per row in.
- **Unit of work:** an enrollment batch runs inside one transaction of the
  host storage, committed at the end or rolled back on error.

 The host platform stays behind traits (`platform` module): accounts,
 identity records, the course catalog and course authoring.

 ## Features

| **Feature** | **Description**                                              |
|-------------|--------------------------------------------------------------|
| csv         | Enables CSV `ItemReader` and `ItemWriter`, and CSV reports    |
| full        | Enables all available features                               |

 ## Getting Started

```rust
# use std::cell::RefCell;
# use bulk_enroll_rs::{
#     BatchError,
#     config::EnrollMode,
#     course_key::CourseKey,
#     platform::{Account, CourseCatalog, IdentityFields, IdentityRecord, IdentityStore, NewAccount, UserDirectory},
# };
# #[derive(Default)]
# struct Host {
#     accounts: RefCell<Vec<Account>>,
#     records: RefCell<Vec<IdentityRecord>>,
# }
# impl UserDirectory for Host {
#     fn username_exists(&self, username: &str) -> bool {
#         self.accounts.borrow().iter().any(|a| a.username == username)
#     }
#     fn find_by_email(&self, email: &str) -> Result<Option<Account>, BatchError> {
#         Ok(self.accounts.borrow().iter().find(|a| a.email == email).cloned())
#     }
#     fn create_account(&self, new: NewAccount) -> Result<Account, BatchError> {
#         let account = Account { id: self.accounts.borrow().len() as u64 + 1, username: new.username, email: new.email, full_name: new.full_name };
#         self.accounts.borrow_mut().push(account.clone());
#         Ok(account)
#     }
# }
# impl IdentityStore for Host {
#     fn find_by_national_id(&self, id: &str) -> Result<Option<IdentityRecord>, BatchError> {
#         Ok(self.records.borrow().iter().find(|r| r.fields.national_id == id).cloned())
#     }
#     fn find_by_account(&self, account: &Account) -> Result<Option<IdentityRecord>, BatchError> {
#         Ok(self.records.borrow().iter().find(|r| r.account.id == account.id).cloned())
#     }
#     fn create(&self, fields: IdentityFields, account: &Account) -> Result<IdentityRecord, BatchError> {
#         let record = IdentityRecord { fields, account: account.clone() };
#         self.records.borrow_mut().push(record.clone());
#         Ok(record)
#     }
# }
# impl CourseCatalog for Host {
#     fn course_exists(&self, course: &CourseKey) -> bool { course.org() == "eol" }
#     fn display_name(&self, _: &CourseKey) -> Result<String, BatchError> { Ok("Demo".to_string()) }
#     fn enroll(&self, _: &Account, _: &CourseKey, _: EnrollMode) -> Result<(), BatchError> { Ok(()) }
#     fn unenroll(&self, _: &Account, _: &CourseKey) -> Result<(), BatchError> { Ok(()) }
# }
use bulk_enroll_rs::enroll::{EnrollmentBatchBuilder, read_enrollment_csv};

fn main() -> Result<(), BatchError> {
    let host = Host::default();
    let upload = "Email;Apellido Paterno;Apellido Materno;Nombres;RUT;Fecha de Nacimiento;Fono;Id curso\r\n\
                  ana@edx.org;Soto;Rojas;Ana;11111111-1;01/01/2000;555;course-v1:eol+Demo+2024\r\n\
                  asd@edx.org\r\n";

    let batch = EnrollmentBatchBuilder::new()
        .users(&host)
        .identities(&host)
        .catalog(&host)
        .mode(EnrollMode::Honor)
        .build()?;

    let report = batch.run(&read_enrollment_csv(upload.as_bytes()))?;

    assert_eq!(report.statuses(), vec!["Creado e Inscrito", "Faltan datos"]);
    assert_eq!(report.output_table[0][8], "ana_soto");
    assert_eq!(report.notifications.len(), 1);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Tunables and enrollment modes
pub mod config;

/// Core module for batch operations
pub mod core;

/// Course run identifiers
pub mod course_key;

/// Bulk enrollment by national ID
pub mod enroll;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers (csv and in-memory)
pub mod item;

pub mod national_id;

pub mod notification;

/// Collaborators provided by the host platform
pub mod platform;

pub mod rerun;

pub mod template;

pub mod username;
