use log::info;

use crate::{
    BatchError,
    config::{BatchConfig, EnrollMode},
    core::{
        item::{ItemProcessor, ItemReader},
        step::StepBuilder,
        transaction::{NoTransaction, TransactionManager, WorkScope},
    },
    item::memory::{CollectingWriter, IterItemReader},
    notification::NotificationPayload,
    platform::{CourseCatalog, IdentityStore, UserDirectory},
};

use super::{
    processor::{EnrollmentOutcome, EnrollmentProcessor},
    row::{ENROLL_HEADER, EnrollmentRow},
    single::{EnrollRequest, SingleEnrollment, UnenrollRequest},
};

static NO_TRANSACTION: NoTransaction = NoTransaction;

/// Result table and notifications of one enrollment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentReport {
    /// One row per input row, in input order, without the header
    pub output_table: Vec<Vec<String>>,
    pub notifications: Vec<NotificationPayload>,
}

impl EnrollmentReport {
    fn from_outcomes(outcomes: Vec<EnrollmentOutcome>) -> Self {
        let mut report = EnrollmentReport::default();
        for outcome in outcomes {
            report.output_table.push(outcome.output_row());
            report.notifications.extend(outcome.notification);
        }
        report
    }

    pub fn header() -> &'static [&'static str] {
        &ENROLL_HEADER
    }

    /// Status column of every row.
    pub fn statuses(&self) -> Vec<&str> {
        self.output_table
            .iter()
            .filter_map(|row| row.last().map(String::as_str))
            .collect()
    }

    /// Writes the header and the result rows as a `;` delimited table.
    #[cfg(feature = "csv")]
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<W, BatchError> {
        crate::template::write_table(Self::header(), &self.output_table, writer)
    }
}

/// Bulk enrollment of people identified by national ID.
///
/// Every call runs in a single unit of work: row statuses never undo
/// anything, an error escaping the batch rolls back every account, identity
/// and enrollment it created.
pub struct EnrollmentBatch<'a> {
    users: &'a dyn UserDirectory,
    identities: Option<&'a dyn IdentityStore>,
    catalog: &'a dyn CourseCatalog,
    transactions: &'a dyn TransactionManager,
    mode: EnrollMode,
    config: BatchConfig,
}

impl<'a> EnrollmentBatch<'a> {
    fn identities(&self) -> Result<&'a dyn IdentityStore, BatchError> {
        self.identities.ok_or_else(|| {
            BatchError::FeatureUnavailable("identity storage is not installed".to_string())
        })
    }

    fn processor(&self, mode: EnrollMode) -> Result<EnrollmentProcessor<'a>, BatchError> {
        EnrollmentProcessor::new(self.users, self.identities()?, self.catalog, mode, &self.config)
    }

    /// Processes in-memory rows.
    pub fn process(&self, rows: Vec<EnrollmentRow>) -> Result<EnrollmentReport, BatchError> {
        self.run(&IterItemReader::new(rows))
    }

    /// Processes every row `reader` yields.
    ///
    /// # Errors
    /// `BatchError::FeatureUnavailable` before reading anything when no
    /// identity store is configured, or the first collaborator failure, in
    /// which case the unit of work is rolled back.
    pub fn run(&self, reader: &dyn ItemReader<EnrollmentRow>) -> Result<EnrollmentReport, BatchError> {
        let processor = self.processor(self.mode)?;
        let writer = CollectingWriter::new();

        let scope = WorkScope::begin(self.transactions)?;
        let step = StepBuilder::new("enroll")
            .reader(reader)
            .processor(&processor)
            .writer(&writer)
            .chunk(self.config.chunk_size)
            .build()?;
        let execution = step.execute()?;
        scope.commit()?;

        let report = EnrollmentReport::from_outcomes(writer.into_items());
        info!(
            "Enrollment batch done in {:?}: {} rows, {} notifications",
            execution.duration,
            report.output_table.len(),
            report.notifications.len()
        );
        Ok(report)
    }

    /// Enrolls one person with the same rules as a batch row.
    pub fn enroll_one(&self, request: &EnrollRequest) -> Result<SingleEnrollment, BatchError> {
        let identities = self.identities()?;
        let mode = request.validate(self.catalog, &self.config.email_regex()?)?;
        let processor =
            EnrollmentProcessor::new(self.users, identities, self.catalog, mode, &self.config)?;

        let scope = WorkScope::begin(self.transactions)?;
        let outcome = processor.process(&request.to_row())?;
        scope.commit()?;

        Ok(SingleEnrollment {
            status: outcome.status,
            username: outcome.username,
            notification: outcome.notification,
        })
    }

    /// Removes the enrollment of the account linked to a registered national ID.
    pub fn unenroll(&self, request: &UnenrollRequest) -> Result<(), BatchError> {
        let (record, course) = request.validate(self.identities()?, self.catalog)?;

        let scope = WorkScope::begin(self.transactions)?;
        self.catalog.unenroll(&record.account, &course)?;
        scope.commit()?;

        info!("{} unenrolled from {}", record.account.username, course);
        Ok(())
    }
}

pub struct EnrollmentBatchBuilder<'a> {
    users: Option<&'a dyn UserDirectory>,
    identities: Option<&'a dyn IdentityStore>,
    catalog: Option<&'a dyn CourseCatalog>,
    transactions: &'a dyn TransactionManager,
    mode: EnrollMode,
    config: BatchConfig,
}

impl Default for EnrollmentBatchBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EnrollmentBatchBuilder<'a> {
    pub fn new() -> Self {
        Self {
            users: None,
            identities: None,
            catalog: None,
            transactions: &NO_TRANSACTION,
            mode: EnrollMode::default(),
            config: BatchConfig::default(),
        }
    }

    pub fn users(mut self, users: &'a dyn UserDirectory) -> Self {
        self.users = Some(users);
        self
    }

    /// Without an identity store the batch refuses to run.
    pub fn identities(mut self, identities: &'a dyn IdentityStore) -> Self {
        self.identities = Some(identities);
        self
    }

    pub fn catalog(mut self, catalog: &'a dyn CourseCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn transactions(mut self, transactions: &'a dyn TransactionManager) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn mode(mut self, mode: EnrollMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<EnrollmentBatch<'a>, BatchError> {
        let users = self
            .users
            .ok_or_else(|| BatchError::Configuration("enrollment batch has no users".to_string()))?;
        let catalog = self.catalog.ok_or_else(|| {
            BatchError::Configuration("enrollment batch has no course catalog".to_string())
        })?;
        self.config.email_regex()?;

        Ok(EnrollmentBatch {
            users,
            identities: self.identities,
            catalog,
            transactions: self.transactions,
            mode: self.mode,
            config: self.config,
        })
    }
}
