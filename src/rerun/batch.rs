use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    BatchError,
    config::BatchConfig,
    core::{
        item::{ItemProcessor, ItemReader},
        step::StepBuilder,
    },
    course_key::CourseKey,
    item::memory::{CollectingWriter, IterItemReader},
    platform::{Account, CourseAuthoring, CourseCatalog},
};

use super::{
    processor::{RerunOutcome, RerunProcessor},
    row::{RERUN_HEADER, RerunRow},
    schedule::CourseScheduleRequest,
    status::RerunStatus,
};

/// Filter value listing the reruns of every course.
pub const ALL_COURSES: &str = "all";

fn course_url(base_url: &str, course: &CourseKey) -> String {
    format!("{}course/{}", base_url, course)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerunReport {
    /// One row per input row, in input order, without the header
    pub output_table: Vec<Vec<String>>,
}

impl RerunReport {
    pub fn header() -> &'static [&'static str] {
        &RERUN_HEADER
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.output_table
            .iter()
            .filter_map(|row| row.last().map(String::as_str))
            .collect()
    }

    #[cfg(feature = "csv")]
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<W, BatchError> {
        crate::template::write_table(Self::header(), &self.output_table, writer)
    }
}

/// A single rerun, as submitted through the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerunRequest {
    pub source_course: String,
    pub new_course: String,
    pub display_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl RerunRequest {
    pub fn to_row(&self) -> RerunRow {
        RerunRow::from(vec![
            self.source_course.clone(),
            self.new_course.clone(),
            self.display_name.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RerunResponse {
    pub status: RerunStatus,
    pub new_course_url: Option<String>,
}

/// A rerun still being processed by the authoring side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRerun {
    pub new_course_id: String,
    pub origen_course_id: String,
    pub display_name: String,
    pub state: String,
    pub new_course_url: String,
}

/// Bulk course reruns requested by one user.
pub struct RerunBatch<'a> {
    authoring: &'a dyn CourseAuthoring,
    catalog: &'a dyn CourseCatalog,
    config: BatchConfig,
}

impl<'a> RerunBatch<'a> {
    pub fn process(&self, user: &Account, rows: Vec<RerunRow>) -> Result<RerunReport, BatchError> {
        self.run(user, &IterItemReader::new(rows))
    }

    /// Validates every row `reader` yields and starts the valid reruns.
    pub fn run(
        &self,
        user: &Account,
        reader: &dyn ItemReader<RerunRow>,
    ) -> Result<RerunReport, BatchError> {
        let processor = RerunProcessor::new(user, self.authoring, self.catalog);
        let writer = CollectingWriter::new();

        let step = StepBuilder::new("rerun")
            .reader(reader)
            .processor(&processor)
            .writer(&writer)
            .chunk(self.config.chunk_size)
            .build()?;
        let execution = step.execute()?;

        let output_table: Vec<Vec<String>> = writer
            .into_items()
            .iter()
            .map(RerunOutcome::output_row)
            .collect();
        info!(
            "Rerun batch done in {:?}: {} rows",
            execution.duration,
            output_table.len()
        );

        Ok(RerunReport { output_table })
    }

    /// One rerun with the same rules as a batch row. The URL points to the
    /// new course once the rerun started.
    pub fn rerun_one(
        &self,
        user: &Account,
        request: &RerunRequest,
        base_url: &str,
    ) -> Result<RerunResponse, BatchError> {
        let processor = RerunProcessor::new(user, self.authoring, self.catalog);
        let outcome = processor.process(&request.to_row())?;

        Ok(RerunResponse {
            status: outcome.status,
            new_course_url: outcome
                .new_course
                .as_ref()
                .map(|course| course_url(base_url, course)),
        })
    }

    /// Reruns in progress, for every course or for one source course.
    pub fn pending_reruns(
        &self,
        filter: &str,
        base_url: &str,
    ) -> Result<Vec<PendingRerun>, BatchError> {
        let source = if filter == ALL_COURSES {
            None
        } else {
            Some(filter.trim().parse::<CourseKey>().map_err(|_| {
                BatchError::Validation(vec![format!(
                    "course: Course key not valid or dont exists: {}",
                    filter
                )])
            })?)
        };

        let pending = self
            .authoring
            .in_process_reruns()?
            .into_iter()
            .filter(|rerun| source.as_ref().is_none_or(|key| rerun.source_course == *key))
            .map(|rerun| PendingRerun {
                new_course_url: course_url(base_url, &rerun.new_course),
                new_course_id: rerun.new_course.to_string(),
                origen_course_id: rerun.source_course.to_string(),
                display_name: rerun.display_name,
                state: rerun.state,
            })
            .collect();

        Ok(pending)
    }

    /// Moves the start and end dates of an existing course.
    pub fn update_schedule(
        &self,
        user: &Account,
        request: &CourseScheduleRequest,
    ) -> Result<(), BatchError> {
        let course = request
            .course_key()
            .filter(|course| self.catalog.course_exists(course))
            .ok_or_else(|| {
                BatchError::Validation(vec![format!(
                    "course: Course key not valid or dont exists: {}",
                    request.course
                )])
            })?;
        let schedule = request.schedule()?;

        if !self.authoring.has_permission(user, &course) {
            return Err(BatchError::Validation(vec![format!(
                "course: User has no permission in the course: {}",
                course
            )]));
        }

        self.authoring.update_schedule(user, &course, &schedule)?;
        info!("Schedule of {} updated by {}", course, user.username);
        Ok(())
    }
}

#[derive(Default)]
pub struct RerunBatchBuilder<'a> {
    authoring: Option<&'a dyn CourseAuthoring>,
    catalog: Option<&'a dyn CourseCatalog>,
    config: BatchConfig,
}

impl<'a> RerunBatchBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authoring(mut self, authoring: &'a dyn CourseAuthoring) -> Self {
        self.authoring = Some(authoring);
        self
    }

    pub fn catalog(mut self, catalog: &'a dyn CourseCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<RerunBatch<'a>, BatchError> {
        Ok(RerunBatch {
            authoring: self.authoring.ok_or_else(|| {
                BatchError::Configuration("rerun batch has no authoring service".to_string())
            })?,
            catalog: self.catalog.ok_or_else(|| {
                BatchError::Configuration("rerun batch has no course catalog".to_string())
            })?,
            config: self.config,
        })
    }
}
