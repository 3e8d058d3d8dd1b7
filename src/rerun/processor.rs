use log::{debug, error, info};

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    course_key::CourseKey,
    platform::{Account, CourseAuthoring, CourseCatalog, RerunFields},
};

use super::{row::RerunRow, schedule::parse_date_range, status::RerunStatus};

/// Result of one rerun row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RerunOutcome {
    pub fields: Vec<String>,
    pub status: RerunStatus,
    /// Set once the authoring side accepted the rerun
    pub new_course: Option<CourseKey>,
}

impl RerunOutcome {
    fn rejected(row: &RerunRow, status: RerunStatus) -> Self {
        RerunOutcome {
            fields: row.padded(),
            status,
            new_course: None,
        }
    }

    pub fn output_row(&self) -> Vec<String> {
        let mut output = self.fields.clone();
        output.push(self.status.to_string());
        output
    }
}

/// Validates rerun rows on behalf of `user` and hands valid ones to the
/// authoring collaborator.
pub struct RerunProcessor<'a> {
    user: &'a Account,
    authoring: &'a dyn CourseAuthoring,
    catalog: &'a dyn CourseCatalog,
}

impl<'a> RerunProcessor<'a> {
    pub fn new(
        user: &'a Account,
        authoring: &'a dyn CourseAuthoring,
        catalog: &'a dyn CourseCatalog,
    ) -> Self {
        RerunProcessor {
            user,
            authoring,
            catalog,
        }
    }

    fn existing_course(&self, raw: &str) -> Option<CourseKey> {
        raw.trim()
            .parse::<CourseKey>()
            .ok()
            .filter(|course| self.catalog.course_exists(course))
    }
}

impl ItemProcessor<RerunRow, RerunOutcome> for RerunProcessor<'_> {
    fn process(&self, row: &RerunRow) -> ItemProcessorResult<RerunOutcome> {
        if !row.is_complete() {
            return Ok(RerunOutcome::rejected(row, RerunStatus::MissingData));
        }

        let Ok(target) = row.new_course_id().trim().parse::<CourseKey>() else {
            debug!("Malformed new course id: {}", row.new_course_id());
            return Ok(RerunOutcome::rejected(row, RerunStatus::InvalidNewCourse));
        };

        let Some(source) = self.existing_course(row.source_course_id()) else {
            debug!("Unknown source course: {}", row.source_course_id());
            return Ok(RerunOutcome::rejected(row, RerunStatus::InvalidSourceCourse));
        };

        if self.catalog.course_exists(&target) {
            return Ok(RerunOutcome::rejected(row, RerunStatus::NewCourseExists));
        }

        if !self.authoring.has_permission(self.user, &source) {
            debug!("{} has no permission on {}", self.user.username, source);
            return Ok(RerunOutcome::rejected(row, RerunStatus::PermissionDenied));
        }

        let Some((start, end)) = parse_date_range(row.start_time(), row.end_time()) else {
            return Ok(RerunOutcome::rejected(row, RerunStatus::InvalidDates));
        };

        let fields = RerunFields {
            display_name: row.display_name().trim().to_string(),
            start,
            end,
            wiki_slug: target.wiki_slug(),
        };

        // Authoring failures are reported on the row, the batch goes on
        let new_course = match self
            .authoring
            .rerun_course(self.user, &source, &target, &fields)
        {
            Ok(new_course) => new_course,
            Err(err) => {
                error!("Rerun of {} into {} failed: {}", source, target, err);
                None
            }
        };

        match new_course {
            Some(new_course) => {
                info!("Rerun of {} into {} started", source, new_course);
                Ok(RerunOutcome {
                    fields: row.padded(),
                    status: RerunStatus::Processing,
                    new_course: Some(new_course),
                })
            }
            None => Ok(RerunOutcome::rejected(row, RerunStatus::RerunFailed)),
        }
    }
}
