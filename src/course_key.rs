use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::BatchError;

const COURSE_V1_PREFIX: &str = "course-v1:";

fn is_valid_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '~' | '.' | ':'))
}

/// Identifier of a course run: organization, course number and run.
///
/// Two textual forms are understood, `course-v1:ORG+COURSE+RUN` and the
/// deprecated `ORG/COURSE/RUN`. A key renders back in the form it was parsed
/// from.
///
/// ```
/// use bulk_enroll_rs::course_key::CourseKey;
///
/// let key: CourseKey = "course-v1:mss+999+2022".parse().unwrap();
/// assert_eq!(key.org(), "mss");
/// assert_eq!(key.wiki_slug(), "mss.999.2022");
/// assert_eq!(key.to_string(), "course-v1:mss+999+2022");
///
/// assert!("course-v2:eol+Test202+2022_2".parse::<CourseKey>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseKey {
    org: String,
    course: String,
    run: String,
    deprecated: bool,
}

impl CourseKey {
    pub fn new(org: &str, course: &str, run: &str) -> Result<Self, BatchError> {
        format!("course-v1:{}+{}+{}", org, course, run).parse()
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn run(&self) -> &str {
        &self.run
    }

    pub fn wiki_slug(&self) -> String {
        format!("{}.{}.{}", self.org, self.course, self.run)
    }
}

impl FromStr for CourseKey {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parts, deprecated): (Vec<&str>, bool) = match s.strip_prefix(COURSE_V1_PREFIX) {
            Some(rest) => (rest.split('+').collect(), false),
            None => (s.split('/').collect(), true),
        };

        match parts.as_slice() {
            [org, course, run] if parts.iter().all(|part| is_valid_part(part)) => Ok(CourseKey {
                org: org.to_string(),
                course: course.to_string(),
                run: run.to_string(),
                deprecated,
            }),
            _ => Err(BatchError::Validation(vec![format!(
                "Invalid course key: {}",
                s
            )])),
        }
    }
}

impl TryFrom<String> for CourseKey {
    type Error = BatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseKey> for String {
    fn from(key: CourseKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deprecated {
            write!(f, "{}/{}/{}", self.org, self.course, self.run)
        } else {
            write!(f, "course-v1:{}+{}+{}", self.org, self.course, self.run)
        }
    }
}
