//! Mocks of the collaborators that tests drive call by call.
use mockall::mock;

use std::io::{self, Write};

use bulk_enroll_rs::{
    BatchError,
    course_key::CourseKey,
    platform::{Account, CourseAuthoring, CourseSchedule, RerunFields, RerunState},
};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub Authoring {}
    impl CourseAuthoring for Authoring {
        fn has_permission(&self, user: &Account, course: &CourseKey) -> bool;
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
}
