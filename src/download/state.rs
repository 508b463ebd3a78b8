//! Download statistics.

use crate::download::dispatch::BatchReport;

/// Per-course download statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub course_id: u64,
    pub course_name: String,
    pub downloaded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub bytes: u64,
}

impl DownloadStats {
    pub fn new(course_id: u64, course_name: impl Into<String>) -> Self {
        Self {
            course_id,
            course_name: course_name.into(),
            ..Default::default()
        }
    }

    /// Add a dispatched batch to the totals.
    pub fn add_batch(&mut self, batch: BatchReport) {
        self.downloaded += batch.downloaded;
        self.failed += batch.failed;
        self.skipped += batch.skipped;
        self.bytes += batch.bytes;
    }

    /// Count an item skipped before reaching the dispatcher.
    pub fn increment_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Count an item that failed before reaching the dispatcher.
    pub fn increment_failed(&mut self) {
        self.failed += 1;
    }
}

/// How processing of one course ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseOutcome {
    /// Files and modules were traversed.
    Completed(DownloadStats),
    /// The course directory already existed.
    Skipped { course_name: String },
    /// The course could not be resolved or its directory created.
    Failed { course_id: u64, reason: String },
}

/// Statistics across all courses in a run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub courses_completed: u64,
    pub courses_skipped: u64,
    pub courses_failed: u64,
    pub downloaded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub bytes: u64,
}

impl RunStats {
    /// Record the outcome of one course.
    pub fn add_outcome(&mut self, outcome: &CourseOutcome) {
        match outcome {
            CourseOutcome::Completed(stats) => {
                self.courses_completed += 1;
                self.downloaded += stats.downloaded;
                self.failed += stats.failed;
                self.skipped += stats.skipped;
                self.bytes += stats.bytes;
            }
            CourseOutcome::Skipped { .. } => self.courses_skipped += 1,
            CourseOutcome::Failed { .. } => self.courses_failed += 1,
        }
    }

    pub fn courses_total(&self) -> u64 {
        self.courses_completed + self.courses_skipped + self.courses_failed
    }
}
