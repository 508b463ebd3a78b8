//! Per-course download orchestration.

use std::path::Path;
use std::slice;

use crate::api::{Course, CourseSource, ModuleItemType, RemoteModule};
use crate::config::Config;
use crate::download::dispatch::{BatchReport, Dispatcher};
use crate::download::state::{CourseOutcome, DownloadStats};
use crate::download::walker::FolderWalker;
use crate::error::Result;
use crate::fs::{child_folder, ensure_dir, get_course_folder};

/// Full name of the folder holding a course's uploaded files.
pub const ROOT_FOLDER_NAME: &str = "course files";

/// Downloads whole courses: the `course files` tree, then module files.
pub struct CourseDownloader<'a, S: CourseSource + ?Sized> {
    source: &'a S,
    dispatcher: &'a Dispatcher,
    config: &'a Config,
}

impl<'a, S: CourseSource + ?Sized> CourseDownloader<'a, S> {
    pub fn new(source: &'a S, dispatcher: &'a Dispatcher, config: &'a Config) -> Self {
        Self {
            source,
            dispatcher,
            config,
        }
    }

    /// Download one course. Never fails; problems are logged and reflected
    /// in the returned outcome.
    ///
    /// A course whose directory already exists is skipped without any
    /// further requests.
    pub async fn download_course(&self, course_id: u64) -> CourseOutcome {
        let course = match self.source.get_course(course_id).await {
            Ok(course) => course,
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::error!("Unauthorized access to course {}: {}", course_id, e);
                } else if e.is_not_found() {
                    tracing::error!("Course {} does not exist: {}", course_id, e);
                } else {
                    tracing::error!("Error processing course {}: {}", course_id, e);
                }
                return CourseOutcome::Failed {
                    course_id,
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!("Processing course: {}", course.name);

        let course_dir = get_course_folder(self.config, &course.name);
        if tokio::fs::try_exists(&course_dir).await.unwrap_or(false) {
            tracing::info!(
                "Skipping course {} because it already has a folder.",
                course.name
            );
            return CourseOutcome::Skipped {
                course_name: course.name,
            };
        }

        if let Err(e) = ensure_dir(&course_dir).await {
            tracing::error!(
                "Cannot create {} for course {}: {}",
                course_dir.display(),
                course_id,
                e
            );
            return CourseOutcome::Failed {
                course_id,
                reason: e.to_string(),
            };
        }

        let mut stats = DownloadStats::new(course.id, course.name.clone());
        self.download_course_files(&course, &course_dir, &mut stats).await;
        self.download_modules(&course, &course_dir, &mut stats).await;

        CourseOutcome::Completed(stats)
    }

    async fn download_course_files(
        &self,
        course: &Course,
        course_dir: &Path,
        stats: &mut DownloadStats,
    ) {
        match self.walk_root_folder(course, course_dir).await {
            Ok(Some(report)) => stats.add_batch(report),
            Ok(None) => {
                tracing::info!("No '{}' folder in course {}", ROOT_FOLDER_NAME, course.id)
            }
            Err(e) if e.is_unauthorized() => {
                tracing::error!("Unauthorized access in course {}: {}", course.id, e)
            }
            Err(e) => tracing::error!("Error processing files in course {}: {}", course.id, e),
        }
    }

    async fn walk_root_folder(
        &self,
        course: &Course,
        course_dir: &Path,
    ) -> Result<Option<BatchReport>> {
        let folders = self.source.list_folders(course.id).await?;
        let Some(root) = folders.iter().find(|f| f.full_name == ROOT_FOLDER_NAME) else {
            return Ok(None);
        };

        let max_depth = self.config.options.max_folder_depth;
        FolderWalker::new(self.source, self.dispatcher, max_depth)
            .walk(root, course_dir)
            .await
            .map(Some)
    }

    async fn download_modules(
        &self,
        course: &Course,
        course_dir: &Path,
        stats: &mut DownloadStats,
    ) {
        let modules = match self.source.list_modules(course.id).await {
            Ok(modules) => modules,
            Err(e) if e.is_unauthorized() => {
                tracing::error!(
                    "Unauthorized access to modules in course {}: {}",
                    course.id,
                    e
                );
                return;
            }
            Err(e) => {
                tracing::error!("Error processing modules in course {}: {}", course.id, e);
                return;
            }
        };

        for module in &modules {
            let module_dir = child_folder(course_dir, &module.name);
            let result = match ensure_dir(&module_dir).await {
                Ok(()) => self.download_module_items(course, module, &module_dir, stats).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {}
                Err(e) if e.is_unauthorized() => tracing::error!(
                    "Unauthorized access to module items in module {} in course {}: {}",
                    module.id,
                    course.id,
                    e
                ),
                Err(e) => tracing::error!(
                    "Error processing module items in module {} in course {}: {}",
                    module.id,
                    course.id,
                    e
                ),
            }
        }
    }

    /// Fetch each file-type item of a module into `module_dir`.
    async fn download_module_items(
        &self,
        course: &Course,
        module: &RemoteModule,
        module_dir: &Path,
        stats: &mut DownloadStats,
    ) -> Result<()> {
        let items = self.source.list_module_items(course.id, module.id).await?;

        for item in items.iter().filter(|i| i.item_type == ModuleItemType::File) {
            let Some(content_id) = item.content_id else {
                tracing::warn!(
                    "No file referenced by module item {} in course {}",
                    item.id,
                    course.id
                );
                stats.increment_skipped();
                continue;
            };

            match self.source.get_file(content_id).await {
                Ok(file) if file.download_url().is_some() => {
                    let batch = self
                        .dispatcher
                        .dispatch(slice::from_ref(&file), module_dir)
                        .await;
                    stats.add_batch(batch);
                }
                Ok(_) => {
                    tracing::warn!(
                        "No URL for file in module item {} in course {}",
                        item.id,
                        course.id
                    );
                    stats.increment_skipped();
                }
                Err(e) if e.is_not_found() => {
                    tracing::warn!(
                        "File not found for module item {} in course {}",
                        item.id,
                        course.id
                    );
                    stats.increment_skipped();
                }
                Err(e) => {
                    tracing::error!(
                        "Error resolving file for module item {} in course {}: {}",
                        item.id,
                        course.id,
                        e
                    );
                    stats.increment_failed();
                }
            }
        }

        Ok(())
    }
}
