//! Mirroring a remote folder tree to disk.

use std::path::{Path, PathBuf};

use crate::api::{CourseSource, RemoteFolder};
use crate::download::dispatch::{BatchReport, Dispatcher};
use crate::error::{Error, Result};
use crate::fs::{child_folder, ensure_dir};

/// Depth-first folder walker.
///
/// Files of a folder are downloaded (and awaited) before its subfolders are
/// visited. An `Unauthorized` listing abandons that folder only; any other
/// listing error is returned to the caller.
pub struct FolderWalker<'a, S: CourseSource + ?Sized> {
    source: &'a S,
    dispatcher: &'a Dispatcher,
    max_depth: usize,
}

impl<'a, S: CourseSource + ?Sized> FolderWalker<'a, S> {
    pub fn new(source: &'a S, dispatcher: &'a Dispatcher, max_depth: usize) -> Self {
        Self {
            source,
            dispatcher,
            max_depth,
        }
    }

    /// Mirror `root` into the directory `local_dir`.
    ///
    /// Child directories are created as soon as their parent is listed, so
    /// every listed subfolder has a local directory even if the walk later
    /// stops on an error.
    pub async fn walk(&self, root: &RemoteFolder, local_dir: &Path) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        ensure_dir(local_dir).await?;

        let mut stack: Vec<(RemoteFolder, PathBuf, usize)> =
            vec![(root.clone(), local_dir.to_path_buf(), 0)];

        while let Some((folder, dir, depth)) = stack.pop() {
            let files = match self.source.list_folder_files(folder.id).await {
                Ok(files) => files,
                Err(e) => {
                    abandon_if_unauthorized(&folder, e)?;
                    continue;
                }
            };
            report.merge(self.dispatcher.dispatch(&files, &dir).await);

            let subfolders = match self.source.list_subfolders(folder.id).await {
                Ok(subfolders) => subfolders,
                Err(e) => {
                    abandon_if_unauthorized(&folder, e)?;
                    continue;
                }
            };

            if depth >= self.max_depth {
                for sub in &subfolders {
                    tracing::warn!(
                        "Skipping folder {} ({}): deeper than {} levels",
                        sub.full_name,
                        sub.id,
                        self.max_depth
                    );
                }
                continue;
            }

            let mut children = Vec::with_capacity(subfolders.len());
            for sub in subfolders {
                let sub_dir = child_folder(&dir, &sub.name);
                ensure_dir(&sub_dir).await?;
                children.push((sub, sub_dir, depth + 1));
            }

            // Reversed so the first listed child is visited first
            stack.extend(children.into_iter().rev());
        }

        Ok(report)
    }
}

/// Log and swallow an authorization failure; return anything else.
fn abandon_if_unauthorized(folder: &RemoteFolder, err: Error) -> Result<()> {
    if err.is_unauthorized() {
        tracing::error!("Unauthorized access to folder {}: {}", folder.id, err);
        Ok(())
    } else {
        Err(err)
    }
}
