//! In-memory `CourseSource` for traversal tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{
    Course, CourseSource, ModuleItemType, RemoteFile, RemoteFolder, RemoteModule,
    RemoteModuleItem,
};
use crate::error::{Error, Result};

/// Collects formatted `tracing` output for assertions.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route events on this thread here until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn count_lines(&self, needle: &str) -> usize {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Failure to inject for a listing call.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    Unauthorized,
    NotFound,
    Other,
}

impl Fault {
    fn to_error(self, what: &str) -> Error {
        match self {
            Fault::Unauthorized => Error::Unauthorized(format!("{} forbidden", what)),
            Fault::NotFound => Error::NotFound(what.to_string()),
            Fault::Other => Error::Api(format!("{} exploded", what)),
        }
    }
}

#[derive(Default)]
pub struct FakeSource {
    pub courses: HashMap<u64, Course>,
    pub folders: HashMap<u64, Vec<RemoteFolder>>,
    pub folder_files: HashMap<u64, Vec<RemoteFile>>,
    pub subfolders: HashMap<u64, Vec<RemoteFolder>>,
    pub modules: HashMap<u64, Vec<RemoteModule>>,
    pub module_items: HashMap<u64, Vec<RemoteModuleItem>>,
    pub files: HashMap<u64, RemoteFile>,

    pub course_faults: HashMap<u64, Fault>,
    pub folder_list_faults: HashMap<u64, Fault>,
    pub file_list_faults: HashMap<u64, Fault>,
    pub subfolder_faults: HashMap<u64, Fault>,
    pub module_list_faults: HashMap<u64, Fault>,
    pub module_item_faults: HashMap<u64, Fault>,
    pub file_faults: HashMap<u64, Fault>,

    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of API calls served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_course(&mut self, id: u64, name: &str) {
        self.courses.insert(
            id,
            Course {
                id,
                name: name.to_string(),
            },
        );
    }

    /// Register a course's folder list; the root is `course files`.
    pub fn add_root_folder(&mut self, course_id: u64, folder_id: u64) {
        self.folders
            .entry(course_id)
            .or_default()
            .push(folder("course files", "course files", folder_id));
    }

    pub fn add_subfolder(&mut self, parent_id: u64, folder_id: u64, name: &str) {
        self.subfolders
            .entry(parent_id)
            .or_default()
            .push(folder(name, name, folder_id));
    }

    pub fn add_folder_file(&mut self, folder_id: u64, file: RemoteFile) {
        self.folder_files.entry(folder_id).or_default().push(file);
    }

    pub fn add_module(&mut self, course_id: u64, module_id: u64, name: &str) {
        self.modules.entry(course_id).or_default().push(RemoteModule {
            id: module_id,
            name: name.to_string(),
        });
    }

    pub fn add_module_item(
        &mut self,
        module_id: u64,
        item_id: u64,
        item_type: ModuleItemType,
        content_id: Option<u64>,
    ) {
        self.module_items
            .entry(module_id)
            .or_default()
            .push(RemoteModuleItem {
                id: item_id,
                item_type,
                content_id,
            });
    }

    pub fn add_file(&mut self, file: RemoteFile) {
        self.files.insert(file.id, file);
    }
}

pub fn folder(name: &str, full_name: &str, id: u64) -> RemoteFolder {
    RemoteFolder {
        id,
        name: name.to_string(),
        full_name: full_name.to_string(),
    }
}

pub fn remote_file(id: u64, name: &str, url: Option<String>) -> RemoteFile {
    RemoteFile {
        id,
        display_name: name.to_string(),
        url,
    }
}

#[async_trait]
impl CourseSource for FakeSource {
    async fn list_courses(&self, _enrollment_states: &[String]) -> Result<Vec<Course>> {
        self.hit();
        let mut courses: Vec<_> = self.courses.values().cloned().collect();
        courses.sort_by_key(|c| c.id);
        Ok(courses)
    }

    async fn get_course(&self, course_id: u64) -> Result<Course> {
        self.hit();
        if let Some(fault) = self.course_faults.get(&course_id) {
            return Err(fault.to_error("course"));
        }
        self.courses
            .get(&course_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("course {}", course_id)))
    }

    async fn list_folders(&self, course_id: u64) -> Result<Vec<RemoteFolder>> {
        self.hit();
        if let Some(fault) = self.folder_list_faults.get(&course_id) {
            return Err(fault.to_error("folders"));
        }
        Ok(self.folders.get(&course_id).cloned().unwrap_or_default())
    }

    async fn list_folder_files(&self, folder_id: u64) -> Result<Vec<RemoteFile>> {
        self.hit();
        if let Some(fault) = self.file_list_faults.get(&folder_id) {
            return Err(fault.to_error("files"));
        }
        Ok(self.folder_files.get(&folder_id).cloned().unwrap_or_default())
    }

    async fn list_subfolders(&self, folder_id: u64) -> Result<Vec<RemoteFolder>> {
        self.hit();
        if let Some(fault) = self.subfolder_faults.get(&folder_id) {
            return Err(fault.to_error("subfolders"));
        }
        Ok(self.subfolders.get(&folder_id).cloned().unwrap_or_default())
    }

    async fn list_modules(&self, course_id: u64) -> Result<Vec<RemoteModule>> {
        self.hit();
        if let Some(fault) = self.module_list_faults.get(&course_id) {
            return Err(fault.to_error("modules"));
        }
        Ok(self.modules.get(&course_id).cloned().unwrap_or_default())
    }

    async fn list_module_items(
        &self,
        _course_id: u64,
        module_id: u64,
    ) -> Result<Vec<RemoteModuleItem>> {
        self.hit();
        if let Some(fault) = self.module_item_faults.get(&module_id) {
            return Err(fault.to_error("module items"));
        }
        Ok(self.module_items.get(&module_id).cloned().unwrap_or_default())
    }

    async fn get_file(&self, file_id: u64) -> Result<RemoteFile> {
        self.hit();
        if let Some(fault) = self.file_faults.get(&file_id) {
            return Err(fault.to_error("file"));
        }
        self.files
            .get(&file_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("file {}", file_id)))
    }
}
