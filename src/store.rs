//! Storage backends for school records.
//!
//! The registry only needs two things from storage: every record in
//! insertion order, and appending a new one. `MemoryStore` is what the
//! server uses by default; `JsonFileStore` keeps the list in a JSON file
//! so registrations survive a restart.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, ValidationError};
use crate::geo::Coordinates;
use crate::school::School;

pub trait SchoolStore: Send {
    /// All records, in insertion order.
    fn all(&self) -> &[School];

    fn insert(&mut self, school: School) -> Result<(), StoreError>;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// Check records that did not come through registration: ids unique,
/// name and address non-blank, coordinates in range.
pub fn validate_records(schools: &[School]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(schools.len());
    for school in schools {
        let invalid = |e: ValidationError| StoreError::InvalidRecord {
            id: school.id,
            reason: e.to_string(),
        };
        if !seen.insert(school.id) {
            return Err(StoreError::DuplicateId(school.id));
        }
        if school.name.trim().is_empty() {
            return Err(invalid(ValidationError::EmptyField("name")));
        }
        if school.address.trim().is_empty() {
            return Err(invalid(ValidationError::EmptyField("address")));
        }
        Coordinates::new(school.latitude, school.longitude).map_err(invalid)?;
    }
    Ok(())
}

/// Process-lifetime storage. Empty on every start.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schools: Vec<School>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schools(schools: Vec<School>) -> Self {
        Self { schools }
    }
}

impl SchoolStore for MemoryStore {
    fn all(&self) -> &[School] {
        &self.schools
    }

    fn insert(&mut self, school: School) -> Result<(), StoreError> {
        self.schools.push(school);
        Ok(())
    }
}

/// A JSON array of schools on disk, rewritten on every insert.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    schools: Vec<School>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first insert.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let schools = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        validate_records(&schools)?;
        tracing::debug!(path = %path.display(), count = schools.len(), "loaded school data");
        Ok(Self { path, schools })
    }

    /// ~/.school-locator/schools.json
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".school-locator")
            .join("schools.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.schools).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl SchoolStore for JsonFileStore {
    fn all(&self) -> &[School] {
        &self.schools
    }

    fn insert(&mut self, school: School) -> Result<(), StoreError> {
        self.schools.push(school);
        if let Err(e) = self.persist() {
            self.schools.pop();
            return Err(e);
        }
        Ok(())
    }
}
