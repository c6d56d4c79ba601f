//! The school registry: id assignment plus the proximity query.

use crate::error::RegistryError;
use crate::geo::{haversine_km, Coordinates};
use crate::school::{seed_schools, RankedSchool, School, SchoolDraft};
use crate::store::{validate_records, MemoryStore, SchoolStore};

/// Owns a store and the id counter. Callers sharing one across threads
/// wrap the whole registry in a single lock.
pub struct Registry {
    store: Box<dyn SchoolStore>,
    next_id: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Registry {
    /// A fresh in-memory registry holding the seed schools; the next id is 4.
    pub fn in_memory() -> Self {
        let seeds = seed_schools();
        let next_id = seeds.len() as u64 + 1;
        Self {
            store: Box::new(MemoryStore::with_schools(seeds)),
            next_id,
        }
    }

    /// Open a registry over `store`, seeding it first if it is empty.
    ///
    /// Existing records are checked for unique ids and valid fields, and the
    /// id counter resumes after the largest one.
    pub fn open(mut store: Box<dyn SchoolStore>) -> Result<Self, RegistryError> {
        if store.is_empty() {
            for school in seed_schools() {
                store.insert(school)?;
            }
            tracing::info!(count = store.len(), "seeded empty school registry");
        }
        validate_records(store.all())?;

        let max_id = store.all().iter().map(|s| s.id).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(RegistryError::IdsExhausted(max_id))?;
        Ok(Self { store, next_id })
    }

    /// Validate `draft` and store it under the next id.
    ///
    /// Validation finishes before anything is touched, so a rejected draft
    /// leaves the registry unchanged. An id handed to a failed store write is
    /// not reused.
    pub fn register(&mut self, draft: &SchoolDraft) -> Result<School, RegistryError> {
        let valid = draft.validate()?;
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(RegistryError::IdsExhausted(self.next_id))?;
        let school = School {
            id: self.next_id,
            name: valid.name,
            address: valid.address,
            latitude: valid.location.latitude(),
            longitude: valid.location.longitude(),
        };
        self.next_id = following;
        self.store.insert(school.clone())?;
        Ok(school)
    }

    /// Every school, nearest to `origin` first. Equal distances keep
    /// insertion order.
    pub fn list_by_proximity(&self, origin: Coordinates) -> Vec<RankedSchool> {
        let mut ranked: Vec<RankedSchool> = self
            .store
            .all()
            .iter()
            .map(|school| RankedSchool {
                distance: haversine_km(
                    origin.latitude(),
                    origin.longitude(),
                    school.latitude,
                    school.longitude,
                ),
                school: school.clone(),
            })
            .collect();
        // Stable, so equal distances keep insertion order.
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        ranked
    }

    pub fn get(&self, id: u64) -> Option<&School> {
        self.store.all().iter().find(|s| s.id == id)
    }

    /// Every school in insertion order.
    pub fn schools(&self) -> &[School] {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
