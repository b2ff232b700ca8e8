//! In-memory record stores and their file layer
//!
//! Students are keyed by faculty number and programs by their normalized name.
//! Both collections share [`RecordStore`]; the per-type behavior (key, error
//! for duplicates and misses) lives in [`StoreRecord`].

pub mod file;

pub use file::{LineFailure, LoadReport, RecordFile};

use crate::core::error::{RegistryError, Result};
use crate::core::models::{Program, Student};
use crate::core::tokens::name_key;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A record that can live in a [`RecordStore`]
pub trait StoreRecord {
    /// Unique key of the record
    type Key: Ord + Clone;

    /// Key under which this record is stored
    fn store_key(&self) -> Self::Key;

    /// Error reported when a record with the same key already exists
    fn duplicate_error(&self) -> RegistryError;

    /// Error reported when no record exists for `key`
    fn missing_error(key: &Self::Key) -> RegistryError;
}

impl StoreRecord for Student {
    type Key = u32;

    fn store_key(&self) -> u32 {
        self.faculty_number()
    }

    fn duplicate_error(&self) -> RegistryError {
        RegistryError::StudentExists(self.faculty_number())
    }

    fn missing_error(key: &u32) -> RegistryError {
        RegistryError::StudentNotFound {
            faculty_number: *key,
        }
    }
}

impl StoreRecord for Program {
    type Key = String;

    fn store_key(&self) -> String {
        self.key()
    }

    fn duplicate_error(&self) -> RegistryError {
        RegistryError::ProgramExists(self.name().to_string())
    }

    fn missing_error(key: &String) -> RegistryError {
        RegistryError::ProgramNotFound { name: key.clone() }
    }
}

/// Keyed collection of records, iterated in key order
#[derive(Debug, Clone)]
pub struct RecordStore<T: StoreRecord> {
    records: BTreeMap<T::Key, T>,
}

/// Students keyed by faculty number
pub type StudentStore = RecordStore<Student>;
/// Programs keyed by normalized name
pub type ProgramStore = RecordStore<Program>;

impl<T: StoreRecord> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: StoreRecord> RecordStore<T> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in key order
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record with this key exists
    #[must_use]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.records.contains_key(key)
    }

    /// Insert a record whose key is not yet taken
    ///
    /// # Errors
    /// Returns the record's duplicate error (`StudentExists` / `ProgramExists`)
    pub fn add_new(&mut self, record: T) -> Result<()> {
        match self.records.entry(record.store_key()) {
            Entry::Occupied(_) => Err(record.duplicate_error()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.records.get(key)
    }

    /// Look up a record or fail with its not-found error
    ///
    /// # Errors
    /// Returns `StudentNotFound` / `ProgramNotFound`
    pub fn get_or_err(&self, key: &T::Key) -> Result<&T> {
        self.records.get(key).ok_or_else(|| T::missing_error(key))
    }

    /// Mutable lookup; mutation must not change the record's key
    pub(crate) fn get_mut_or_err(&mut self, key: &T::Key) -> Result<&mut T> {
        self.records.get_mut(key).ok_or_else(|| T::missing_error(key))
    }
}

impl ProgramStore {
    /// Case-insensitive lookup by program name
    ///
    /// # Errors
    /// Returns `ProgramNotFound` carrying the name as given
    pub fn find(&self, name: &str) -> Result<&Program> {
        self.records
            .get(&name_key(name))
            .ok_or_else(|| RegistryError::ProgramNotFound {
                name: name.to_string(),
            })
    }
}
