//! # Document Store
//!
//! Holds the editable resume and its pristine baseline.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Key → Edit → Save / Reset
//!   ↓     ↓      ↓        ↓
//! JSON  Keys  Mutations  Baseline
//! ```
//!
//! Every successful operation swaps in a new `Arc<ResumeDocument>`.
//! Snapshots handed out earlier never change underneath their holders.

use crate::keys::{ItemKey, KeyGenerator};
use crate::model::{ResumeData, ResumeDocument};
use crate::mutations::{CollectionPath, Item, ItemPatch, Mutation, MutationResult, ProfileField};
use crate::DocumentError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Editable resume plus the snapshot it can be reset to
#[derive(Debug)]
pub struct DocumentStore {
    /// Current version number (increments on each change)
    version: u64,

    current: Arc<ResumeDocument>,

    /// Last saved (or initial) document
    pristine: Arc<ResumeDocument>,

    keys: KeyGenerator,
}

impl DocumentStore {
    /// Create a store from keyless resume data
    pub fn new(label: &str, data: ResumeData) -> Self {
        let mut keys = KeyGenerator::new(label);
        let document = Arc::new(ResumeDocument::from_data(data, &mut keys));

        Self {
            version: 0,
            current: Arc::clone(&document),
            pristine: document,
            keys,
        }
    }

    /// Load resume data from a JSON file
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let data = ResumeData::load(path)?;
        let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or("resume");
        Ok(Self::new(label, data))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current document value
    pub fn current(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.current)
    }

    /// Baseline used by [`DocumentStore::reset`]
    pub fn pristine(&self) -> Arc<ResumeDocument> {
        Arc::clone(&self.pristine)
    }

    /// Check if the document differs from its baseline
    pub fn is_dirty(&self) -> bool {
        !Arc::ptr_eq(&self.current, &self.pristine) && self.current != self.pristine
    }

    /// Apply a mutation, producing a new document value
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, DocumentError> {
        mutation.validate(&self.current)?;

        let mut next = ResumeDocument::clone(&self.current);
        let key = mutation.apply(&mut next, &mut self.keys)?;

        self.current = Arc::new(next);
        self.version += 1;
        debug!(version = self.version, ?mutation, "Applied mutation");

        Ok(MutationResult {
            version: self.version,
            document: self.current(),
            key,
        })
    }

    pub fn set_field(
        &mut self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<MutationResult, DocumentError> {
        self.apply(Mutation::SetField {
            field,
            value: value.into(),
        })
    }

    pub fn append_item(
        &mut self,
        collection: CollectionPath,
        item: Item,
    ) -> Result<MutationResult, DocumentError> {
        self.apply(Mutation::AppendItem { collection, item })
    }

    pub fn remove_item(
        &mut self,
        collection: CollectionPath,
        key: ItemKey,
    ) -> Result<MutationResult, DocumentError> {
        self.apply(Mutation::RemoveItem { collection, key })
    }

    pub fn update_item(
        &mut self,
        collection: CollectionPath,
        key: ItemKey,
        patch: ItemPatch,
    ) -> Result<MutationResult, DocumentError> {
        self.apply(Mutation::UpdateItem {
            collection,
            key,
            patch,
        })
    }

    /// Replace the current document with a snapshot
    pub fn reset_to(&mut self, snapshot: Arc<ResumeDocument>) -> Arc<ResumeDocument> {
        self.current = snapshot;
        self.version += 1;
        debug!(version = self.version, "Reset document to snapshot");
        self.current()
    }

    /// Discard all edits since the last save
    pub fn reset(&mut self) -> Arc<ResumeDocument> {
        let pristine = self.pristine();
        self.reset_to(pristine)
    }

    /// Promote the current document to the new baseline
    pub fn mark_saved(&mut self) -> Arc<ResumeDocument> {
        self.pristine = self.current();
        self.current()
    }
}
