//! # Vitae Document
//!
//! Resume document model for the Vitae live editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ ResumeData: keyless JSON shape              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore: keyed document + baseline    │
//! │  - Stable item keys (never index-based)     │
//! │  - Validated mutations                      │
//! │  - Immutable snapshots (Arc)                │
//! │  - Reset / save baseline                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: propagation + pane coordination     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitae_document::{CollectionPath, DocumentStore, Item, ResumeData};
//!
//! let data = ResumeData::load("resume.json".as_ref())?;
//! let mut store = DocumentStore::new("resume", data);
//!
//! let result = store.append_item(
//!     CollectionPath::Certifications,
//!     Item::Text("CKA".to_string()),
//! )?;
//! let key = result.key.unwrap();
//!
//! store.remove_item(CollectionPath::Certifications, key)?;
//! ```

mod errors;
mod keys;
mod model;
mod mutations;
mod section;
mod store;

pub use errors::DocumentError;
pub use keys::{get_document_seed, ItemKey, KeyGenerator};
pub use model::{
    Education, Experience, Keyed, Profile, Project, ResumeData, ResumeDocument, Skill,
    SkillCategory, SkillData, SkillSet,
};
pub use mutations::{
    CollectionPath, EducationPatch, ExperiencePatch, Item, ItemKind, ItemPatch, Mutation,
    MutationError, MutationResult, ProfileField, ProjectPatch, SkillPatch,
};
pub use section::{SectionId, UnknownSection};
pub use store::DocumentStore;
