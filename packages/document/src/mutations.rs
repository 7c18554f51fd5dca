//! # Document Mutations
//!
//! Semantic edit operations on a [`ResumeDocument`].
//!
//! ## Mutation Semantics
//!
//! ### SetField
//! - Atomic replacement of one profile field
//! - Empty text clears optional fields (avatar, links)
//!
//! ### AppendItem
//! - Item kind must match the collection
//! - The new item always receives a fresh key
//!
//! ### RemoveItem / UpdateItem
//! - Items are addressed by key, never by index
//! - An unknown key fails without touching the document, so an edit that
//!   raced a removal cannot land on a neighbouring item

use crate::keys::{ItemKey, KeyGenerator};
use crate::model::{
    Education, Experience, Keyed, Project, ResumeDocument, Skill, SkillCategory,
};
use crate::section::SectionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Editable fields of the profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Name,
    Title,
    Location,
    Email,
    Phone,
    Bio,
    Avatar,
    /// A named social link (e.g. "github")
    Link(String),
}

/// Address of a keyed list inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionPath {
    Experience,
    Education,
    Skills(SkillCategory),
    Projects,
    Certifications,
    AdditionalInfo,
}

impl CollectionPath {
    /// Kind of item this collection holds
    pub fn item_kind(&self) -> ItemKind {
        match self {
            CollectionPath::Experience => ItemKind::Experience,
            CollectionPath::Education => ItemKind::Education,
            CollectionPath::Skills(_) => ItemKind::Skill,
            CollectionPath::Projects => ItemKind::Project,
            CollectionPath::Certifications | CollectionPath::AdditionalInfo => ItemKind::Text,
        }
    }

    /// Editing section the collection belongs to
    pub fn section(&self) -> SectionId {
        match self {
            CollectionPath::Experience => SectionId::Experience,
            CollectionPath::Education => SectionId::Education,
            CollectionPath::Skills(_) => SectionId::Skills,
            CollectionPath::Projects => SectionId::Projects,
            CollectionPath::Certifications => SectionId::Certifications,
            CollectionPath::AdditionalInfo => SectionId::AdditionalInfo,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionPath::Skills(category) => write!(f, "skills.{:?}", category),
            other => f.write_str(other.section().as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Experience,
    Education,
    Skill,
    Project,
    Text,
}

/// A new list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Item {
    Experience(Experience),
    Education(Education),
    Skill(Skill),
    Project(Project),
    Text(String),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Experience(_) => ItemKind::Experience,
            Item::Education(_) => ItemKind::Education,
            Item::Skill(_) => ItemKind::Skill,
            Item::Project(_) => ItemKind::Project,
            Item::Text(_) => ItemKind::Text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub period: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub location: Option<String>,
    pub period: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub gpa: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<u8>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub highlights: Option<Vec<String>>,
    pub link: Option<String>,
    pub image: Option<String>,
}

/// Partial update of one list item; absent fields are left unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ItemPatch {
    Experience(ExperiencePatch),
    Education(EducationPatch),
    Skill(SkillPatch),
    Project(ProjectPatch),
    Text(String),
}

impl ItemPatch {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemPatch::Experience(_) => ItemKind::Experience,
            ItemPatch::Education(_) => ItemKind::Education,
            ItemPatch::Skill(_) => ItemKind::Skill,
            ItemPatch::Project(_) => ItemKind::Project,
            ItemPatch::Text(_) => ItemKind::Text,
        }
    }
}

/// Semantic edit operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Replace one profile field
    SetField { field: ProfileField, value: String },

    /// Append an item to the end of a collection
    AppendItem { collection: CollectionPath, item: Item },

    /// Remove the item with the given key
    RemoveItem { collection: CollectionPath, key: ItemKey },

    /// Patch the item with the given key
    UpdateItem {
        collection: CollectionPath,
        key: ItemKey,
        patch: ItemPatch,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Item not found in {collection}: {key}")]
    ItemNotFound {
        collection: CollectionPath,
        key: ItemKey,
    },

    #[error("{collection} holds {expected:?} items, got {found:?}")]
    ItemKindMismatch {
        collection: CollectionPath,
        expected: ItemKind,
        found: ItemKind,
    },

    #[error("Field {0:?} cannot be empty")]
    EmptyRequiredField(ProfileField),
}

/// Outcome of a successfully applied mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// Store version after the mutation
    pub version: u64,

    /// The new document value
    pub document: Arc<ResumeDocument>,

    /// Key assigned by an append
    pub key: Option<ItemKey>,
}

impl Mutation {
    /// Check that the mutation can be applied without side effects
    pub fn validate(&self, doc: &ResumeDocument) -> Result<(), MutationError> {
        match self {
            Mutation::SetField { field, value } => match field {
                ProfileField::Name | ProfileField::Title if value.trim().is_empty() => {
                    Err(MutationError::EmptyRequiredField(field.clone()))
                }
                _ => Ok(()),
            },
            Mutation::AppendItem { collection, item } => {
                check_kind(collection, item.kind())
            }
            Mutation::RemoveItem { collection, key } => check_key(doc, collection, key),
            Mutation::UpdateItem {
                collection,
                key,
                patch,
            } => {
                check_kind(collection, patch.kind())?;
                check_key(doc, collection, key)
            }
        }
    }

    /// Apply mutation with validation, returning the key of an appended item
    pub fn apply(
        &self,
        doc: &mut ResumeDocument,
        keys: &mut KeyGenerator,
    ) -> Result<Option<ItemKey>, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::SetField { field, value } => {
                Self::apply_set_field(doc, field, value);
                Ok(None)
            }
            Mutation::AppendItem { collection, item } => {
                let key = keys.next_key();
                Self::apply_append(doc, collection, item, key.clone())?;
                Ok(Some(key))
            }
            Mutation::RemoveItem { collection, key } => {
                Self::apply_remove(doc, collection, key)?;
                Ok(None)
            }
            Mutation::UpdateItem {
                collection,
                key,
                patch,
            } => {
                Self::apply_update(doc, collection, key, patch)?;
                Ok(None)
            }
        }
    }

    fn apply_set_field(doc: &mut ResumeDocument, field: &ProfileField, value: &str) {
        let profile = &mut doc.profile;
        match field {
            ProfileField::Name => profile.name = value.to_string(),
            ProfileField::Title => profile.title = value.to_string(),
            ProfileField::Location => profile.location = value.to_string(),
            ProfileField::Email => profile.email = value.to_string(),
            ProfileField::Phone => profile.phone = value.to_string(),
            ProfileField::Bio => profile.bio = value.to_string(),
            ProfileField::Avatar => set_optional_text(&mut profile.avatar, &Some(value.to_string())),
            ProfileField::Link(label) => {
                if value.is_empty() {
                    profile.links.remove(label);
                } else {
                    profile.links.insert(label.clone(), value.to_string());
                }
            }
        }
    }

    fn apply_append(
        doc: &mut ResumeDocument,
        collection: &CollectionPath,
        item: &Item,
        key: ItemKey,
    ) -> Result<(), MutationError> {
        match (collection, item) {
            (CollectionPath::Experience, Item::Experience(value)) => {
                doc.experience.push(Keyed::new(key, value.clone()))
            }
            (CollectionPath::Education, Item::Education(value)) => {
                doc.education.push(Keyed::new(key, value.clone()))
            }
            (CollectionPath::Skills(category), Item::Skill(value)) => doc
                .skills
                .category_mut(*category)
                .push(Keyed::new(key, value.clone())),
            (CollectionPath::Projects, Item::Project(value)) => {
                doc.projects.push(Keyed::new(key, value.clone()))
            }
            (CollectionPath::Certifications, Item::Text(value)) => {
                doc.certifications.push(Keyed::new(key, value.clone()))
            }
            (CollectionPath::AdditionalInfo, Item::Text(value)) => {
                doc.additional_info.push(Keyed::new(key, value.clone()))
            }
            _ => return check_kind(collection, item.kind()),
        }
        Ok(())
    }

    fn apply_remove(
        doc: &mut ResumeDocument,
        collection: &CollectionPath,
        key: &ItemKey,
    ) -> Result<(), MutationError> {
        let removed = match collection {
            CollectionPath::Experience => remove_keyed(&mut doc.experience, key),
            CollectionPath::Education => remove_keyed(&mut doc.education, key),
            CollectionPath::Skills(category) => {
                remove_keyed(doc.skills.category_mut(*category), key)
            }
            CollectionPath::Projects => remove_keyed(&mut doc.projects, key),
            CollectionPath::Certifications => remove_keyed(&mut doc.certifications, key),
            CollectionPath::AdditionalInfo => remove_keyed(&mut doc.additional_info, key),
        };

        if removed {
            Ok(())
        } else {
            Err(not_found(collection, key))
        }
    }

    fn apply_update(
        doc: &mut ResumeDocument,
        collection: &CollectionPath,
        key: &ItemKey,
        patch: &ItemPatch,
    ) -> Result<(), MutationError> {
        let found = match (collection, patch) {
            (CollectionPath::Experience, ItemPatch::Experience(patch)) => {
                find_keyed(&mut doc.experience, key).map(|target| patch.apply_to(target))
            }
            (CollectionPath::Education, ItemPatch::Education(patch)) => {
                find_keyed(&mut doc.education, key).map(|target| patch.apply_to(target))
            }
            (CollectionPath::Skills(category), ItemPatch::Skill(patch)) => {
                find_keyed(doc.skills.category_mut(*category), key)
                    .map(|target| patch.apply_to(target))
            }
            (CollectionPath::Projects, ItemPatch::Project(patch)) => {
                find_keyed(&mut doc.projects, key).map(|target| patch.apply_to(target))
            }
            (CollectionPath::Certifications, ItemPatch::Text(text)) => {
                find_keyed(&mut doc.certifications, key).map(|target| *target = text.clone())
            }
            (CollectionPath::AdditionalInfo, ItemPatch::Text(text)) => {
                find_keyed(&mut doc.additional_info, key).map(|target| *target = text.clone())
            }
            _ => return check_kind(collection, patch.kind()),
        };

        found.ok_or_else(|| not_found(collection, key))
    }
}

impl ExperiencePatch {
    fn apply_to(&self, target: &mut Experience) {
        set(&mut target.company, &self.company);
        set(&mut target.position, &self.position);
        set_optional_text(&mut target.location, &self.location);
        set(&mut target.period, &self.period);
        set(&mut target.achievements, &self.achievements);
        set(&mut target.technologies, &self.technologies);
    }
}

impl EducationPatch {
    fn apply_to(&self, target: &mut Education) {
        set(&mut target.school, &self.school);
        set(&mut target.degree, &self.degree);
        set(&mut target.location, &self.location);
        set(&mut target.period, &self.period);
        set(&mut target.achievements, &self.achievements);
        if self.gpa.is_some() {
            target.gpa = self.gpa;
        }
    }
}

impl SkillPatch {
    fn apply_to(&self, target: &mut Skill) {
        set(&mut target.name, &self.name);
        if self.level.is_some() {
            target.level = self.level;
        }
        set_optional_text(&mut target.experience, &self.experience);
    }
}

impl ProjectPatch {
    fn apply_to(&self, target: &mut Project) {
        set(&mut target.title, &self.title);
        set(&mut target.description, &self.description);
        set(&mut target.period, &self.period);
        set(&mut target.start_date, &self.start_date);
        set(&mut target.end_date, &self.end_date);
        set(&mut target.technologies, &self.technologies);
        set(&mut target.highlights, &self.highlights);
        set_optional_text(&mut target.link, &self.link);
        set_optional_text(&mut target.image, &self.image);
    }
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

// Empty text clears the field
fn set_optional_text(slot: &mut Option<String>, value: &Option<String>) {
    match value {
        Some(text) if text.is_empty() => *slot = None,
        Some(text) => *slot = Some(text.clone()),
        None => {}
    }
}

fn find_keyed<'a, T>(items: &'a mut [Keyed<T>], key: &ItemKey) -> Option<&'a mut T> {
    items
        .iter_mut()
        .find(|item| &item.key == key)
        .map(|item| &mut item.value)
}

fn remove_keyed<T>(items: &mut Vec<Keyed<T>>, key: &ItemKey) -> bool {
    match items.iter().position(|item| &item.key == key) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

fn contains_key<T>(items: &[Keyed<T>], key: &ItemKey) -> bool {
    items.iter().any(|item| &item.key == key)
}

fn check_kind(collection: &CollectionPath, found: ItemKind) -> Result<(), MutationError> {
    let expected = collection.item_kind();
    if expected == found {
        Ok(())
    } else {
        Err(MutationError::ItemKindMismatch {
            collection: *collection,
            expected,
            found,
        })
    }
}

fn check_key(
    doc: &ResumeDocument,
    collection: &CollectionPath,
    key: &ItemKey,
) -> Result<(), MutationError> {
    let present = match collection {
        CollectionPath::Experience => contains_key(&doc.experience, key),
        CollectionPath::Education => contains_key(&doc.education, key),
        CollectionPath::Skills(category) => contains_key(doc.skills.category(*category), key),
        CollectionPath::Projects => contains_key(&doc.projects, key),
        CollectionPath::Certifications => contains_key(&doc.certifications, key),
        CollectionPath::AdditionalInfo => contains_key(&doc.additional_info, key),
    };

    if present {
        Ok(())
    } else {
        Err(not_found(collection, key))
    }
}

fn not_found(collection: &CollectionPath, key: &ItemKey) -> MutationError {
    MutationError::ItemNotFound {
        collection: *collection,
        key: key.clone(),
    }
}
