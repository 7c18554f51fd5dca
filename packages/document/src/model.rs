//! # Resume Model
//!
//! Two shapes of the same resume:
//!
//! - [`ResumeData`]: the plain, keyless form that is loaded from and saved
//!   to JSON.
//! - [`ResumeDocument`]: the editable form. Every list item is wrapped in
//!   [`Keyed`] so edits address items by key, never by index.

use crate::keys::{ItemKey, KeyGenerator};
use crate::section::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub period: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub school: String,
    pub degree: String,
    #[serde(default)]
    pub location: String,
    pub period: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The fixed set of skill categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Cloud,
    Databases,
    Analytics,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Cloud,
        SkillCategory::Databases,
        SkillCategory::Analytics,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillData {
    #[serde(default)]
    pub frontend: Vec<Skill>,
    #[serde(default)]
    pub backend: Vec<Skill>,
    #[serde(default)]
    pub cloud: Vec<Skill>,
    #[serde(default)]
    pub databases: Vec<Skill>,
    #[serde(default)]
    pub analytics: Vec<Skill>,
}

/// Keyless resume as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub profile: Profile,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: SkillData,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub additional_info: Vec<String>,
}

impl ResumeData {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Load resume data from a JSON file
    pub fn load(path: &Path) -> Result<Self, crate::DocumentError> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&source)?)
    }
}

/// A list item paired with its stable key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyed<T> {
    pub key: ItemKey,
    pub value: T,
}

impl<T> Keyed<T> {
    pub fn new(key: ItemKey, value: T) -> Self {
        Self { key, value }
    }
}

fn keyed<T>(items: Vec<T>, keys: &mut KeyGenerator) -> Vec<Keyed<T>> {
    items
        .into_iter()
        .map(|value| Keyed::new(keys.next_key(), value))
        .collect()
}

fn unkeyed<T: Clone>(items: &[Keyed<T>]) -> Vec<T> {
    items.iter().map(|item| item.value.clone()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSet {
    pub frontend: Vec<Keyed<Skill>>,
    pub backend: Vec<Keyed<Skill>>,
    pub cloud: Vec<Keyed<Skill>>,
    pub databases: Vec<Keyed<Skill>>,
    pub analytics: Vec<Keyed<Skill>>,
}

impl SkillSet {
    pub fn category(&self, category: SkillCategory) -> &Vec<Keyed<Skill>> {
        match category {
            SkillCategory::Frontend => &self.frontend,
            SkillCategory::Backend => &self.backend,
            SkillCategory::Cloud => &self.cloud,
            SkillCategory::Databases => &self.databases,
            SkillCategory::Analytics => &self.analytics,
        }
    }

    pub fn category_mut(&mut self, category: SkillCategory) -> &mut Vec<Keyed<Skill>> {
        match category {
            SkillCategory::Frontend => &mut self.frontend,
            SkillCategory::Backend => &mut self.backend,
            SkillCategory::Cloud => &mut self.cloud,
            SkillCategory::Databases => &mut self.databases,
            SkillCategory::Analytics => &mut self.analytics,
        }
    }

    pub fn len(&self) -> usize {
        SkillCategory::ALL
            .iter()
            .map(|category| self.category(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Editable resume with stable item keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub profile: Profile,
    pub experience: Vec<Keyed<Experience>>,
    pub skills: SkillSet,
    pub education: Vec<Keyed<Education>>,
    pub projects: Vec<Keyed<Project>>,
    pub certifications: Vec<Keyed<String>>,
    pub additional_info: Vec<Keyed<String>>,
}

impl ResumeDocument {
    /// Build a keyed document, drawing a fresh key for every item
    pub fn from_data(data: ResumeData, keys: &mut KeyGenerator) -> Self {
        let ResumeData {
            profile,
            experience,
            skills,
            education,
            projects,
            certifications,
            additional_info,
        } = data;

        Self {
            profile,
            experience: keyed(experience, keys),
            skills: SkillSet {
                frontend: keyed(skills.frontend, keys),
                backend: keyed(skills.backend, keys),
                cloud: keyed(skills.cloud, keys),
                databases: keyed(skills.databases, keys),
                analytics: keyed(skills.analytics, keys),
            },
            education: keyed(education, keys),
            projects: keyed(projects, keys),
            certifications: keyed(certifications, keys),
            additional_info: keyed(additional_info, keys),
        }
    }

    /// Strip keys for saving
    pub fn to_data(&self) -> ResumeData {
        ResumeData {
            profile: self.profile.clone(),
            experience: unkeyed(&self.experience),
            skills: SkillData {
                frontend: unkeyed(&self.skills.frontend),
                backend: unkeyed(&self.skills.backend),
                cloud: unkeyed(&self.skills.cloud),
                databases: unkeyed(&self.skills.databases),
                analytics: unkeyed(&self.skills.analytics),
            },
            education: unkeyed(&self.education),
            projects: unkeyed(&self.projects),
            certifications: unkeyed(&self.certifications),
            additional_info: unkeyed(&self.additional_info),
        }
    }

    /// Number of entries rendered under a section (the profile is one record)
    pub fn section_len(&self, section: SectionId) -> usize {
        match section {
            SectionId::Profile => 1,
            SectionId::Experience => self.experience.len(),
            SectionId::Skills => self.skills.len(),
            SectionId::Education => self.education.len(),
            SectionId::Projects => self.projects.len(),
            SectionId::Certifications => self.certifications.len(),
            SectionId::AdditionalInfo => self.additional_info.len(),
        }
    }
}
